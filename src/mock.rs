//! Generators for the simulated backend.
//!
//! Every fetch in this crate resolves against data produced here: random
//! sample sets standing in for list endpoints, plus a handful of fixed seed
//! records for the sourcing workflow.

use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    Channel, Condition, Deal, DealScore, DealStatus, Item, ItemStatus, Listing, ListingStatus,
    Order, OrderStatus, Purchase, PurchaseStatus, SearchQuery, SearchQueryStatus, Shipment,
    ShipmentStatus, Source,
};

pub const ITEM_SAMPLE_SIZE: usize = 50;
pub const DEAL_SAMPLE_SIZE: usize = 25;
pub const ORDER_SAMPLE_SIZE: usize = 20;
pub const SHIPMENT_SAMPLE_SIZE: usize = 15;
pub const LISTING_SAMPLE_SIZE: usize = 15;

pub const PHOTO_PLACEHOLDER: &str = "/api/placeholder/300/300";
pub const LABEL_PLACEHOLDER: &str = "/api/placeholder/400/600";

const BRANDS: &[&str] = &[
    "Apple",
    "Samsung",
    "OnePlus",
    "Google",
    "Sony",
    "Nintendo",
    "Microsoft",
];
const MODELS: &[&str] = &[
    "iPhone 13",
    "Galaxy S21",
    "9 Pro",
    "Pixel 6",
    "WH-1000XM4",
    "Switch",
    "Surface Pro",
];
const LOCATIONS: &[&str] = &["A1-B2", "A2-C1", "B1-A3", "Storage", "Office"];
const DEAL_TITLES: &[&str] = &[
    "iPhone 13 Pro 128GB",
    "Samsung Galaxy S21",
    "OnePlus 9 Pro",
    "Google Pixel 6",
    "iPad Air 4th Gen",
    "MacBook Air M1",
    "Nintendo Switch OLED",
    "Sony WH-1000XM4",
    "AirPods Pro 2nd Gen",
    "Apple Watch Series 8",
];
const CARRIERS: &[&str] = &["Royal Mail", "DPD", "Hermes", "UPS"];
const BUYERS: &[&str] = &["buyer1", "buyer2", "buyer3", "buyer4", "buyer5"];

fn choose<T: Copy>(pool: &[T]) -> T {
    *pool
        .choose(&mut rand::thread_rng())
        .expect("pools are non-empty")
}

/// `RM` plus nine uppercase alphanumerics, the shape the carrier hands back.
pub fn tracking_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_uppercase())
        .collect();
    format!("RM{}", suffix)
}

pub fn mock_items(count: usize) -> Vec<Item> {
    let conditions = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
    ];
    let sources = [
        Source::Vinted,
        Source::Facebook,
        Source::Gumtree,
        Source::Carboot,
        Source::Charity,
    ];
    let statuses = [
        ItemStatus::InStock,
        ItemStatus::Listed,
        ItemStatus::Allocated,
        ItemStatus::Sold,
    ];

    (1..=count)
        .map(|i| {
            let mut rng = rand::thread_rng();
            let brand = choose(BRANDS);
            let model = choose(MODELS);
            let buy_price = rng.gen_range(50..550);
            let ask_price = buy_price + rng.gen_range(50..250);
            let est_resale = ask_price + rng.gen_range(0..100);
            Item {
                id: format!("item-{}", i),
                sku: format!("SKU{:04}", i),
                title: format!("{} {}", brand, model),
                brand: Some(brand.to_string()),
                model: Some(model.to_string()),
                storage_gb: None,
                condition: choose(&conditions),
                source: choose(&sources),
                buy_price: Decimal::from(buy_price),
                ask_price: Some(Decimal::from(ask_price)),
                est_resale: Some(Decimal::from(est_resale)),
                channels: vec![Channel::Vinted],
                location: Some(choose(LOCATIONS).to_string()),
                status: choose(&statuses),
                serial: None,
                photos: vec![PHOTO_PLACEHOLDER.to_string()],
                created_at: Utc::now() - Duration::minutes(rng.gen_range(0..30 * 24 * 60)),
                listed_at: None,
                notes: rng
                    .gen_bool(0.3)
                    .then(|| "Good condition, minor scratches".to_string()),
            }
        })
        .collect()
}

pub fn mock_deals(count: usize) -> Vec<Deal> {
    let scores = [DealScore::A, DealScore::B, DealScore::C, DealScore::D];

    (1..=count)
        .map(|i| {
            let mut rng = rand::thread_rng();
            let price = rng.gen_range(50..450);
            let est_resale = price + rng.gen_range(100..400);
            Deal {
                id: format!("deal-{}", i),
                source: Source::Vinted,
                title: choose(DEAL_TITLES).to_string(),
                price: Decimal::from(price),
                url: format!("https://vinted.com/items/{}", i),
                seller_rating: rng.gen_range(1..=5),
                est_resale: Decimal::from(est_resale),
                score: choose(&scores),
                age_minutes: rng.gen_range(0..120),
                photos: vec![PHOTO_PLACEHOLDER.to_string()],
                description: Some("Good condition, some wear".to_string()),
                seller: Some(format!("seller{}", i)),
                location: Some("UK".to_string()),
                status: DealStatus::PendingReview,
            }
        })
        .collect()
}

pub fn mock_orders(count: usize) -> Vec<Order> {
    let platforms = [Channel::Vinted, Channel::Ebay];
    let statuses = [
        OrderStatus::PendingPick,
        OrderStatus::LabelPending,
        OrderStatus::LabelReady,
        OrderStatus::Dispatched,
    ];

    (1..=count)
        .map(|i| {
            let mut rng = rand::thread_rng();
            let sale_price = Decimal::from(rng.gen_range(100..400));
            Order {
                id: format!("order-{}", i),
                platform: choose(&platforms),
                item_id: format!("item-{}", rng.gen_range(1..=ITEM_SAMPLE_SIZE)),
                buyer: choose(BUYERS).to_string(),
                sale_price,
                shipping_paid: Decimal::from(rng.gen_range(5..20)),
                fees_est: (sale_price * dec!(0.1)).floor(),
                created_at: Utc::now() - Duration::minutes(rng.gen_range(0..7 * 24 * 60)),
                status: choose(&statuses),
                buyer_rating: Some(rng.gen_range(1..=5)),
                notes: None,
            }
        })
        .collect()
}

pub fn mock_shipments(count: usize) -> Vec<Shipment> {
    let statuses = [
        ShipmentStatus::Pending,
        ShipmentStatus::Printing,
        ShipmentStatus::Printed,
        ShipmentStatus::Failed,
    ];

    (1..=count)
        .map(|i| {
            let mut rng = rand::thread_rng();
            Shipment {
                id: format!("shipment-{}", i),
                order_id: format!("order-{}", i),
                carrier: choose(CARRIERS).to_string(),
                label_url: rng.gen_bool(0.7).then(|| LABEL_PLACEHOLDER.to_string()),
                printer: Some("Default Printer".to_string()),
                tracking: rng.gen_bool(0.7).then(tracking_code),
                status: choose(&statuses),
                created_at: Utc::now() - Duration::minutes(rng.gen_range(0..7 * 24 * 60)),
                updated_at: Utc::now() - Duration::minutes(rng.gen_range(0..24 * 60)),
            }
        })
        .collect()
}

pub fn mock_listings(count: usize) -> Vec<Listing> {
    let platforms = [Channel::Vinted, Channel::Ebay];
    let statuses = [
        ListingStatus::Draft,
        ListingStatus::Active,
        ListingStatus::Sold,
        ListingStatus::Ended,
    ];

    (1..=count)
        .map(|i| {
            let mut rng = rand::thread_rng();
            Listing {
                id: format!("listing-{}", i),
                item_id: format!("item-{}", i),
                platform: choose(&platforms),
                title: format!("Mock Listing {}", i),
                description: "Mock description for listing".to_string(),
                price: Decimal::from(rng.gen_range(50..250)),
                photos: vec![PHOTO_PLACEHOLDER.to_string()],
                status: choose(&statuses),
                created_at: Utc::now() - Duration::minutes(rng.gen_range(0..30 * 24 * 60)),
                published_at: rng.gen_bool(0.5).then(Utc::now),
            }
        })
        .collect()
}

/// The fixed deal backlog the sourcing screen starts with. Deal "3" arrives
/// already approved, with its purchase recorded by `seed_purchases`.
pub fn seed_discovered_deals() -> Vec<Deal> {
    vec![
        Deal {
            id: "1".to_string(),
            source: Source::Vinted,
            title: "Zara Black Blazer Size L".to_string(),
            price: dec!(18.50),
            url: "https://vinted.com/items/123456".to_string(),
            seller_rating: 5,
            est_resale: dec!(44.00),
            score: DealScore::A,
            age_minutes: 45,
            photos: vec![PHOTO_PLACEHOLDER.to_string()],
            description: Some("Very good".to_string()),
            seller: Some("fashionista123".to_string()),
            location: None,
            status: DealStatus::PendingReview,
        },
        Deal {
            id: "2".to_string(),
            source: Source::Vinted,
            title: "Nike Air Max 90 Size 9".to_string(),
            price: dec!(35.00),
            url: "https://vinted.com/items/789012".to_string(),
            seller_rating: 4,
            est_resale: dec!(65.00),
            score: DealScore::B,
            age_minutes: 120,
            photos: vec![PHOTO_PLACEHOLDER.to_string()],
            description: Some("Good".to_string()),
            seller: Some("sneakerhead_uk".to_string()),
            location: None,
            status: DealStatus::PendingReview,
        },
        Deal {
            id: "3".to_string(),
            source: Source::Vinted,
            title: "Vintage Band T-Shirt".to_string(),
            price: dec!(12.00),
            url: "https://vinted.com/items/345678".to_string(),
            seller_rating: 4,
            est_resale: dec!(20.00),
            score: DealScore::C,
            age_minutes: 900,
            photos: vec![PHOTO_PLACEHOLDER.to_string()],
            description: Some("Good".to_string()),
            seller: Some("vintage_collector".to_string()),
            location: None,
            status: DealStatus::Approved,
        },
    ]
}

pub fn seed_purchases() -> Vec<Purchase> {
    vec![Purchase {
        id: "1".to_string(),
        deal_id: "3".to_string(),
        title: "Vintage Band T-Shirt".to_string(),
        price: dec!(12.00),
        seller: "vintage_collector".to_string(),
        status: PurchaseStatus::Purchased,
        purchased_at: Utc::now() - Duration::days(3),
        expected_delivery: Some((Utc::now() + Duration::days(4)).date_naive()),
        tracking_number: Some("VT123456789GB".to_string()),
    }]
}

pub fn seed_search_queries() -> Vec<SearchQuery> {
    vec![
        SearchQuery {
            id: "1".to_string(),
            query: "Zara jacket size L".to_string(),
            category: "Outerwear".to_string(),
            max_price: dec!(25),
            status: SearchQueryStatus::Active,
            last_checked: Utc::now() - Duration::hours(2),
            results_found: 12,
        },
        SearchQuery {
            id: "2".to_string(),
            query: "Nike sneakers size 9".to_string(),
            category: "Shoes".to_string(),
            max_price: dec!(40),
            status: SearchQueryStatus::Active,
            last_checked: Utc::now() - Duration::hours(3),
            results_found: 8,
        },
        SearchQuery {
            id: "3".to_string(),
            query: "Vintage band t-shirt".to_string(),
            category: "Tops".to_string(),
            max_price: dec!(15),
            status: SearchQueryStatus::Paused,
            last_checked: Utc::now() - Duration::days(1),
            results_found: 3,
        },
    ]
}
