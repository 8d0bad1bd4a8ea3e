use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_TOAST_DURATION_MS: i64 = 5_000;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Simulated round-trip latencies, in milliseconds.
///
/// All data access in this crate is mocked; these delays stand in for the
/// network and are tuned per feed to match what the dashboard expects.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    #[serde(default = "default_items_fetch_ms")]
    pub items_fetch_ms: u64,

    #[serde(default = "default_deals_fetch_ms")]
    pub deals_fetch_ms: u64,

    #[serde(default = "default_orders_fetch_ms")]
    pub orders_fetch_ms: u64,

    #[serde(default = "default_listings_fetch_ms")]
    pub listings_fetch_ms: u64,

    #[serde(default = "default_shipments_fetch_ms")]
    pub shipments_fetch_ms: u64,

    /// Time a queued label spends in the `printing` state.
    #[serde(default = "default_print_label_ms")]
    pub print_label_ms: u64,

    /// Same, for a re-queued label.
    #[serde(default = "default_retry_print_ms")]
    pub retry_print_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            items_fetch_ms: default_items_fetch_ms(),
            deals_fetch_ms: default_deals_fetch_ms(),
            orders_fetch_ms: default_orders_fetch_ms(),
            listings_fetch_ms: default_listings_fetch_ms(),
            shipments_fetch_ms: default_shipments_fetch_ms(),
            print_label_ms: default_print_label_ms(),
            retry_print_ms: default_retry_print_ms(),
        }
    }
}

/// Store-layer configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Simulated latencies for mocked I/O
    #[serde(default)]
    #[validate]
    pub latency: LatencyConfig,

    /// Default lifetime of a toast before auto-removal; <= 0 persists
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: i64,

    /// Capacity of the store event channel
    #[serde(default = "default_event_channel_capacity")]
    #[validate(custom = "validate_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency: LatencyConfig::default(),
            toast_duration_ms: default_toast_duration_ms(),
            event_channel_capacity: default_event_channel_capacity(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl StoreConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn default_items_fetch_ms() -> u64 {
    1_000
}
fn default_deals_fetch_ms() -> u64 {
    800
}
fn default_orders_fetch_ms() -> u64 {
    600
}
fn default_listings_fetch_ms() -> u64 {
    500
}
fn default_shipments_fetch_ms() -> u64 {
    400
}
fn default_print_label_ms() -> u64 {
    2_000
}
fn default_retry_print_ms() -> u64 {
    1_500
}
fn default_toast_duration_ms() -> i64 {
    DEFAULT_TOAST_DURATION_MS
}
fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn validate_event_channel_capacity(capacity: usize) -> Result<(), ValidationError> {
    if capacity == 0 {
        let mut err = ValidationError::new("event_channel_capacity");
        err.message = Some("event_channel_capacity must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum StoreConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Loads configuration from optional `config/` files plus `APP__`-prefixed
/// environment overrides, falling back to built-in defaults.
pub fn load_config() -> Result<StoreConfig, StoreConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let store_config: StoreConfig = config.try_deserialize()?;
    store_config.validate()?;

    Ok(store_config)
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("flipdesk={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}
