//! # Regdesk utilities
//!
//! Configuration loading, the persisted payment-attempt store, path helpers,
//! and log redaction shared by the CLI and the TUI.

pub mod attempt_store;
pub mod config;
pub mod path_processing;
pub mod redact;

pub use attempt_store::{AttemptStore, AttemptStoreError, InMemoryAttemptStore, JsonAttemptStore};
pub use config::{CatalogEntry, CheckoutSettings, ConfigError, OnlinePaymentStrategy, RegdeskConfig};
pub use path_processing::{expand_tilde, path_from_env_or_config_dir, regdesk_config_dir};
pub use redact::{redact_payment_id, redact_sensitive};
