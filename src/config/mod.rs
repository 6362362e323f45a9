//! Persisted settings and per-run provider configuration.

pub mod provider;
pub mod settings;

pub use provider::{ConfigOverrides, Language, ProviderConfig, ProviderKind};
pub use settings::{Settings, mask_secret};
