//! Parsing and validation of `tagtrace.toml` project configuration files.
//!
//! This crate reads the optional project configuration file and produces a
//! strongly-typed [`TraceConfig`]: the tag-category [`Taxonomy`] (tier
//! membership), scan scopes and pattern template, cache and search settings,
//! and the report's finding policy.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod taxonomy;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    default_config_toml, load_config, load_config_from_str, load_config_or_default, validate_config,
    CONFIG_FILE,
};
pub use taxonomy::{Taxonomy, Tier};
pub use types::*;
