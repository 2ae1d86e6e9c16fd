// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from defaults, an optional file (YAML or JSON) and
/// `PROBE__`-prefixed environment variables, in that order of precedence.
///
/// Not validated here: callers layer their own overrides on top and call
/// `ProbeConfig::validate` once the final values are known.
pub fn load_config(path: Option<&Path>) -> Result<ProbeConfig> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(::config::File::from(path));
    }

    builder
        .add_source(::config::Environment::with_prefix("PROBE").separator("__"))
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")
}
