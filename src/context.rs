//! Build-wide data handed to every rendered layout.
//!
//! Computed once per run. Templates see it as a flat map:
//!
//! ```jinja
//! {% macro public(site) %}
//!   <footer>&copy; {{ site.year }} {{ site.site_name }}, built {{ site.build_timestamp }}</footer>
//! {% endmacro %}
//! ```

use crate::config::SiteConfig;
use anyhow::Result;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use minijinja::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Format of the default build timestamp, e.g. `2024-01-01 00:00:00 CST`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Field names owned by the context; `[extra]` may not reuse them.
pub const RESERVED_FIELDS: &[&str] = &["year", "build_timestamp"];

/// Read-only data available to every page render.
#[derive(Debug, Clone, Serialize)]
pub struct BuildContext {
    pub year: i32,
    pub build_timestamp: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl BuildContext {
    pub fn new(
        year: i32,
        build_timestamp: impl Into<String>,
        extra: BTreeMap<String, toml::Value>,
    ) -> Self {
        Self {
            year,
            build_timestamp: build_timestamp.into(),
            extra,
        }
    }

    /// Build the context from config at the current instant.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::at(config, Utc::now())
    }

    /// Build the context from config as of `now`.
    ///
    /// The configured timestamp wins; otherwise `now` is formatted in the
    /// configured timezone.
    pub fn at(config: &SiteConfig, now: DateTime<Utc>) -> Result<Self> {
        let tz = config.timezone()?;
        let local = tz.from_utc_datetime(&now.naive_utc());

        let build_timestamp = match &config.build.timestamp {
            Some(timestamp) => timestamp.clone(),
            None => local.format(TIMESTAMP_FORMAT).to_string(),
        };

        Ok(Self::new(local.year(), build_timestamp, config.extra.clone()))
    }

    /// Context as a template value.
    pub fn to_value(&self) -> Value {
        Value::from_serialize(self)
    }
}
