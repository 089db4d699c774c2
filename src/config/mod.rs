//! Site configuration management for `stencil.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[build]`   | Paths, globs, layout names, timestamp, output opts |
//! | `[extra]`   | User-defined fields exposed to every template      |
//!
//! # Example
//!
//! ```toml
//! [build]
//! src = "src"
//! out = "site"
//! timezone = "Europe/Berlin"
//!
//! [extra]
//! site_name = "My Site"
//! ```
//!
//! Precedence: CLI flags > config file > defaults.

mod build;
pub mod defaults;
mod error;

use build::BuildConfig;
pub use error::ConfigError;

use crate::cli::Cli;
use crate::context::RESERVED_FIELDS;
use anyhow::{Result, bail};
use chrono_tz::Tz;
use educe::Educe;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG: &str = "stencil.toml";

/// Root configuration structure representing stencil.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the config file that was loaded, if any
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// User-defined extra fields, merged into the build context
    #[serde(default)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load the config file named on the command line, or the default one if present.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_path(path)?,
            None if Path::new(DEFAULT_CONFIG).is_file() => Self::from_path(Path::new(DEFAULT_CONFIG))?,
            None => Self::default(),
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.src, cli.src.as_ref());
        Self::update_option(&mut self.build.out, cli.out.as_ref());
        Self::update_option(&mut self.build.glob, cli.glob.as_ref());
        Self::update_option(&mut self.build.minify, cli.minify.as_ref());
        Self::update_option(&mut self.build.parallel, cli.parallel.as_ref());

        if let Some(timestamp) = &cli.timestamp {
            self.build.timestamp = Some(timestamp.clone());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Root of the mirrored page tree: `<src>/<pages_dir>`
    pub fn pages_root(&self) -> PathBuf {
        self.build.src.join(&self.build.pages_dir)
    }

    /// Full glob for page discovery: `<src>/<glob>`
    pub fn pages_pattern(&self) -> String {
        self.rooted_pattern(&self.build.glob)
    }

    /// Full globs for shared fragments, in configured order
    pub fn shared_patterns(&self) -> Vec<String> {
        self.build
            .shared
            .iter()
            .map(|glob| self.rooted_pattern(glob))
            .collect()
    }

    /// Join a glob onto `src`, escaping `src` so its characters match literally.
    fn rooted_pattern(&self, glob: &str) -> String {
        let src = Pattern::escape(&self.build.src.to_string_lossy());
        Path::new(&src).join(glob).to_string_lossy().into_owned()
    }

    /// Parse the configured timezone
    pub fn timezone(&self) -> Result<Tz> {
        self.build.timezone.parse::<Tz>().map_err(|err| {
            ConfigError::Validation(format!(
                "[build.timezone] `{}` is not a valid timezone: {err}",
                self.build.timezone
            ))
            .into()
        })
    }

    /// Validate configuration before building
    pub fn validate(&self) -> Result<()> {
        self.timezone()?;

        let non_empty = [
            ("[build.glob]", &self.build.glob),
            ("[build.page_suffix]", &self.build.page_suffix),
            ("[build.output_suffix]", &self.build.output_suffix),
            ("[build.default_layout]", &self.build.default_layout),
            ("[build.layout_block]", &self.build.layout_block),
        ];
        for (field, value) in non_empty {
            if value.trim().is_empty() {
                bail!(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }

        if let Some(timestamp) = &self.build.timestamp
            && timestamp.trim().is_empty()
        {
            bail!(ConfigError::Validation(
                "[build.timestamp] must not be empty when set".into()
            ));
        }

        if let Some(field) = RESERVED_FIELDS.iter().find(|f| self.extra.contains_key(**f)) {
            bail!(ConfigError::Validation(format!(
                "[extra.{field}] is reserved for the build context"
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
