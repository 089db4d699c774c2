//! `[build]` section configuration.
//!
//! Source/output roots, page discovery, layout selection and the build timestamp.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in stencil.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// src = "src"                          # Source directory
/// out = "site"                         # Output directory
/// glob = "pages/**/*.template.html"    # Pages, relative to src
/// timezone = "America/Chicago"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Source directory holding pages, includes and layouts.
    #[serde(default = "defaults::build::src")]
    #[educe(Default = defaults::build::src())]
    pub src: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::out")]
    #[educe(Default = defaults::build::out())]
    pub out: PathBuf,

    /// Glob for page templates, relative to `src`.
    #[serde(default = "defaults::build::glob")]
    #[educe(Default = defaults::build::glob())]
    pub glob: String,

    /// Globs for shared fragments (partials and layouts), relative to `src`.
    #[serde(default = "defaults::build::shared")]
    #[educe(Default = defaults::build::shared())]
    pub shared: Vec<String>,

    /// Directory (relative to `src`) whose subtree is mirrored into `out`.
    #[serde(default = "defaults::build::pages_dir")]
    #[educe(Default = defaults::build::pages_dir())]
    pub pages_dir: PathBuf,

    /// File name suffix stripped from page sources.
    #[serde(default = "defaults::build::page_suffix")]
    #[educe(Default = defaults::build::page_suffix())]
    pub page_suffix: String,

    /// File name suffix appended to output files.
    #[serde(default = "defaults::build::output_suffix")]
    #[educe(Default = defaults::build::output_suffix())]
    pub output_suffix: String,

    /// Layout block executed when a page does not request another one.
    #[serde(default = "defaults::build::default_layout")]
    #[educe(Default = defaults::build::default_layout())]
    pub default_layout: String,

    /// Block whose trimmed output overrides the layout for a page.
    #[serde(default = "defaults::build::layout_block")]
    #[educe(Default = defaults::build::layout_block())]
    pub layout_block: String,

    /// IANA timezone used for the default build timestamp.
    #[serde(default = "defaults::build::timezone")]
    #[educe(Default = defaults::build::timezone())]
    pub timezone: String,

    /// Fixed build timestamp; computed from the current time when unset.
    #[serde(default = "defaults::build::timestamp")]
    #[educe(Default = defaults::build::timestamp())]
    pub timestamp: Option<String>,

    /// Minify HTML output.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Render pages on a thread pool instead of one after another.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub parallel: bool,
}
