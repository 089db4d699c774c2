//! Command-line interface definitions.
//!
//! Every flag is optional; unset flags fall back to the config file, then to defaults.
//!
//! Long flags may also be spelled with a single dash (`-src ./src`).

use clap::Parser;
use std::{ffi::OsString, path::PathBuf};

/// Long flags accepted with a single leading dash.
const SINGLE_DASH_LONGS: &[&str] = &[
    "src",
    "out",
    "glob",
    "timestamp",
    "config",
    "minify",
    "parallel",
];

/// Stencil static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source directory (default: ./src)
    #[arg(short, long)]
    pub src: Option<PathBuf>,

    /// Output directory (default: ./site)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Glob for pages within the source directory (default: pages/**/*.template.html)
    #[arg(short, long)]
    pub glob: Option<String>,

    /// Build timestamp (default: now, e.g. "2024-01-01 00:00:00 CST")
    #[arg(short, long)]
    pub timestamp: Option<String>,

    /// Config file name (default: stencil.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Minify the html output
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Render pages in parallel
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub parallel: Option<bool>,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-src` / `-src=x` to `--src` / `--src=x` up to a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut done = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            let rewrite = match arg.to_str() {
                _ if done => false,
                Some("--") => {
                    done = true;
                    false
                }
                Some(text) => text
                    .strip_prefix('-')
                    .filter(|flag| !flag.starts_with('-'))
                    .and_then(|flag| flag.split('=').next())
                    .is_some_and(|name| SINGLE_DASH_LONGS.contains(&name)),
                None => false,
            };

            if rewrite {
                let mut long = OsString::from("-");
                long.push(&arg);
                long
            } else {
                arg
            }
        })
        .collect()
}
