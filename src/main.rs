//! Stencil - a static site generator that composes page templates with shared layouts.

mod build;
mod cli;
mod config;
mod context;
mod error;
mod logger;
mod render;
mod template;
mod utils;

use anyhow::Result;
use build::build_site;
use cli::Cli;
use config::SiteConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and build every page; the first error ends the run.
fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(cli)?;
    if let Some(path) = &config.config_path {
        log!("config"; "loaded {}", path.display());
    }

    build_site(&config)?;
    Ok(())
}
