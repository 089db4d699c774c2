//! Site building orchestration.
//!
//! ```text
//! build_site()
//!     │
//!     ├── BuildContext::from_config()   (once per run)
//!     ├── discover_pages()              <src>/<glob>, sorted
//!     │
//!     └── for each page (in order, or on the rayon pool)
//!             TemplateSet::build() ──► render_page()
//! ```
//!
//! The first failing page aborts the run. Pages written before it stay on disk.

use crate::{
    config::SiteConfig,
    context::BuildContext,
    error::BuildError,
    log,
    render::render_page,
    template::TemplateSet,
    utils::files::expand_glob,
};
use anyhow::Result;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Build the entire site. Returns the output files written, in page order.
pub fn build_site(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    let ctx = BuildContext::from_config(config)?;
    build_with_context(config, &ctx)
}

/// Build the site with an explicit build context.
pub fn build_with_context(config: &SiteConfig, ctx: &BuildContext) -> Result<Vec<PathBuf>> {
    let build = &config.build;

    log!("build"; "source directory: {}", build.src.display());
    log!("build"; "output directory: {}", build.out.display());
    log!("build"; "build timestamp: {}", ctx.build_timestamp);

    let pages = discover_pages(config)?;
    log!("build"; "found {} page template(s) to render", pages.len());

    fs::create_dir_all(&build.out).map_err(|err| BuildError::filesystem(&build.out, err))?;

    let shared = config.shared_patterns();
    let render = |page: &PathBuf| render_one(&shared, page, config, ctx);

    let written = if build.parallel {
        pages.par_iter().map(render).collect::<Result<Vec<_>, _>>()?
    } else {
        pages.iter().map(render).collect::<Result<Vec<_>, _>>()?
    };

    log!("build"; "done, {} page(s) written", written.len());

    Ok(written)
}

/// Collect page templates matching `<src>/<glob>`.
///
/// Finding none is an error: a site without pages is almost always a wrong `--src`.
pub fn discover_pages(config: &SiteConfig) -> Result<Vec<PathBuf>, BuildError> {
    let pattern = config.pages_pattern();
    let pages = expand_glob(&pattern)?;

    if pages.is_empty() {
        return Err(BuildError::NoPages(pattern));
    }
    Ok(pages)
}

fn render_one(
    shared: &[String],
    page: &Path,
    config: &SiteConfig,
    ctx: &BuildContext,
) -> Result<PathBuf, BuildError> {
    let set = TemplateSet::build(shared, page)?;
    render_page(&set, page, config, ctx)
}

// ============================================================================
// Tests
// ============================================================================
