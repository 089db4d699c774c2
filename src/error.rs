//! Errors raised while assembling and rendering pages.
//!
//! Every variant is fatal for the run. Messages are path-qualified; the
//! underlying cause is kept as the error source, so `{:#}` prints
//! `path: cause` like a shell tool would.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid glob pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no page templates found: {0}")]
    NoPages(String),

    #[error("{}: cannot list directory", .0.path().display())]
    Glob(#[source] glob::GlobError),

    #[error("{}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("duplicate block \"{name}\": defined in {} and {}", first.display(), second.display())]
    DuplicateBlock {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{}: executing layout \"{layout}\"", page.display())]
    LayoutExecution {
        page: PathBuf,
        layout: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("{} is not under {}", page.display(), root.display())]
    PathResolution { page: PathBuf, root: PathBuf },

    #[error("{}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: minijinja::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
