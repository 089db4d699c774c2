//! Utility modules for the static site generator.

pub mod files;
pub mod minify;
