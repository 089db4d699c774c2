//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn src() -> PathBuf {
        "src".into()
    }

    pub fn out() -> PathBuf {
        "site".into()
    }

    pub fn glob() -> String {
        "pages/**/*.template.html".into()
    }

    pub fn shared() -> Vec<String> {
        vec!["_includes/*.html".into(), "_layouts/*.html".into()]
    }

    pub fn pages_dir() -> PathBuf {
        "pages".into()
    }

    pub fn page_suffix() -> String {
        ".template.html".into()
    }

    pub fn output_suffix() -> String {
        ".html".into()
    }

    pub fn default_layout() -> String {
        "public".into()
    }

    pub fn layout_block() -> String {
        "layout_name".into()
    }

    pub fn timezone() -> String {
        "America/Chicago".into()
    }

    pub fn timestamp() -> Option<String> {
        None
    }
}
