//! Page rendering: layout selection, output path and write.
//!
//! # Pipeline
//!
//! ```text
//! render_page()
//!     │
//!     ├── resolve_layout()  ──► "public" or the page's `layout_name` block
//!     ├── output_path()     ──► <out>/<rel>.html
//!     ├── create_dir_all()
//!     └── execute layout    ──► (minify) ──► write
//! ```

use crate::config::SiteConfig;
use crate::context::BuildContext;
use crate::error::BuildError;
use crate::log;
use crate::template::TemplateSet;
use crate::utils::minify::minify_html;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Pick the layout block for a page.
///
/// When the set defines `layout_block`, its trimmed output names the layout.
/// Empty output or a failed render means "no override".
pub fn resolve_layout(set: &TemplateSet, layout_block: &str, default_layout: &str) -> String {
    if !set.contains(layout_block) {
        return default_layout.to_owned();
    }

    match set.execute(layout_block, None) {
        Ok(rendered) => match rendered.trim() {
            "" => default_layout.to_owned(),
            name => name.to_owned(),
        },
        Err(err) => {
            log!("warn"; "`{layout_block}` block failed, using `{default_layout}`: {err}");
            default_layout.to_owned()
        }
    }
}

/// Map a page source to its output file.
///
/// `<pages_root>/blog/post.template.html` becomes `<out_root>/blog/post.html`.
/// A file name without `page_suffix` keeps its name and gets `output_suffix` appended.
pub fn output_path(
    page: &Path,
    pages_root: &Path,
    out_root: &Path,
    page_suffix: &str,
    output_suffix: &str,
) -> Result<PathBuf, BuildError> {
    let page = normalize(page);
    let root = normalize(pages_root);

    let relative = page
        .strip_prefix(&root)
        .map_err(|_| BuildError::PathResolution {
            page: page.clone(),
            root: root.clone(),
        })?;

    let file_name = relative
        .file_name()
        .ok_or_else(|| BuildError::PathResolution {
            page: page.clone(),
            root: root.clone(),
        })?
        .to_string_lossy();
    let stem = file_name.strip_suffix(page_suffix).unwrap_or(&file_name);

    Ok(out_root.join(relative.with_file_name(format!("{stem}{output_suffix}"))))
}

/// Render one page through its layout and write it under `build.out`.
///
/// Returns the path written. The layout is rendered fully in memory first,
/// so a failing page never leaves a truncated file behind.
pub fn render_page(
    set: &TemplateSet,
    page: &Path,
    config: &SiteConfig,
    ctx: &BuildContext,
) -> Result<PathBuf, BuildError> {
    let build = &config.build;

    let layout = resolve_layout(set, &build.layout_block, &build.default_layout);
    let out = output_path(
        page,
        &config.pages_root(),
        &build.out,
        &build.page_suffix,
        &build.output_suffix,
    )?;

    log!(
        "render";
        "{} -> {} (layout: {layout}, {} templates)",
        page.display(),
        out.display(),
        set.files().len()
    );

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::filesystem(parent, err))?;
    }

    let html = set
        .execute(&layout, Some(&ctx.to_value()))
        .map_err(|source| BuildError::LayoutExecution {
            page: page.to_path_buf(),
            layout: layout.clone(),
            source,
        })?;

    let html = if build.minify {
        minify_html(html.as_bytes())
    } else {
        html.into_bytes()
    };
    fs::write(&out, html).map_err(|err| BuildError::filesystem(&out, err))?;

    log!("render"; "wrote {}", out.display());

    Ok(out)
}

/// Drop `.` components so `./src/pages` and `src/pages` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn config_for(dir: &TempDir) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.src = dir.path().join("src");
        config.build.out = dir.path().join("site");
        config
    }

    fn ctx() -> BuildContext {
        BuildContext::new(2024, "2024-01-01 00:00:00 CST", BTreeMap::new())
    }

    fn set_for(config: &SiteConfig, page: &Path) -> TemplateSet {
        TemplateSet::build(&config.shared_patterns(), page).unwrap()
    }

    // ------------------------------------------------------------------------
    // output_path
    // ------------------------------------------------------------------------

    #[test]
    fn test_output_path_top_level() {
        let out = output_path(
            Path::new("src/pages/index.template.html"),
            Path::new("src/pages"),
            Path::new("site"),
            ".template.html",
            ".html",
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("site/index.html"));
    }

    #[test]
    fn test_output_path_nested() {
        let out = output_path(
            Path::new("src/pages/blog/2024/hello.template.html"),
            Path::new("src/pages"),
            Path::new("/tmp/out"),
            ".template.html",
            ".html",
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("/tmp/out/blog/2024/hello.html"));
    }

    #[test]
    fn test_output_path_ignores_cur_dir() {
        let out = output_path(
            Path::new("src/pages/about.template.html"),
            Path::new("./src/pages"),
            Path::new("./site"),
            ".template.html",
            ".html",
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("./site/about.html"));
    }

    #[test]
    fn test_output_path_without_page_suffix() {
        let out = output_path(
            Path::new("src/pages/raw.html"),
            Path::new("src/pages"),
            Path::new("site"),
            ".template.html",
            ".html",
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("site/raw.html.html"));
    }

    #[test]
    fn test_output_path_outside_root() {
        let err = output_path(
            Path::new("elsewhere/index.template.html"),
            Path::new("src/pages"),
            Path::new("site"),
            ".template.html",
            ".html",
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::PathResolution { .. }));
    }

    #[test]
    fn test_output_path_is_root_itself() {
        let err = output_path(
            Path::new("src/pages"),
            Path::new("src/pages"),
            Path::new("site"),
            ".template.html",
            ".html",
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::PathResolution { .. }));
    }

    // ------------------------------------------------------------------------
    // resolve_layout
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_layout_default() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(&config.build.src, "pages/index.template.html", "");

        let set = set_for(&config, &page);
        assert_eq!(resolve_layout(&set, "layout_name", "public"), "public");
    }

    #[test]
    fn test_resolve_layout_override_trimmed() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            "{% macro layout_name() %}\n  dashboard \n{% endmacro %}",
        );

        let set = set_for(&config, &page);
        assert_eq!(resolve_layout(&set, "layout_name", "public"), "dashboard");
    }

    #[test]
    fn test_resolve_layout_whitespace_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            "{% macro layout_name() %}   \n {% endmacro %}",
        );

        let set = set_for(&config, &page);
        assert_eq!(resolve_layout(&set, "layout_name", "public"), "public");
    }

    #[test]
    fn test_resolve_layout_failure_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            r#"{% macro layout_name() %}{{ template("missing") }}{% endmacro %}"#,
        );

        let set = set_for(&config, &page);
        assert_eq!(resolve_layout(&set, "layout_name", "public"), "public");
    }

    // ------------------------------------------------------------------------
    // render_page
    // ------------------------------------------------------------------------

    #[test]
    fn test_render_page_default_layout() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            "{% macro public(site) %}Hello {{ site.year }}{% endmacro %}",
        );

        let set = set_for(&config, &page);
        let out = render_page(&set, &page, &config, &ctx()).unwrap();

        assert_eq!(out, config.build.out.join("index.html"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "Hello 2024");
    }

    #[test]
    fn test_render_page_layout_override() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        write(
            &config.build.src,
            "_layouts/public.html",
            "{% macro public(site) %}PUBLIC{% endmacro %}",
        );
        write(
            &config.build.src,
            "_layouts/dashboard.html",
            r#"{% macro dashboard(site) %}DASH {{ template("content", site) }}{% endmacro %}"#,
        );
        let page = write(
            &config.build.src,
            "pages/admin/index.template.html",
            concat!(
                "{% macro layout_name() %}dashboard{% endmacro %}",
                "{% macro content(site) %}built {{ site.build_timestamp }}{% endmacro %}",
            ),
        );

        let set = set_for(&config, &page);
        let out = render_page(&set, &page, &config, &ctx()).unwrap();

        assert_eq!(out, config.build.out.join("admin/index.html"));
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "DASH built 2024-01-01 00:00:00 CST"
        );
    }

    #[test]
    fn test_render_page_missing_layout_names_page_and_layout() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            "{% macro layout_name() %}fancy{% endmacro %}",
        );

        let set = set_for(&config, &page);
        let err = render_page(&set, &page, &config, &ctx()).unwrap_err();

        match &err {
            BuildError::LayoutExecution { page: p, layout, .. } => {
                assert_eq!(p, &page);
                assert_eq!(layout, "fancy");
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = format!("{err}");
        assert!(message.contains("index.template.html"));
        assert!(message.contains("\"fancy\""));
        assert!(!config.build.out.join("index.html").exists());
    }

    #[test]
    fn test_render_page_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        write(&config.build.out, "index.html", "stale content that is longer");
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            "{% macro public(site) %}fresh{% endmacro %}",
        );

        let set = set_for(&config, &page);
        render_page(&set, &page, &config, &ctx()).unwrap();

        assert_eq!(
            fs::read_to_string(config.build.out.join("index.html")).unwrap(),
            "fresh"
        );
    }

    #[test]
    fn test_render_page_directory_collision() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        // a file where the output subdirectory should go
        write(&config.build.out, "blog", "not a directory");
        let page = write(
            &config.build.src,
            "pages/blog/post.template.html",
            "{% macro public(site) %}post{% endmacro %}",
        );

        let set = set_for(&config, &page);
        let err = render_page(&set, &page, &config, &ctx()).unwrap_err();
        assert!(matches!(err, BuildError::Filesystem { .. }));
    }

    #[test]
    fn test_render_page_outside_pages_root() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let page = write(
            dir.path(),
            "stray/index.template.html",
            "{% macro public(site) %}x{% endmacro %}",
        );

        let set = set_for(&config, &page);
        let err = render_page(&set, &page, &config, &ctx()).unwrap_err();
        assert!(matches!(err, BuildError::PathResolution { .. }));
    }

    #[test]
    fn test_render_page_minified() {
        let dir = TempDir::new().unwrap();
        let mut config = config_for(&dir);
        config.build.minify = true;
        let page = write(
            &config.build.src,
            "pages/index.template.html",
            "{% macro public(site) %}<html>\n  <body>\n    <p>Hi</p>\n  </body>\n</html>{% endmacro %}",
        );

        let set = set_for(&config, &page);
        let out = render_page(&set, &page, &config, &ctx()).unwrap();

        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("<p>Hi</p>"));
        assert!(!html.contains("\n  "));
    }
}
