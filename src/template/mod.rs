//! Template sets: one page plus every shared fragment in a single block namespace.
//!
//! Each file is compiled as its own MiniJinja template (named by its path).
//! Its top-level exports, normally macros, are its blocks:
//!
//! ```jinja
//! {# _layouts/public.html #}
//! {% macro public(site) %}
//! <html><body>{{ template("content", site) }}</body></html>
//! {% endmacro %}
//!
//! {# pages/index.template.html #}
//! {% macro content(site) %}Hello {{ site.year }}{% endmacro %}
//! ```
//!
//! Block names are unique across the set, so `template("content", ..)`
//! resolves the same way from every file.

mod funcs;

use crate::error::BuildError;
use crate::utils::files::expand_glob;
use minijinja::{Environment, Value, context};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

/// Block name -> name of the template (file) defining it.
type BlockIndex = BTreeMap<String, String>;

/// Compiled namespace of named blocks for exactly one page.
///
/// Built fresh per page and dropped once the page is written.
pub struct TemplateSet {
    env: Environment<'static>,
    blocks: BlockIndex,
    files: Vec<PathBuf>,
}

impl TemplateSet {
    /// Gather shared fragments and the page into one set.
    ///
    /// Shared files come first, in pattern order and lexical order within a
    /// pattern, followed by the page. Patterns matching nothing are fine.
    pub fn build(shared_patterns: &[String], page: &Path) -> Result<Self, BuildError> {
        let mut files: Vec<PathBuf> = Vec::new();
        for pattern in shared_patterns {
            for file in expand_glob(pattern)? {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }
        files.retain(|file| file != page);
        files.push(page.to_path_buf());

        let mut env = Environment::new();
        funcs::register_helpers(&mut env);

        for file in &files {
            let source = fs::read_to_string(file).map_err(|err| BuildError::read(file, err))?;
            let defined = top_level_macros(&source);
            env.add_template_owned(template_name(file), source)
                .map_err(|err| BuildError::parse(file, err))?;

            let mut seen = BTreeSet::new();
            for name in defined {
                if !seen.insert(name.clone()) {
                    return Err(BuildError::DuplicateBlock {
                        name,
                        first: file.clone(),
                        second: file.clone(),
                    });
                }
            }
        }

        let mut blocks = BlockIndex::new();
        for file in &files {
            let name = template_name(file);
            let exports = exported_names(&env, &name).map_err(|err| BuildError::parse(file, err))?;

            for block in exports {
                if let Some(first) = blocks.get(&block) {
                    return Err(BuildError::DuplicateBlock {
                        name: block,
                        first: PathBuf::from(first),
                        second: file.clone(),
                    });
                }
                blocks.insert(block, name.clone());
            }
        }

        funcs::register_template(&mut env, Value::from_serialize(&blocks));

        Ok(Self { env, blocks, files })
    }

    /// Whether any file in the set defines `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// Files in the set, in load order (page last).
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Render block `name` into a string.
    ///
    /// `data` becomes the block's argument; `None` calls it without one.
    pub fn execute(&self, name: &str, data: Option<&Value>) -> Result<String, minijinja::Error> {
        let file = self
            .blocks
            .get(name)
            .ok_or_else(|| funcs::undefined_block(name))?;
        funcs::call_block(&self.env, file, name, data)
    }
}

fn template_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Top-level names a file exports once evaluated without data.
fn exported_names(env: &Environment<'_>, name: &str) -> Result<Vec<String>, minijinja::Error> {
    let template = env.get_template(name)?;
    let captured = template.render_captured(context! {})?;
    Ok(captured
        .state()
        .exports()
        .into_iter()
        .map(str::to_owned)
        .collect())
}

/// Names of the macros a source defines outside any other macro, in order.
///
/// MiniJinja lets a later definition replace an earlier one, so repeats
/// have to be found in the source. Comments and `raw` sections are skipped.
fn top_level_macros(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut in_raw = false;
    let mut rest = source;

    while let Some(start) = rest.find('{') {
        rest = &rest[start..];
        let close = if rest.starts_with("{#") {
            "#}"
        } else if rest.starts_with("{%") {
            "%}"
        } else {
            rest = &rest[1..];
            continue;
        };

        let Some(end) = rest[2..].find(close) else {
            break;
        };
        let body = &rest[2..2 + end];
        rest = &rest[2 + end + 2..];
        if close == "#}" {
            continue;
        }

        let body = body.trim_matches(|c: char| c == '-' || c == '+' || c == '~' || c.is_whitespace());
        let mut words = body.split_whitespace();
        let keyword = words.next().unwrap_or_default();

        if in_raw {
            in_raw = keyword != "endraw";
            continue;
        }
        match keyword {
            "raw" => in_raw = true,
            "macro" => {
                if depth == 0
                    && let Some(name) = words.next()
                {
                    let name = name.split('(').next().unwrap_or_default();
                    if !name.is_empty() {
                        names.push(name.to_owned());
                    }
                }
                depth += 1;
            }
            "endmacro" => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    names
}
