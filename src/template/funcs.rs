//! Functions registered on every template set.

use minijinja::{Environment, Error, ErrorKind, State, Value, context};
use std::cell::Cell;

/// Global holding the `block name -> file` map seen by `template()`
pub(super) const BLOCK_INDEX: &str = "__blocks";

/// Deepest chain of nested `template()` calls before giving up
const MAX_BLOCK_DEPTH: usize = 32;

thread_local! {
    static BLOCK_DEPTH: Cell<usize> = const { Cell::new(0) };
}

pub(super) fn register_helpers(env: &mut Environment<'static>) {
    env.add_function("now_rfc3339", now_rfc3339);
}

pub(super) fn register_template(env: &mut Environment<'static>, index: Value) {
    env.add_global(BLOCK_INDEX, index);
    env.add_function("template", template);
}

/// Evaluate `file` and call the block `name` it exports.
///
/// The block receives `data` as its only argument, or no argument at all.
pub(super) fn call_block(
    env: &Environment<'_>,
    file: &str,
    name: &str,
    data: Option<&Value>,
) -> Result<String, Error> {
    let template = env.get_template(file)?;
    let captured = template.render_captured(context! {})?;
    let state = captured.state();
    let block = state
        .lookup(name)
        .filter(|block| !block.is_undefined())
        .ok_or_else(|| undefined_block(name))?;

    let rendered = match data {
        Some(data) => block.call(state, std::slice::from_ref(data))?,
        None => block.call(state, &[])?,
    };
    Ok(rendered.to_string())
}

pub(super) fn undefined_block(name: &str) -> Error {
    Error::new(
        ErrorKind::TemplateNotFound,
        format!("block \"{name}\" is not defined in the template set"),
    )
}

/// `{{ template("name", data) }}`: invoke a block defined anywhere in the set.
fn template(state: &State, name: String, data: Option<Value>) -> Result<Value, Error> {
    let file = state
        .lookup(BLOCK_INDEX)
        .and_then(|index| index.get_attr(&name).ok())
        .and_then(|file| file.as_str().map(str::to_owned))
        .ok_or_else(|| undefined_block(&name))?;

    let _depth = DepthGuard::enter(&name)?;
    call_block(state.env(), &file, &name, data.as_ref()).map(Value::from_safe_string)
}

fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Counts nested `template()` calls on this thread.
struct DepthGuard;

impl DepthGuard {
    fn enter(name: &str) -> Result<Self, Error> {
        BLOCK_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > MAX_BLOCK_DEPTH {
                return Err(Error::new(
                    ErrorKind::InvalidOperation,
                    format!("block \"{name}\" nested deeper than {MAX_BLOCK_DEPTH} calls"),
                ));
            }
            depth.set(next);
            Ok(Self)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        BLOCK_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
