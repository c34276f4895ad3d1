//! Locating brick documents inside larger JSON inputs.
//!
//! Brick trees are often embedded in some other payload (a screen config, an
//! API response). A [`Selector`] narrows one input value down to the brick
//! documents it contains, either with a JSON Pointer or with a jq filter.
use anyhow::{Context, Result, anyhow};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub enum Selector {
    /// The whole input is the document.
    #[default]
    Whole,
    /// e.g. `/screens/0/root`
    Pointer(String),
    /// jq filter; each output is one document.
    Jq(String),
}

impl Selector {
    pub fn from_options(json_pointer: Option<&str>, jq_expr: Option<&str>) -> Self {
        match (json_pointer, jq_expr) {
            (_, Some(expr)) => Selector::Jq(expr.to_string()),
            (Some(ptr), None) => Selector::Pointer(ptr.to_string()),
            (None, None) => Selector::Whole,
        }
    }

    pub fn apply(&self, input: Value) -> Result<Vec<Value>> {
        match self {
            Selector::Whole => Ok(vec![input]),
            Selector::Pointer(ptr) => input
                .pointer(ptr)
                .cloned()
                .map(|v| vec![v])
                .ok_or_else(|| anyhow!("JSON pointer `{ptr}` matched nothing")),
            Selector::Jq(expr) => run_jaq(expr, &input)?
                .iter()
                .map(|out| serde_json::from_str::<Value>(out).context("jq produced non-JSON output"))
                .collect(),
        }
    }
}

/// Run a jq filter, returning each output as JSON text.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<String>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let v = item.map_err(|e| anyhow!("jq runtime error: {e:?}"))?;
        out.push(v.to_string());
    }
    Ok(out)
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let msg: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("jq parse error: {err:?} in `{}`", file.code))
        .collect();
    anyhow!(msg.join("\n"))
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> anyhow::Error {
    let msg: Vec<String> = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("jq: undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect();
    anyhow!(msg.join("\n"))
}
