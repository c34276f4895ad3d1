//! CLI: decode brick documents → (check | fmt | tree)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use crate::brick::Brick;
use crate::document;
use crate::error::BrickError;
use crate::registry::TypeRegistry;
use crate::select::Selector;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate, normalize and inspect JSON brick trees
#[derive(Parser, Debug)]
#[command(name = "json-brick", version)]
pub struct CommandLineInterface {
    /// log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// decode every document and report the ones that fail
    Check(CheckOut),
    /// decode and re-encode in canonical form
    Fmt(FmtOut),
    /// print the component tree outline
    Tree(TreeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to the brick document in each input (e.g. /screens/0/root)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq filter selecting brick documents in each input; wins over --json-pointer
    #[arg(long)]
    jq_expr: Option<String>,

    /// JSON array of extra view type names to register
    #[arg(long)]
    types: Option<PathBuf>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct FmtOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct TreeOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

/// One decoded (or failed) document.
struct Loaded {
    label: String,
    result: std::result::Result<Brick, BrickError>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn registry(&self) -> Result<TypeRegistry> {
        let mut types = TypeRegistry::standard();
        let Some(path) = self.types.as_ref() else {
            return Ok(types);
        };
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read types file {}", path.display()))?;
        let names: Vec<String> = document::from_str_with_path(&source)
            .with_context(|| format!("types file {} must be a JSON array of names", path.display()))?;
        for name in names {
            types.register_view(&name)?;
        }
        tracing::debug!(count = types.len(), "type registry ready");
        Ok(types)
    }

    fn load(&self) -> Result<Vec<Loaded>> {
        let types = self.registry()?;
        TypeRegistry::install(types.clone());
        let selector = Selector::from_options(self.json_pointer.as_deref(), self.jq_expr.as_deref());
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let per_file = source_paths
            .par_iter()
            .map(|path| self.load_file(path, &selector, &types))
            .collect::<Result<Vec<_>>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }

    fn load_file(&self, path: &Path, selector: &Selector, types: &TypeRegistry) -> Result<Vec<Loaded>> {
        let path_str = path.to_string_lossy();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read source file {path_str}"))?;
        let values = if self.ndjson {
            document::values_from_ndjson(&source)
        } else {
            document::from_str_with_path::<Value>(&source).map(|v| vec![v])
        }
        .with_context(|| format!("failed to parse JSON source file ({path_str})"))?;

        let mut out = Vec::new();
        for value in values {
            let docs = selector
                .apply(value)
                .with_context(|| format!("failed to select documents in {path_str}"))?;
            for doc in docs {
                let label = format!("{path_str}#{}", out.len());
                out.push(Loaded { label, result: Brick::decode_with(&doc, types) });
            }
        }
        Ok(out)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Check(target) => {
                let loaded = target.input_settings.load()?;
                let mut failed = 0usize;
                for doc in &loaded {
                    match &doc.result {
                        Ok(brick) => println!(
                            "{} {} {} ({} nodes)",
                            "ok".green().bold(),
                            doc.label,
                            brick.name(),
                            brick.walk().count()
                        ),
                        Err(error) => {
                            failed += 1;
                            println!("{} {}: {error}", "error".red().bold(), doc.label);
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} document(s) failed to decode", loaded.len());
                }
                Ok(())
            }
            Command::Fmt(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let loaded = target.input_settings.load()?;
                let mut values = loaded
                    .into_iter()
                    .map(|doc| doc.result.map(|b| b.to_value()).map_err(|e| anyhow!("{}: {e}", doc.label)))
                    .collect::<Result<Vec<_>>>()?;
                let out_value = if values.len() == 1 { values.remove(0) } else { Value::Array(values) };
                let src = serde_json::to_string_pretty(&out_value)?;
                write_output(target.out.as_deref(), &src)
            }
            Command::Tree(target) => {
                for doc in target.input_settings.load()? {
                    println!("{}", doc.label.dimmed());
                    match doc.result {
                        Ok(brick) => print!("{}", outline(&brick)),
                        Err(error) => println!("  {} {error}", "error".red().bold()),
                    }
                }
                Ok(())
            }
        }
    }
}

/// Indented one-line-per-node rendering of a tree.
pub fn outline(root: &Brick) -> String {
    fn go(b: &Brick, depth: usize, out: &mut String) {
        let mut line = format!("{}{} {}", "  ".repeat(depth + 1), b.name().bold(), b.target().name().cyan());
        if let Some(layout) = b.layout() {
            line.push_str(&format!(" [{:?} {:?}/{:?}]", layout.axis, layout.align, layout.distribution));
        }
        match (b.width(), b.height()) {
            (None, None) => {}
            (w, h) => line.push_str(&format!(" {}x{}", fmt_dim(w), fmt_dim(h))),
        }
        if let Some(nib) = b.nib_name() {
            line.push_str(&format!(" nib={nib}"));
        }
        if let Some(outlet) = b.outlet() {
            line.push_str(&format!(" @{}", outlet.yellow()));
        }
        out.push_str(&line);
        out.push('\n');
        for c in b.children() {
            go(c, depth + 1, out);
        }
    }
    fn fmt_dim(d: Option<f64>) -> String {
        d.map(|v| v.to_string()).unwrap_or_else(|| "_".to_string())
    }

    let mut out = String::new();
    go(root, 0, &mut out);
    out
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{src}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Alignment, Axis, Distribution};
    use crate::metrics::LayoutMetrics;
    use crate::registry::TypeRef;

    #[test]
    fn outline_lists_every_node() {
        colored::control::set_override(false);
        let title = Brick::of_type("title", TypeRef::view("Label")).unwrap().with_outlet("titleLabel");
        let root = Brick::union("cell", vec![title], Axis::Vertical, Alignment::Fill, Distribution::Fill, LayoutMetrics::default())
            .unwrap()
            .with_height(44.0);
        let text = outline(&root);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["  cell View [Vertical Fill/Fill] _x44", "    title Label @titleLabel"]);
    }

    #[test]
    fn types_file_extends_the_standard_registry() {
        let path = std::env::temp_dir().join(format!("json-brick-types-{}.json", std::process::id()));
        std::fs::write(&path, r#"["App.FeedHeader"]"#).unwrap();
        let settings = InputSettings {
            ndjson: false,
            json_pointer: None,
            jq_expr: None,
            types: Some(path.clone()),
            input: vec![],
        };
        let types = settings.registry().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(types.resolve_view("App.FeedHeader").name(), "App.FeedHeader");
        assert_eq!(types.resolve_view("Label").name(), "Label");
    }

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn cli_parses_inputs() {
        let cli = CommandLineInterface::try_parse_from(["json-brick", "-v", "fmt", "-i", "a.json", "b.json", "--jq-expr", ".root"]).unwrap();
        assert!(cli.verbose);
        match cli.cmd {
            Command::Fmt(f) => {
                assert_eq!(f.input_settings.input, vec!["a.json", "b.json"]);
                assert_eq!(f.input_settings.jq_expr.as_deref(), Some(".root"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
