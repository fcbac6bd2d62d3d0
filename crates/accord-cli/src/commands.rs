use std::path::Path;

use accord_merge::{ResolutionConfig, Resolver};
use accord_patch::{apply, apply_guarded, validate, Patch, PatchResult};
use accord_types::{Document, SiblingSet};
use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Resolve(args) => cmd_resolve(args, cli.format),
        Command::Check(args) => cmd_check(args, cli.format),
        Command::Apply(args) => cmd_apply(args, cli.format),
    }
}

fn cmd_resolve(args: ResolveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let resolver = resolver_from_args(&args)?;
    let siblings = load_siblings(&args.siblings)?;
    let count = siblings.len();
    let resolved = resolver.resolve(siblings);

    match format {
        OutputFormat::Text => {
            println!(
                "{} Resolved {} siblings ({}, tie-break {})",
                "✓".green().bold(),
                count.to_string().bold(),
                resolver.strategy().to_string().cyan(),
                resolver.tie_break().to_string().cyan(),
            );
            print_document(&resolved)
        }
        OutputFormat::Json => print_json(&resolve_report(&resolver, count, &resolved)),
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let document = load_document(&args.document)?;
    let patch = load_patch(&args.patch)?;
    let verdict = validate(&patch, &document);

    match format {
        OutputFormat::Text => {
            if verdict.is_ok() {
                println!(
                    "{} Patch is safe to apply ({} operations)",
                    "✓".green().bold(),
                    patch.len()
                );
            }
        }
        OutputFormat::Json => print_json(&check_report(&patch, &verdict))?,
    }
    verdict.context("patch rejected")
}

fn cmd_apply(args: ApplyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut document = load_document(&args.document)?;
    let patch = load_patch(&args.patch)?;
    let guarded = !args.unguarded;
    if guarded {
        apply_guarded(&patch, &mut document).context("failed to apply patch")?;
    } else {
        apply(&patch, &mut document).context("failed to apply patch")?;
    }

    match format {
        OutputFormat::Text => {
            let mode = if guarded { "guarded" } else { "unguarded" };
            println!(
                "{} Applied {} operations ({})",
                "✓".green().bold(),
                patch.len(),
                mode.yellow()
            );
            print_document(&document)
        }
        OutputFormat::Json => print_json(&apply_report(guarded, &patch, &document)),
    }
}

/// Build the resolver: configuration first, then explicit flags on top.
pub(crate) fn resolver_from_args(args: &ResolveArgs) -> anyhow::Result<Resolver> {
    let mut resolver = match &args.config {
        Some(path) => {
            let config = ResolutionConfig::from_path(path)?;
            debug!(path = %path.display(), "loaded resolver configuration");
            match &args.record_type {
                Some(record_type) => config.resolver_for(record_type),
                None => config.default.resolver(),
            }
        }
        None => Resolver::default(),
    };
    if let Some(strategy) = args.strategy {
        resolver = Resolver::new(strategy.into()).with_tie_break(resolver.tie_break());
    }
    if let Some(tie_break) = args.tie_break {
        resolver = resolver.with_tie_break(tie_break.into());
    }
    debug!(
        strategy = %resolver.strategy(),
        tie_break = %resolver.tie_break(),
        record_type = args.record_type.as_deref().unwrap_or("-"),
        "resolver selected"
    );
    Ok(resolver)
}

pub(crate) fn resolve_report(resolver: &Resolver, siblings: usize, document: &Document) -> Value {
    json!({
        "strategy": resolver.strategy(),
        "tie_break": resolver.tie_break(),
        "siblings": siblings,
        "document": document,
    })
}

pub(crate) fn check_report(patch: &Patch, verdict: &PatchResult<()>) -> Value {
    match verdict {
        Ok(()) => json!({"valid": true, "operations": patch.len()}),
        Err(err) => json!({"valid": false, "error": err.to_string()}),
    }
}

pub(crate) fn apply_report(guarded: bool, patch: &Patch, document: &Document) -> Value {
    json!({
        "guarded": guarded,
        "operations": patch.len(),
        "document": document,
    })
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "read input file");
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub(crate) fn load_siblings(path: &Path) -> anyhow::Result<SiblingSet> {
    let raw = read_json(path)?;
    let siblings: SiblingSet = serde_json::from_value(raw)
        .with_context(|| format!("{} is not a non-empty array of siblings", path.display()))?;
    debug!(path = %path.display(), siblings = siblings.len(), "loaded siblings");
    Ok(siblings)
}

pub(crate) fn load_document(path: &Path) -> anyhow::Result<Document> {
    let document = Document::from(read_json(path)?);
    debug!(path = %path.display(), shape = document.shape(), "loaded document");
    Ok(document)
}

pub(crate) fn load_patch(path: &Path) -> anyhow::Result<Patch> {
    let raw = read_json(path)?;
    let patch = Patch::from_json(&raw).with_context(|| format!("malformed patch in {}", path.display()))?;
    debug!(path = %path.display(), operations = patch.len(), "loaded patch");
    Ok(patch)
}

fn print_document(document: &Document) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

fn print_json(report: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
