//! Output Rendering
//!
//! Provides a unified interface for rendering command results as text or
//! JSON. Renderers return the document; the caller decides where it goes.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::{json, Value};

use crate::application::{
    ConvertResult, ConvertedImage, ExportResult, ItemFailure, PlanResult, PullResult,
    PulledImage, VerifyReport,
};
use crate::domain::entities::{MergeReport, RegistryDocument};
use crate::domain::value_objects::LogicalImageKey;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    write: &'static str,
    skip: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            write: "→",
            skip: "○",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            write: "->",
            skip: "[ ]",
        }
    }
}

/// Renders the result of every command.
pub trait Renderer {
    fn plan(&self, result: &PlanResult) -> String;
    fn export(&self, result: &ExportResult) -> String;
    fn convert(&self, result: &ConvertResult) -> String;
    fn pull(&self, result: &PullResult) -> String;
    fn registry_list(&self, document: &RegistryDocument, location: &Path) -> String;
    fn registry_merge(&self, report: &MergeReport, location: &Path) -> String;
    fn registry_verify(&self, report: &VerifyReport, location: &Path) -> String;
}

/// Text renderer
pub struct TextRenderer {
    /// Whether to use unicode
    pub unicode: bool,
    /// Verbosity level
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    fn icons(&self) -> Icons {
        if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        }
    }

    fn headline(&self, out: &mut String, ok: bool, dry_run: bool, stage: &str) {
        let icons = self.icons();
        let line = match (dry_run, ok) {
            (true, _) => format!("{} {stage} (dry run)", icons.skip),
            (false, true) => format!("{} {stage} Complete", icons.check),
            (false, false) => format!("{} {stage} Finished With Failures", icons.cross),
        };
        let _ = writeln!(out, "{line}");
        let _ = writeln!(out);
    }

    fn failures(&self, out: &mut String, failed: &[ItemFailure]) {
        if failed.is_empty() {
            return;
        }
        let icons = self.icons();
        let _ = writeln!(out, "  Failed ({}):", failed.len());
        for failure in failed {
            let _ = writeln!(out, "    {} {}", icons.cross, failure);
        }
    }

    fn images(&self, out: &mut String, title: &str, items: &[(String, String)], always: bool) {
        if items.is_empty() || !(always || self.verbose > 0) {
            return;
        }
        let icons = self.icons();
        let _ = writeln!(out, "  {title} ({}):", items.len());
        for (reference, locator) in items {
            let _ = writeln!(out, "    {reference} {} {locator}", icons.write);
        }
    }

    fn merge_line(&self, out: &mut String, report: &MergeReport, dry_run: bool) {
        let verb = if dry_run { "would change" } else { "changed" };
        let _ = writeln!(
            out,
            "  Registry {verb}: {} added, {} updated, {} unchanged",
            report.added.len(),
            report.updated.len(),
            report.unchanged.len()
        );
    }
}

fn converted_pairs(items: &[ConvertedImage]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|i| (i.reference.to_string(), i.locator.clone()))
        .collect()
}

fn pulled_pairs(items: &[PulledImage]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|i| (i.reference.to_string(), i.locator.clone()))
        .collect()
}

impl Renderer for TextRenderer {
    fn plan(&self, result: &PlanResult) -> String {
        let icons = self.icons();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} Planned {} images ({})",
            icons.check,
            result.references.len(),
            result.version.tag()
        );
        let _ = writeln!(out);
        for reference in &result.references {
            let _ = writeln!(out, "    {} {reference}", icons.write);
        }
        let _ = writeln!(out, "  Tags file: {}", result.tags_file.display());
        if let Some(report) = &result.registered {
            self.merge_line(&mut out, report, false);
        }
        out
    }

    fn export(&self, result: &ExportResult) -> String {
        let icons = self.icons();
        let mut out = String::new();
        self.headline(&mut out, result.is_success(), result.dry_run, "Export");

        if !result.exported.is_empty() {
            let title = if result.dry_run { "Would export" } else { "Exported" };
            let _ = writeln!(out, "  {title} ({}):", result.exported.len());
            for archive in &result.exported {
                if result.dry_run {
                    let _ = writeln!(out, "    {} {}", icons.write, archive.path.display());
                } else {
                    let _ = writeln!(
                        out,
                        "    {} {} ({} bytes)",
                        icons.write,
                        archive.path.display(),
                        archive.size
                    );
                }
            }
        }
        if !result.skipped.is_empty() && self.verbose > 0 {
            let _ = writeln!(out, "  Skipped ({}):", result.skipped.len());
            for reference in &result.skipped {
                let _ = writeln!(out, "    {} {reference}", icons.skip);
            }
        } else if !result.skipped.is_empty() {
            let _ = writeln!(out, "  Skipped ({})", result.skipped.len());
        }
        self.failures(&mut out, &result.failed);
        if let Some(manifest) = &result.manifest {
            let _ = writeln!(out, "  Manifest: {}", manifest.display());
        }
        out
    }

    fn convert(&self, result: &ConvertResult) -> String {
        let mut out = String::new();
        self.headline(&mut out, result.is_success(), result.dry_run, "Convert");
        let title = if result.dry_run { "Would convert" } else { "Converted" };
        self.images(&mut out, title, &converted_pairs(&result.converted), true);
        self.images(&mut out, "Up to date", &converted_pairs(&result.skipped), false);
        if !result.skipped.is_empty() && self.verbose == 0 {
            let _ = writeln!(out, "  Up to date ({})", result.skipped.len());
        }
        self.failures(&mut out, &result.failed);
        self.merge_line(&mut out, &result.registry, result.dry_run);
        out
    }

    fn pull(&self, result: &PullResult) -> String {
        let mut out = String::new();
        self.headline(&mut out, result.is_success(), result.dry_run, "Pull");
        let title = if result.dry_run { "Would pull" } else { "Pulled" };
        self.images(&mut out, title, &pulled_pairs(&result.pulled), true);
        self.images(&mut out, "Already present", &pulled_pairs(&result.skipped), false);
        if !result.skipped.is_empty() && self.verbose == 0 {
            let _ = writeln!(out, "  Already present ({})", result.skipped.len());
        }
        if !result.unresolvable.is_empty() {
            let _ = writeln!(out, "  Unresolvable ({}):", result.unresolvable.len());
            for key in &result.unresolvable {
                let _ = writeln!(out, "    [!] {}", key.as_str());
            }
        }
        self.failures(&mut out, &result.failed);
        self.merge_line(&mut out, &result.registry, result.dry_run);
        out
    }

    fn registry_list(&self, document: &RegistryDocument, location: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Registry: {}", location.display());
        if let Some(name) = &document.name {
            let _ = writeln!(out, "Name: {name}");
        }
        let _ = writeln!(out);
        if document.is_empty() {
            let _ = writeln!(out, "  (no entries)");
            return out;
        }
        let width = document
            .entries()
            .keys()
            .map(|k| k.as_str().chars().count())
            .max()
            .unwrap_or(0);
        for (key, entry) in document.entries() {
            let _ = writeln!(
                out,
                "  {:<width$}  {:<6}  {}",
                key.as_str(),
                entry.kind.as_str(),
                entry.locator
            );
        }
        out
    }

    fn registry_merge(&self, report: &MergeReport, location: &Path) -> String {
        let icons = self.icons();
        let mut out = String::new();
        let _ = writeln!(out, "{} Merged into {}", icons.check, location.display());
        self.merge_line(&mut out, report, false);
        out
    }

    fn registry_verify(&self, report: &VerifyReport, location: &Path) -> String {
        let icons = self.icons();
        let mut out = String::new();
        if report.is_ok() {
            let _ = writeln!(
                out,
                "{} Registry OK: {} ({} image paths checked)",
                icons.check,
                location.display(),
                report.checked
            );
            return out;
        }
        let _ = writeln!(
            out,
            "{} Registry has {} problems: {}",
            icons.cross,
            report.violations.len(),
            location.display()
        );
        for violation in &report.violations {
            let _ = writeln!(out, "    {} {violation}", icons.cross);
        }
        out
    }
}

/// JSON renderer
pub struct JsonRenderer;

fn keys_json(keys: &[LogicalImageKey]) -> Vec<&str> {
    keys.iter().map(LogicalImageKey::as_str).collect()
}

fn merge_json(report: &MergeReport) -> Value {
    json!({
        "added": keys_json(&report.added),
        "updated": keys_json(&report.updated),
        "unchanged": keys_json(&report.unchanged),
    })
}

fn failures_json(failed: &[ItemFailure]) -> Vec<Value> {
    failed
        .iter()
        .map(|f| json!({"subject": f.subject, "message": f.message}))
        .collect()
}

fn converted_json(items: &[ConvertedImage]) -> Vec<Value> {
    items
        .iter()
        .map(|i| {
            json!({
                "reference": i.reference.to_string(),
                "image": i.image.display().to_string(),
                "locator": i.locator,
                "rebound": keys_json(&i.rebound),
            })
        })
        .collect()
}

fn pulled_json(items: &[PulledImage]) -> Vec<Value> {
    items
        .iter()
        .map(|i| {
            json!({
                "reference": i.reference.to_string(),
                "image": i.image.display().to_string(),
                "locator": i.locator,
                "keys": keys_json(&i.keys),
            })
        })
        .collect()
}

fn to_line(value: Value) -> String {
    format!("{value}\n")
}

impl Renderer for JsonRenderer {
    fn plan(&self, result: &PlanResult) -> String {
        to_line(json!({
            "command": "plan",
            "success": true,
            "version": result.version.tag(),
            "references": result.references.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "tags_file": result.tags_file.display().to_string(),
            "registry": result.registered.as_ref().map(merge_json),
        }))
    }

    fn export(&self, result: &ExportResult) -> String {
        to_line(json!({
            "command": "export",
            "success": result.is_success(),
            "dry_run": result.dry_run,
            "exported": result.exported.iter().map(|a| json!({
                "reference": a.reference.to_string(),
                "archive": a.path.display().to_string(),
                "size": a.size,
            })).collect::<Vec<_>>(),
            "skipped": result.skipped.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "failed": failures_json(&result.failed),
            "manifest": result.manifest.as_ref().map(|p| p.display().to_string()),
        }))
    }

    fn convert(&self, result: &ConvertResult) -> String {
        to_line(json!({
            "command": "convert",
            "success": result.is_success(),
            "dry_run": result.dry_run,
            "converted": converted_json(&result.converted),
            "skipped": converted_json(&result.skipped),
            "failed": failures_json(&result.failed),
            "registry": merge_json(&result.registry),
        }))
    }

    fn pull(&self, result: &PullResult) -> String {
        to_line(json!({
            "command": "pull",
            "success": result.is_success(),
            "dry_run": result.dry_run,
            "pulled": pulled_json(&result.pulled),
            "skipped": pulled_json(&result.skipped),
            "unresolvable": keys_json(&result.unresolvable),
            "failed": failures_json(&result.failed),
            "registry": merge_json(&result.registry),
        }))
    }

    fn registry_list(&self, document: &RegistryDocument, location: &Path) -> String {
        let entries: serde_json::Map<String, Value> = document
            .entries()
            .iter()
            .map(|(key, entry)| {
                (
                    key.as_str().to_string(),
                    json!({"locator": entry.locator, "kind": entry.kind.as_str()}),
                )
            })
            .collect();
        to_line(json!({
            "command": "registry list",
            "registry": location.display().to_string(),
            "name": document.name,
            "entries": entries,
        }))
    }

    fn registry_merge(&self, report: &MergeReport, location: &Path) -> String {
        to_line(json!({
            "command": "registry merge",
            "success": true,
            "registry": location.display().to_string(),
            "changes": merge_json(report),
        }))
    }

    fn registry_verify(&self, report: &VerifyReport, location: &Path) -> String {
        to_line(json!({
            "command": "registry verify",
            "success": report.is_ok(),
            "registry": location.display().to_string(),
            "checked": report.checked,
            "violations": report.violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }))
    }
}

/// Create a renderer based on format
pub fn create_renderer(format: OutputFormat, unicode: bool, verbose: u8) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { unicode, verbose }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
