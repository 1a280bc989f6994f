//! `lo migrate`: report what the startup migration did.

use super::Session;
use crate::output::{OutputMode, pretty_kv, render_mode};
use listo_core::MigrationOutcome;
use std::io::Write;

/// Execute `lo migrate`. Migration itself runs when the session opens; this
/// only reports its outcome.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_migrate(output: OutputMode, session: &Session) -> anyhow::Result<()> {
    render_mode(output, &session.migration, render_text, render_pretty)
}

fn render_text(outcome: &MigrationOutcome, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{}\t{}",
        outcome.from_version,
        outcome.to_version,
        kind_name(outcome),
        outcome.migrated.join(",")
    )
}

fn render_pretty(outcome: &MigrationOutcome, w: &mut dyn Write) -> std::io::Result<()> {
    if !outcome.changed_anything() {
        return writeln!(w, "store is at version {}; nothing to migrate", outcome.to_version);
    }
    pretty_kv(w, "from", &outcome.from_version)?;
    pretty_kv(w, "to", &outcome.to_version)?;
    pretty_kv(w, "kind", kind_name(outcome))?;
    pretty_kv(w, "migrated", outcome.migrated.join(", "))?;
    if !outcome.skipped.is_empty() {
        pretty_kv(w, "skipped", outcome.skipped.join(", "))?;
    }
    Ok(())
}

fn kind_name(outcome: &MigrationOutcome) -> String {
    serde_json::to_value(outcome.kind)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
