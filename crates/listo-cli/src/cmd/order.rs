//! `lo order`: print a section's reconciled key ordering.

use super::{Session, parse_section};
use crate::output::{OutputMode, fail, render_mode};
use clap::Args;
use listo_core::OrderingStore;
use listo_core::error::ListError;
use listo_core::model::{ItemKey, Section};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Section to show: in-progress or completed.
    pub section: String,
}

#[derive(Debug, Serialize)]
struct OrderView {
    section: Section,
    ordering: Vec<ItemKey>,
}

/// Execute `lo order`.
///
/// # Errors
///
/// Returns an error if the section is unknown or the reconciled ordering
/// cannot be persisted.
pub fn run_order(args: &OrderArgs, output: OutputMode, session: &mut Session) -> anyhow::Result<()> {
    let section = parse_section(&args.section, output)?;
    let live = session.list().keys_in(section);
    let ordering = OrderingStore::load(&mut session.store, section, &live)
        .map_err(|e| fail(output, ListError::from(e)))?;

    let view = OrderView {
        section,
        ordering: ordering.ordering().to_vec(),
    };
    render_mode(
        output,
        &view,
        |v, w| {
            for key in &v.ordering {
                writeln!(w, "{key}")?;
            }
            Ok(())
        },
        |v, w| {
            let keys: Vec<String> = v.ordering.iter().map(ToString::to_string).collect();
            writeln!(w, "{}: [{}]", v.section, keys.join(", "))
        },
    )
}
