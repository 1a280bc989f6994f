//! `lo move`: reorder an item within its section.

use super::Session;
use crate::output::{OutputMode, fail, render};
use clap::Args;
use listo_core::OrderingStore;
use listo_core::error::ListError;
use listo_core::model::{ItemKey, Section};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Key of the item to move.
    pub key: ItemKey,

    /// Key of the item whose slot it takes.
    #[arg(long)]
    pub to: ItemKey,
}

#[derive(Debug, Serialize)]
struct MoveResult {
    section: Section,
    changed: bool,
    ordering: Vec<ItemKey>,
}

/// Execute `lo move`. The moved item lands in the target's slot; everything
/// between shifts by one toward the moved item's old slot.
///
/// # Errors
///
/// Returns an error if either key is missing, the items are in different
/// sections, or the ordering cannot be persisted.
pub fn run_move(args: &MoveArgs, output: OutputMode, session: &mut Session) -> anyhow::Result<()> {
    let (section, live) = {
        let list = session.list();
        let section_of = |key| {
            list.get(key)
                .map(|item| item.section())
                .ok_or(ListError::NotFound(key))
        };
        let moved = section_of(args.key).map_err(|e| fail(output, e))?;
        let target = section_of(args.to).map_err(|e| fail(output, e))?;
        if moved != target {
            return Err(fail(
                output,
                ListError::CrossSection {
                    moved: args.key,
                    target: args.to,
                },
            ));
        }
        (moved, list.keys_in(moved))
    };

    let mut ordering = OrderingStore::load(&mut session.store, section, &live)
        .map_err(|e| fail(output, ListError::from(e)))?;
    let changed = ordering
        .reorder(args.key, args.to)
        .map_err(|e| fail(output, ListError::from(e)))?;
    tracing::info!(moved = args.key, target = args.to, %section, changed, "reordered item");

    let result = MoveResult {
        section,
        changed,
        ordering: ordering.ordering().to_vec(),
    };
    render(output, &result, |r, w| {
        let keys: Vec<String> = r.ordering.iter().map(ToString::to_string).collect();
        writeln!(w, "{}: {}", r.section, keys.join(" "))
    })
}
