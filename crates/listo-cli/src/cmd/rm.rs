//! `lo rm`: delete an item.

use super::Session;
use crate::output::{OutputMode, fail, render};
use clap::Args;
use listo_core::model::ItemKey;
use serde_json::json;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Key of the item to delete.
    pub key: ItemKey,
}

/// Execute `lo rm`.
///
/// # Errors
///
/// Returns an error if the key does not exist or the store cannot be written.
pub fn run_rm(args: &RmArgs, output: OutputMode, session: &mut Session) -> anyhow::Result<()> {
    let removed = session.list().delete(args.key).map_err(|e| fail(output, e))?;
    tracing::info!(key = removed.key, "deleted item");

    let result = json!({ "deleted": removed });
    render(output, &result, |_, w| {
        writeln!(w, "deleted {}: {}", removed.key, removed.description)
    })
}
