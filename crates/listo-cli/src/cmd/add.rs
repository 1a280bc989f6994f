//! `lo add`: append a new item to the in-progress section.

use super::{Session, parse_label};
use crate::output::{OutputMode, fail, pretty_item, render_mode, text_item};
use clap::Args;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Item description. Multiple words are joined with spaces.
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Label to attach (repeatable): red, green, blue, yellow.
    #[arg(short, long = "label")]
    pub labels: Vec<String>,
}

/// Execute `lo add`.
///
/// # Errors
///
/// Returns an error if the description is blank, a label is unknown, or the
/// store cannot be written.
pub fn run_add(args: &AddArgs, output: OutputMode, session: &mut Session) -> anyhow::Result<()> {
    let labels = args
        .labels
        .iter()
        .map(|raw| parse_label(raw, output))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let description = args.text.join(" ");

    let mut list = session.list();
    let key = list.add(&description, labels).map_err(|e| fail(output, e))?;
    let item = list.get(key).cloned().ok_or_else(|| anyhow::anyhow!("item {key} vanished after add"))?;
    tracing::info!(key, "added item");

    render_mode(
        output,
        &item,
        |item, w| text_item(w, item),
        |item, w| {
            write!(w, "added ")?;
            pretty_item(w, item)
        },
    )
}
