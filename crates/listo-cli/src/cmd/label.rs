//! `lo label`: toggle a label on an item.

use super::{Session, parse_label};
use crate::output::{OutputMode, fail, render};
use clap::Args;
use listo_core::model::ItemKey;
use serde_json::json;

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Key of the item.
    pub key: ItemKey,

    /// Label to toggle: red, green, blue, yellow.
    pub label: String,
}

/// Execute `lo label`. Adds the label when absent, removes it when present.
///
/// # Errors
///
/// Returns an error if the label is unknown, the key does not exist, or the
/// store cannot be written.
pub fn run_label(args: &LabelArgs, output: OutputMode, session: &mut Session) -> anyhow::Result<()> {
    let label = parse_label(&args.label, output)?;
    let mut list = session.list();
    let item = list
        .toggle_label(args.key, label.clone())
        .map_err(|e| fail(output, e))?
        .clone();
    let set = item.has_label(&label);
    tracing::info!(key = item.key, label = %label, set, "toggled label");

    let result = json!({
        "key": item.key,
        "label": label,
        "set": set,
        "labels": item.labels,
    });
    render(output, &result, |_, w| {
        let verb = if set { "added" } else { "removed" };
        writeln!(w, "{verb} label {label} on {}", item.key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: LabelArgs,
    }

    #[test]
    fn parses_key_and_label() {
        let w = Wrapper::parse_from(["test", "7", "yellow"]);
        assert_eq!(w.args.key, 7);
        assert_eq!(w.args.label, "yellow");
    }

    #[test]
    fn label_is_required() {
        assert!(Wrapper::try_parse_from(["test", "7"]).is_err());
    }
}
