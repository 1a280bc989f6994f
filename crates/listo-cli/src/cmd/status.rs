//! `lo done` and `lo reopen`: move an item between sections.

use super::Session;
use crate::output::{OutputMode, fail, pretty_item, render_mode, text_item};
use clap::Args;
use listo_core::model::ItemKey;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Key of the item.
    pub key: ItemKey,
}

/// Set the completion status of one item.
///
/// # Errors
///
/// Returns an error if the key does not exist or the store cannot be written.
pub fn run_set_status(
    args: &StatusArgs,
    status: bool,
    output: OutputMode,
    session: &mut Session,
) -> anyhow::Result<()> {
    let mut list = session.list();
    let item = list
        .set_status(args.key, status)
        .map_err(|e| fail(output, e))?
        .clone();
    tracing::info!(key = item.key, status, "set item status");

    render_mode(
        output,
        &item,
        |item, w| text_item(w, item),
        |item, w| pretty_item(w, item),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: StatusArgs,
    }

    #[test]
    fn parses_numeric_key() {
        let w = Wrapper::parse_from(["test", "42"]);
        assert_eq!(w.args.key, 42);
    }

    #[test]
    fn rejects_non_numeric_key() {
        assert!(Wrapper::try_parse_from(["test", "abc"]).is_err());
    }
}
