//! `lo list`: show items by section in their persisted order.

use super::{Session, SectionView, parse_label, parse_section, section_view};
use crate::output::{OutputMode, fail, pretty_item, pretty_rule, render_mode, text_item};
use clap::Args;
use listo_core::error::ListError;
use listo_core::model::filter::uniform_status;
use listo_core::model::{Filter, Item, Section};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Search words (repeatable); every word must occur in the description.
    #[arg(short, long = "search")]
    pub search: Vec<String>,

    /// Only show items carrying this label.
    #[arg(short, long)]
    pub label: Option<String>,

    /// Only show one section: in-progress or completed.
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListView {
    sections: Vec<SectionView>,
    /// Whether a divider separates the sections: both have visible items.
    divider: bool,
}

/// Execute `lo list`.
///
/// # Errors
///
/// Returns an error if a filter argument is unknown or the reconciled
/// orderings cannot be persisted.
pub fn run_list(args: &ListArgs, output: OutputMode, session: &mut Session) -> anyhow::Result<()> {
    let label = args
        .label
        .as_deref()
        .map(|raw| parse_label(raw, output))
        .transpose()?;
    let sections = match args.section.as_deref() {
        Some(raw) => vec![parse_section(raw, output)?],
        None => Section::ALL.to_vec(),
    };

    let filter = Filter::new(&args.search, label);
    let items = session.list().items().to_vec();
    let visible: Vec<Item> = filter.apply(&items).cloned().collect();

    let mut views = Vec::with_capacity(sections.len());
    for section in sections {
        let view = section_view(session, section, &visible)
            .map_err(|e| fail(output, ListError::from(e)))?;
        views.push(view);
    }
    let divider = !uniform_status(views.iter().flat_map(|v| v.items.iter()));
    tracing::debug!(
        total = items.len(),
        visible = visible.len(),
        filtered = !filter.is_empty(),
        "listed items"
    );

    let view = ListView {
        sections: views,
        divider,
    };
    render_mode(output, &view, render_text, render_pretty)
}

fn render_text(view: &ListView, w: &mut dyn Write) -> std::io::Result<()> {
    for item in view.sections.iter().flat_map(|s| s.items.iter()) {
        text_item(w, item)?;
    }
    Ok(())
}

fn render_pretty(view: &ListView, w: &mut dyn Write) -> std::io::Result<()> {
    let shown: Vec<&SectionView> = view.sections.iter().filter(|s| !s.items.is_empty()).collect();
    if shown.is_empty() {
        return writeln!(w, "no items");
    }
    for (i, section) in shown.iter().enumerate() {
        if i > 0 && view.divider {
            pretty_rule(w)?;
        }
        writeln!(w, "{} ({})", section.section, section.items.len())?;
        for item in &section.items {
            pretty_item(w, item)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ListArgs,
    }

    #[test]
    fn no_filters_by_default() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.search.is_empty());
        assert!(w.args.label.is_none());
        assert!(w.args.section.is_none());
    }

    #[test]
    fn parses_repeated_search_and_section() {
        let w = Wrapper::parse_from([
            "test", "-s", "buy", "--search", "milk", "--label", "green", "--section", "done",
        ]);
        assert_eq!(w.args.search, vec!["buy", "milk"]);
        assert_eq!(w.args.label.as_deref(), Some("green"));
        assert_eq!(w.args.section.as_deref(), Some("done"));
    }

    #[test]
    fn pretty_view_draws_divider_between_sections() {
        let mut done = Item::new(2, "b", vec![]);
        done.status = true;
        let view = ListView {
            sections: vec![
                SectionView {
                    section: Section::InProgress,
                    items: vec![Item::new(1, "a", vec![])],
                },
                SectionView {
                    section: Section::Completed,
                    items: vec![done],
                },
            ],
            divider: true,
        };
        let mut buf = Vec::new();
        render_pretty(&view, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "in-progress (1)");
        assert!(lines[2].starts_with("---"));
        assert_eq!(lines[3], "completed (1)");
    }

    #[test]
    fn pretty_view_reports_empty_list() {
        let view = ListView {
            sections: vec![SectionView {
                section: Section::InProgress,
                items: vec![],
            }],
            divider: false,
        };
        let mut buf = Vec::new();
        render_pretty(&view, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "no items\n");
    }
}
