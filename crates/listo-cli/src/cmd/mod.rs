pub mod add;
pub mod completions;
pub mod label;
pub mod list;
pub mod migrate;
pub mod move_cmd;
pub mod order;
pub mod rm;
pub mod status;

use crate::output::{CliError, OutputMode, render_error};
use listo_core::config::EffectiveConfig;
use listo_core::error::{ErrorCode, StoreError};
use listo_core::model::{Item, Label, Section};
use listo_core::storage::{CookieJar, FileStore};
use listo_core::{MigrationOutcome, Migrator, OrderingStore, TodoList};
use serde::Serialize;

/// An opened, migrated store plus what the startup migration did.
#[derive(Debug)]
pub struct Session {
    pub store: FileStore,
    pub migration: MigrationOutcome,
}

impl Session {
    /// Open the data directory and bring it up to the current schema,
    /// pulling in anything left in the legacy cookie file.
    pub fn open(config: &EffectiveConfig) -> Self {
        let store = FileStore::open(&config.data_dir);
        let legacy = CookieJar::open(&config.cookie_file);
        let mut migrator = Migrator::new(store, legacy);
        let migration = migrator.migrate();
        let (store, _) = migrator.into_inner();
        Self { store, migration }
    }

    pub fn list(&mut self) -> TodoList<&mut FileStore> {
        TodoList::load(&mut self.store)
    }
}

/// One section's items in display order.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub section: Section,
    pub items: Vec<Item>,
}

/// Arrange `section` by its persisted ordering. The ordering is reconciled
/// against every item in the section; `visible` only narrows what is shown.
pub fn section_view(
    session: &mut Session,
    section: Section,
    visible: &[Item],
) -> Result<SectionView, StoreError> {
    let live = session.list().keys_in(section);
    let ordering = OrderingStore::load(&mut session.store, section, &live)?;
    let in_section: Vec<Item> = visible
        .iter()
        .filter(|item| item.section() == section)
        .cloned()
        .collect();
    let items = ordering.arrange(&in_section).into_iter().cloned().collect();
    Ok(SectionView { section, items })
}

/// Parse a label argument, reporting unknown names with their error code.
pub fn parse_label(raw: &str, output: OutputMode) -> anyhow::Result<Label> {
    raw.parse::<Label>().map_err(|e| {
        report(output, &e.to_string(), ErrorCode::UnknownLabel);
        anyhow::Error::new(e)
    })
}

/// Parse a section argument, reporting unknown names with their error code.
pub fn parse_section(raw: &str, output: OutputMode) -> anyhow::Result<Section> {
    raw.parse::<Section>().map_err(|e| {
        report(output, &e.to_string(), ErrorCode::UnknownSection);
        anyhow::Error::new(e)
    })
}

fn report(output: OutputMode, message: &str, code: ErrorCode) {
    if let Err(err) = render_error(output, &CliError::with_code(message, code)) {
        tracing::warn!(error = %err, "failed to render error");
    }
}

