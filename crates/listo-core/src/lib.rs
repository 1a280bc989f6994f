//! listo-core library.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums with machine codes in [`error`]; `anyhow::Result`
//!   only where config files are read.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`). Nothing here
//!   installs a subscriber.
//! - **Storage**: every module takes its backend as a [`storage::KeyValueStore`]
//!   so it can run against [`storage::MemoryStore`] in tests.

pub mod config;
pub mod error;
pub mod list;
pub mod lock;
pub mod model;
pub mod ordering;
pub mod storage;
pub mod version;

pub use list::TodoList;
pub use ordering::OrderingStore;
pub use version::{MigrationOutcome, Migrator, VERSION};
