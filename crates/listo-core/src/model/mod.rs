//! Persisted data shapes: items, labels, sections and search filters.

pub mod filter;
pub mod item;
pub mod section;

pub use filter::Filter;
pub use item::{Item, ItemKey, Label};
pub use section::Section;
