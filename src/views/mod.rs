//! Per-tenant table-view definitions: layout, default and overriding
//! filters and sorts, and the stores that keep them.

pub mod definition;
pub mod errors;
pub mod store;
pub mod validate;

pub use definition::{BoardBucket, ColumnView, Rendering, TableViewDefinition, ViewKey};
pub use errors::ViewError;
pub use store::{InMemoryViewStore, JsonFileViewStore, SeedOutcome, ViewDefinitionStore};
pub use validate::validate_definition;
