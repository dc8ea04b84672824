//! Property registry: the closed catalog of tables and their columns.
//!
//! Every other layer resolves column ids through [`PropertyRegistry`];
//! nothing outside this module knows how a column maps onto the graph.

pub mod column;
pub mod errors;
pub mod graph_path;
pub mod identifiers;
pub mod registry;
mod tables;

pub use column::{BaseCondition, BaseValue, ColumnDefinition, TableDefinition, ValueType};
pub use errors::CatalogError;
pub use graph_path::{Direction, GraphPath, Hop};
pub use identifiers::{ColumnType, TableId, TableViewType};
pub use registry::{registry, PropertyRegistry};
