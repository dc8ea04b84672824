//! Viewgraph - filtered, sorted, paginated table views over a property graph
//!
//! This crate turns the saved views of a CRM front end into graph queries:
//! - A static property registry describing every table and column
//! - A filter grammar with a stable JSON wire format
//! - Translation of filter, sort and page into parameterised Cypher
//! - Per-tenant view definitions with shipped presets
//! - Execution against any `GraphExecutor`, including an in-memory graph

pub mod utils;

pub mod catalog;
pub mod config;
pub mod entities;
pub mod executor;
pub mod predicate;
pub mod presets;
pub mod query;
pub mod service;
pub mod views;
