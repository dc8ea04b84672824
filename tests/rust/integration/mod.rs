//! End-to-end tests: service, presets, stores and the in-memory graph
//! working together.

mod common;
mod fixture_tests;
mod mock_executor_tests;
mod scenario_tests;
mod view_store_tests;
