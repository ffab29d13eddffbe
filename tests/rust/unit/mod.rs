//! Unit tests - public API checks that need no graph database
//!
//! Pins the rendered projection queries and the snapshot loader.

mod snapshot_tests;
