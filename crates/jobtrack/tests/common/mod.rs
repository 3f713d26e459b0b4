//! Shared test utilities for jobtrack integration tests.
//!
//! This module provides:
//! - `StoreHarness` wiring a store to an in-memory backend and a
//!   notification receiver
//! - `SqliteHarness` for stores backed by a database in a temp directory
//! - Builders for application records and config files

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{drain, wait_until, SqliteHarness, StoreHarness};
