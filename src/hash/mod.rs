// =====================================================================
// File: hash/mod.rs
//
//! The `hash` module provides the separate-chaining backend of the
//! keyed index.
//!
//! Structure:
//! - `chain.rs` : Defines [`ChainEntry`] and the [`HashStrategy`] bucket
//!                function.
//! - `table.rs` : Defines the [`ChainedHashIndex`] (insert, search,
//!                remove, sorted snapshot).
//! - `tests.rs` : Unit tests for the table.
// =====================================================================

pub mod chain;
pub mod table;

pub use self::chain::{ChainEntry, HashStrategy};
pub use self::table::{ChainedHashIndex, DEFAULT_TABLE_SIZE};
