// =====================================================================
// File: index/mod.rs
//
//! The `index` module holds the keyed index contract and the binary
//! search tree backend.
//!
//! Structure:
//! - `mod.rs`   : The [`KeyedIndex`] trait both backends implement, plus
//!                [`TraversalOrder`] and [`Backend`].
//! - `node.rs`  : Defines the [`TreeNode`] structure and its helpers.
//! - `tree.rs`  : Defines the [`OrderedIndex`] and its algorithms
//!                (insert, search, remove, traverse).
//! - `tests.rs` : Unit tests for the tree (compiled only in test mode).
//!
//! The hash backend lives in [`crate::hash`] and implements the same
//! trait, so a catalog can hold either one behind `Box<dyn KeyedIndex>`.
// =====================================================================
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{IndexError, Record};

pub mod node;
pub mod tree;

pub use self::node::TreeNode;
pub use self::tree::{OrderedIndex, Traversal};



/// Visiting order for a traversal.
///
/// The hash backend has no intrinsic order and always answers with a
/// key-sorted snapshot, whatever order is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Left, node, right: ascending by key.
    #[default]
    InOrder,
    /// Node, left, right.
    PreOrder,
    /// Left, right, node.
    PostOrder,
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" | "INORDER" => Ok(Self::InOrder),
            "PRE" | "PREORDER" => Ok(Self::PreOrder),
            "POST" | "POSTORDER" => Ok(Self::PostOrder),
            other => Err(format!("unknown traversal order '{}'", other)),
        }
    }
}


/// Which index implementation backs a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Unbalanced binary search tree ([`OrderedIndex`]).
    #[default]
    Tree,
    /// Separate-chaining hash table ([`crate::ChainedHashIndex`]).
    Hash,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TREE" | "BST" => Ok(Self::Tree),
            "HASH" | "TABLE" => Ok(Self::Hash),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => f.write_str("tree"),
            Self::Hash => f.write_str("hash"),
        }
    }
}


/// Call contract shared by both index backends.
///
/// An index owns every record handed to `insert` until it is removed or
/// the index is dropped. Implementations are single-threaded and do no
/// locking of their own; wrap one in a `Mutex` to share it.
pub trait KeyedIndex {
    /// Stores `record`. Rejected inserts leave the index unchanged.
    fn insert(&mut self, record: Record) -> Result<(), IndexError>;

    /// Looks up a key. `None` means not found.
    fn search(&self, key: &str) -> Option<&Record>;

    /// Removes a key, handing back its record. `None` means not found.
    fn remove(&mut self, key: &str) -> Option<Record>;

    /// Walks the stored records. Recomputed on every call.
    fn traverse(&self, order: TraversalOrder) -> Box<dyn Iterator<Item = &Record> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    fn backend(&self) -> Backend;

    /// Consumes the index and returns every record it held.
    fn drain(self: Box<Self>) -> Vec<Record>;

    fn contains(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// Whether `insert` could place `key` at all, ignoring duplicates.
    fn check_key(&self, _key: &str) -> Result<(), IndexError> {
        Ok(())
    }
}
