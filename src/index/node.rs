// =====================================================================
// File: index/node.rs
//
// Description:
//   Defines the binary search tree node (`TreeNode`) used by the
//   ordered index. Each node maintains:
//
//   - `record`: The record stored at this node (its key orders the tree).
//   - `left`  : Subtree holding keys that compare less than `record.key`.
//   - `right` : Subtree holding keys that compare greater or equal.
//
// Notes:
//   * Children are owned outright. There is no parent link; a parent
//     slot is found again by descending from the root.
//   * This file contains only the node representation and helpers.
//     Insert, search and remove live in `tree.rs`.
// =====================================================================
use crate::Record;

/// Owned link to a child subtree.
pub type Link = Option<Box<TreeNode>>;

/// Basic binary search tree node.
#[derive(Debug)]
pub struct TreeNode {
    pub record: Record,
    /// Box moves the subtree onto the heap so the type has a known size
    pub left: Link,
    pub right: Link,
}


impl TreeNode {
    /// Creates a leaf node holding `record`.
    ///
    /// # Example
    /// ```
    /// use recordindex::{Record, index::TreeNode};
    /// let node = TreeNode::new(Record::course("CSCI100", "Intro", vec![]));
    /// assert!(node.is_leaf());
    /// ```
    pub fn new(record: Record) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }

    /// The key this node is ordered by.
    pub fn key(&self) -> &str {
        &self.record.key
    }

    /// `true` when neither child is present.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the leftmost node of this subtree, the smallest key in it.
    ///
    /// Used to find the in-order successor of a node with two children:
    /// call it on the node's right child.
    pub fn leftmost(&self) -> &TreeNode {
        let mut current_node = self;
        while let Some(next) = current_node.left.as_deref() {
            current_node = next;
        }
        current_node
    }

    /// Height of this subtree counted in nodes. A single leaf has height 1.
    ///
    /// Computed level by level so skewed trees do not recurse per node.
    pub fn height(&self) -> usize {
        let mut level: Vec<&TreeNode> = vec![self];
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }
        height
    }
}
