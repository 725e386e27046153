// =====================================================================
// File: index/tree.rs
//
// Description:
//   Implements the ordered index (`OrderedIndex`), an unbalanced binary
//   search tree over `TreeNode` structures. Records are kept ordered by
//   key so in-order, pre-order and post-order walks come straight from
//   the tree shape.
//
// Features:
//   - `insert`  : Adds a record as a new leaf; duplicate keys are rejected.
//   - `search`  : Standard BST descent; returns the record for a key.
//   - `remove`  : Leaf / one-child / two-children (successor) repair.
//   - `traverse`: Lazy in-order, pre-order or post-order iterator.
//
// Notes:
//   * Relies on `node.rs` for the `TreeNode` definition.
//   * No rebalancing. Already sorted input degrades the tree into a
//     list, so every walk here is iterative or bounded by one descent.
// =====================================================================
use std::cmp::Ordering;

use log::{debug, trace};

use super::node::{Link, TreeNode};
use super::{Backend, KeyedIndex, TraversalOrder};
use crate::{IndexError, Record};

/// Binary search tree index. Owns the root link and every record below it.
#[derive(Debug, Default)]
pub struct OrderedIndex {
    root: Link,
    size: usize,
}


impl OrderedIndex {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search the tree for a key.
    ///
    /// Descends from the root, going left when `key` is less than the
    /// node's key and right when it is greater.
    ///
    /// # Returns
    /// * `Some(&Record)` if the key is stored in the tree.
    /// * `None` once an empty child is reached.
    ///
    /// # Notes
    /// - O(log n) on random insertion order, O(n) when the keys were
    ///   inserted already sorted.
    ///
    /// # Example
    /// ```
    /// use recordindex::{OrderedIndex, Record};
    /// let mut tree = OrderedIndex::new();
    /// tree.insert(Record::course("CSCI100", "Intro", vec![])).unwrap();
    /// assert_eq!(tree.search("CSCI100").map(|r| r.title.as_str()), Some("Intro"));
    /// assert!(tree.search("CSCI200").is_none());
    /// ```
    pub fn search(&self, key: &str) -> Option<&Record> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key()) {
                Ordering::Equal => return Some(&node.record),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Insert a record into the tree.
    ///
    /// - An empty tree takes the record as its root.
    /// - Otherwise the record descends (less goes left, everything else
    ///   right) and is attached as a new leaf at the first empty child.
    ///
    /// # Errors
    /// `IndexError::DuplicateKey` if the key is already stored. The check
    /// happens during the same descent, before anything is linked, so a
    /// rejected insert leaves the tree unchanged.
    ///
    /// # Example
    /// ```
    /// use recordindex::{IndexError, OrderedIndex, Record};
    /// let mut tree = OrderedIndex::new();
    /// tree.insert(Record::course("CSCI100", "Intro", vec![])).unwrap();
    /// let again = tree.insert(Record::course("CSCI100", "Other", vec![]));
    /// assert!(matches!(again, Err(IndexError::DuplicateKey { .. })));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, record: Record) -> Result<(), IndexError> {
        let mut slot = &mut self.root;
        let mut depth = 0usize;

        while let Some(node) = slot {
            match record.key.as_str().cmp(node.key()) {
                Ordering::Equal => {
                    debug!("ordered index rejected duplicate key '{}'", record.key);
                    return Err(IndexError::DuplicateKey { key: record.key });
                }
                Ordering::Less => slot = &mut node.left,
                Ordering::Greater => slot = &mut node.right,
            }
            depth += 1;
        }

        trace!("ordered index: '{}' attached at depth {}", record.key, depth);
        *slot = Some(Box::new(TreeNode::new(record)));
        self.size += 1;
        Ok(())
    }

    /// Removes a key from the tree if present.
    ///
    /// The node holding the key is repaired by one of four cases, checked
    /// in this order:
    /// 1. **Leaf**: detached, the parent's slot becomes empty.
    /// 2. **Only a left child**: the left child takes the node's slot.
    /// 3. **Only a right child**: the right child takes the node's slot.
    /// 4. **Two children**: the in-order successor (leftmost node of the
    ///    right subtree) is unlinked, its right child taking its place, and
    ///    its record moves into this node. No key is left stored twice.
    ///
    /// # Returns
    /// * `Some(record)` with the removed record.
    /// * `None` if the key was not present; the tree is unchanged.
    ///
    /// # Example
    /// ```
    /// use recordindex::{OrderedIndex, Record};
    /// let mut tree = OrderedIndex::new();
    /// tree.insert(Record::course("CSCI100", "Intro", vec![])).unwrap();
    /// assert!(tree.remove("CSCI100").is_some());
    /// assert!(tree.remove("CSCI100").is_none());
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        let removed = Self::remove_node(&mut self.root, key);
        if removed.is_some() {
            self.size -= 1;
            debug!("ordered index removed '{}', {} records left", key, self.size);
        }
        removed
    }

    /// Lazily walk the records in the requested order.
    ///
    /// Each call starts a fresh walk from the root.
    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_> {
        Traversal::new(self.root.as_deref(), order)
    }

    /// In-order walk, ascending by key.
    pub fn iter(&self) -> Traversal<'_> {
        self.traverse(TraversalOrder::InOrder)
    }

    /// Number of records stored. Kept as a counter, not recounted.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels in the tree, 0 when empty.
    pub fn height(&self) -> usize {
        self.root.as_deref().map_or(0, TreeNode::height)
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        Self::release(self.root.take());
        self.size = 0;
    }

    /// Takes every record out of the tree, ascending by key.
    pub fn into_records(mut self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.size);
        let mut pending: Vec<Box<TreeNode>> = Vec::new();
        let mut current = self.root.take();
        self.size = 0;

        // In-order walk that hands each node's record out as it is visited
        loop {
            while let Some(mut node) = current {
                current = node.left.take();
                pending.push(node);
            }
            match pending.pop() {
                Some(mut node) => {
                    current = node.right.take();
                    records.push(node.record);
                }
                None => break,
            }
        }
        records
    }


    // =========================
    // Removal helpers
    // =========================

    /// Unlinks the node holding `key` and repairs its slot.
    ///
    /// Both descents below are loops over `&mut Link`, so a tree that
    /// degraded into a list is handled without deep recursion.
    fn remove_node(root: &mut Link, key: &str) -> Option<Record> {
        let mut slot = root;
        loop {
            let direction = key.cmp(slot.as_deref()?.key());
            slot = match direction {
                Ordering::Equal => break,
                Ordering::Less => &mut slot.as_mut()?.left,
                Ordering::Greater => &mut slot.as_mut()?.right,
            };
        }

        // Two children: the successor's record moves into this node
        let node = slot.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            let successor = Self::take_leftmost(&mut node.right)?;
            trace!("ordered index: '{}' replaced by successor '{}'", key, successor.key);
            return Some(std::mem::replace(&mut node.record, successor));
        }

        // Leaf or a single child: the child (if any) takes over the slot
        let mut removed = slot.take()?;
        *slot = removed.left.take().or_else(|| removed.right.take());
        Some(removed.record)
    }

    /// Detaches the leftmost node under `slot`, its right child moving up.
    fn take_leftmost(slot: &mut Link) -> Option<Record> {
        let mut slot = slot;
        while slot.as_deref()?.left.is_some() {
            slot = &mut slot.as_mut()?.left;
        }

        let mut leftmost = slot.take()?;
        *slot = leftmost.right.take();
        Some(leftmost.record)
    }

    /// Frees a subtree without recursing once per level.
    fn release(root: Link) {
        let mut pending: Vec<Box<TreeNode>> = root.into_iter().collect();
        while let Some(mut node) = pending.pop() {
            // Detach children before the parent goes away
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}


impl Drop for OrderedIndex {
    fn drop(&mut self) {
        Self::release(self.root.take());
    }
}


impl KeyedIndex for OrderedIndex {
    fn insert(&mut self, record: Record) -> Result<(), IndexError> {
        OrderedIndex::insert(self, record)
    }

    fn search(&self, key: &str) -> Option<&Record> {
        OrderedIndex::search(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<Record> {
        OrderedIndex::remove(self, key)
    }

    fn traverse(&self, order: TraversalOrder) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(OrderedIndex::traverse(self, order))
    }

    fn len(&self) -> usize {
        self.size
    }

    fn is_empty(&self) -> bool {
        OrderedIndex::is_empty(self)
    }

    fn backend(&self) -> Backend {
        Backend::Tree
    }

    fn drain(self: Box<Self>) -> Vec<Record> {
        (*self).into_records()
    }
}


impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = &'a Record;
    type IntoIter = Traversal<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


/// Lazy depth-first walk over an `OrderedIndex`.
///
/// Keeps an explicit stack of nodes; a node pushed as `expanded` has had
/// its children scheduled already and is yielded when popped.
#[derive(Debug)]
pub struct Traversal<'a> {
    order: TraversalOrder,
    stack: Vec<(&'a TreeNode, bool)>,
}


impl<'a> Traversal<'a> {
    fn new(root: Option<&'a TreeNode>, order: TraversalOrder) -> Self {
        Self {
            order,
            stack: root.map(|node| (node, false)).into_iter().collect(),
        }
    }
}


impl<'a> Iterator for Traversal<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(&node.record);
            }

            let left = node.left.as_deref().map(|child| (child, false));
            let right = node.right.as_deref().map(|child| (child, false));

            // Pushed in reverse of the visiting order
            match self.order {
                TraversalOrder::InOrder => {
                    self.stack.extend(right);
                    self.stack.push((node, true));
                    self.stack.extend(left);
                }
                TraversalOrder::PreOrder => {
                    self.stack.extend(right);
                    self.stack.extend(left);
                    return Some(&node.record);
                }
                TraversalOrder::PostOrder => {
                    self.stack.push((node, true));
                    self.stack.extend(right);
                    self.stack.extend(left);
                }
            }
        }
        None
    }
}
