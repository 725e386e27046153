// =====================================================================
// File: hash/table.rs
//
// Description:
//   Implements the chained hash index (`ChainedHashIndex`): a fixed
//   array of buckets, each holding a singly linked chain of the records
//   whose keys hashed there.
//
// Features:
//   - `insert`         : Appends to the tail of the bucket's chain.
//   - `search`         : Walks one chain; first exact match wins.
//   - `remove`         : Splices a head or interior entry out of a chain.
//   - `sorted_snapshot`: Copies every live record out and sorts by key.
//
// Notes:
//   * The table never grows. It is sized once, up front, and every key
//     maps into it by `HashStrategy::bucket`.
//   * Chains are released iteratively on drop.
// =====================================================================
use log::{debug, trace};

use super::chain::{ChainEntry, ChainLink, HashStrategy};
use crate::index::{Backend, KeyedIndex, TraversalOrder};
use crate::{IndexError, Record};

/// Bucket count used when none is configured. Prime, to spread keys.
pub const DEFAULT_TABLE_SIZE: usize = 179;

/// Separate-chaining hash table over records.
#[derive(Debug)]
pub struct ChainedHashIndex {
    buckets: Vec<ChainLink>,
    strategy: HashStrategy,
    size: usize,
}


impl Default for ChainedHashIndex {
    fn default() -> Self {
        Self::new()
    }
}


impl ChainedHashIndex {
    /// Table with [`DEFAULT_TABLE_SIZE`] buckets and the char-sum hash.
    pub fn new() -> Self {
        Self::with_table_size(DEFAULT_TABLE_SIZE, HashStrategy::default())
    }

    /// Create a table with `table_size` buckets hashed by `strategy`.
    ///
    /// # Panics
    /// If `table_size` is zero. Configuration loading rejects zero
    /// before a table is built.
    pub fn with_table_size(table_size: usize, strategy: HashStrategy) -> Self {
        assert!(table_size > 0, "hash table needs at least one bucket");
        let mut buckets = Vec::with_capacity(table_size);
        buckets.resize_with(table_size, || None);
        Self {
            buckets,
            strategy,
            size: 0,
        }
    }

    /// Bucket number for `key`, always below [`Self::table_size`].
    pub fn hash(&self, key: &str) -> Result<usize, IndexError> {
        self.strategy.bucket(key, self.buckets.len())
    }

    /// Insert a record at the tail of its bucket's chain.
    ///
    /// # Errors
    /// - `IndexError::KeyFormat` if the key cannot be hashed.
    /// - `IndexError::DuplicateKey` if the key is already in the chain.
    ///
    /// In both cases nothing is linked.
    ///
    /// # Example
    /// ```
    /// use recordindex::{ChainedHashIndex, HashStrategy, Record};
    /// let mut table = ChainedHashIndex::with_table_size(5, HashStrategy::CharSum);
    /// table.insert(Record::course("CSCI100", "Intro", vec![])).unwrap();
    /// assert_eq!(table.len(), 1);
    /// assert!(!table.is_empty());
    /// ```
    pub fn insert(&mut self, record: Record) -> Result<(), IndexError> {
        let bucket = self.hash(&record.key)?;

        let mut slot = &mut self.buckets[bucket];
        let mut position = 0usize;
        while let Some(entry) = slot {
            if entry.key() == record.key {
                debug!("hash index rejected duplicate key '{}'", record.key);
                return Err(IndexError::DuplicateKey { key: record.key });
            }
            slot = &mut entry.next;
            position += 1;
        }

        trace!("hash index: '{}' -> bucket {} position {}", record.key, bucket, position);
        *slot = Some(Box::new(ChainEntry::new(record)));
        self.size += 1;
        Ok(())
    }

    /// Search the key's bucket for an exact match.
    ///
    /// A key that cannot be hashed can never have been inserted, so it
    /// reports `None` like any other missing key.
    pub fn search(&self, key: &str) -> Option<&Record> {
        let bucket = self.hash(key).ok()?;
        let mut current = self.buckets[bucket].as_deref();
        while let Some(entry) = current {
            if entry.key() == key {
                return Some(&entry.record);
            }
            current = entry.next.as_deref();
        }
        None
    }

    /// Remove the first entry with `key` from its bucket.
    ///
    /// - Head match: the second entry (if any) becomes the bucket head.
    /// - Interior match: the entry is spliced out behind a trailing link.
    ///
    /// # Returns
    /// * `Some(record)` with the removed record.
    /// * `None` if the key was not found; the table is unchanged.
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        let bucket = self.hash(key).ok()?;
        let head = &mut self.buckets[bucket];

        if head.as_ref().is_some_and(|entry| entry.key() == key) {
            let mut removed = head.take()?;
            *head = removed.next.take();
            self.size -= 1;
            debug!("hash index removed '{}' from head of bucket {}", key, bucket);
            return Some(removed.record);
        }

        let mut trailing = head.as_mut()?;
        loop {
            if trailing.next.as_ref().is_some_and(|entry| entry.key() == key) {
                let mut removed = trailing.next.take()?;
                trailing.next = removed.next.take();
                self.size -= 1;
                debug!("hash index removed '{}' from chain in bucket {}", key, bucket);
                return Some(removed.record);
            }
            trailing = trailing.next.as_mut()?;
        }
    }

    /// All live records, sorted by key.
    ///
    /// The table has no order of its own, so this copies a reference to
    /// every entry into a new vector and sorts it. O(n log n) time and
    /// O(n) extra space; later changes to the table are not reflected.
    pub fn sorted_snapshot(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = Vec::with_capacity(self.size);
        for bucket in &self.buckets {
            let mut current = bucket.as_deref();
            while let Some(entry) = current {
                records.push(&entry.record);
                current = entry.next.as_deref();
            }
        }
        records.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        records
    }

    pub fn len(&self) -> usize {
        self.size
    }

    /// `true` only when every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Option::is_none)
    }

    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Records per bucket.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Chain length of every bucket, in bucket order.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|bucket| {
                let mut length = 0;
                let mut current = bucket.as_deref();
                while let Some(entry) = current {
                    length += 1;
                    current = entry.next.as_deref();
                }
                length
            })
            .collect()
    }

    /// Length of the longest collision chain.
    pub fn longest_chain(&self) -> usize {
        self.chain_lengths().into_iter().max().unwrap_or(0)
    }

    /// Drops every record; the bucket count stays the same.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            let mut current = bucket.take();
            while let Some(mut entry) = current {
                current = entry.next.take();
            }
        }
        self.size = 0;
    }

    /// Takes every record out of the table, in bucket order.
    pub fn into_records(mut self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.size);
        for bucket in &mut self.buckets {
            let mut current = bucket.take();
            while let Some(entry) = current {
                let ChainEntry { record, next } = *entry;
                records.push(record);
                current = next;
            }
        }
        self.size = 0;
        records
    }
}


impl Drop for ChainedHashIndex {
    fn drop(&mut self) {
        self.clear();
    }
}


impl KeyedIndex for ChainedHashIndex {
    fn insert(&mut self, record: Record) -> Result<(), IndexError> {
        ChainedHashIndex::insert(self, record)
    }

    fn search(&self, key: &str) -> Option<&Record> {
        ChainedHashIndex::search(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<Record> {
        ChainedHashIndex::remove(self, key)
    }

    fn traverse(&self, order: TraversalOrder) -> Box<dyn Iterator<Item = &Record> + '_> {
        if order != TraversalOrder::InOrder {
            trace!("hash index has no {:?} order, returning sorted snapshot", order);
        }
        Box::new(self.sorted_snapshot().into_iter())
    }

    fn len(&self) -> usize {
        self.size
    }

    fn is_empty(&self) -> bool {
        ChainedHashIndex::is_empty(self)
    }

    fn backend(&self) -> Backend {
        Backend::Hash
    }

    fn drain(self: Box<Self>) -> Vec<Record> {
        (*self).into_records()
    }

    fn check_key(&self, key: &str) -> Result<(), IndexError> {
        self.hash(key).map(|_| ())
    }
}
