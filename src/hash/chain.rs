// =====================================================================
// File: hash/chain.rs
//
// Description:
//   Chain entries and the bucket hash function used by the chained
//   hash index.
//
//   - `ChainEntry`  : One record in a bucket's singly linked chain.
//   - `HashStrategy`: How a key is turned into a bucket number.
//
// Notes:
//   * Each entry owns the next one; a bucket owns the head.
// =====================================================================
use serde::{Deserialize, Serialize};

use crate::{IndexError, Record};

/// Owned link to the next entry in a chain (or to the head of a bucket).
pub type ChainLink = Option<Box<ChainEntry>>;

/// One entry in a collision chain.
#[derive(Debug)]
pub struct ChainEntry {
    pub record: Record,
    pub next: ChainLink,
}


impl ChainEntry {
    pub fn new(record: Record) -> Self {
        Self { record, next: None }
    }

    pub fn key(&self) -> &str {
        &self.record.key
    }
}


/// Maps a key to a bucket. Fixed for the lifetime of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashStrategy {
    /// Sum of the key's bytes. Defined for every key.
    #[default]
    CharSum,
    /// The run of decimal digits the key ends with, read as an integer
    /// ("98109" -> 98109, "CSCI300" -> 300).
    Numeric,
}


impl HashStrategy {
    /// Returns the bucket for `key` in a table of `table_size` buckets.
    ///
    /// The result is always in `0..table_size`.
    ///
    /// # Errors
    /// `IndexError::KeyFormat` when the numeric strategy is given a key
    /// that does not end in a digit.
    ///
    /// # Example
    /// ```
    /// use recordindex::HashStrategy;
    /// assert_eq!(HashStrategy::CharSum.bucket("AB", 10), Ok((65 + 66) % 10));
    /// assert_eq!(HashStrategy::Numeric.bucket("CSCI300", 7), Ok(300 % 7));
    /// assert!(HashStrategy::Numeric.bucket("CSCI", 7).is_err());
    /// ```
    pub fn bucket(self, key: &str, table_size: usize) -> Result<usize, IndexError> {
        debug_assert!(table_size > 0, "hash table must have at least one bucket");
        let table_size = table_size as u64;

        let hash = match self {
            Self::CharSum => key.bytes().fold(0u64, |sum, byte| sum.wrapping_add(u64::from(byte))),
            Self::Numeric => Self::trailing_number(key)?,
        };
        Ok((hash % table_size) as usize)
    }

    /// Checks that `key` can be hashed under this strategy.
    pub fn accepts(self, key: &str) -> bool {
        match self {
            Self::CharSum => true,
            Self::Numeric => Self::trailing_number(key).is_ok(),
        }
    }

    fn trailing_number(key: &str) -> Result<u64, IndexError> {
        let digits = key.len() - key.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(IndexError::KeyFormat {
                key: key.to_string(),
                reason: "numeric hashing needs a key ending in digits",
            });
        }

        // Overlong digit runs wrap instead of failing so the hash stays total
        let number = key[key.len() - digits..]
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0')));
        Ok(number)
    }
}
