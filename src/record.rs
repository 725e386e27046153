// =====================================================================
// File: record.rs
//
// Description:
//   The `Record` stored by every index backend. A record is keyed by a
//   course or bid identifier and carries a display title plus an opaque
//   payload. Indexes only ever look at `key`.
// =====================================================================
use std::fmt;

/// Variant-specific data carried by a record. Never inspected by an index.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Course variant: keys of the courses that must be taken first.
    Prerequisites(Vec<String>),
    /// Bid variant: the fund the bid belongs to and its amount.
    Bid { fund: String, amount: f64 },
}

/// A keyed record: a course or an auction bid.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub title: String,
    pub payload: Payload,
}

impl Record {
    /// Builds a course record.
    ///
    /// # Example
    /// ```
    /// use recordindex::Record;
    /// let course = Record::course("CSCI200", "Data Structures", vec!["CSCI101".into()]);
    /// assert_eq!(course.key, "CSCI200");
    /// assert_eq!(course.prerequisites(), ["CSCI101".to_string()]);
    /// ```
    pub fn course(key: impl Into<String>, title: impl Into<String>, prerequisites: Vec<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            payload: Payload::Prerequisites(prerequisites),
        }
    }

    /// Builds a bid record.
    pub fn bid(key: impl Into<String>, title: impl Into<String>, fund: impl Into<String>, amount: f64) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            payload: Payload::Bid { fund: fund.into(), amount },
        }
    }

    /// Prerequisite keys for a course, empty for a bid.
    pub fn prerequisites(&self) -> &[String] {
        match &self.payload {
            Payload::Prerequisites(list) => list,
            Payload::Bid { .. } => &[],
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Prerequisites(list) if list.is_empty() => {
                write!(f, "{}, {}", self.key, self.title)
            }
            Payload::Prerequisites(list) => {
                write!(f, "{}, {} | Prerequisites: {}", self.key, self.title, list.join(", "))
            }
            Payload::Bid { fund, amount } => {
                write!(f, "{}: {} | {:.2} | {}", self.key, self.title, amount, fund)
            }
        }
    }
}
