// ============================================================
// File: loader.rs
//
// Description:
//   Reads data files and turns their lines into `Record`s.
//
//   Course files have no header, and each line is:
//
//     KEY,Title[,PREREQ,PREREQ...]
//
//   e.g. `CSCI300,Introduction to Algorithms,CSCI200,MATH201`.
//
//   Bid files are monthly sales exports with a header row. Only
//   four columns are read: title (0), bid id (1), winning amount (4)
//   and fund (8). Fields may be double-quoted to carry commas,
//   e.g. `"$1,250.00"`.
//
// Goal:
//   Keys are checked here, before a record is handed to an index,
//   so an index is never asked to store a key it cannot hash.
// ============================================================
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CatalogError, HashStrategy, Record};

const BID_TITLE_COLUMN: usize = 0;
const BID_ID_COLUMN: usize = 1;
const BID_AMOUNT_COLUMN: usize = 4;
const BID_FUND_COLUMN: usize = 8;

/// Layout of a data file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// `KEY,Title[,PREREQ...]` lines, no header.
    #[default]
    Courses,
    /// Sales export with a header row; see the module notes for columns.
    Bids,
}

impl DataFormat {
    /// Leading lines that carry no records.
    pub fn header_lines(self) -> usize {
        match self {
            Self::Courses => 0,
            Self::Bids => 1,
        }
    }

    /// Parses one data line of this format.
    pub fn parse_line(self, line: &str, line_number: usize) -> Result<Record, CatalogError> {
        match self {
            Self::Courses => parse_course_line(line, line_number),
            Self::Bids => parse_bid_line(line, line_number),
        }
    }
}

impl FromStr for DataFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COURSES" => Ok(Self::Courses),
            "BIDS" => Ok(Self::Bids),
            _ => Err(CatalogError::Config(format!("unknown data format '{}'", s))),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Courses => write!(f, "courses"),
            Self::Bids => write!(f, "bids"),
        }
    }
}

/// Read every line of a course file.
pub fn read_lines(path: &Path) -> Result<Vec<String>, CatalogError> {
    let io_error = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };

    let data_file = File::open(path).map_err(io_error)?;
    let buf_reader = BufReader::new(data_file);

    let mut lines = Vec::new();
    for line in buf_reader.lines() {
        lines.push(line.map_err(io_error)?);
    }
    Ok(lines)
}


/// Check that `key` is usable by every index backend.
///
/// A key must be non-empty ASCII letters and digits. Under the numeric
/// hash strategy it must also end in a digit.
///
/// # Example
/// ```
/// use recordindex::{validate_key, HashStrategy};
/// assert!(validate_key("CSCI100", HashStrategy::Numeric).is_ok());
/// assert!(validate_key("CSCI", HashStrategy::Numeric).is_err());
/// assert!(validate_key("CS CI", HashStrategy::CharSum).is_err());
/// ```
pub fn validate_key(key: &str, strategy: HashStrategy) -> Result<(), CatalogError> {
    let violation = |reason| CatalogError::KeyFormat {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(violation("key is empty"));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(violation("key must be ASCII letters and digits"));
    }
    if !strategy.accepts(key) {
        return Err(violation("numeric hashing needs a key ending in digits"));
    }
    Ok(())
}


/// Parse one course line. `line_number` is 1-based and used in errors.
///
/// Fields are trimmed and empty prerequisite fields are dropped. The key
/// itself is not validated here; see [`validate_key`].
pub fn parse_course_line(line: &str, line_number: usize) -> Result<Record, CatalogError> {
    let mut fields = line.split(',').map(str::trim);

    let key = fields.next().unwrap_or("");
    let title = fields.next().unwrap_or("");
    if key.is_empty() || title.is_empty() {
        return Err(CatalogError::MalformedLine {
            line: line_number,
            reason: "expected at least a course number and a title".to_string(),
        });
    }

    let prerequisites = fields
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Record::course(key, title, prerequisites))
}


/// Parse one bid line. `line_number` is 1-based and used in errors.
///
/// # Example
/// ```
/// use recordindex::{parse_bid_line, Payload};
/// let line = r#"Office Chair,98109,Furniture,04/12/2019,"$1,250.00",x,x,x,General Fund"#;
/// let bid = parse_bid_line(line, 2).unwrap();
/// assert_eq!(bid.key, "98109");
/// assert_eq!(bid.payload, Payload::Bid { fund: "General Fund".into(), amount: 1250.0 });
/// ```
pub fn parse_bid_line(line: &str, line_number: usize) -> Result<Record, CatalogError> {
    let malformed = |reason: String| CatalogError::MalformedLine {
        line: line_number,
        reason,
    };

    let fields = split_fields(line);
    if fields.len() <= BID_FUND_COLUMN {
        return Err(malformed(format!(
            "expected at least {} columns, found {}",
            BID_FUND_COLUMN + 1,
            fields.len()
        )));
    }

    let key = fields[BID_ID_COLUMN].as_str();
    if key.is_empty() {
        return Err(malformed("bid id is empty".to_string()));
    }

    let raw_amount = fields[BID_AMOUNT_COLUMN].as_str();
    let amount = parse_amount(raw_amount)
        .ok_or_else(|| malformed(format!("'{}' is not a bid amount", raw_amount)))?;

    Ok(Record::bid(
        key,
        fields[BID_TITLE_COLUMN].as_str(),
        fields[BID_FUND_COLUMN].as_str(),
        amount,
    ))
}


/// Reads a dollar amount, ignoring `$` signs and thousands separators.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let amount: f64 = cleaned.trim().parse().ok()?;
    amount.is_finite().then_some(amount)
}


/// Splits a comma separated line, honoring double quotes.
///
/// A quoted field may contain commas, and `""` inside quotes is a
/// literal quote. Every field is trimmed.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
