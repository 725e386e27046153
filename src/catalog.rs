// =====================================================================
// File: catalog.rs
//
// Description:
// Defines the `Catalog` struct, the running context that owns the one
// active index and feeds it records from course files.
//
// Responsibilities:
// - Hold exactly one index backend at a time (tree or hash).
// - Validate keys before they reach the index.
// - Load course files and bid exports alike.
// - Turn "not found" answers from the index into `CatalogError::NotFound`.
// - Move every record across when the caller switches backend, or
//   leave the old backend in place if the new one refuses a key.
// =====================================================================
use std::fmt;
use std::path::Path;

use log::{debug, info, warn};

use crate::loader::{read_lines, validate_key};
use crate::{
    Backend, CatalogConfig, CatalogError, ChainedHashIndex, DataFormat, IndexError, KeyedIndex, OrderedIndex,
    Record, TraversalOrder,
};

/// Counts from loading a course file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Lines skipped for a missing field or an invalid key.
    pub malformed: usize,
    /// Lines skipped because their key was already loaded.
    pub duplicates: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loaded, {} malformed, {} duplicate",
            self.loaded, self.malformed, self.duplicates
        )
    }
}


/// Owns the active index and the configuration it was built from.
pub struct Catalog {
    index: Box<dyn KeyedIndex>,
    config: CatalogConfig,
}


impl Catalog {
    /// Creates an empty catalog using the configured backend.
    ///
    /// A `table_size` of zero is raised to one bucket; use
    /// [`Catalog::try_new`] to reject it instead.
    ///
    /// # Example
    /// ```
    /// use recordindex::{Backend, Catalog, CatalogConfig};
    /// let catalog = Catalog::new(CatalogConfig::default());
    /// assert_eq!(catalog.backend(), Backend::Tree);
    /// assert!(catalog.is_empty());
    /// ```
    pub fn new(mut config: CatalogConfig) -> Self {
        if config.table_size == 0 {
            warn!("table_size 0 is not usable, using 1 bucket");
            config.table_size = 1;
        }
        let index = Self::build_index(config.backend, &config);
        Self { index, config }
    }

    /// Creates an empty catalog after validating `config`.
    pub fn try_new(config: CatalogConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Creates an empty catalog with `backend`, ignoring `config.backend`.
    pub fn with_backend(backend: Backend, mut config: CatalogConfig) -> Self {
        config.backend = backend;
        Self::new(config)
    }

    fn build_index(backend: Backend, config: &CatalogConfig) -> Box<dyn KeyedIndex> {
        match backend {
            Backend::Tree => Box::new(OrderedIndex::new()),
            Backend::Hash => Box::new(ChainedHashIndex::with_table_size(
                config.table_size,
                config.hash_strategy,
            )),
        }
    }

    pub fn backend(&self) -> Backend {
        self.index.backend()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The active index, for read-only inspection.
    pub fn index(&self) -> &dyn KeyedIndex {
        self.index.as_ref()
    }

    /// Replaces the active index with an empty one of kind `backend` and
    /// moves every record into it. A no-op if `backend` is already active.
    ///
    /// # Errors
    /// If the new backend cannot take one of the stored keys. The catalog
    /// then keeps its current backend and every record.
    pub fn switch_backend(&mut self, backend: Backend) -> Result<(), CatalogError> {
        let current = self.backend();
        if backend == current {
            return Ok(());
        }

        let target = Self::build_index(backend, &self.config);
        for record in self.index.traverse(TraversalOrder::InOrder) {
            target.check_key(&record.key)?;
        }

        let previous = std::mem::replace(&mut self.index, target);
        let mut records = previous.drain().into_iter();
        let mut moved = 0usize;
        while let Some(record) = records.next() {
            if let Err(e) = self.index.insert(record) {
                warn!("switch to {} backend failed: {}, keeping {}", backend, e, current);
                let partial = std::mem::replace(&mut self.index, Self::build_index(current, &self.config));
                for record in partial.drain().into_iter().chain(records) {
                    if let Err(e) = self.index.insert(record) {
                        warn!("record lost while restoring {} backend: {}", current, e);
                    }
                }
                return Err(e.into());
            }
            moved += 1;
        }

        self.config.backend = backend;
        info!("switched catalog to {} backend ({} records moved)", backend, moved);
        Ok(())
    }

    /// Validates and stores one record.
    pub fn insert(&mut self, record: Record) -> Result<(), CatalogError> {
        validate_key(&record.key, self.config.hash_strategy)?;
        self.index.insert(record)?;
        Ok(())
    }

    /// Loads every course line of `path` into the active index.
    ///
    /// Bad lines and duplicate keys are skipped with a warning and
    /// counted in the report; only an unreadable file is an error.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadReport, CatalogError> {
        self.load_data(path, DataFormat::Courses)
    }

    /// Loads a bid export (header row first) into the active index.
    pub fn load_bids_file(&mut self, path: &Path) -> Result<LoadReport, CatalogError> {
        self.load_data(path, DataFormat::Bids)
    }

    /// Loads `path` as a file of the given format.
    pub fn load_data(&mut self, path: &Path, format: DataFormat) -> Result<LoadReport, CatalogError> {
        let lines = read_lines(path)?;
        let report = self.load_formatted(&lines, format);
        info!("loaded {} from '{}': {}", format, path.display(), report);
        Ok(report)
    }

    /// Loads course lines already in memory. See [`Catalog::load_file`].
    pub fn load_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> LoadReport {
        self.load_formatted(lines, DataFormat::Courses)
    }

    /// Loads bid lines already in memory; the first line is the header.
    pub fn load_bid_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> LoadReport {
        self.load_formatted(lines, DataFormat::Bids)
    }

    fn load_formatted<S: AsRef<str>>(&mut self, lines: &[S], format: DataFormat) -> LoadReport {
        let mut report = LoadReport::default();

        for (idx, line) in lines.iter().enumerate().skip(format.header_lines()) {
            let line = line.as_ref();
            // Ignore blank lines silently
            if line.trim().is_empty() {
                continue;
            }

            let outcome = format
                .parse_line(line, idx + 1)
                .and_then(|record| self.insert(record));
            match outcome {
                Ok(()) => report.loaded += 1,
                Err(CatalogError::Index(IndexError::DuplicateKey { key })) => {
                    warn!("line {}: duplicate key '{}' skipped", idx + 1, key);
                    report.duplicates += 1;
                }
                Err(e) => {
                    warn!("line {}: {} ({})", idx + 1, e, line);
                    report.malformed += 1;
                }
            }
        }
        report
    }

    /// Looks up a key.
    pub fn find(&self, key: &str) -> Result<&Record, CatalogError> {
        self.index
            .search(key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }

    /// Removes a key, returning its record.
    pub fn remove(&mut self, key: &str) -> Result<Record, CatalogError> {
        let removed = self
            .index
            .remove(key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))?;
        debug!("catalog removed '{}'", key);
        Ok(removed)
    }

    /// Records in `order`. The hash backend always answers sorted by key.
    pub fn list(&self, order: TraversalOrder) -> Vec<&Record> {
        self.index.traverse(order).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every `(course, prerequisite)` pair whose prerequisite is not loaded,
    /// ordered by course key.
    pub fn missing_prerequisites(&self) -> Vec<(String, String)> {
        let index = self.index.as_ref();
        index
            .traverse(TraversalOrder::InOrder)
            .flat_map(move |record| {
                record
                    .prerequisites()
                    .iter()
                    .filter(move |prereq| !index.contains(prereq))
                    .map(move |prereq| (record.key.clone(), prereq.clone()))
            })
            .collect()
    }
}


impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}


// =====================================================================
// Unit Tests for Catalog
// =====================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashStrategy;

    const COURSES: [&str; 5] = [
        "CSCI300,Introduction to Algorithms,CSCI200,MATH201",
        "CSCI100,Introduction to Computer Science",
        "MATH201,Discrete Mathematics",
        "CSCI350,Operating Systems,CSCI300",
        "CSCI200,Data Structures,CSCI101",
    ];

    fn keys(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.key.clone()).collect()
    }

    fn hash_config() -> CatalogConfig {
        CatalogConfig {
            backend: Backend::Hash,
            table_size: 5,
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn test_new_catalog_initial_state() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.backend(), Backend::Tree);
        assert!(matches!(catalog.find("CSCI100"), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn load_lines_into_tree() {
        let mut catalog = Catalog::default();
        let report = catalog.load_lines(&COURSES);
        assert_eq!(report, LoadReport { loaded: 5, malformed: 0, duplicates: 0 });
        assert_eq!(
            keys(&catalog.list(TraversalOrder::InOrder)),
            ["CSCI100", "CSCI200", "CSCI300", "CSCI350", "MATH201"]
        );
    }

    #[test]
    fn load_lines_counts_bad_and_duplicate_lines() {
        let mut catalog = Catalog::default();
        let lines = [
            "CSCI100,Intro",
            "",
            "CSCI100,Intro again",
            "NOTITLE",
            "CS-1,Bad key",
            "MATH201,Discrete Mathematics",
        ];
        let report = catalog.load_lines(&lines);
        assert_eq!(report, LoadReport { loaded: 2, malformed: 2, duplicates: 1 });
        assert_eq!(catalog.find("CSCI100").unwrap().title, "Intro");
        assert_eq!(report.to_string(), "2 loaded, 2 malformed, 1 duplicate");
    }

    #[test]
    fn hash_catalog_lists_sorted() {
        let mut catalog = Catalog::new(hash_config());
        catalog.load_lines(&COURSES);
        assert_eq!(catalog.backend(), Backend::Hash);
        for order in [TraversalOrder::InOrder, TraversalOrder::PreOrder, TraversalOrder::PostOrder] {
            assert_eq!(
                keys(&catalog.list(order)),
                ["CSCI100", "CSCI200", "CSCI300", "CSCI350", "MATH201"]
            );
        }
    }

    #[test]
    fn remove_missing_reports_not_found() {
        for config in [CatalogConfig::default(), hash_config()] {
            let mut catalog = Catalog::new(config);
            catalog.load_lines(&COURSES);
            let result = catalog.remove("ENG999");
            assert!(matches!(result, Err(CatalogError::NotFound(ref k)) if k == "ENG999"));
            assert_eq!(catalog.len(), 5);
        }
    }

    #[test]
    fn remove_then_find() {
        let mut catalog = Catalog::default();
        catalog.load_lines(&COURSES);
        let removed = catalog.remove("CSCI300").unwrap();
        assert_eq!(removed.title, "Introduction to Algorithms");
        assert!(catalog.find("CSCI300").is_err());
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn switch_backend_moves_every_record() {
        let mut catalog = Catalog::default();
        catalog.load_lines(&COURSES);
        let before = keys(&catalog.list(TraversalOrder::InOrder));

        catalog.switch_backend(Backend::Hash).unwrap();
        assert_eq!(catalog.backend(), Backend::Hash);
        assert_eq!(catalog.config().backend, Backend::Hash);
        assert_eq!(keys(&catalog.list(TraversalOrder::InOrder)), before);

        catalog.switch_backend(Backend::Tree).unwrap();
        assert_eq!(catalog.backend(), Backend::Tree);
        assert_eq!(keys(&catalog.list(TraversalOrder::InOrder)), before);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn switch_to_same_backend_is_noop() {
        let mut catalog = Catalog::default();
        catalog.load_lines(&COURSES);
        catalog.switch_backend(Backend::Tree).unwrap();
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn numeric_strategy_rejects_keys_before_the_index() {
        let config = CatalogConfig {
            backend: Backend::Tree,
            hash_strategy: HashStrategy::Numeric,
            ..CatalogConfig::default()
        };
        let mut catalog = Catalog::new(config);
        let result = catalog.insert(Record::course("MATH", "No number", vec![]));
        assert!(matches!(result, Err(CatalogError::KeyFormat { .. })));
        assert!(catalog.is_empty());

        // Everything that got in can later move to a numeric hash table
        catalog.insert(Record::course("MATH201", "Discrete", vec![])).unwrap();
        catalog.switch_backend(Backend::Hash).unwrap();
        assert!(catalog.find("MATH201").is_ok());
    }

    #[test]
    fn zero_table_size_does_not_panic() {
        let config = CatalogConfig {
            backend: Backend::Hash,
            table_size: 0,
            ..CatalogConfig::default()
        };
        assert!(matches!(Catalog::try_new(config.clone()), Err(CatalogError::Config(_))));

        let mut catalog = Catalog::new(config.clone());
        assert_eq!(catalog.config().table_size, 1);
        catalog.load_lines(&COURSES);
        assert_eq!(catalog.len(), 5);

        // Same config, reaching the hash table through a switch
        let mut catalog = Catalog::new(CatalogConfig { backend: Backend::Tree, ..config });
        catalog.load_lines(&COURSES);
        catalog.switch_backend(Backend::Hash).unwrap();
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn refused_switch_keeps_current_backend() {
        let config = CatalogConfig {
            hash_strategy: HashStrategy::Numeric,
            ..CatalogConfig::default()
        };
        let mut catalog = Catalog::new(config);
        catalog.load_lines(&COURSES);
        // Bypasses key validation; a numeric table cannot hash this key
        catalog.index.insert(Record::course("ENGLISH", "No number", vec![])).unwrap();
        let before = keys(&catalog.list(TraversalOrder::InOrder));

        let result = catalog.switch_backend(Backend::Hash);
        assert!(matches!(
            result,
            Err(CatalogError::Index(IndexError::KeyFormat { ref key, .. })) if key == "ENGLISH"
        ));
        assert_eq!(catalog.backend(), Backend::Tree);
        assert_eq!(catalog.config().backend, Backend::Tree);
        assert_eq!(keys(&catalog.list(TraversalOrder::InOrder)), before);
        assert_eq!(catalog.len(), 6);
    }

    const BIDS: [&str; 4] = [
        "ArticleTitle,ArticleID,Department,CloseDate,WinningBid,InventoryID,VehicleID,ReceiptNumber,Fund",
        "Hoover Steam Vac,98223,Enterprise,11/5/2016,$27.00,,,,Enterprise",
        "Office Chair,98109,General Services,11/2/2016,\"$1,250.00\",,,,General Fund",
        "Broken Row,98110,General Services,11/2/2016,free,,,,General Fund",
    ];

    #[test]
    fn load_bid_lines_skips_header_and_bad_amounts() {
        for config in [CatalogConfig::default(), hash_config()] {
            let mut catalog = Catalog::new(config);
            let report = catalog.load_bid_lines(&BIDS);
            assert_eq!(report, LoadReport { loaded: 2, malformed: 1, duplicates: 0 });

            let chair = catalog.find("98109").unwrap();
            assert_eq!(chair.title, "Office Chair");
            assert_eq!(
                chair.payload,
                crate::Payload::Bid { fund: "General Fund".into(), amount: 1250.0 }
            );
            assert!(catalog.find("ArticleID").is_err());
            assert_eq!(keys(&catalog.list(TraversalOrder::InOrder)), ["98109", "98223"]);
        }
    }

    #[test]
    fn bids_load_into_numeric_hash_table() {
        let config = CatalogConfig {
            backend: Backend::Hash,
            hash_strategy: HashStrategy::Numeric,
            ..CatalogConfig::default()
        };
        let mut catalog = Catalog::new(config);
        catalog.load_bid_lines(&BIDS);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.remove("98223").is_ok());
        assert!(catalog.missing_prerequisites().is_empty());
    }

    #[test]
    fn missing_prerequisites_are_reported() {
        let mut catalog = Catalog::default();
        catalog.load_lines(&COURSES);
        assert_eq!(
            catalog.missing_prerequisites(),
            vec![("CSCI200".to_string(), "CSCI101".to_string())]
        );

        catalog.remove("MATH201").unwrap();
        assert_eq!(
            catalog.missing_prerequisites(),
            vec![
                ("CSCI200".to_string(), "CSCI101".to_string()),
                ("CSCI300".to_string(), "MATH201".to_string()),
            ]
        );
    }
}
