use serde_json::Value;
use crate::filter::AttributeFilter;
use crate::search::{self, ScoredPosition};
use crate::{Error, InvertedIndex, Record, RecordStore, Result};

/// Configuration for building a catalog
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Index partitions of the store on the rayon pool
    pub parallel_build: bool,
    /// Store size below which the index is always built sequentially;
    /// also the partition size of a parallel build
    pub parallel_threshold: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            parallel_build: true,
            parallel_threshold: 4096,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(Error::InvalidConfig(
                "parallel_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A search hit with its record
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub position: usize,
    pub score: usize,
    pub record: &'a Record,
}

/// The frozen record store together with its inverted index
///
/// Constructed once per load and read-only afterwards, so it can be shared
/// across threads without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    store: RecordStore,
    index: InvertedIndex,
}

impl Catalog {
    pub fn with_config(store: RecordStore, config: &CatalogConfig) -> Self {
        let threshold = config.parallel_threshold.max(1);
        let index = if config.parallel_build && store.len() >= threshold {
            InvertedIndex::build_parallel(&store, threshold)
        } else {
            InvertedIndex::build(&store)
        };
        Self { store, index }
    }

    /// Load entrypoint for decoded JSON input
    pub fn from_json(value: Value, config: &CatalogConfig) -> Result<Self> {
        config.validate()?;
        let store = RecordStore::from_json(value)?;
        Ok(Self::with_config(store, config))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, position: usize) -> Result<&Record> {
        self.store.get(position)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Record> {
        self.store.find_by_id(id)
    }

    /// Full-text search returning records, best first
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Record> {
        self.search_hits(query, limit)
            .into_iter()
            .map(|hit| hit.record)
            .collect()
    }

    /// Full-text search keeping positions and scores
    pub fn search_hits(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        search::search(&self.store, &self.index, query, limit)
            .into_iter()
            .filter_map(|ScoredPosition { position, score }| {
                self.store.get(position).ok().map(|record| SearchHit { position, score, record })
            })
            .collect()
    }

    /// Records satisfying every predicate of `filter`, in store order
    pub fn filter(&self, filter: &AttributeFilter) -> Vec<&Record> {
        filter.apply(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Predicate;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json(
            json!([
                {"id": "1", "Type": "Car Vacuum Cleaner", "Brand": "X"},
                {"id": "2", "Type": "Car Vacuum Cleaner", "Brand": "Y"},
                {"id": "3", "Type": "Speaker", "Brand": "X"}
            ]),
            &CatalogConfig::default(),
        )
        .unwrap()
    }

    fn ids(records: Vec<&Record>) -> Vec<&str> {
        records.into_iter().filter_map(|r| r.id()).collect()
    }

    #[test]
    fn test_search_returns_records() {
        let catalog = catalog();
        assert_eq!(ids(catalog.search("vacuum", 10)), ["1", "2"]);

        let hits = catalog.search_hits("vacuum", 10);
        assert!(hits.iter().all(|hit| hit.score == 1));
        assert_eq!(hits[1].position, 1);
    }

    #[test]
    fn test_filter() {
        let catalog = catalog();
        let by_type = AttributeFilter::new().with("Type", Predicate::substring("Vacuum"));
        assert_eq!(ids(catalog.filter(&by_type)), ["1", "2"]);
    }

    #[test]
    fn test_parallel_config_builds_same_index() {
        let config = CatalogConfig {
            parallel_build: true,
            parallel_threshold: 1,
        };
        let parallel = Catalog::with_config(catalog().store().clone(), &config);
        assert_eq!(parallel.index().term_count(), catalog().index().term_count());
        assert_eq!(ids(parallel.search("x", 10)), ["1", "3"]);
    }

    #[test]
    fn test_invalid_config() {
        let config = CatalogConfig {
            parallel_build: true,
            parallel_threshold: 0,
        };
        assert!(matches!(
            Catalog::from_json(json!([]), &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
