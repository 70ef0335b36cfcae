use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use prodex_core::analysis::{
    category_breakdown, dataset_stats, feature_counts, warranty_counts, weight_summary,
    CategoryBreakdown, DatasetStats, FeatureCount, NumericSummary, ValueCount,
};
use prodex_core::{AnalysisConfig, Catalog, Error, Record, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of leading records copied into a report
pub const SAMPLE_RECORDS: usize = 5;

/// Analysis summary of a loaded catalog
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub total_records: usize,
    pub data_structure: DatasetStats,
    pub search_index_size: usize,
    pub categories: Vec<CategoryBreakdown>,
    pub features: Vec<FeatureCount>,
    pub weights: Option<NumericSummary>,
    pub warranties: Vec<ValueCount>,
    pub sample_records: Vec<Record>,
}

impl AnalysisReport {
    pub fn build(catalog: &Catalog, config: &AnalysisConfig) -> Self {
        let store = catalog.store();
        Self {
            timestamp: Utc::now(),
            total_records: store.len(),
            data_structure: dataset_stats(store),
            search_index_size: catalog.index().term_count(),
            categories: category_breakdown(store, config),
            features: feature_counts(store, &config.feature_keywords),
            weights: weight_summary(store, config),
            warranties: warranty_counts(store, config),
            sample_records: store.iter().take(SAMPLE_RECORDS).cloned().collect(),
        }
    }
}

/// Timestamped report name in the working directory
pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "prodex_analysis_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write an analysis report as pretty JSON
///
/// The file is replaced atomically, so readers never observe a partial report.
pub fn export_analysis<P: AsRef<Path>>(
    catalog: &Catalog,
    config: &AnalysisConfig,
    path: P,
) -> Result<AnalysisReport> {
    let path = path.as_ref();
    let report = AnalysisReport::build(catalog, config);
    let data = serde_json::to_vec_pretty(&report)?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&data))
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;

    info!("Analysis exported to {:?}", path);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodex_core::CatalogConfig;
    use serde_json::{json, Value};

    fn catalog() -> Catalog {
        let records: Vec<Value> = (0..8)
            .map(|i| json!({"id": i.to_string(), "Type": if i % 2 == 0 { "Speaker" } else { "Cable" }, "Weight": format!("{} g", i + 1)}))
            .collect();
        Catalog::from_json(Value::Array(records), &CatalogConfig::default()).unwrap()
    }

    #[test]
    fn test_export_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = export_analysis(&catalog(), &AnalysisConfig::default(), &path).unwrap();
        assert_eq!(report.total_records, 8);
        assert_eq!(report.sample_records.len(), SAMPLE_RECORDS);

        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["total_records"], json!(8));
        assert_eq!(written["data_structure"]["unique_attributes"], json!(3));
        assert_eq!(written["categories"][0]["top_values"][0]["value"], json!("Speaker"));
        assert_eq!(written["weights"]["count"], json!(8));
        assert_eq!(written["sample_records"][0]["id"], json!("0"));
    }

    #[test]
    fn test_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, b"stale").unwrap();

        export_analysis(&catalog(), &AnalysisConfig::default(), &path).unwrap();
        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(written.is_object());
    }

    #[test]
    fn test_default_export_path() {
        let path = default_export_path();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("prodex_analysis_"));
        assert!(name.ends_with(".json"));
    }
}
