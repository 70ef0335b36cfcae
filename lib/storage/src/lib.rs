pub mod export;
pub mod loader;

pub use export::{default_export_path, export_analysis, AnalysisReport};
pub use loader::{load_catalog, read_json};
