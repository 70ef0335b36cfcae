//! Interactive query shell
//!
//! Reads one command per line and prints a compact, human-readable view of
//! the results. The catalog is passed in; the shell keeps no state of its own.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use prodex_core::analysis::{
    category_breakdown, dataset_stats, feature_counts, warranty_counts, weight_summary,
};
use prodex_core::{AnalysisConfig, AttributeFilter, Catalog, Predicate, Record};
use prodex_similarity::Recommender;
use prodex_storage::{default_export_path, export_analysis};

/// Attributes shown for every listed product
pub const KEY_ATTRIBUTES: &[&str] = &[
    "Type",
    "Brand",
    "Model Number",
    "Model Name",
    "Weight",
    "Sales Package",
    "Features",
];

const MAX_DISPLAY: usize = 5;
const MAX_VALUE_CHARS: usize = 80;
const SEARCH_LIMIT: usize = 5;
const RECOMMEND_LIMIT: usize = 3;

const HELP: &str = "\
Commands:
  search <query>          - Search products
  filter <attr>=<value>   - Filter by attribute (substring match)
  recommend <id>          - Get recommendations
  product <id>            - Show one product
  stats                   - Show data statistics
  categories              - Analyze categories
  pricing                 - Analyze weights and warranties
  export [path]           - Write an analysis report
  help                    - Show this help
  quit                    - Exit";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Filter { attribute: String, value: String },
    Recommend(String),
    Product(String),
    Stats,
    Categories,
    Pricing,
    Export(Option<PathBuf>),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match (verb.to_lowercase().as_str(), rest) {
            ("", _) => Command::Empty,
            ("quit" | "exit", _) => Command::Quit,
            ("help", _) => Command::Help,
            ("stats", _) => Command::Stats,
            ("categories", _) => Command::Categories,
            ("pricing", _) => Command::Pricing,
            ("export", "") => Command::Export(None),
            ("export", path) => Command::Export(Some(PathBuf::from(path))),
            ("search", q) if !q.is_empty() => Command::Search(q.to_string()),
            ("recommend" | "similar", id) if !id.is_empty() => Command::Recommend(id.to_string()),
            ("product", id) if !id.is_empty() => Command::Product(id.to_string()),
            ("filter", condition) => match condition.split_once('=') {
                Some((attribute, value)) if !attribute.trim().is_empty() => Command::Filter {
                    attribute: attribute.trim().to_string(),
                    value: value.trim().to_string(),
                },
                _ => Command::Invalid("Invalid filter format. Use: filter attribute=value".into()),
            },
            (verb, _) => Command::Invalid(format!(
                "Unknown command '{verb}'. Type 'help' for available commands."
            )),
        }
    }
}

/// Run the shell until `quit` or end of input
pub fn run<R: BufRead, W: Write>(
    catalog: &Catalog,
    config: &AnalysisConfig,
    input: R,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "{HELP}")?;
    write!(out, "\n> ")?;
    out.flush()?;

    for line in input.lines() {
        let command = Command::parse(&line?);
        if command == Command::Quit {
            break;
        }
        execute(catalog, config, &command, out)?;
        write!(out, "\n> ")?;
        out.flush()?;
    }

    writeln!(out, "Goodbye!")
}

/// Execute one command, writing its output
pub fn execute<W: Write>(
    catalog: &Catalog,
    config: &AnalysisConfig,
    command: &Command,
    out: &mut W,
) -> std::io::Result<()> {
    match command {
        Command::Search(query) => {
            let results = catalog.search(query, SEARCH_LIMIT);
            writeln!(out, "Found {} matching products for '{}'", results.len(), query)?;
            display_records(out, &results)
        }
        Command::Filter { attribute, value } => {
            let filter = AttributeFilter::new().with(attribute.as_str(), Predicate::substring(value));
            let results = catalog.filter(&filter);
            writeln!(out, "Found {} products with {} ~ '{}'", results.len(), attribute, value)?;
            display_records(out, &results)
        }
        Command::Recommend(id) => match Recommender::new(catalog.store()).recommend(id, RECOMMEND_LIMIT) {
            Some(ranked) => {
                let records: Vec<&Record> = ranked.iter().map(|r| r.record).collect();
                writeln!(out, "Found {} similar products to ID {}", records.len(), id)?;
                display_records(out, &records)
            }
            None => writeln!(out, "Product with ID {id} not found"),
        },
        Command::Product(id) => match catalog.find_by_id(id) {
            Some(record) => display_records(out, &[record]),
            None => writeln!(out, "Product with ID {id} not found"),
        },
        Command::Stats => write_stats(catalog, config, out),
        Command::Categories => write_categories(catalog, config, out),
        Command::Pricing => write_pricing(catalog, config, out),
        Command::Export(path) => {
            let path = path.clone().unwrap_or_else(default_export_path);
            match export_analysis(catalog, config, &path) {
                Ok(report) => writeln!(
                    out,
                    "Exported analysis of {} products to {}",
                    report.total_records,
                    path.display()
                ),
                Err(e) => writeln!(out, "Export failed: {e}"),
            }
        }
        Command::Help => writeln!(out, "{HELP}"),
        Command::Invalid(message) => writeln!(out, "{message}"),
        Command::Quit | Command::Empty => Ok(()),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Print up to five records with their key attributes
pub fn display_records<W: Write>(out: &mut W, records: &[&Record]) -> std::io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No products to display");
    }

    for (i, record) in records.iter().take(MAX_DISPLAY).enumerate() {
        writeln!(out, "\nProduct {}:", i + 1)?;
        writeln!(out, "   ID: {}", record.id().unwrap_or("N/A"))?;
        for attribute in KEY_ATTRIBUTES {
            if let Some(value) = record.get(attribute) {
                let text = prodex_core::record::value_text(value);
                writeln!(out, "   {}: {}", attribute, truncate(&text, MAX_VALUE_CHARS))?;
            }
        }
        writeln!(out, "   Total Attributes: {}", record.len())?;
    }
    Ok(())
}

fn write_stats<W: Write>(catalog: &Catalog, config: &AnalysisConfig, out: &mut W) -> std::io::Result<()> {
    let stats = dataset_stats(catalog.store());
    if stats.total_records == 0 {
        return writeln!(out, "No data loaded");
    }

    writeln!(out, "Total Products: {}", stats.total_records)?;
    writeln!(out, "Unique Attributes: {}", stats.unique_attributes)?;
    writeln!(out, "Search Index Terms: {}", catalog.index().term_count())?;
    writeln!(out, "\nMost Common Attributes:")?;
    for entry in stats.top_attributes(config.top_n) {
        let share = entry.count as f64 / stats.total_records as f64 * 100.0;
        writeln!(out, "   {}: {} products ({:.1}%)", entry.value, entry.count, share)?;
    }
    writeln!(out, "\nAttribute Range:")?;
    writeln!(out, "   Maximum attributes in single product: {}", stats.max_attributes)?;
    writeln!(out, "   Minimum attributes in single product: {}", stats.min_attributes)
}

fn write_categories<W: Write>(catalog: &Catalog, config: &AnalysisConfig, out: &mut W) -> std::io::Result<()> {
    for breakdown in category_breakdown(catalog.store(), config) {
        if breakdown.top_values.is_empty() {
            continue;
        }
        writeln!(out, "Top {} values:", breakdown.attribute)?;
        for entry in &breakdown.top_values {
            writeln!(out, "   {}: {} products", entry.value, entry.count)?;
        }
    }

    writeln!(out, "\nFeature Analysis:")?;
    for feature in feature_counts(catalog.store(), &config.feature_keywords) {
        writeln!(out, "   {}: {} products", feature.keyword, feature.count)?;
    }
    Ok(())
}

fn write_pricing<W: Write>(catalog: &Catalog, config: &AnalysisConfig, out: &mut W) -> std::io::Result<()> {
    match weight_summary(catalog.store(), config) {
        Some(w) => {
            writeln!(out, "Weight Statistics ({} products):", w.count)?;
            writeln!(out, "   Average: {:.2}", w.mean)?;
            writeln!(out, "   Median: {:.2}", w.median)?;
            writeln!(out, "   Min: {:.2}", w.min)?;
            writeln!(out, "   Max: {:.2}", w.max)?;
        }
        None => writeln!(out, "No weight information found")?,
    }

    let warranties = warranty_counts(catalog.store(), config);
    if !warranties.is_empty() {
        writeln!(out, "\nWarranty Information:")?;
        for entry in warranties {
            writeln!(out, "   {}: {} products", entry.value, entry.count)?;
        }
    }
    Ok(())
}
