use anyhow::Context;
use clap::{Parser, Subcommand};
use prodex::shell;
use prodex_api::{ApiConfig, RestApi};
use prodex_core::{AnalysisConfig, AttributeFilter, Catalog, CatalogConfig, Predicate, Record};
use prodex_similarity::Recommender;
use prodex_storage::{default_export_path, export_analysis, load_catalog};
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Explore a JSON product catalog: search, filter and recommend
#[derive(Parser, Debug)]
#[command(name = "prodex")]
#[command(about = "An in-memory product catalog explorer", long_about = None)]
struct Args {
    /// Path to the JSON record file
    #[arg(short, long, global = true, default_value = "./data-set.json")]
    data: PathBuf,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Build the search index on a single thread
    #[arg(long, global = true)]
    sequential_index: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Full-text search
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Filter by attributes; `attr=value` conditions match substrings
    Filter {
        conditions: Vec<String>,
        /// A JSON filter object, e.g. '{"Weight": {"max": 2}}'
        #[arg(long, conflicts_with = "conditions")]
        json: Option<String>,
    },
    /// Products similar to the given one
    Recommend {
        id: String,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Show one product
    Product { id: String },
    /// Dataset statistics
    Stats,
    /// Write an analysis report
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive query shell
    Shell,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_filter(conditions: &[String], json: Option<&str>) -> anyhow::Result<AttributeFilter> {
    if let Some(raw) = json {
        let value: Value = serde_json::from_str(raw).context("filter is not valid JSON")?;
        return Ok(AttributeFilter::from_json(&value)?);
    }

    conditions.iter().try_fold(AttributeFilter::new(), |filter, condition| {
        let (attribute, value) = condition
            .split_once('=')
            .with_context(|| format!("invalid condition {condition:?}, expected attr=value"))?;
        Ok(filter.with(attribute.trim(), Predicate::substring(value.trim())))
    })
}

fn spawn_http(catalog: Catalog, host: String, port: u16) -> std::thread::JoinHandle<()> {
    let config = ApiConfig {
        host,
        port,
        ..ApiConfig::default()
    };
    let catalog = Arc::new(catalog);

    std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", config.host, config.port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(catalog, config).await {
                error!("HTTP server error: {}", e);
            }
        })
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting prodex v{}", env!("CARGO_PKG_VERSION"));

    let catalog_config = CatalogConfig {
        parallel_build: !args.sequential_index,
        ..CatalogConfig::default()
    };
    let catalog = load_catalog(&args.data, &catalog_config)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    let analysis = AnalysisConfig::default();

    match args.command {
        Command::Serve { host, port } => {
            let http_handle = spawn_http(catalog, host, port);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }
            info!("Shutting down...");
        }
        Command::Search { query, limit } => {
            let query = query.join(" ");
            let results = catalog.search(&query, limit);
            print_json(&json!({
                "results": results,
                "count": results.len(),
                "query": query
            }))?;
        }
        Command::Filter { conditions, json } => {
            let filter = parse_filter(&conditions, json.as_deref())?;
            let results = catalog.filter(&filter);
            print_json(&json!({
                "results": results,
                "count": results.len()
            }))?;
        }
        Command::Recommend { id, limit } => {
            let Some(ranked) = Recommender::new(catalog.store()).recommend(&id, limit) else {
                eprintln!("Product with ID {id} not found");
                return Ok(ExitCode::FAILURE);
            };
            let results: Vec<&Record> = ranked.iter().map(|r| r.record).collect();
            let scores: Vec<u32> = ranked.iter().map(|r| r.score).collect();
            print_json(&json!({
                "reference": id,
                "results": results,
                "scores": scores,
                "count": results.len()
            }))?;
        }
        Command::Product { id } => match catalog.find_by_id(&id) {
            Some(record) => print_json(record)?,
            None => {
                eprintln!("Product with ID {id} not found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Stats => {
            let stats = prodex_core::analysis::dataset_stats(catalog.store());
            print_json(&json!({
                "total_products": stats.total_records,
                "unique_attributes": stats.unique_attributes,
                "top_attributes": stats.top_attributes(analysis.top_n),
                "max_attributes": stats.max_attributes,
                "min_attributes": stats.min_attributes,
                "search_index_size": catalog.index().term_count()
            }))?;
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(default_export_path);
            let report = export_analysis(&catalog, &analysis, &path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Exported analysis of {} products to {}",
                report.total_records,
                path.display()
            );
        }
        Command::Shell => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            shell::run(&catalog, &analysis, stdin.lock(), &mut stdout)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
