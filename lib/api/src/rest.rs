use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use prodex_core::analysis::{dataset_stats, value_counts, ValueCount};
use prodex_core::{AnalysisConfig, AttributeFilter, Catalog, Record};
use prodex_similarity::Recommender;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub default_search_limit: usize,
    pub default_recommend_limit: usize,
    pub analysis: AnalysisConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            default_search_limit: 20,
            default_recommend_limit: 5,
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Shared, read-only request state
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub config: ApiConfig,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<i64>,
}

// Non-positive limits select nothing
fn effective_limit(requested: Option<i64>, default: usize) -> usize {
    requested.map_or(default, |limit| usize::try_from(limit.max(0)).unwrap_or(usize::MAX))
}

pub struct RestApi;

impl RestApi {
    pub async fn start(catalog: Arc<Catalog>, config: ApiConfig) -> std::io::Result<()> {
        let bind = (config.host.clone(), config.port);
        let state = web::Data::new(AppState { catalog, config });

        info!("Serving {} products on http://{}:{}", state.catalog.len(), bind.0, bind.1);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(Self::routes)
        })
        .bind(bind)?
        .run()
        .await
    }

    /// Register the API routes; the app must carry `web::Data<AppState>`
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/api/search", web::get().to(search))
            .route("/api/filter", web::post().to(filter))
            .route("/api/recommend/{id}", web::get().to(recommend))
            .route("/api/product/{id}", web::get().to(get_product))
            .route("/api/stats", web::get().to(stats));
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Product not found"
    }))
}

fn ranked_map(counts: &[ValueCount]) -> Map<String, Value> {
    counts
        .iter()
        .map(|c| (c.value.clone(), Value::from(c.count)))
        .collect()
}

async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    let query = params.q.as_deref().unwrap_or("").trim();
    if query.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "results": [],
            "count": 0
        })));
    }

    let limit = effective_limit(params.limit, state.config.default_search_limit);
    let results = state.catalog.search(query, limit);
    debug!("search {:?} limit {} -> {} results", query, limit, results.len());

    Ok(HttpResponse::Ok().json(json!({
        "results": results,
        "count": results.len(),
        "query": query
    })))
}

async fn filter(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    let filter = match AttributeFilter::from_json(&body) {
        Ok(filter) => filter,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": e.to_string()
            })));
        }
    };

    let results = state.catalog.filter(&filter);
    debug!("filter {:?} -> {} results", filter.conditions(), results.len());

    Ok(HttpResponse::Ok().json(json!({
        "results": results,
        "count": results.len()
    })))
}

async fn recommend(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<LimitParams>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let limit = effective_limit(params.limit, state.config.default_recommend_limit);

    let Some(ranked) = Recommender::new(state.catalog.store()).recommend(&id, limit) else {
        debug!("recommend: reference {:?} not found", id);
        return Ok(not_found());
    };

    let scores: Vec<u32> = ranked.iter().map(|r| r.score).collect();
    let results: Vec<&Record> = ranked.iter().map(|r| r.record).collect();
    debug!("recommend {:?} limit {} -> {} results", id, limit, results.len());

    Ok(HttpResponse::Ok().json(json!({
        "reference": id,
        "results": results,
        "scores": scores,
        "count": results.len()
    })))
}

async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    match state.catalog.find_by_id(&id) {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(not_found()),
    }
}

async fn stats(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let store = state.catalog.store();
    let analysis = &state.config.analysis;
    let dataset = dataset_stats(store);

    let categories: Map<String, Value> = analysis
        .category_attributes
        .iter()
        .map(|attribute| {
            let counts = value_counts(store, attribute, analysis.top_n);
            (attribute.clone(), Value::Object(ranked_map(&counts)))
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "total_products": dataset.total_records,
        "unique_attributes": dataset.unique_attributes,
        "top_attributes": ranked_map(dataset.top_attributes(analysis.top_n)),
        "top_categories": categories,
        "search_index_size": state.catalog.index().term_count()
    })))
}
