mod config;
mod drafts;
mod error;
mod metrics;
mod sessions;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use corpus::{Category, Intent};
use extract::{
    DocumentGenerator, FormCompletionSession, FormExtractor, LanguageModel, OllamaClient, RetryPolicy,
    SessionError, SessionView,
};
use index::SemanticIndex;
use query::{ContextResolver, TriageAnswer, TriagePipeline};
use web::{EvidenceProvider, PageCache, Source, SourceRegistry, WebEvidenceFetcher};

use crate::config::{AppConfig, LogFormat};
use crate::drafts::DraftWriter;
use crate::error::ApiError;
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};
use crate::sessions::SessionStore;

struct AppState {
    pipeline: TriagePipeline,
    extractor: FormExtractor,
    index: Arc<SemanticIndex>,
    registry: Arc<SourceRegistry>,
    cache: Option<PageCache>,
    drafts: Arc<dyn DocumentGenerator>,
    sessions: SessionStore,
    metrics: Arc<Metrics>,
    model: String,
}

impl AppState {
    fn new(
        config: &AppConfig,
        llm: Arc<dyn LanguageModel>,
        provider: Arc<dyn EvidenceProvider>,
        registry: Arc<SourceRegistry>,
        cache: Option<PageCache>,
        model: String,
    ) -> Self {
        let index = Arc::new(SemanticIndex::statutory());
        let resolver = ContextResolver::new(provider, index.clone());

        Self {
            pipeline: TriagePipeline::new(llm.clone(), resolver).with_max_retries(config.retry.max_retries),
            extractor: FormExtractor::new(llm).with_max_retries(config.retry.max_retries),
            index,
            registry,
            cache,
            drafts: Arc::new(DraftWriter::new(config.drafts_dir.clone())),
            sessions: SessionStore::new(),
            metrics: Metrics::new(),
            model,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let registry = match &config.fetch.sources_file {
        Some(path) => SourceRegistry::from_json_file(path).await?,
        None => SourceRegistry::government_portals()
            .with_timeout(Duration::from_secs(config.fetch.timeout_secs)),
    };
    let registry = Arc::new(registry);
    info!(sources = registry.all().len(), "Source registry loaded");

    let cache = PageCache::new(
        Duration::from_secs(config.fetch.cache_ttl_secs),
        config.fetch.cache_max_entries,
    );
    let fetcher = WebEvidenceFetcher::new(registry.clone(), Some(cache.clone()))?;

    let llm = OllamaClient::new(config.llm.base_url.clone(), config.llm.model.clone())
        .with_timeout(Duration::from_secs(config.llm.timeout_secs))
        .with_retry(RetryPolicy::new(
            config.retry.max_retries,
            config.retry.initial_backoff_ms,
            config.retry.max_backoff_ms,
        ));

    let state = Arc::new(AppState::new(
        &config,
        Arc::new(llm),
        Arc::new(fetcher),
        registry,
        Some(cache),
        config.llm.model.clone(),
    ));

    spawn_session_sweeper(state.clone(), Duration::from_secs(config.sessions.idle_secs));

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn spawn_session_sweeper(state: Arc<AppState>, max_idle: Duration) {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let swept = state.sessions.sweep_idle(max_idle);
            if swept > 0 {
                info!(swept, remaining = state.sessions.len(), "Idle form sessions abandoned");
            }
        }
    });
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/analyze", post(analyze))
        .route("/api/forms", post(start_form))
        .route(
            "/api/forms/:id",
            get(get_form).patch(update_form).delete(delete_form),
        )
        .route("/api/forms/:id/generate", post(generate_form))
        .route("/api/forms/:id/edit", post(edit_form))
        .route("/api/debug/retrieve", get(debug_retrieve))
        .route("/api/debug/sources", get(debug_sources))
        .route("/api/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
    corpus_chunks: usize,
    sources: usize,
    open_sessions: usize,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.clone(),
        corpus_chunks: state.index.len(),
        sources: state.registry.all().len(),
        open_sessions: state.sessions.len(),
    })
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<TriageAnswer>, ApiError> {
    let timer = TimedOperation::start();

    match state.pipeline.analyze(&req.text).await {
        Ok(answer) => {
            state.metrics.record_request(true);
            state.metrics.record_analyze(timer.elapsed(), &answer);
            Ok(Json(answer))
        }
        Err(e) => {
            warn!(error = %e, "Analysis failed");
            state.metrics.record_request(false);
            Err(e.into())
        }
    }
}

#[derive(Deserialize)]
struct StartFormRequest {
    text: String,
    intent: Intent,
}

async fn start_form(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartFormRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let timer = TimedOperation::start();

    let session = FormCompletionSession::start(&state.extractor, req.intent, &req.text)
        .await
        .inspect_err(|_| state.metrics.record_request(false))?;

    state.metrics.record_request(true);
    state.metrics.record_form_started(timer.elapsed());

    let view = session.view();
    state.sessions.insert(session);
    Ok((StatusCode::CREATED, Json(view)))
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("form session"))
}

async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let session = state.sessions.get(&id).ok_or_else(|| ApiError::not_found("form session"))?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

#[derive(Deserialize)]
struct UpdateFormRequest {
    fields: serde_json::Map<String, serde_json::Value>,
}

/// All updates are validated before any is applied.
async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFormRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let session = state.sessions.get(&id).ok_or_else(|| ApiError::not_found("form session"))?;
    let mut session = session.lock().await;
    session
        .ensure_editable()
        .map_err(|e| ApiError::from(e).with_session(session.view()))?;

    let mut staged = session.record().clone();
    for (field, value) in &req.fields {
        staged
            .set_json(field, value)
            .map_err(|e| ApiError::from(SessionError::from(e)).with_session(session.view()))?;
    }
    for (field, value) in &req.fields {
        session
            .update_field_json(field, value)
            .map_err(|e| ApiError::from(e).with_session(session.view()))?;
    }

    Ok(Json(session.view()))
}

async fn generate_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let session = state.sessions.get(&id).ok_or_else(|| ApiError::not_found("form session"))?;
    let mut session = session.lock().await;

    let result = session.generate(state.drafts.as_ref()).await;
    state.metrics.record_generation(result.is_ok());

    match result {
        Ok(_) => Ok(Json(session.view())),
        Err(e) => Err(ApiError::from(e).with_session(session.view())),
    }
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let session = state.sessions.get(&id).ok_or_else(|| ApiError::not_found("form session"))?;
    let mut session = session.lock().await;

    session.edit().map_err(|e| ApiError::from(e).with_session(session.view()))?;
    Ok(Json(session.view()))
}

async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("form session"))
    }
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(label) => Category::parse(label)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("unknown category '{}'", label))),
    }
}

#[derive(Deserialize)]
struct RetrieveParams {
    q: String,
    category: Option<String>,
    k: Option<usize>,
}

#[derive(Serialize)]
struct RetrieveHit {
    id: String,
    heading: String,
    distance: f32,
    text: String,
}

async fn debug_retrieve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RetrieveParams>,
) -> Result<Json<Vec<RetrieveHit>>, ApiError> {
    let category = parse_category(params.category.as_deref())?;
    let k = params.k.unwrap_or(index::DEFAULT_TOP_K).clamp(1, 20);

    let hits = state
        .index
        .search(&params.q, category, k)
        .into_iter()
        .map(|m| RetrieveHit {
            id: m.chunk.id.clone(),
            heading: m.chunk.heading(),
            distance: m.distance,
            text: m.chunk.text.clone(),
        })
        .collect();

    Ok(Json(hits))
}

#[derive(Deserialize)]
struct SourcesParams {
    category: Option<String>,
}

async fn debug_sources(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SourcesParams>,
) -> Result<Json<Vec<Source>>, ApiError> {
    let sources = match parse_category(params.category.as_deref())? {
        Some(category) => state.registry.for_category(category).into_iter().cloned().collect(),
        None => state.registry.all().to_vec(),
    };
    Ok(Json(sources))
}

#[derive(Serialize)]
struct MetricsResponse {
    #[serde(flatten)]
    metrics: MetricsSnapshot,
    open_sessions: usize,
    pages_cached: usize,
    page_cache_ttl_secs: u64,
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let (pages_cached, page_cache_ttl_secs) = state
        .cache
        .as_ref()
        .map(|c| {
            let stats = c.stats();
            (stats.pages_cached, stats.ttl_secs)
        })
        .unwrap_or((0, 0));

    Json(MetricsResponse {
        metrics: state.metrics.snapshot(),
        open_sessions: state.sessions.len(),
        pages_cached,
        page_cache_ttl_secs,
    })
}
