//! HTTP surface for the WSB trend analyst.
//!
//! Thin layer only: the pipeline lives in `trend-orchestrator`. Analysis
//! runs are started as background jobs under a uuid and polled by id; the
//! job store is in-memory and rebuilt on restart.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use metrics_client::MetricsClient;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use trend_core::{AnalysisRun, JobStatus, Recommendation, TickerMention, TrendError};
use trend_orchestrator::TrendOrchestrator;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TrendOrchestrator>,
    pub jobs: Arc<DashMap<String, AnalysisRun>>,
}

impl AppState {
    pub fn new(orchestrator: TrendOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            jobs: Arc::new(DashMap::new()),
        }
    }
}

pub struct AppError(TrendError);

impl From<TrendError> for AppError {
    fn from(err: TrendError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TrendError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            TrendError::JobNotFound(_) => StatusCode::NOT_FOUND,
            TrendError::FeedError(_) | TrendError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": self.0.to_string(),
            "retryable": self.0.is_retryable(),
        });
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct TrendingResponse {
    tickers: Vec<TickerMention>,
}

#[derive(Serialize)]
struct AnalyzeStarted {
    job_id: String,
    status: JobStatus,
}

#[derive(Serialize)]
struct StockDetail {
    ticker: String,
    recommendation: Recommendation,
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "app": "WSB Stock Analyst"}))
}

async fn get_trending(
    State(state): State<AppState>,
) -> Result<Json<TrendingResponse>, AppError> {
    let tickers = state.orchestrator.trending().await?;
    Ok(Json(TrendingResponse { tickers }))
}

async fn start_analysis(State(state): State<AppState>) -> Json<AnalyzeStarted> {
    let job_id = Uuid::new_v4().to_string();
    let mut pending = AnalysisRun::new(job_id.clone());
    pending.status = JobStatus::Running;
    state.jobs.insert(job_id.clone(), pending);

    let orchestrator = state.orchestrator.clone();
    let jobs = state.jobs.clone();
    let id = job_id.clone();
    tokio::spawn(async move {
        let run = orchestrator
            .run(&id, |event| {
                tracing::info!(
                    "Job {}: analyzed {} ({}/{})",
                    id,
                    event.ticker,
                    event.index,
                    event.total
                );
            })
            .await;
        jobs.insert(id.clone(), run);
    });

    Json(AnalyzeStarted {
        job_id,
        status: JobStatus::Running,
    })
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<AnalysisRun>, AppError> {
    let run = state
        .jobs
        .get(&job_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| TrendError::JobNotFound(job_id))?;
    Ok(Json(run))
}

async fn get_stock_detail(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<StockDetail>, AppError> {
    let ticker = ticker.to_uppercase();
    let recommendation = state.orchestrator.analyze_ticker(&ticker).await?;
    Ok(Json(StockDetail { ticker, recommendation }))
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/trending", get(get_trending))
        .route("/api/analyze", post(start_analysis))
        .route("/api/analysis/:job_id", get(get_analysis))
        .route("/api/stock/:ticker", get(get_stock_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    let provider = Arc::new(MetricsClient::from_env());
    let orchestrator = TrendOrchestrator::new(provider);
    let state = AppState::new(orchestrator);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("WSB analyst API listening on {}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
