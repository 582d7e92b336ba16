//! HTTP API for the rendering orchestrator.
//!
//! All three workflows share one skeleton: stage the payload, invoke the
//! engine, classify the outcome, scrape telemetry, respond. Exactly one
//! response is produced per request on every path — failures come back in
//! the same structured shape family as successes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use shared_types::{
    BenchmarkResponse, EngineErrorResponse, GenerateResponse, HealthResponse, ValidateErrorResponse,
    ValidateResponse,
};

use crate::engine::{self, ProcessResult};
use crate::staging;
use crate::state::AppState;
use crate::telemetry;

/// Configure all API routes. The static `/outputs` mount and tracing layers
/// are attached in `main`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(generate))
        .route("/generate/benchmark", post(benchmark))
        .route("/generate/validate", post(validate))
        .route("/performance", get(performance))
        .route("/health", get(health_check))
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    #[serde(default)]
    pub benchmark: bool,
}

/// Server-error body for the generation and benchmark flows.
fn engine_error(error: &str, details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(EngineErrorResponse {
            error: error.to_string(),
            details,
            engine_used: "failed".to_string(),
        }),
    )
        .into_response()
}

/// POST /generate?benchmark={true|false} — render a diagram
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
    Json(body): Json<Value>,
) -> Response {
    info!(benchmark = params.benchmark, "processing generation request");

    let staged = match staging::stage_payload(&state.config.staging_dir, "arch", &body).await {
        Ok(staged) => staged,
        Err(e) => {
            error!("staging failed: {e}");
            return engine_error("Generation failed", e.to_string());
        }
    };

    let cmd = state.config.generate_command(&staged.path, params.benchmark);
    let result = match engine::invoke(&cmd).await {
        Ok(result) => result,
        Err(e) => return engine_error("Generation failed", e.to_string()),
    };
    if !result.success {
        error!(exit_code = ?result.exit_code, "generation engine failed");
        return engine_error("Generation failed", result.combined_output());
    }

    Json(GenerateResponse {
        image_url: state.config.image_url.clone(),
        engine_used: "accelerated".to_string(),
        execution_time_ms: result.elapsed.as_millis() as u64,
        performance: telemetry::extract_generation(&result.stdout),
    })
    .into_response()
}

/// Server-error body for the benchmark flow.
fn benchmark_error(details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Benchmark failed", "details": details })),
    )
        .into_response()
}

/// POST /generate/benchmark — run both engine backends and compare timings.
/// The raw report rides along with the parsed fields: the full comparative
/// output has value beyond what is scraped.
pub async fn benchmark(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    info!("processing benchmark request");

    let staged = match staging::stage_payload(&state.config.staging_dir, "benchmark", &body).await {
        Ok(staged) => staged,
        Err(e) => {
            error!("staging failed: {e}");
            return benchmark_error(e.to_string());
        }
    };

    let cmd = state.config.generate_command(&staged.path, true);
    let result = match engine::invoke(&cmd).await {
        Ok(result) => result,
        Err(e) => return benchmark_error(e.to_string()),
    };
    if !result.success {
        error!(exit_code = ?result.exit_code, "benchmark engine failed");
        return benchmark_error(result.stderr);
    }

    Json(BenchmarkResponse {
        benchmark_results: telemetry::extract_benchmark(&result.stdout),
        full_output: result.stdout,
    })
    .into_response()
}

/// Client-error body for the validation flow. A validation process that
/// rejected its input (or could not run) is an expected outcome, not a
/// server error.
fn invalid(error: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidateErrorResponse {
            valid: false,
            error,
        }),
    )
        .into_response()
}

/// What a failed validation process reports as its reason: stderr when the
/// engine wrote one, otherwise whatever reached stdout.
fn invalid_detail(result: &ProcessResult) -> String {
    if result.stderr.is_empty() {
        result.stdout.clone()
    } else {
        result.stderr.clone()
    }
}

/// POST /generate/validate — structural check without rendering
pub async fn validate(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    info!("processing validation request");

    let staged = match staging::stage_payload(&state.config.staging_dir, "validate", &body).await {
        Ok(staged) => staged,
        Err(e) => {
            error!("staging failed: {e}");
            return invalid(e.to_string());
        }
    };

    let cmd = state.config.validate_command(&staged.path);
    let result = match engine::invoke(&cmd).await {
        Ok(result) => result,
        Err(e) => return invalid(e.to_string()),
    };
    // A non-zero exit here is the engine rejecting the input, not crashing.
    if !result.success {
        return invalid(invalid_detail(&result));
    }

    let telemetry = telemetry::extract_validation(&result.stdout);
    Json(ValidateResponse {
        valid: telemetry.is_valid,
        layer_count: telemetry.layer_count,
        network_name: telemetry.network_name,
        validation_backend: true,
        details: result.stdout,
    })
    .into_response()
}

/// GET /performance — static capability descriptor
pub async fn performance() -> impl IntoResponse {
    Json(json!({
        "engine": "accelerated",
        "features": [
            "Fast JSON parsing",
            "Optimized layer processing",
            "Mathematical computations acceleration",
            "CLI tools for validation and benchmarking"
        ],
        "endpoints": {
            "/generate": "Generate neural network diagrams",
            "/generate/benchmark": "Benchmark parsing performance",
            "/generate/validate": "Validate neural network JSON"
        }
    }))
}

/// GET /health — static liveness descriptor
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        engine: "accelerated".to_string(),
        timestamp: Utc::now(),
    })
}
