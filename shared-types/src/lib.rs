//! Shared response and telemetry contracts
//!
//! Every JSON body the renderer service emits lives here, so the HTTP
//! handlers and the integration tests agree on one set of shapes.
//!
//! Telemetry fields are scraped from free-text engine output and are all
//! optional: a field that could not be extracted is simply absent, never an
//! error. Numeric captures stay strings because the engine prints them as
//! formatted text, not as a versioned schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Telemetry
// ============================================================================

/// Timing breakdown scraped from the generation engine's performance summary.
///
/// All fields are absent when the engine did not print a summary block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationTelemetry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex_compile_seconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png_convert_seconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_seconds: Option<String>,
}

impl GenerationTelemetry {
    pub fn is_empty(&self) -> bool {
        self.latex_compile_seconds.is_none()
            && self.png_convert_seconds.is_none()
            && self.total_seconds.is_none()
    }
}

/// Comparative timings from a benchmark run of both engine backends.
///
/// `rust_available` reflects a label match only; the timing fields may still
/// be absent when the numeric capture failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTelemetry {
    pub rust_available: bool,
    pub rust_time: Option<String>,
    pub python_time: Option<String>,
    pub speedup: Option<String>,
}

/// Structural validity report scraped from the validation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationTelemetry {
    pub is_valid: bool,
    pub layer_count: Option<u32>,
    pub network_name: Option<String>,
}

// ============================================================================
// Response bodies
// ============================================================================

/// Success body for `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub engine_used: String,
    pub execution_time_ms: u64,
    pub performance: GenerationTelemetry,
}

/// Failure body for `/generate` and `/generate/benchmark`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineErrorResponse {
    pub error: String,
    pub details: String,
    pub engine_used: String,
}

/// Success body for `POST /generate/benchmark`.
///
/// The raw stdout rides along deliberately: the full comparative report has
/// value beyond the parsed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResponse {
    pub benchmark_results: BenchmarkTelemetry,
    pub full_output: String,
}

/// Success body for `POST /generate/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub layer_count: Option<u32>,
    pub network_name: Option<String>,
    pub validation_backend: bool,
    pub details: String,
}

/// Failure body for `POST /generate/validate`.
///
/// A validation process that could not run (or rejected the input) is an
/// expected, recoverable outcome reported to the client, not a server error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateErrorResponse {
    pub valid: bool,
    pub error: String,
}

/// Body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub engine: String,
    pub timestamp: DateTime<Utc>,
}
