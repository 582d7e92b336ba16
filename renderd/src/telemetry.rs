//! Telemetry extraction from free-text engine output.
//!
//! Engine stdout is not a versioned schema, so extraction is total: each
//! field is scraped independently by a line marker plus a capture pattern,
//! and any field that fails to match is simply absent. No input ever makes
//! extraction return an error.

use once_cell::sync::Lazy;
use regex::Regex;
use shared_types::{BenchmarkTelemetry, GenerationTelemetry, ValidationTelemetry};

/// Gate for generation timings: no summary block, no fields.
const PERFORMANCE_SUMMARY_MARKER: &str = "Performance Summary:";
/// Exact confirmation line the validation engine prints for valid input.
const VALID_MARKER: &str = "✅ JSON is valid!";

static SECONDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.\d+)s").unwrap());
static SPEEDUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.\d+)x").unwrap());
static LAYER_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"Layers: (\d+)").unwrap());
static NETWORK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"Name: (.+)").unwrap());

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line).map(|c| c[1].to_string())
}

/// Scrape the generation engine's performance summary. Timing captures stay
/// strings — they are formatted text, not parsed floats.
pub fn extract_generation(stdout: &str) -> GenerationTelemetry {
    let mut telemetry = GenerationTelemetry::default();
    if !stdout.contains(PERFORMANCE_SUMMARY_MARKER) {
        return telemetry;
    }
    for line in stdout.lines() {
        if line.contains("LaTeX compilation:") {
            telemetry.latex_compile_seconds = capture(&SECONDS, line);
        }
        if line.contains("PNG conversion:") {
            telemetry.png_convert_seconds = capture(&SECONDS, line);
        }
        if line.contains("Total time:") {
            telemetry.total_seconds = capture(&SECONDS, line);
        }
    }
    telemetry
}

/// Scrape the comparative benchmark report. `rust_available` is a label
/// match only — it holds even when no numeric time could be captured.
pub fn extract_benchmark(stdout: &str) -> BenchmarkTelemetry {
    let mut telemetry = BenchmarkTelemetry {
        rust_available: stdout.contains("Rust:"),
        ..Default::default()
    };
    for line in stdout.lines() {
        if line.contains("🦀 Rust:") {
            telemetry.rust_time = capture(&SECONDS, line);
        }
        if line.contains("🐍 Python:") {
            telemetry.python_time = capture(&SECONDS, line);
        }
        if line.contains("⚡ Speedup:") {
            telemetry.speedup = capture(&SPEEDUP, line);
        }
    }
    telemetry
}

/// Scrape the validation report. Layer count and network name are
/// independent of the validity marker and may be absent either way.
pub fn extract_validation(stdout: &str) -> ValidationTelemetry {
    let mut telemetry = ValidationTelemetry {
        is_valid: stdout.contains(VALID_MARKER),
        ..Default::default()
    };
    for line in stdout.lines() {
        if telemetry.layer_count.is_none() {
            if let Some(c) = LAYER_COUNT.captures(line) {
                telemetry.layer_count = c[1].parse().ok();
            }
        }
        if telemetry.network_name.is_none() {
            if let Some(c) = NETWORK_NAME.captures(line) {
                telemetry.network_name = Some(c[1].trim().to_string());
            }
        }
    }
    telemetry
}
