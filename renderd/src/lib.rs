//! PlotNeuron rendering orchestrator
//!
//! This crate provides the HTTP service that accepts neural-network
//! architecture descriptions, stages them to disk, runs an external
//! rendering engine as a one-shot process, and maps the process outcome
//! onto a small set of stable JSON responses.

pub mod api;
pub mod config;
pub mod engine;
pub mod staging;
pub mod state;
pub mod telemetry;
