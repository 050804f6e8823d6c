//! Groundwater level monitor.
//!
//! Replays a recorded water table series, classifies each reading against
//! the pump safety threshold, reports the pump status step by step and
//! projects three future scenarios from the last reading.
//!
//! Layout:
//! - `model`      — shared types and the crate error.
//! - `alert`      — threshold classification and alert policy.
//! - `analysis`   — replay engine and forecast (pure computation).
//! - `ingest`     — CSV loading and the session-scoped loader.
//! - `variants`   — dashboard presets.
//! - `config`     — layered configuration.
//! - `render`     — terminal presentation.
//! - `simulation` — drives the engine into a renderer.
//! - `export`     — JSON run report.
//! - `logging`    — structured logging.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod simulation;
pub mod variants;
