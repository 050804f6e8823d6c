/// Monitoring and projection logic for the groundwater monitor.
///
/// This module holds the pure computation: the point-by-point replay with
/// its per-step classification and alert status, and the closed-form
/// forecast drawn once the replay ends. Nothing here performs I/O or
/// rendering.
///
/// Submodules:
/// - `replay`   — engine, lazy replay iterator, pacing adapter.
/// - `forecast` — High/Neutral/Low projections from the last observation.

pub mod forecast;
pub mod replay;

pub use forecast::{forecast, DEFAULT_HORIZON, DEFAULT_NUM_POINTS};
pub use replay::{MonitorEngine, Paced, Replay, ReplayStep, Snapshot, StatusKind, StatusMessage};
