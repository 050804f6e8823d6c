/// Threshold logic for the pump controller.
///
/// Submodules:
/// - `thresholds` — classification, shutdown index, alert policy.

pub mod thresholds;

pub use thresholds::{classify, find_shutdown_index, AlertPolicy};
