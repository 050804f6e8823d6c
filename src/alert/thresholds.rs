//! Groundwater threshold checking.
//!
//! Classification of single heights, detection of the first threshold
//! crossing (the pump shutdown point) and the policy that decides whether a
//! step after the crossing is still in alert.

use crate::model::{Classification, Series};

/// Classifies a height against the threshold.
///
/// `Unsafe` iff `height <= threshold`. Pure: no history, no hysteresis.
pub fn classify(height: f64, threshold: f64) -> Classification {
    if height <= threshold {
        Classification::Unsafe
    } else {
        Classification::Safe
    }
}

/// Returns the index of the first observation at or below the threshold.
///
/// Returns `series.len()` when the series never crosses, meaning no
/// shutdown occurred. Only the first crossing counts; later recoveries and
/// re-crossings do not move it.
pub fn find_shutdown_index(series: &Series, threshold: f64) -> usize {
    series
        .iter()
        .position(|obs| classify(obs.height, threshold) == Classification::Unsafe)
        .unwrap_or(series.len())
}

/// How the status banner behaves after the shutdown index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPolicy {
    /// Each step is judged on its own height; recovery clears the alert.
    #[default]
    Reevaluate,
    /// Once the shutdown index is reached every later step stays in alert.
    Latched,
}

impl AlertPolicy {
    /// Decides whether the step at `index` shows the alert banner.
    pub fn is_alert(self, index: usize, shutdown_index: usize, class: Classification) -> bool {
        match self {
            AlertPolicy::Reevaluate => class == Classification::Unsafe,
            AlertPolicy::Latched => index >= shutdown_index || class == Classification::Unsafe,
        }
    }
}

impl std::str::FromStr for AlertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reevaluate" => Ok(AlertPolicy::Reevaluate),
            "latched" => Ok(AlertPolicy::Latched),
            other => Err(format!("unknown alert policy '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
