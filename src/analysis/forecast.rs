//! Closed-form projection of the water table after the last reading.
//!
//! Three futures branch from the final observation `(t0, h0)`:
//!
//!   neutral(t) = h0 + 0.5 * sin((t - t0) / 5)
//!   high(t)    = neutral(t) + 0.05 * (t - t0)
//!   low(t)     = neutral(t) - 0.05 * (t - t0)
//!
//! evaluated at evenly spaced times over `[t0, t0 + horizon]`.

use crate::model::{Forecast, ForecastTrajectory, Observation, Scenario};

/// Forecast length in time units.
pub const DEFAULT_HORIZON: f64 = 30.0;

/// Samples per trajectory.
pub const DEFAULT_NUM_POINTS: usize = 50;

const OSCILLATION_AMPLITUDE: f64 = 0.5;
const OSCILLATION_PERIOD_DIVISOR: f64 = 5.0;
const DRIFT_PER_UNIT: f64 = 0.05;

/// Offsets from `t0` of `num_points` evenly spaced samples, both ends included.
fn sample_offsets(horizon: f64, num_points: usize) -> Vec<f64> {
    match num_points {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n)
            .map(|i| horizon * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Projects the three scenarios from `last`.
///
/// All three trajectories start at `last.height`, and for every sample
/// `high >= neutral >= low`.
pub fn forecast(last: &Observation, horizon: f64, num_points: usize) -> Forecast {
    let offsets = sample_offsets(horizon, num_points);
    let mut high = Vec::with_capacity(offsets.len());
    let mut neutral = Vec::with_capacity(offsets.len());
    let mut low = Vec::with_capacity(offsets.len());

    for dt in offsets {
        let t = last.time + dt;
        let base = last.height + OSCILLATION_AMPLITUDE * (dt / OSCILLATION_PERIOD_DIVISOR).sin();
        let drift = DRIFT_PER_UNIT * dt;
        neutral.push(Observation::new(t, base));
        high.push(Observation::new(t, base + drift));
        low.push(Observation::new(t, base - drift));
    }

    Forecast {
        origin: *last,
        high: ForecastTrajectory { scenario: Scenario::High, points: high },
        neutral: ForecastTrajectory { scenario: Scenario::Neutral, points: neutral },
        low: ForecastTrajectory { scenario: Scenario::Low, points: low },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
