//! Simulation driver.
//!
//! Pulls steps from the engine and pushes them to a renderer: legend,
//! paced replay, "forecasting" banner, forecast chart, "complete" banner.
//! This is the only place where the engine and the presentation meet.

use std::time::Duration;

use serde::Serialize;

use crate::alert::AlertPolicy;
use crate::analysis::{forecast, MonitorEngine, Paced, StatusMessage};
use crate::config::MonitorConfig;
use crate::logging::{self, Component};
use crate::model::{Forecast, MonitorError, Series};
use crate::render::{Legend, Renderer};

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub variant: String,
    pub threshold: f64,
    pub alert_policy: AlertPolicy,
    pub steps: usize,
    pub alert_steps: usize,
    /// Steps whose chart carried the shutdown marker.
    pub marker_steps: usize,
    /// `None` when the threshold was never crossed.
    pub shutdown_index: Option<usize>,
    pub final_status: StatusMessage,
    pub forecast: Forecast,
}

/// Runs the full simulation with real sleeps between steps.
pub fn run_simulation<R: Renderer>(
    series: &Series,
    config: &MonitorConfig,
    renderer: &mut R,
) -> Result<RunSummary, MonitorError> {
    run_simulation_with(series, config, renderer, std::thread::sleep)
}

/// Same as [`run_simulation`] with an injectable sleep, for tests.
pub fn run_simulation_with<R, S>(
    series: &Series,
    config: &MonitorConfig,
    renderer: &mut R,
    sleep: S,
) -> Result<RunSummary, MonitorError>
where
    R: Renderer,
    S: FnMut(Duration),
{
    let engine = MonitorEngine::new(series, config.threshold, config.alert_policy, &config.labels);
    let bounds = series.bounds(config.horizon);

    logging::info(
        Component::Engine,
        Some(&config.variant),
        &format!(
            "Starting replay of {} observations (threshold {}, policy {:?})",
            engine.step_count(),
            config.threshold,
            config.alert_policy
        ),
    );
    if let Some(index) = engine.shutdown() {
        logging::debug(Component::Engine, None, &format!("Shutdown index {}", index));
    }

    renderer.show_legend(&Legend::from_config(config))?;

    let mut steps = 0;
    let mut alert_steps = 0;
    let mut marker_steps = 0;
    for step in Paced::new(engine.replay(), config.delay(), sleep) {
        renderer.draw_step(&step, &bounds)?;
        steps += 1;
        if step.alert {
            alert_steps += 1;
        }
        if step.snapshot.shutdown_marker.is_some() {
            marker_steps += 1;
        }
    }
    logging::log_run_summary(steps, alert_steps, engine.shutdown());

    renderer.show_status(&StatusMessage::forecasting(&config.labels))?;
    let projection = forecast(series.last(), config.horizon, config.num_points);
    renderer.draw_forecast(engine.classified(), &projection, &bounds.including(&projection))?;

    let final_status = StatusMessage::complete(&config.labels);
    renderer.show_status(&final_status)?;

    Ok(RunSummary {
        variant: config.variant.clone(),
        threshold: config.threshold,
        alert_policy: config.alert_policy,
        steps,
        alert_steps,
        marker_steps,
        shutdown_index: engine.shutdown(),
        final_status,
        forecast: projection,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
