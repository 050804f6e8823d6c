//! Presentation layer for the groundwater monitor.
//!
//! The engine never calls into this module; the simulation driver pulls
//! steps from the engine and hands them to a [`Renderer`]. Implementations
//! keep two regions, a chart and a status banner, and overwrite both rather
//! than appending.
//!
//! Submodules:
//! - `canvas`   — character grid and the scoped surface guard.
//! - `terminal` — terminal renderer (crossterm).
//! - `legend`   — legend contents and the optional logo check.

pub mod canvas;
pub mod legend;
pub mod terminal;

use crate::analysis::{ReplayStep, StatusMessage};
use crate::model::{ChartBounds, ClassifiedPoint, Forecast, MonitorError};

pub use legend::Legend;
pub use terminal::TerminalRenderer;

pub trait Renderer {
    /// Shows the legend panel once, before the replay starts.
    fn show_legend(&mut self, legend: &Legend) -> Result<(), MonitorError>;

    /// Draws the chart for one replay step and its status banner.
    fn draw_step(&mut self, step: &ReplayStep<'_>, bounds: &ChartBounds) -> Result<(), MonitorError>;

    /// Draws the full history overlaid with the three forecast curves.
    fn draw_forecast(
        &mut self,
        history: &[ClassifiedPoint],
        forecast: &Forecast,
        bounds: &ChartBounds,
    ) -> Result<(), MonitorError>;

    /// Replaces the status banner.
    fn show_status(&mut self, status: &StatusMessage) -> Result<(), MonitorError>;
}
