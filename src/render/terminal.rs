//! Terminal renderer.
//!
//! Draws the chart as a character grid with a height gutter on the left and
//! the time range underneath, followed by a one-line status banner. In
//! in-place mode every frame clears the screen and redraws the legend, the
//! chart and the banner, so the legend stays visible for the whole run;
//! otherwise frames are appended, which is what logs and tests want.

use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style::{self, Stylize};
use crossterm::terminal::{Clear, ClearType};

use crate::analysis::{ReplayStep, StatusKind, StatusMessage};
use crate::config::MonitorConfig;
use crate::model::{ChartBounds, Classification, ClassifiedPoint, Forecast, MonitorError, Scenario};
use crate::render::canvas::{Canvas, SurfaceTracker};
use crate::render::{Legend, Renderer};
use crate::variants::{Color, Labels, Palette};

pub const DEFAULT_WIDTH: usize = 72;
pub const DEFAULT_HEIGHT: usize = 18;

const GUTTER: usize = 9;

const GLYPH_SAFE: char = '●';
const GLYPH_UNSAFE: char = '○';
const GLYPH_SHUTDOWN: char = 'X';
const GLYPH_THRESHOLD: char = '┄';

fn scenario_glyph(scenario: Scenario) -> char {
    match scenario {
        Scenario::High => '^',
        Scenario::Neutral => '~',
        Scenario::Low => 'v',
    }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    palette: Palette,
    labels: Labels,
    threshold: f64,
    width: usize,
    height: usize,
    colored: bool,
    in_place: bool,
    /// Legend panel as last shown; repeated at the top of in-place frames.
    legend: Option<String>,
    tracker: SurfaceTracker,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, config: &MonitorConfig) -> Self {
        Self {
            out,
            palette: config.palette,
            labels: config.labels.clone(),
            threshold: config.threshold,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            colored: true,
            in_place: true,
            legend: None,
            tracker: SurfaceTracker::new(),
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Plain output: no colors, no screen clearing.
    pub fn plain(mut self) -> Self {
        self.colored = false;
        self.in_place = false;
        self
    }

    pub fn surfaces(&self) -> &SurfaceTracker {
        &self.tracker
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colored {
            style::style(text).with(style::Color::from(color)).to_string()
        } else {
            text.to_string()
        }
    }

    fn status_line(&self, status: &StatusMessage) -> String {
        let color = match status.kind {
            StatusKind::Safe | StatusKind::Complete => self.palette.safe,
            StatusKind::Alert => self.palette.shutdown_marker,
            StatusKind::Forecasting => Color::Yellow,
        };
        self.paint(&status.text, color)
    }

    fn draw_points(&self, canvas: &mut Canvas, points: &[ClassifiedPoint]) {
        canvas.hline(self.threshold, GLYPH_THRESHOLD, self.palette.threshold_line);
        for point in points {
            let (glyph, color) = match point.class {
                Classification::Safe => (GLYPH_SAFE, self.palette.safe),
                Classification::Unsafe => (GLYPH_UNSAFE, self.palette.unsafe_point),
            };
            canvas.plot(point.observation.time, point.observation.height, glyph, color);
        }
    }

    /// Turns a finished canvas into text: title, gutter + grid, time axis.
    fn frame(&self, canvas: &Canvas, title: &str) -> String {
        let bounds = canvas.bounds();
        let threshold_row = canvas.row(self.threshold);
        let mut text = String::new();
        text.push_str(title);
        text.push('\n');

        for row in 0..canvas.height() {
            let gutter = if row == 0 {
                format!("{:>8.2} │", bounds.y_max)
            } else if row == canvas.height() - 1 {
                format!("{:>8.2} │", bounds.y_min)
            } else if Some(row) == threshold_row {
                format!("{:>8.2} │", self.threshold)
            } else {
                format!("{:>width$}│", "", width = GUTTER)
            };
            text.push_str(&gutter);
            text.push_str(&canvas.render_row(row, self.colored));
            text.push('\n');
        }

        text.push_str(&format!("{:>width$}└{}\n", "", "─".repeat(canvas.width()), width = GUTTER));
        let left = format!("{:.1}", bounds.x_min);
        let right = format!("{:.1}", bounds.x_max);
        let pad = canvas.width().saturating_sub(left.len() + right.len());
        text.push_str(&format!("{:>width$} {}{}{}\n", "", left, " ".repeat(pad), right, width = GUTTER));
        text
    }

    fn clear_screen(&mut self) -> Result<(), MonitorError> {
        queue!(self.out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        Ok(())
    }

    fn write_frame(&mut self, chart: &str, status: &str) -> Result<(), MonitorError> {
        if self.in_place {
            self.clear_screen()?;
            if let Some(ref legend) = self.legend {
                write!(self.out, "{}", legend)?;
            }
        }
        write!(self.out, "{}", chart)?;
        writeln!(self.out, "{}", status)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_legend(&mut self, legend: &Legend) -> Result<(), MonitorError> {
        let mut text = String::new();
        if let Some(ref logo) = legend.logo {
            text.push_str(&format!("[{}]\n", logo));
        }
        text.push_str(&format!("{}\n", legend.title));
        text.push_str(&format!("Variant: {}\n", legend.variant));
        text.push_str(&format!("Critical threshold: {}m\n", legend.threshold));
        for (color, label) in &legend.entries {
            text.push_str(&format!("  {}\n", self.paint(label, *color)));
        }
        text.push_str(&format!("Simulation delay: {}s\n", legend.delay_secs));
        if self.in_place {
            self.clear_screen()?;
        }
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        self.legend = Some(text);
        Ok(())
    }

    fn draw_step(&mut self, step: &ReplayStep<'_>, bounds: &ChartBounds) -> Result<(), MonitorError> {
        let title = format!("{} | t={:.2}", self.labels.title, step.observation.time);
        let chart = {
            let mut surface = self.tracker.acquire(self.width, self.height, *bounds);
            self.draw_points(&mut surface, step.snapshot.points);
            if let Some(marker) = step.snapshot.shutdown_marker {
                surface.plot(marker.time, marker.height, GLYPH_SHUTDOWN, self.palette.shutdown_marker);
            }
            self.frame(&surface, &title)
        };
        let status = self.status_line(&step.status);
        self.write_frame(&chart, &status)
    }

    fn draw_forecast(
        &mut self,
        history: &[ClassifiedPoint],
        forecast: &Forecast,
        bounds: &ChartBounds,
    ) -> Result<(), MonitorError> {
        let chart = {
            let mut surface = self.tracker.acquire(self.width, self.height, *bounds);
            self.draw_points(&mut surface, history);
            for trajectory in forecast.trajectories() {
                let color = self.scenario_color(trajectory.scenario);
                for p in &trajectory.points {
                    surface.plot(p.time, p.height, scenario_glyph(trajectory.scenario), color);
                }
            }
            self.frame(&surface, &self.labels.title)
        };

        let mut key = String::new();
        for (scenario, label) in [
            (Scenario::High, &self.labels.high),
            (Scenario::Neutral, &self.labels.neutral),
            (Scenario::Low, &self.labels.low),
        ] {
            let entry = format!("{} {}", scenario_glyph(scenario), label);
            key.push_str(&format!("  {}\n", self.paint(&entry, self.scenario_color(scenario))));
        }

        let mut body = chart;
        body.push_str(&key);
        let status = self.status_line(&StatusMessage::forecasting(&self.labels));
        self.write_frame(&body, &status)
    }

    fn show_status(&mut self, status: &StatusMessage) -> Result<(), MonitorError> {
        let line = self.status_line(status);
        if self.in_place {
            // Banner is the last line of the frame; rewrite it.
            queue!(self.out, cursor::MoveUp(1), Clear(ClearType::CurrentLine))?;
        }
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalRenderer<W> {
    fn scenario_color(&self, scenario: Scenario) -> Color {
        match scenario {
            Scenario::High => self.palette.high,
            Scenario::Neutral => self.palette.neutral,
            Scenario::Low => self.palette.low,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertPolicy;
    use crate::analysis::{forecast, MonitorEngine};
    use crate::model::{Observation, Series};

    fn config() -> MonitorConfig {
        MonitorConfig::for_variant("classic").unwrap()
    }

    fn series() -> Series {
        Series::new(vec![
            Observation::new(0.0, 0.0),
            Observation::new(1.0, -1.5),
            Observation::new(2.0, -1.0),
        ])
        .unwrap()
    }

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_step_frames_release_their_surface() {
        let config = config();
        let s = series();
        let engine = MonitorEngine::new(&s, config.threshold, AlertPolicy::Reevaluate, &config.labels);
        let bounds = s.bounds(config.horizon);
        let mut renderer = TerminalRenderer::new(Vec::new(), &config).plain();

        for step in engine.replay() {
            renderer.draw_step(&step, &bounds).unwrap();
            assert_eq!(renderer.surfaces().live(), 0, "surface outlived step {}", step.index);
        }
        assert_eq!(renderer.surfaces().acquired(), 3);
    }

    #[test]
    fn test_marker_drawn_only_when_snapshot_carries_it() {
        let config = config();
        let s = series();
        let engine = MonitorEngine::new(&s, config.threshold, AlertPolicy::Reevaluate, &config.labels);
        let bounds = s.bounds(config.horizon);
        let steps: Vec<_> = engine.replay().collect();

        let mut renderer = TerminalRenderer::new(Vec::new(), &config).plain();
        renderer.draw_step(&steps[0], &bounds).unwrap();
        assert!(!output(renderer).contains(GLYPH_SHUTDOWN));

        let mut renderer = TerminalRenderer::new(Vec::new(), &config).plain();
        renderer.draw_step(&steps[1], &bounds).unwrap();
        let text = output(renderer);
        assert!(text.contains(GLYPH_SHUTDOWN));
        assert!(text.contains(&config.labels.alert));
    }

    #[test]
    fn test_plain_mode_emits_no_escape_sequences() {
        let config = config();
        let s = series();
        let mut renderer = TerminalRenderer::new(Vec::new(), &config).plain();
        let f = forecast(s.last(), config.horizon, config.num_points);
        let engine = MonitorEngine::new(&s, config.threshold, AlertPolicy::Reevaluate, &config.labels);
        renderer
            .draw_forecast(engine.classified(), &f, &s.bounds(config.horizon))
            .unwrap();
        renderer.show_status(&StatusMessage::complete(&config.labels)).unwrap();
        let text = output(renderer);
        assert!(!text.contains('\x1b'));
        assert!(text.contains(&config.labels.high));
        assert!(text.contains(&config.labels.low));
        assert!(text.trim_end().ends_with(&config.labels.complete));
    }

    #[test]
    fn test_in_place_frames_keep_the_legend_on_screen() {
        let config = config();
        let s = series();
        let engine = MonitorEngine::new(&s, config.threshold, AlertPolicy::Reevaluate, &config.labels);
        let bounds = s.bounds(config.horizon);
        let mut renderer = TerminalRenderer::new(Vec::new(), &config);

        renderer.show_legend(&Legend::from_config(&config)).unwrap();
        for step in engine.replay() {
            renderer.draw_step(&step, &bounds).unwrap();
        }
        let text = output(renderer);

        let clear_all = "\x1b[2J";
        let last_clear = text.rfind(clear_all).expect("in-place frames clear the screen");
        assert_eq!(text.matches(clear_all).count(), 4, "legend plus one clear per step");
        let visible = &text[last_clear..];
        assert!(visible.contains("Critical threshold: -1.2m"));
        assert!(visible.contains(&config.labels.legend_shutdown));
        assert!(visible.contains("Simulation delay"));
        assert!(visible.contains("t=2.0"));
    }

    #[test]
    fn test_in_place_status_rewrites_the_banner_line() {
        let config = config();
        let mut renderer = TerminalRenderer::new(Vec::new(), &config);
        renderer.show_status(&StatusMessage::complete(&config.labels)).unwrap();
        let text = output(renderer);
        let banner = text.find(&config.labels.complete).unwrap();
        let erase = text.find("\x1b[2K").expect("banner line is cleared");
        assert!(erase < banner);
    }

    #[test]
    fn test_frame_has_requested_grid_height() {
        let config = config();
        let s = series();
        let engine = MonitorEngine::new(&s, config.threshold, AlertPolicy::Reevaluate, &config.labels);
        let mut renderer = TerminalRenderer::new(Vec::new(), &config).plain().with_size(20, 6);
        let step = engine.replay().next().unwrap();
        renderer.draw_step(&step, &s.bounds(config.horizon)).unwrap();
        let text = output(renderer);
        let grid_rows = text.lines().filter(|l| l.contains('│')).count();
        assert_eq!(grid_rows, 6);
    }
}
