/// Core data types for the groundwater monitoring service.
///
/// This module defines the shared domain model imported by all other modules:
/// observations, the loaded series, per-point classification, forecast
/// trajectories and the crate error type. It contains no I/O.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Safe/unsafe boundary for the water table height, in meters.
/// Every dashboard variant uses this value.
pub const DEFAULT_THRESHOLD_M: f64 = -1.2;

/// Default input file name, looked up relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "groundwater_level_modified.csv";

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single recorded water table height.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Observation {
    pub time: f64,
    pub height: f64, // meters, negative below the reference level
}

impl Observation {
    pub fn new(time: f64, height: f64) -> Self {
        Self { time, height }
    }
}

/// Ordered, non-empty sequence of observations.
///
/// The engine assumes at least one row, so the only way to build a
/// `Series` is through [`Series::new`], which rejects an empty input.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    pub fn new(observations: Vec<Observation>) -> Result<Self, MonitorError> {
        if observations.is_empty() {
            return Err(MonitorError::EmptySeries);
        }
        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false, since [`Series::new`] rejects empty input. Kept next to
    /// `len` for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn last(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Axis limits for charts of this series extended by a forecast horizon.
    ///
    /// x spans from the first recorded time to the end of the forecast,
    /// y pads the observed height range by half a meter on both sides.
    pub fn bounds(&self, horizon: f64) -> ChartBounds {
        let (mut t_min, mut h_min, mut h_max) = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for obs in &self.observations {
            t_min = t_min.min(obs.time);
            h_min = h_min.min(obs.height);
            h_max = h_max.max(obs.height);
        }
        ChartBounds {
            x_min: t_min,
            x_max: self.last().time + horizon,
            y_min: h_min - 0.5,
            y_max: h_max + 0.5,
        }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Axis limits of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartBounds {
    /// Widens the limits so every forecast point fits, keeping the same
    /// half-meter padding on the height axis.
    pub fn including(&self, forecast: &Forecast) -> ChartBounds {
        let mut bounds = *self;
        for point in forecast.trajectories().iter().flat_map(|t| t.points.iter()) {
            bounds.x_min = bounds.x_min.min(point.time);
            bounds.x_max = bounds.x_max.max(point.time);
            bounds.y_min = bounds.y_min.min(point.height - 0.5);
            bounds.y_max = bounds.y_max.max(point.height + 0.5);
        }
        bounds
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Per-observation safety label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Classification {
    /// Height strictly above the threshold; the pump may run.
    Safe,
    /// Height at or below the threshold.
    Unsafe,
}

/// An observation tagged with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedPoint {
    pub observation: Observation,
    pub class: Classification,
}

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// The three projected futures drawn after the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Scenario {
    /// Recharge: neutral baseline plus a rising linear term.
    High,
    /// Stable: sinusoidal baseline around the last height.
    Neutral,
    /// Drought: neutral baseline minus a falling linear term.
    Low,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ForecastTrajectory {
    pub scenario: Scenario,
    pub points: Vec<Observation>,
}

impl ForecastTrajectory {
    pub fn heights(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.height).collect()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Forecast {
    pub origin: Observation,
    pub high: ForecastTrajectory,
    pub neutral: ForecastTrajectory,
    pub low: ForecastTrajectory,
}

impl Forecast {
    /// Trajectories in drawing order.
    pub fn trajectories(&self) -> [&ForecastTrajectory; 3] {
        [&self.high, &self.neutral, &self.low]
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while loading data, resolving configuration or exporting.
#[derive(Debug, PartialEq)]
pub enum MonitorError {
    /// The series file does not exist. Fatal at startup.
    DataFileNotFound(String),
    /// A CSV row could not be read. `row` is the 1-based data row.
    ParseError { row: usize, message: String },
    /// The series source contained no observations.
    EmptySeries,
    /// Any other I/O failure, with the underlying message.
    Io(String),
    /// A configuration value is out of range or unreadable.
    InvalidConfig(String),
    /// No preset with this name exists in the variant registry.
    UnknownVariant(String),
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::DataFileNotFound(path) => write!(f, "Data file not found: {}", path),
            MonitorError::ParseError { row, message } => {
                write!(f, "Parse error at row {}: {}", row, message)
            }
            MonitorError::EmptySeries => write!(f, "Series contains no observations"),
            MonitorError::Io(msg) => write!(f, "I/O error: {}", msg),
            MonitorError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            MonitorError::UnknownVariant(name) => write!(f, "Unknown variant: {}", name),
        }
    }
}

impl std::error::Error for MonitorError {}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
