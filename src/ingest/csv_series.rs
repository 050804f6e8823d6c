/// Groundwater series CSV reader
///
/// Reads the recorded water table as a headered CSV with at least a `Time`
/// and a `Height` column, one row per observation, in temporal order.
/// Additional columns are ignored.
///
/// Example:
///   Time,Height
///   0,0.12
///   1,0.05

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::logging::{self, Component};
use crate::model::{MonitorError, Observation, Series};

// ============================================================================
// Row structure
// ============================================================================

#[derive(Debug, Deserialize)]
struct SeriesRow {
    #[serde(rename = "Time")]
    time: f64,
    #[serde(rename = "Height")]
    height: f64,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a series from any CSV source.
///
/// Row numbers in errors are 1-based and count data rows only (the header
/// is not row 1).
pub fn parse_series_csv<R: Read>(source: R) -> Result<Series, MonitorError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut observations = Vec::new();
    for (i, record) in reader.deserialize::<SeriesRow>().enumerate() {
        let row = record.map_err(|e| MonitorError::ParseError {
            row: i + 1,
            message: e.to_string(),
        })?;
        observations.push(Observation::new(row.time, row.height));
    }

    Series::new(observations)
}

/// Load a series from a CSV file on disk.
///
/// A missing file is reported as `DataFileNotFound` so the caller can halt
/// before any simulation starts.
pub fn load_series_csv(path: impl AsRef<Path>) -> Result<Series, MonitorError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MonitorError::DataFileNotFound(path.display().to_string()),
        _ => MonitorError::Io(format!("{}: {}", path.display(), e)),
    })?;
    parse_series_csv(file)
}

// ============================================================================
// Memoized loader
// ============================================================================

/// Loads one series file at most once per session.
///
/// The first successful `load` reads and parses the file; later calls hand
/// out the same shared series. Failed loads are not cached.
pub struct SeriesLoader {
    path: PathBuf,
    cached: Mutex<Option<Arc<Series>>>,
}

impl SeriesLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached series, reading the file on first use.
    pub fn load(&self) -> Result<Arc<Series>, MonitorError> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(series) = cached.as_ref() {
            return Ok(Arc::clone(series));
        }

        let display = self.path.display().to_string();
        let series = Arc::new(load_series_csv(&self.path)?);
        logging::info(
            Component::Loader,
            Some(&display),
            &format!("Loaded {} observations", series.len()),
        );
        *cached = Some(Arc::clone(&series));
        Ok(series)
    }

    /// True once a series has been loaded and not invalidated.
    pub fn is_loaded(&self) -> bool {
        self.cached.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Drops the cached series; the next `load` reads the file again.
    pub fn invalidate(&self) {
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_series() {
        let csv = "Time,Height\n0,0.0\n1,-1.5\n2,-1.0\n";
        let series = parse_series_csv(csv.as_bytes()).expect("valid csv should parse");
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(1), Some(&Observation::new(1.0, -1.5)));
    }

    #[test]
    fn test_extra_columns_and_whitespace_are_tolerated() {
        let csv = "Well, Time , Height\nA, 0.5 , -0.25\nA,1.5,-0.75\n";
        let series = parse_series_csv(csv.as_bytes()).expect("extra column should be ignored");
        assert_eq!(series.first(), &Observation::new(0.5, -0.25));
        assert_eq!(series.last(), &Observation::new(1.5, -0.75));
    }

    #[test]
    fn test_header_only_is_empty_series() {
        let result = parse_series_csv("Time,Height\n".as_bytes());
        assert_eq!(result, Err(MonitorError::EmptySeries));
    }

    #[test]
    fn test_non_numeric_height_reports_row_number() {
        let csv = "Time,Height\n0,0.1\n1,abc\n";
        match parse_series_csv(csv.as_bytes()) {
            Err(MonitorError::ParseError { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_height_column_is_parse_error() {
        let csv = "Time,Depth\n0,0.1\n";
        assert!(matches!(
            parse_series_csv(csv.as_bytes()),
            Err(MonitorError::ParseError { row: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_data_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            load_series_csv(&path),
            Err(MonitorError::DataFileNotFound(_))
        ));
    }

    #[test]
    fn test_loader_memoizes_and_invalidates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Time,Height\n0,0.2\n1,0.1").unwrap();

        let loader = SeriesLoader::new(file.path());
        assert!(!loader.is_loaded());
        let first = loader.load().expect("first load should succeed");
        let second = loader.load().expect("cached load should succeed");
        assert!(Arc::ptr_eq(&first, &second), "second load should reuse the cached series");

        loader.invalidate();
        assert!(!loader.is_loaded());
        let third = loader.load().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
