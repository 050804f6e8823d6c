/// Series ingestion.
///
/// Submodules:
/// - `csv_series` — CSV parsing and the session-scoped memoized loader.

pub mod csv_series;

pub use csv_series::{load_series_csv, parse_series_csv, SeriesLoader};
