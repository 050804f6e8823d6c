//! Legend panel contents.
//!
//! Mirrors the dashboard sidebar: logo, threshold, color legend and the
//! simulation speed. The logo is cosmetic, so a missing file only produces
//! a warning.

use std::path::Path;

use crate::config::MonitorConfig;
use crate::logging::{self, Component};
use crate::variants::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub threshold: f64,
    pub delay_secs: f64,
    pub variant: String,
    pub entries: Vec<(Color, String)>,
    /// Path of the logo when it exists on disk.
    pub logo: Option<String>,
}

impl Legend {
    pub fn from_config(config: &MonitorConfig) -> Self {
        let labels = &config.labels;
        let palette = &config.palette;
        Legend {
            title: labels.title.clone(),
            threshold: config.threshold,
            delay_secs: config.delay_secs,
            variant: config.variant.clone(),
            entries: vec![
                (palette.safe, labels.legend_safe.clone()),
                (palette.unsafe_point, labels.legend_unsafe.clone()),
                (palette.shutdown_marker, labels.legend_shutdown.clone()),
            ],
            logo: check_logo(&config.logo_file),
        }
    }
}

/// Returns the logo path if the file exists, warning otherwise.
pub fn check_logo(path: &Path) -> Option<String> {
    let display = path.display().to_string();
    if path.is_file() {
        Some(display)
    } else {
        logging::warn(Component::Render, Some(&display), "Logo image not found, continuing without it");
        None
    }
}
