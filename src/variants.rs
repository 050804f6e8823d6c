/// Dashboard variant registry.
///
/// The monitor ships with four presentation presets that share one engine
/// and differ only in wording, palette, default pacing and the alert policy
/// applied after the shutdown point. This is the single source of truth for
/// those presets; configuration starts from one of them and layers overrides
/// on top.

use crate::alert::AlertPolicy;
use crate::model::DEFAULT_THRESHOLD_M;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Terminal colors available to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Gray,
    Red,
    Blue,
    Orange,
    Yellow,
    Cyan,
    Magenta,
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        use crossterm::style::Color as Term;
        match color {
            Color::Green => Term::Green,
            Color::Gray => Term::DarkGrey,
            Color::Red => Term::Red,
            Color::Blue => Term::Blue,
            Color::Orange => Term::AnsiValue(208),
            Color::Yellow => Term::Yellow,
            Color::Cyan => Term::Cyan,
            Color::Magenta => Term::Magenta,
        }
    }
}

/// Colors for every element a chart can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Palette {
    pub safe: Color,
    pub unsafe_point: Color,
    pub shutdown_marker: Color,
    pub threshold_line: Color,
    pub high: Color,
    pub neutral: Color,
    pub low: Color,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Static wording of a preset. See [`Labels`] for the owned, overridable form.
#[derive(Debug, Clone, Copy)]
pub struct LabelSet {
    pub title: &'static str,
    pub safe: &'static str,
    pub alert: &'static str,
    pub forecasting: &'static str,
    pub complete: &'static str,
    pub legend_safe: &'static str,
    pub legend_unsafe: &'static str,
    pub legend_shutdown: &'static str,
    pub high: &'static str,
    pub neutral: &'static str,
    pub low: &'static str,
}

/// Display strings used by status messages, legend and forecast chart.
///
/// Step messages are built as `"<prefix> (t=<time>) : <text>"`; `safe` and
/// `alert` hold the text part.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Labels {
    pub title: String,
    pub safe: String,
    pub alert: String,
    pub forecasting: String,
    pub complete: String,
    pub legend_safe: String,
    pub legend_unsafe: String,
    pub legend_shutdown: String,
    pub high: String,
    pub neutral: String,
    pub low: String,
}

impl From<&LabelSet> for Labels {
    fn from(set: &LabelSet) -> Self {
        Labels {
            title: set.title.to_string(),
            safe: set.safe.to_string(),
            alert: set.alert.to_string(),
            forecasting: set.forecasting.to_string(),
            complete: set.complete.to_string(),
            legend_safe: set.legend_safe.to_string(),
            legend_unsafe: set.legend_unsafe.to_string(),
            legend_shutdown: set.legend_shutdown.to_string(),
            high: set.high.to_string(),
            neutral: set.neutral.to_string(),
            low: set.low.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Variant metadata
// ---------------------------------------------------------------------------

/// One dashboard preset.
pub struct Variant {
    /// Lookup key used by `--variant` and the config file.
    pub name: &'static str,
    /// Human-readable summary shown by `gwmon variants`.
    pub description: &'static str,
    pub threshold: f64,
    /// Seconds between replay steps.
    pub default_delay_secs: f64,
    pub alert_policy: AlertPolicy,
    pub labels: LabelSet,
    pub palette: Palette,
}

pub const DEFAULT_VARIANT: &str = "classic";

pub static VARIANT_REGISTRY: &[Variant] = &[
    Variant {
        name: "classic",
        description: "Green/gray/red monitor. Status follows every reading, \
                      so a recovery above the threshold restarts the pump.",
        threshold: DEFAULT_THRESHOLD_M,
        default_delay_secs: 0.1,
        alert_policy: AlertPolicy::Reevaluate,
        labels: LabelSet {
            title: "Digital Twin: Groundwater Level Monitoring",
            safe: "Level safe",
            alert: "Level too low! PUMP STOPPED",
            forecasting: "Computing future scenarios...",
            complete: "Simulation complete.",
            legend_safe: "Green: safe level (> threshold)",
            legend_unsafe: "Gray: below threshold (recovery)",
            legend_shutdown: "Red: shutdown point",
            high: "High recharge (forecast)",
            neutral: "Stable (forecast)",
            low: "Drought (forecast)",
        },
        palette: Palette {
            safe: Color::Green,
            unsafe_point: Color::Gray,
            shutdown_marker: Color::Red,
            threshold_line: Color::Red,
            high: Color::Green,
            neutral: Color::Blue,
            low: Color::Orange,
        },
    },
    Variant {
        name: "latched",
        description: "Pump lockout. Once the shutdown point is reached the \
                      alert stays raised until the replay ends.",
        threshold: DEFAULT_THRESHOLD_M,
        default_delay_secs: 0.05,
        alert_policy: AlertPolicy::Latched,
        labels: LabelSet {
            title: "Digital Twin: Groundwater Pump Lockout",
            safe: "Pump running",
            alert: "Critical level reached, pump locked out",
            forecasting: "Projecting future levels...",
            complete: "Replay finished.",
            legend_safe: "Green: pump running",
            legend_unsafe: "Orange: critical level",
            legend_shutdown: "Red: lockout point",
            high: "Recharge",
            neutral: "Stable",
            low: "Drought",
        },
        palette: Palette {
            safe: Color::Green,
            unsafe_point: Color::Orange,
            shutdown_marker: Color::Red,
            threshold_line: Color::Red,
            high: Color::Green,
            neutral: Color::Blue,
            low: Color::Orange,
        },
    },
    Variant {
        name: "field",
        description: "High-contrast palette for field laptops. Latches the \
                      alert after the first crossing.",
        threshold: DEFAULT_THRESHOLD_M,
        default_delay_secs: 0.05,
        alert_policy: AlertPolicy::Latched,
        labels: LabelSet {
            title: "Well Field Monitor",
            safe: "Water table OK",
            alert: "ALERT: water table below limit, pump off",
            forecasting: "Running scenarios...",
            complete: "Done.",
            legend_safe: "Cyan: above limit",
            legend_unsafe: "Yellow: below limit",
            legend_shutdown: "Magenta: pump shutdown",
            high: "Wet season",
            neutral: "Baseline",
            low: "Dry season",
        },
        palette: Palette {
            safe: Color::Cyan,
            unsafe_point: Color::Yellow,
            shutdown_marker: Color::Magenta,
            threshold_line: Color::Magenta,
            high: Color::Cyan,
            neutral: Color::Blue,
            low: Color::Yellow,
        },
    },
    Variant {
        name: "fr",
        description: "French-language dashboard. Status follows every reading.",
        threshold: DEFAULT_THRESHOLD_M,
        default_delay_secs: 0.1,
        alert_policy: AlertPolicy::Reevaluate,
        labels: LabelSet {
            title: "Digital Twin : Surveillance de Nappe Phréatique",
            safe: "Niveau Sûr",
            alert: "Niveau trop bas ! POMPE ARRÊTÉE",
            forecasting: "Calcul des scénarios futurs en cours...",
            complete: "Simulation terminée.",
            legend_safe: "Vert : Niveau Sûr (> Seuil)",
            legend_unsafe: "Gris : Sous le seuil (Récupération)",
            legend_shutdown: "Rouge : Point d'arrêt (Shutdown)",
            high: "Recharge Haute (Prédiction)",
            neutral: "Stable (Prédiction)",
            low: "Sécheresse (Prédiction)",
        },
        palette: Palette {
            safe: Color::Green,
            unsafe_point: Color::Gray,
            shutdown_marker: Color::Red,
            threshold_line: Color::Red,
            high: Color::Green,
            neutral: Color::Blue,
            low: Color::Orange,
        },
    },
];

/// Looks up a variant by name. Returns `None` if not found.
pub fn find_variant(name: &str) -> Option<&'static Variant> {
    VARIANT_REGISTRY.iter().find(|v| v.name == name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
