//! Runtime configuration.
//!
//! A run is configured in layers, each overriding the previous one:
//!
//! 1. the selected variant preset (`variants::VARIANT_REGISTRY`)
//! 2. an optional TOML file (`gwmon.toml` by default)
//! 3. environment variables, with `.env` loaded through `dotenv`
//! 4. command line flags
//!
//! The variant name itself is picked with the same precedence before any
//! other layer is applied, since it supplies the defaults.
//!
//! Example `gwmon.toml`:
//!
//! ```toml
//! [monitor]
//! variant = "latched"
//! delay_secs = 0.02
//! data_file = "data/groundwater_level_modified.csv"
//!
//! [labels]
//! alert = "Pump tripped"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::alert::AlertPolicy;
use crate::analysis::{DEFAULT_HORIZON, DEFAULT_NUM_POINTS};
use crate::logging::LogLevel;
use crate::model::{MonitorError, DEFAULT_DATA_FILE};
use crate::variants::{find_variant, Labels, Palette, DEFAULT_VARIANT};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gwmon.toml";

/// Logo shown next to the legend. Optional.
pub const DEFAULT_LOGO_FILE: &str = "DT.png";

/// Accepted range for the per-step delay, in seconds.
pub const MIN_DELAY_SECS: f64 = 0.001;
pub const MAX_DELAY_SECS: f64 = 0.5;

pub const ENV_VARIANT: &str = "GWMON_VARIANT";
pub const ENV_DATA_FILE: &str = "GWMON_DATA_FILE";
pub const ENV_DELAY: &str = "GWMON_DELAY";
pub const ENV_LOG_FILE: &str = "GWMON_LOG_FILE";

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub variant: String,
    pub threshold: f64,
    pub delay_secs: f64,
    pub alert_policy: AlertPolicy,
    pub labels: Labels,
    pub palette: Palette,
    pub data_file: PathBuf,
    pub logo_file: PathBuf,
    pub horizon: f64,
    pub num_points: usize,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl MonitorConfig {
    /// Defaults of a registered variant.
    pub fn for_variant(name: &str) -> Result<Self, MonitorError> {
        let variant = find_variant(name).ok_or_else(|| MonitorError::UnknownVariant(name.to_string()))?;
        Ok(MonitorConfig {
            variant: variant.name.to_string(),
            threshold: variant.threshold,
            delay_secs: variant.default_delay_secs,
            alert_policy: variant.alert_policy,
            labels: Labels::from(&variant.labels),
            palette: variant.palette,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            logo_file: PathBuf::from(DEFAULT_LOGO_FILE),
            horizon: DEFAULT_HORIZON,
            num_points: DEFAULT_NUM_POINTS,
            log_level: LogLevel::Warning,
            log_file: None,
        })
    }

    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.delay_secs)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if !(MIN_DELAY_SECS..=MAX_DELAY_SECS).contains(&self.delay_secs) {
            return Err(MonitorError::InvalidConfig(format!(
                "delay_secs must be within [{}, {}], got {}",
                MIN_DELAY_SECS, MAX_DELAY_SECS, self.delay_secs
            )));
        }
        if !self.threshold.is_finite() {
            return Err(MonitorError::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "horizon must be positive, got {}",
                self.horizon
            )));
        }
        if self.num_points < 2 {
            return Err(MonitorError::InvalidConfig(format!(
                "num_points must be at least 2, got {}",
                self.num_points
            )));
        }
        Ok(())
    }

    fn apply(&mut self, layer: &ConfigOverrides) {
        if let Some(v) = layer.threshold {
            self.threshold = v;
        }
        if let Some(v) = layer.delay_secs {
            self.delay_secs = v;
        }
        if let Some(v) = layer.alert_policy {
            self.alert_policy = v;
        }
        if let Some(ref v) = layer.data_file {
            self.data_file = v.clone();
        }
        if let Some(ref v) = layer.logo_file {
            self.logo_file = v.clone();
        }
        if let Some(v) = layer.horizon {
            self.horizon = v;
        }
        if let Some(v) = layer.num_points {
            self.num_points = v;
        }
        if let Some(v) = layer.log_level {
            self.log_level = v;
        }
        if let Some(ref v) = layer.log_file {
            self.log_file = Some(v.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// One configuration layer. Unset fields leave the value below untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub variant: Option<String>,
    pub threshold: Option<f64>,
    pub delay_secs: Option<f64>,
    pub alert_policy: Option<AlertPolicy>,
    pub data_file: Option<PathBuf>,
    pub logo_file: Option<PathBuf>,
    pub horizon: Option<f64>,
    pub num_points: Option<usize>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<String>,
}

/// Wording overrides from the `[labels]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelOverrides {
    pub title: Option<String>,
    pub safe: Option<String>,
    pub alert: Option<String>,
    pub forecasting: Option<String>,
    pub complete: Option<String>,
    pub legend_safe: Option<String>,
    pub legend_unsafe: Option<String>,
    pub legend_shutdown: Option<String>,
    pub high: Option<String>,
    pub neutral: Option<String>,
    pub low: Option<String>,
}

impl LabelOverrides {
    fn apply(&self, labels: &mut Labels) {
        let pairs = [
            (&self.title, &mut labels.title),
            (&self.safe, &mut labels.safe),
            (&self.alert, &mut labels.alert),
            (&self.forecasting, &mut labels.forecasting),
            (&self.complete, &mut labels.complete),
            (&self.legend_safe, &mut labels.legend_safe),
            (&self.legend_unsafe, &mut labels.legend_unsafe),
            (&self.legend_shutdown, &mut labels.legend_shutdown),
            (&self.high, &mut labels.high),
            (&self.neutral, &mut labels.neutral),
            (&self.low, &mut labels.low),
        ];
        for (value, slot) in pairs {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
    }
}

/// Contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub monitor: ConfigOverrides,
    pub labels: Option<LabelOverrides>,
    /// Replaces the variant palette as a whole.
    pub palette: Option<Palette>,
}

/// Parse a config file body.
pub fn parse_file_config(text: &str) -> Result<FileConfig, MonitorError> {
    toml::from_str(text).map_err(|e| MonitorError::InvalidConfig(e.to_string()))
}

/// Read a config file.
///
/// With `required == false` a missing file yields an empty config, which is
/// how the default `gwmon.toml` lookup behaves.
pub fn load_file_config(path: &Path, required: bool) -> Result<FileConfig, MonitorError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_file_config(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(FileConfig::default()),
        Err(e) => Err(MonitorError::InvalidConfig(format!("{}: {}", path.display(), e))),
    }
}

/// Build the environment layer from a variable lookup.
///
/// Takes the lookup as a closure so tests do not have to touch the process
/// environment.
pub fn overrides_from_vars<F>(lookup: F) -> Result<ConfigOverrides, MonitorError>
where
    F: Fn(&str) -> Option<String>,
{
    let delay_secs = match lookup(ENV_DELAY) {
        Some(raw) => Some(raw.trim().parse::<f64>().map_err(|e| {
            MonitorError::InvalidConfig(format!("{}='{}': {}", ENV_DELAY, raw, e))
        })?),
        None => None,
    };

    Ok(ConfigOverrides {
        variant: lookup(ENV_VARIANT),
        delay_secs,
        data_file: lookup(ENV_DATA_FILE).map(PathBuf::from),
        log_file: lookup(ENV_LOG_FILE),
        ..ConfigOverrides::default()
    })
}

/// Build the environment layer from the process environment.
pub fn overrides_from_env() -> Result<ConfigOverrides, MonitorError> {
    overrides_from_vars(|key| std::env::var(key).ok())
}

/// Combine all layers into a validated configuration.
pub fn resolve(
    file: &FileConfig,
    env: &ConfigOverrides,
    cli: &ConfigOverrides,
) -> Result<MonitorConfig, MonitorError> {
    let variant = cli
        .variant
        .as_deref()
        .or(env.variant.as_deref())
        .or(file.monitor.variant.as_deref())
        .unwrap_or(DEFAULT_VARIANT);

    let mut config = MonitorConfig::for_variant(variant)?;
    config.apply(&file.monitor);
    if let Some(ref labels) = file.labels {
        labels.apply(&mut config.labels);
    }
    if let Some(palette) = file.palette {
        config.palette = palette;
    }
    config.apply(env);
    config.apply(cli);

    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env() -> ConfigOverrides {
        ConfigOverrides::default()
    }

    #[test]
    fn test_defaults_come_from_default_variant() {
        let config = resolve(&FileConfig::default(), &no_env(), &no_env()).unwrap();
        assert_eq!(config.variant, "classic");
        assert_eq!(config.threshold, -1.2);
        assert_eq!(config.delay_secs, 0.1);
        assert_eq!(config.alert_policy, AlertPolicy::Reevaluate);
        assert_eq!(config.data_file, PathBuf::from("groundwater_level_modified.csv"));
        assert_eq!(config.num_points, 50);
    }

    #[test]
    fn test_file_layer_overrides_variant_and_labels() {
        let file = parse_file_config(
            r#"
            [monitor]
            variant = "latched"
            delay_secs = 0.02

            [labels]
            alert = "Pump tripped"
            "#,
        )
        .expect("valid toml should parse");
        let config = resolve(&file, &no_env(), &no_env()).unwrap();
        assert_eq!(config.variant, "latched");
        assert_eq!(config.alert_policy, AlertPolicy::Latched);
        assert_eq!(config.delay_secs, 0.02);
        assert_eq!(config.labels.alert, "Pump tripped");
        assert_eq!(config.labels.safe, "Pump running");
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let file = parse_file_config("[monitor]\ndelay_secs = 0.2\nvariant = \"fr\"\n").unwrap();
        let env = ConfigOverrides {
            delay_secs: Some(0.3),
            variant: Some("field".to_string()),
            ..ConfigOverrides::default()
        };
        let cli = ConfigOverrides {
            delay_secs: Some(0.4),
            ..ConfigOverrides::default()
        };
        let config = resolve(&file, &env, &cli).unwrap();
        assert_eq!(config.delay_secs, 0.4);
        assert_eq!(config.variant, "field");
    }

    #[test]
    fn test_delay_outside_range_is_rejected() {
        for delay in [0.0, 0.0005, 0.51, 2.0] {
            let cli = ConfigOverrides {
                delay_secs: Some(delay),
                ..ConfigOverrides::default()
            };
            let result = resolve(&FileConfig::default(), &no_env(), &cli);
            assert!(
                matches!(result, Err(MonitorError::InvalidConfig(_))),
                "delay {} should be rejected",
                delay
            );
        }
    }

    #[test]
    fn test_delay_range_ends_are_accepted() {
        for delay in [MIN_DELAY_SECS, MAX_DELAY_SECS] {
            let cli = ConfigOverrides {
                delay_secs: Some(delay),
                ..ConfigOverrides::default()
            };
            assert!(resolve(&FileConfig::default(), &no_env(), &cli).is_ok());
        }
    }

    #[test]
    fn test_unknown_variant_is_reported() {
        let cli = ConfigOverrides {
            variant: Some("neon".to_string()),
            ..ConfigOverrides::default()
        };
        assert_eq!(
            resolve(&FileConfig::default(), &no_env(), &cli),
            Err(MonitorError::UnknownVariant("neon".to_string()))
        );
    }

    #[test]
    fn test_unknown_file_keys_are_rejected() {
        assert!(parse_file_config("[monitor]\nspeed = 3\n").is_err());
    }

    #[test]
    fn test_env_layer_parses_delay_and_paths() {
        let vars: HashMap<&str, &str> = [(ENV_DELAY, " 0.05 "), (ENV_DATA_FILE, "/tmp/levels.csv")]
            .into_iter()
            .collect();
        let env = overrides_from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(env.delay_secs, Some(0.05));
        assert_eq!(env.data_file, Some(PathBuf::from("/tmp/levels.csv")));
        assert_eq!(env.variant, None);
    }

    #[test]
    fn test_env_layer_rejects_non_numeric_delay() {
        let result = overrides_from_vars(|k| (k == ENV_DELAY).then(|| "fast".to_string()));
        assert!(matches!(result, Err(MonitorError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_optional_config_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gwmon.toml");
        assert_eq!(load_file_config(&path, false), Ok(FileConfig::default()));
        assert!(load_file_config(&path, true).is_err());
    }
}
