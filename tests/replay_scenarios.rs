/// Integration tests for the replay engine and forecast.
///
/// These walk the public API the way the binary does: build a series,
/// construct the engine for a policy, pull steps, then project the forecast.
///
/// Both alert policies are exercised explicitly. The default configuration
/// uses `AlertPolicy::Reevaluate`.

use gwmon_service::alert::{classify, find_shutdown_index, AlertPolicy};
use gwmon_service::analysis::{forecast, MonitorEngine, StatusKind};
use gwmon_service::config::{resolve, ConfigOverrides, FileConfig};
use gwmon_service::model::{Classification, Observation, Series};
use gwmon_service::variants::{find_variant, Labels, DEFAULT_VARIANT};

const THRESHOLD: f64 = -1.2;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn labels() -> Labels {
    Labels::from(&find_variant(DEFAULT_VARIANT).unwrap().labels)
}

fn series(points: &[(f64, f64)]) -> Series {
    Series::new(points.iter().map(|&(t, h)| Observation::new(t, h)).collect()).unwrap()
}

fn dip_and_recover() -> Series {
    series(&[(0.0, 0.0), (1.0, -1.5), (2.0, -1.0)])
}

// ---------------------------------------------------------------------------
// Dip and recovery
// ---------------------------------------------------------------------------

#[test]
fn test_dip_and_recover_shutdown_index() {
    assert_eq!(find_shutdown_index(&dip_and_recover(), THRESHOLD), 1);
}

#[test]
fn test_dip_and_recover_under_reevaluate_policy() {
    let labels = labels();
    let s = dip_and_recover();
    let engine = MonitorEngine::new(&s, THRESHOLD, AlertPolicy::Reevaluate, &labels);
    let steps: Vec<_> = engine.replay().collect();

    assert_eq!(steps[0].status.kind, StatusKind::Safe);
    assert!(steps[0].snapshot.shutdown_marker.is_none());

    assert_eq!(steps[1].status.kind, StatusKind::Alert);
    assert_eq!(steps[1].snapshot.shutdown_marker, Some(Observation::new(1.0, -1.5)));

    // Recovery clears the alert.
    assert_eq!(steps[2].status.kind, StatusKind::Safe);
    assert!(steps[2].snapshot.past_shutdown);
    assert!(steps[2].snapshot.shutdown_marker.is_none());
}

#[test]
fn test_dip_and_recover_under_latched_policy() {
    let labels = labels();
    let s = dip_and_recover();
    let engine = MonitorEngine::new(&s, THRESHOLD, AlertPolicy::Latched, &labels);
    let steps: Vec<_> = engine.replay().collect();

    assert_eq!(steps[0].status.kind, StatusKind::Safe);
    assert_eq!(steps[1].status.kind, StatusKind::Alert);
    // Recovery is ignored once latched; the marker stays on the crossing point.
    assert_eq!(steps[2].status.kind, StatusKind::Alert);
    assert_eq!(steps[2].snapshot.shutdown_marker, Some(Observation::new(1.0, -1.5)));
    // The point itself is still classified by its own height.
    assert_eq!(steps[2].class, Classification::Safe);
}

#[test]
fn test_default_configuration_reevaluates() {
    let config = resolve(&FileConfig::default(), &ConfigOverrides::default(), &ConfigOverrides::default())
        .expect("defaults should validate");
    assert_eq!(config.alert_policy, AlertPolicy::Reevaluate);
    assert_eq!(config.threshold, THRESHOLD);
}

// ---------------------------------------------------------------------------
// Never crossing
// ---------------------------------------------------------------------------

#[test]
fn test_series_above_threshold_never_emits_marker() {
    let labels = labels();
    let s = series(&[(0.0, 0.4), (1.0, -0.2), (2.0, -1.19), (3.0, 0.0)]);
    assert_eq!(find_shutdown_index(&s, THRESHOLD), s.len());

    for policy in [AlertPolicy::Reevaluate, AlertPolicy::Latched] {
        let engine = MonitorEngine::new(&s, THRESHOLD, policy, &labels);
        for step in engine.replay() {
            assert!(step.snapshot.shutdown_marker.is_none(), "marker at step {}", step.index);
            assert!(!step.snapshot.past_shutdown);
            assert_eq!(step.status.kind, StatusKind::Safe);
        }
        assert_eq!(engine.replay().count(), 4);
    }
}

// ---------------------------------------------------------------------------
// Shutdown index properties
// ---------------------------------------------------------------------------

#[test]
fn test_shutdown_index_is_invariant_to_rows_after_it() {
    let prefix = [(0.0, 0.2), (1.0, -0.9), (2.0, -1.3)];
    let tails: [&[(f64, f64)]; 3] = [&[], &[(3.0, 4.0)], &[(3.0, -5.0), (4.0, 1.0), (5.0, -1.2)]];
    for tail in tails {
        let mut points = prefix.to_vec();
        points.extend_from_slice(tail);
        assert_eq!(find_shutdown_index(&series(&points), THRESHOLD), 2);
    }
}

#[test]
fn test_classification_does_not_depend_on_position() {
    let labels = labels();
    let s = series(&[(0.0, -1.3), (1.0, 0.0), (2.0, -1.3), (3.0, 0.0)]);
    let engine = MonitorEngine::new(&s, THRESHOLD, AlertPolicy::Latched, &labels);
    for step in engine.replay() {
        assert_eq!(step.class, classify(step.observation.height, THRESHOLD));
    }
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[test]
fn test_forecast_from_reference_point() {
    let f = forecast(&Observation::new(100.0, 0.0), 30.0, 50);
    let (high, neutral, low) = (f.high.heights(), f.neutral.heights(), f.low.heights());

    assert_eq!(high.len(), 50);
    assert_eq!(neutral.len(), 50);
    assert_eq!(low.len(), 50);
    assert_eq!((high[0], neutral[0], low[0]), (0.0, 0.0, 0.0));
    assert!((high[49] - low[49] - 3.0).abs() < 1e-12);
}

#[test]
fn test_forecast_branches_are_ordered_from_series_end() {
    let s = series(&[(0.0, 0.1), (7.5, -2.4)]);
    let f = forecast(s.last(), 30.0, 50);
    for i in 0..50 {
        assert!(f.high.points[i].height >= f.neutral.points[i].height);
        assert!(f.neutral.points[i].height >= f.low.points[i].height);
        assert!(f.neutral.points[i].time >= 7.5);
    }
}
