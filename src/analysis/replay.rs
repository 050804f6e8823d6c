//! Point-by-point replay of a recorded series.
//!
//! [`MonitorEngine`] classifies the whole series once, finds the shutdown
//! index, and hands out [`Replay`] iterators. Each iterator is a fresh pass
//! from the first observation; steps borrow the engine's classified points
//! so a snapshot costs no copying.
//!
//! Pacing is a separate adapter ([`Paced`]) so the engine itself never
//! sleeps and stays testable.

use std::time::Duration;

use crate::alert::{classify, find_shutdown_index, AlertPolicy};
use crate::model::{Classification, ClassifiedPoint, Observation, Series};
use crate::variants::Labels;

// ---------------------------------------------------------------------------
// Status messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum StatusKind {
    Safe,
    Alert,
    Forecasting,
    Complete,
}

/// Text for the status banner. Overwrites the previous banner when shown.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    /// Per-step banner: `"✅ (t=12.0) : Level safe"`.
    pub fn for_step(time: f64, alert: bool, labels: &Labels) -> Self {
        if alert {
            StatusMessage {
                kind: StatusKind::Alert,
                text: format!("🚨 (t={:.1}) : {}", time, labels.alert),
            }
        } else {
            StatusMessage {
                kind: StatusKind::Safe,
                text: format!("✅ (t={:.1}) : {}", time, labels.safe),
            }
        }
    }

    pub fn forecasting(labels: &Labels) -> Self {
        StatusMessage {
            kind: StatusKind::Forecasting,
            text: format!("🔮 {}", labels.forecasting),
        }
    }

    pub fn complete(labels: &Labels) -> Self {
        StatusMessage {
            kind: StatusKind::Complete,
            text: labels.complete.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Everything a chart needs to draw one replay step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'e> {
    /// Observations `0..=index`, each tagged with its classification.
    pub points: &'e [ClassifiedPoint],
    /// True when the step index is at or after the shutdown index.
    pub past_shutdown: bool,
    /// The observation at the shutdown index, present when the step is past
    /// shutdown and its banner is in alert.
    pub shutdown_marker: Option<Observation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep<'e> {
    pub index: usize,
    pub observation: Observation,
    pub class: Classification,
    pub alert: bool,
    pub snapshot: Snapshot<'e>,
    pub status: StatusMessage,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct MonitorEngine<'a> {
    policy: AlertPolicy,
    labels: &'a Labels,
    classified: Vec<ClassifiedPoint>,
    shutdown_index: usize,
}

impl<'a> MonitorEngine<'a> {
    pub fn new(series: &Series, threshold: f64, policy: AlertPolicy, labels: &'a Labels) -> Self {
        let classified = series
            .iter()
            .map(|obs| ClassifiedPoint {
                observation: *obs,
                class: classify(obs.height, threshold),
            })
            .collect();

        Self {
            policy,
            labels,
            classified,
            shutdown_index: find_shutdown_index(series, threshold),
        }
    }

    /// Number of steps a replay yields.
    pub fn step_count(&self) -> usize {
        self.classified.len()
    }

    /// Index of the first unsafe observation, or the series length.
    pub fn shutdown_index(&self) -> usize {
        self.shutdown_index
    }

    /// `None` when the series never crosses the threshold.
    pub fn shutdown(&self) -> Option<usize> {
        (self.shutdown_index < self.classified.len()).then_some(self.shutdown_index)
    }

    /// The whole series with classifications, as drawn on the final chart.
    pub fn classified(&self) -> &[ClassifiedPoint] {
        &self.classified
    }

    /// Starts a new pass from the first observation.
    pub fn replay(&self) -> Replay<'_> {
        Replay {
            engine: self,
            next_index: 0,
        }
    }

    fn step(&self, index: usize) -> ReplayStep<'_> {
        let point = self.classified[index];
        let past_shutdown = index >= self.shutdown_index;
        let alert = self.policy.is_alert(index, self.shutdown_index, point.class);
        let shutdown_marker = (past_shutdown && alert)
            .then(|| self.classified[self.shutdown_index].observation);

        ReplayStep {
            index,
            observation: point.observation,
            class: point.class,
            alert,
            snapshot: Snapshot {
                points: &self.classified[..=index],
                past_shutdown,
                shutdown_marker,
            },
            status: StatusMessage::for_step(point.observation.time, alert, self.labels),
        }
    }
}

/// Lazy, finite sequence of replay steps in temporal order.
pub struct Replay<'e> {
    engine: &'e MonitorEngine<'e>,
    next_index: usize,
}

impl<'e> Replay<'e> {
    /// Sleeps `delay` between consecutive steps.
    pub fn paced(self, delay: Duration) -> Paced<Self, fn(Duration)> {
        Paced::new(self, delay, std::thread::sleep as fn(Duration))
    }
}

impl<'e> Iterator for Replay<'e> {
    type Item = ReplayStep<'e>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.engine.step_count() {
            return None;
        }
        let step = self.engine.step(self.next_index);
        self.next_index += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.engine.step_count() - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Replay<'_> {}

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Iterator adapter that waits `delay` before every element but the first.
///
/// The wait happens when the consumer asks for the next element, so the
/// previous element has already been fully handled (drawn) by then.
pub struct Paced<I, S> {
    inner: I,
    delay: Duration,
    sleep: S,
    started: bool,
}

impl<I, S: FnMut(Duration)> Paced<I, S> {
    pub fn new(inner: I, delay: Duration, sleep: S) -> Self {
        Self {
            inner,
            delay,
            sleep,
            started: false,
        }
    }
}

impl<I: Iterator, S: FnMut(Duration)> Iterator for Paced<I, S> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if self.started && !self.delay.is_zero() {
            (self.sleep)(self.delay);
        }
        self.started = true;
        Some(item)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
