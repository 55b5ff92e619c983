//! Markers: a frequency of interest in a sweep and its readout.
//!
//! A marker is either *unresolved* (no frequency, no data, or a frequency
//! outside the sweep) or *resolved* to one sample index, in which case the
//! full [`MetricSet`](fields::MetricSet) for that sample is available.
//! Changing the frequency, the data, or the numeric settings re-resolves the
//! marker and then notifies every registered listener.
pub mod fields;
pub mod readout;

use std::fmt;

use crate::color::MarkerColor;
use crate::config::MarkerSettings;
use crate::data::model::SweepSnapshot;
use crate::data::resolver::{Resolution, resolve};
use crate::frequency::parse_frequency;

use fields::{MetricKey, MetricSet, MetricValue, default_field_selection};
use readout::{ReadoutOptions, compute_metrics};

/// Callback run after every re-resolution of a marker.
pub type Listener = Box<dyn FnMut(&Marker)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Unresolved,
    Resolved,
}

pub struct Marker {
    name: String,
    color: MarkerColor,
    /// 0 means "no frequency set".
    target_freq: u64,
    resolution: Resolution,
    field_selection: Vec<MetricKey>,
    options: ReadoutOptions,
    sweep: SweepSnapshot,
    metrics: MetricSet,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("name", &self.name)
            .field("color", &self.color)
            .field("target_freq", &self.target_freq)
            .field("resolution", &self.resolution)
            .field("field_selection", &self.field_selection)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Marker {
    /// Create an unresolved marker. An unparseable `frequency` leaves the
    /// marker unset.
    pub fn new(name: impl Into<String>, color: MarkerColor, frequency: &str) -> Self {
        let name = name.into();
        let target_freq = parse_frequency(frequency).unwrap_or_else(|e| {
            log::warn!("{name}: {e}, leaving the frequency unset");
            0
        });
        Self {
            name,
            color,
            target_freq,
            resolution: Resolution::UNRESOLVED,
            field_selection: default_field_selection(),
            options: ReadoutOptions::default(),
            sweep: SweepSnapshot::default(),
            metrics: MetricSet::default(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> MarkerColor {
        self.color
    }

    pub fn set_color(&mut self, color: MarkerColor) {
        self.color = color;
    }

    pub fn target_freq(&self) -> u64 {
        self.target_freq
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn resolved_index(&self) -> Option<usize> {
        self.resolution.index
    }

    pub fn prev_freq(&self) -> Option<u64> {
        self.resolution.prev_freq
    }

    pub fn next_freq(&self) -> Option<u64> {
        self.resolution.next_freq
    }

    pub fn state(&self) -> MarkerState {
        if self.resolution.is_resolved() {
            MarkerState::Resolved
        } else {
            MarkerState::Unresolved
        }
    }

    pub fn sweep(&self) -> &SweepSnapshot {
        &self.sweep
    }

    pub fn field_selection(&self) -> &[MetricKey] {
        &self.field_selection
    }

    /// Replace the displayed fields. Repeated keys keep their first position.
    /// Does not re-resolve or notify.
    pub fn set_field_selection(&mut self, fields: &[MetricKey]) {
        self.field_selection.clear();
        for &key in fields {
            if !self.field_selection.contains(&key) {
                self.field_selection.push(key);
            }
        }
    }

    /// Register a listener for update notifications.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Marker) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Set the target frequency from user text such as `"14.2M"`.
    pub fn set_frequency(&mut self, frequency: &str) {
        let hz = parse_frequency(frequency).unwrap_or_else(|e| {
            log::warn!("{}: {e}, clearing the frequency", self.name);
            0
        });
        self.set_frequency_hz(hz);
    }

    pub fn set_frequency_hz(&mut self, hz: u64) {
        self.target_freq = hz;
        self.update();
    }

    /// Resolve against a fresh sweep at the current frequency.
    pub fn load_data(&mut self, sweep: SweepSnapshot) {
        self.sweep = sweep;
        self.update();
    }

    /// Adopt settings: field selection, reference impedance and return-loss
    /// sign. Recomputes the readout.
    pub fn apply_settings(&mut self, settings: &MarkerSettings) {
        self.adopt_settings(settings);
        self.update();
    }

    /// Take over `settings` without re-resolving; the next frequency or data
    /// change picks them up.
    pub(crate) fn adopt_settings(&mut self, settings: &MarkerSettings) {
        self.set_field_selection(&settings.fields);
        self.options = ReadoutOptions {
            reference_impedance: settings.reference_impedance,
            returnloss_is_positive: settings.returnloss_is_positive,
        };
    }

    /// All metrics, or `None` while unresolved.
    pub fn metrics(&self) -> Option<&MetricSet> {
        self.resolution.is_resolved().then_some(&self.metrics)
    }

    /// Selected fields in display order. Every value is unavailable while the
    /// marker is unresolved.
    pub fn readout(&self) -> Vec<(MetricKey, MetricValue)> {
        self.metrics.select(&self.field_selection)
    }

    fn update(&mut self) {
        self.resolution = resolve(self.target_freq, &self.sweep.s11);
        self.metrics = match self.resolution.index {
            Some(index) => compute_metrics(&self.sweep.s11, &self.sweep.s21, index, &self.options),
            None => {
                if self.target_freq != 0 && !self.sweep.is_empty() {
                    log::debug!("{} at {} Hz is unresolved", self.name, self.target_freq);
                }
                MetricSet::default()
            }
        };
        self.notify();
    }

    fn notify(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(self);
        }
        self.listeners = listeners;
    }
}
