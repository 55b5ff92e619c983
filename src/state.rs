use crate::color::{MarkerColor, marker_color};
use crate::config::MarkerSettings;
use crate::data::model::{ComplexSample, SweepSnapshot};
use crate::marker::Marker;
use crate::marker::fields::MetricKey;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The markers of one measurement session and the sweep they share,
/// independent of any rendering.
#[derive(Debug, Default)]
pub struct MarkerSession {
    markers: Vec<Marker>,

    /// Most recent sweep (empty until data arrives).
    sweep: SweepSnapshot,

    /// Settings handed to every marker.
    settings: MarkerSettings,

    /// Running count used for default names and colours.
    created: usize,
}

impl MarkerSession {
    pub fn new(settings: MarkerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.markers.get_mut(index)
    }

    pub fn sweep(&self) -> &SweepSnapshot {
        &self.sweep
    }

    pub fn settings(&self) -> &MarkerSettings {
        &self.settings
    }

    /// Add a marker with the next default name and colour, resolved
    /// against the current sweep.
    pub fn add_marker(&mut self, frequency: &str) -> &mut Marker {
        let color = marker_color(self.created);
        self.created += 1;
        let name = format!("Marker {}", self.created);
        self.add_marker_with(name, color, frequency)
    }

    pub fn add_marker_with(
        &mut self,
        name: impl Into<String>,
        color: MarkerColor,
        frequency: &str,
    ) -> &mut Marker {
        let mut marker = Marker::new(name, color, frequency);
        marker.adopt_settings(&self.settings);
        marker.load_data(self.sweep.clone());
        self.markers.push(marker);
        let last = self.markers.len() - 1;
        &mut self.markers[last]
    }

    /// Remove and return the marker at `index`.
    pub fn remove_marker(&mut self, index: usize) -> Option<Marker> {
        (index < self.markers.len()).then(|| self.markers.remove(index))
    }

    /// Ingest a new sweep and re-resolve every marker against it.
    pub fn set_sweep(&mut self, sweep: SweepSnapshot) {
        log::info!(
            "Loaded sweep with {} S11 / {} S21 points for {} markers",
            sweep.s11.len(),
            sweep.s21.len(),
            self.markers.len()
        );
        for marker in &mut self.markers {
            marker.load_data(sweep.clone());
        }
        self.sweep = sweep;
    }

    /// Apply new settings to the session and all of its markers.
    pub fn apply_settings(&mut self, settings: MarkerSettings) {
        for marker in &mut self.markers {
            marker.apply_settings(&settings);
        }
        self.settings = settings;
    }

    /// Change only the displayed fields of every marker.
    pub fn set_field_selection(&mut self, fields: &[MetricKey]) {
        self.settings.fields = fields.to_vec();
        for marker in &mut self.markers {
            marker.set_field_selection(fields);
        }
    }

    /// A marker on fixed example data, for previewing a field selection
    /// before applying it.
    pub fn preview_marker(&self, fields: &[MetricKey]) -> Marker {
        let color = self
            .markers
            .first()
            .map(Marker::color)
            .unwrap_or_else(|| marker_color(0));
        let mut marker = Marker::new("Example marker", color, "123456000");
        marker.apply_settings(&self.settings);
        marker.set_field_selection(fields);
        marker.load_data(example_snapshot());
        marker
    }
}

/// Three-point example sweep used by [`MarkerSession::preview_marker`].
pub fn example_snapshot() -> SweepSnapshot {
    SweepSnapshot::new(
        vec![
            ComplexSample::new(123_000_000, 0.89, -0.11),
            ComplexSample::new(123_500_000, 0.9, -0.1),
            ComplexSample::new(124_000_000, 0.91, -0.95),
        ],
        vec![
            ComplexSample::new(123_000_000, -0.25, 0.49),
            ComplexSample::new(123_456_000, -0.3, 0.5),
            ComplexSample::new(124_000_000, -0.2, 0.5),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerState;

    #[test]
    fn markers_follow_the_session_sweep() {
        let mut session = MarkerSession::default();
        session.add_marker("123.456M");
        session.add_marker("200M");
        assert!(session.markers().iter().all(|m| m.state() == MarkerState::Unresolved));

        session.set_sweep(example_snapshot());
        assert_eq!(session.markers()[0].resolved_index(), Some(1));
        assert_eq!(session.markers()[1].resolved_index(), None);

        // Markers added later pick up the current sweep.
        let m = session.add_marker("123M");
        assert_eq!(m.resolved_index(), Some(0));
        assert_eq!(m.name(), "Marker 3");
    }

    #[test]
    fn default_names_and_colours_keep_counting_after_removal() {
        let mut session = MarkerSession::default();
        session.add_marker("");
        session.add_marker("");
        let removed = session.remove_marker(0).unwrap();
        assert_eq!(removed.name(), "Marker 1");
        assert!(session.remove_marker(5).is_none());

        let c = session.add_marker("").color();
        assert_eq!(session.markers()[1].name(), "Marker 3");
        assert_ne!(c, session.markers()[0].color());
    }

    #[test]
    fn settings_reach_every_marker() {
        let mut session = MarkerSession::default();
        session.add_marker("123456000");
        session.add_marker("123M");
        session.set_sweep(example_snapshot());

        session.set_field_selection(&[MetricKey::Vswr, MetricKey::S11Phase]);
        for m in session.markers() {
            assert_eq!(m.field_selection(), &[MetricKey::Vswr, MetricKey::S11Phase]);
        }

        session.apply_settings(MarkerSettings {
            reference_impedance: 75.0,
            ..MarkerSettings::default()
        });
        assert_eq!(session.settings().reference_impedance, 75.0);
        for m in session.markers() {
            assert_eq!(m.field_selection().len(), 12);
        }
    }

    #[test]
    fn preview_uses_example_data() {
        let session = MarkerSession::default();
        let preview = session.preview_marker(&[MetricKey::ActualFreq, MetricKey::S21Gain]);
        assert_eq!(preview.resolved_index(), Some(1));
        let rows = preview.readout();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|(_, v)| v.is_available()));
    }

    #[test]
    fn new_markers_start_with_session_settings() {
        let mut session = MarkerSession::default();
        session.set_sweep(example_snapshot());
        session.apply_settings(MarkerSettings {
            returnloss_is_positive: true,
            fields: vec![MetricKey::Vswr, MetricKey::ReturnLoss],
            ..MarkerSettings::default()
        });

        let m = session.add_marker("123456000");
        assert_eq!(m.state(), MarkerState::Resolved);
        assert_eq!(m.field_selection(), &[MetricKey::Vswr, MetricKey::ReturnLoss]);
        let rl = m.metrics().unwrap().get(MetricKey::ReturnLoss).as_f64().unwrap();
        assert!(rl > 0.0);
    }
}
