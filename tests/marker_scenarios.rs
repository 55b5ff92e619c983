use std::cell::RefCell;
use std::rc::Rc;

use num_complex::Complex64;
use tempfile::TempDir;

use vna_marker::data::loader::{load_file, save_file};
use vna_marker::rf::immittance::{DEFAULT_REFERENCE_IMPEDANCE, admittance, impedance};
use vna_marker::rf::metrics::vswr;
use vna_marker::state::example_snapshot;
use vna_marker::{
    ComplexSample, Marker, MarkerColor, MarkerSession, MarkerState, MetricKey, MetricValue,
    SweepSnapshot, resolve,
};

fn example_s11() -> Vec<ComplexSample> {
    example_snapshot().s11.to_vec()
}

#[test]
fn example_marker_resolves_and_reports_vswr() {
    let r = resolve(123_456_000, &example_s11());
    assert_eq!(r.index, Some(1));

    let mut marker = Marker::new("Example marker", MarkerColor::rgb(0, 128, 255), "123456000");
    marker.load_data(example_snapshot());
    let metrics = marker.metrics().expect("resolved");

    let mag = Complex64::new(0.90, -0.10).norm();
    let expected = (1.0 + mag) / (1.0 - mag);
    let got = metrics.get(MetricKey::Vswr).as_f64().unwrap();
    assert!((got - expected).abs() < 1e-12);
    assert!((got - 20.17).abs() < 0.01);
}

#[test]
fn example_beyond_the_sweep_is_unresolved() {
    let r = resolve(200_000_000, &example_s11());
    assert_eq!(r.index, None);
    assert_eq!(r.prev_freq, None);
    assert_eq!(r.next_freq, None);
}

#[test]
fn zero_frequency_never_resolves() {
    for n in 0..4 {
        let data: Vec<ComplexSample> = (1..=n).map(|i| ComplexSample::new(i, 0.0, 0.0)).collect();
        assert_eq!(resolve(0, &data).index, None);
    }
}

#[test]
fn unequal_s21_withholds_transmission_only() {
    let snapshot = SweepSnapshot::new(
        example_s11(),
        vec![
            ComplexSample::new(123_000_000, -0.25, 0.49),
            ComplexSample::new(124_000_000, -0.2, 0.5),
        ],
    );
    let mut marker = Marker::new("M", MarkerColor::rgb(1, 2, 3), "123456000");
    marker.set_field_selection(&MetricKey::ALL);
    marker.load_data(snapshot);

    for (key, value) in marker.readout() {
        if matches!(
            key,
            MetricKey::S21Gain | MetricKey::S21Phase | MetricKey::S21GroupDelay
        ) {
            assert_eq!(value, MetricValue::Unavailable, "{key}");
        } else {
            assert!(value.is_available(), "{key}");
        }
    }
}

#[test]
fn impedance_and_admittance_are_inverse() {
    for i in 0..20 {
        let gamma = Complex64::from_polar(0.05 * i as f64, 0.3 * i as f64);
        let z = impedance(gamma, DEFAULT_REFERENCE_IMPEDANCE).unwrap();
        let y = admittance(z).unwrap();
        assert!((y - z.inv()).norm() < 1e-12);
    }
}

#[test]
fn vswr_grows_with_reflection() {
    let values: Vec<f64> = (0..10)
        .map(|i| vswr(Complex64::new(0.0, i as f64 * 0.1)))
        .collect();
    assert_eq!(values[0], 1.0);
    assert!(values.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn session_notifies_each_marker_on_new_sweep() {
    let updates = Rc::new(RefCell::new(Vec::new()));
    let mut session = MarkerSession::default();
    for freq in ["123M", "124M"] {
        let log = Rc::clone(&updates);
        session.add_marker(freq).subscribe(move |m| {
            log.borrow_mut().push((m.name().to_string(), m.state()));
        });
    }

    session.set_sweep(example_snapshot());

    assert_eq!(
        *updates.borrow(),
        vec![
            ("Marker 1".to_string(), MarkerState::Resolved),
            ("Marker 2".to_string(), MarkerState::Resolved),
        ]
    );
}

#[test]
fn open_reactance_stays_distinct_from_missing_in_json() {
    // A matched load: Z = Z0, so there is no parallel reactance at all.
    let matched = SweepSnapshot::reflection_only(vec![
        ComplexSample::new(1_000_000, 0.0, 0.0),
        ComplexSample::new(2_000_000, 0.0, 0.0),
    ]);
    let mut marker = Marker::new("M", MarkerColor::rgb(0, 0, 0), "1M");
    marker.set_field_selection(&[MetricKey::ParLc, MetricKey::S21Gain]);
    marker.load_data(matched);

    let rows = marker.readout();
    assert_eq!(rows[0], (MetricKey::ParLc, MetricValue::Real(f64::INFINITY)));
    assert_eq!(rows[1], (MetricKey::S21Gain, MetricValue::Unavailable));

    let json: Vec<String> = rows
        .iter()
        .map(|(_, v)| serde_json::to_string(v).unwrap())
        .collect();
    assert_eq!(json, vec!["\"inf\"".to_string(), "null".to_string()]);
}

#[test]
fn saved_sweep_drives_a_marker() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("example.csv");
    save_file(&path, &example_snapshot()).unwrap();

    let mut session = MarkerSession::default();
    session.set_sweep(load_file(&path).unwrap());
    let marker = session.add_marker("123.456M");
    assert_eq!(marker.resolved_index(), Some(1));
    assert_eq!(marker.prev_freq(), Some(123_000_000));
    assert!(marker.metrics().unwrap().get(MetricKey::S21Gain).is_available());
}
