use num_complex::Complex64;

use crate::data::model::ComplexSample;
use crate::rf::immittance::{self, ReactiveElement};
use crate::rf::metrics;

use super::fields::{MetricKey, MetricSet, MetricValue};

/// Numeric options that change computed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutOptions {
    pub reference_impedance: f64,
    pub returnloss_is_positive: bool,
}

impl Default for ReadoutOptions {
    fn default() -> Self {
        Self {
            reference_impedance: immittance::DEFAULT_REFERENCE_IMPEDANCE,
            returnloss_is_positive: false,
        }
    }
}

/// Compute every metric for the sample at `index`.
///
/// Each failed conversion leaves only its own keys unavailable. Transmission
/// keys are filled in only when `s21` has exactly as many points as `s11`.
pub fn compute_metrics(
    s11: &[ComplexSample],
    s21: &[ComplexSample],
    index: usize,
    options: &ReadoutOptions,
) -> MetricSet {
    let mut set = MetricSet::default();
    let Some(point) = s11.get(index) else {
        return set;
    };
    let gamma = point.coefficient;

    set.insert(MetricKey::ActualFreq, MetricValue::Real(point.freq as f64));

    match immittance::impedance(gamma, options.reference_impedance) {
        Ok(z) => insert_immittance(&mut set, z, point.freq),
        Err(e) => log::debug!("{e} at {} Hz", point.freq),
    }

    set.insert(MetricKey::Vswr, MetricValue::Real(metrics::vswr(gamma)));
    set.insert(
        MetricKey::ReturnLoss,
        MetricValue::Real(metrics::return_loss_db(gamma, options.returnloss_is_positive)),
    );
    set.insert(MetricKey::S11Phase, MetricValue::Real(metrics::phase_degrees(gamma)));
    set.insert(MetricKey::S11GroupDelay, metrics::group_delay(s11, index).into());

    if s21.len() != s11.len() {
        if !s21.is_empty() {
            log::warn!(
                "S21 has {} points but S11 has {}; skipping transmission metrics",
                s21.len(),
                s11.len()
            );
        }
        return set;
    }

    let through = s21[index].coefficient;
    set.insert(MetricKey::S21Gain, MetricValue::Real(metrics::gain_db(through)));
    set.insert(MetricKey::S21Phase, MetricValue::Real(metrics::phase_degrees(through)));
    set.insert(
        MetricKey::S21GroupDelay,
        metrics::transmission_group_delay(s21, index).into(),
    );

    set
}

/// Series and parallel views of `z`, plus Q.
fn insert_immittance(set: &mut MetricSet, z: Complex64, freq: u64) {
    set.insert(MetricKey::Impedance, MetricValue::Complex(z));
    set.insert(
        MetricKey::Admittance,
        immittance::admittance(z).map_or(MetricValue::Unavailable, MetricValue::Complex),
    );
    set.insert(MetricKey::S11Q, metrics::quality_factor(z).into());

    set.insert(MetricKey::SerR, MetricValue::Real(z.re));
    insert_reactive(
        set,
        z.im,
        freq,
        [MetricKey::SerLc, MetricKey::SerC, MetricKey::SerL],
    );

    if let Ok(parallel) = immittance::parallel_equivalent(z) {
        set.insert(MetricKey::ParR, MetricValue::Real(parallel.re));
        insert_reactive(
            set,
            parallel.im,
            freq,
            [MetricKey::ParLc, MetricKey::ParC, MetricKey::ParL],
        );
    }
}

/// `[combined, capacitance, inductance]`
fn insert_reactive(set: &mut MetricSet, reactance: f64, freq: u64, keys: [MetricKey; 3]) {
    let [combined, cap_key, ind_key] = keys;
    let cap: MetricValue = immittance::reactance_to_capacitance(reactance, freq).into();
    let ind: MetricValue = immittance::reactance_to_inductance(reactance, freq).into();

    let dominant = match ReactiveElement::for_reactance(reactance) {
        ReactiveElement::Capacitor => cap,
        ReactiveElement::Inductor => ind,
    };
    set.insert(cap_key, cap);
    set.insert(ind_key, ind);
    set.insert(combined, dominant);
}
