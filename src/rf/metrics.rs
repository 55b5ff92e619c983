use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::data::model::ComplexSample;
use crate::error::{RfError, RfResult};

/// Voltage standing wave ratio `(1 + |Γ|) / (1 - |Γ|)`.
///
/// `|Γ| >= 1` is not a passive measurement; it reports an unbounded ratio.
pub fn vswr(gamma: Complex64) -> f64 {
    let mag = gamma.norm();
    if mag >= 1.0 {
        return f64::INFINITY;
    }
    (1.0 + mag) / (1.0 - mag)
}

/// `20·log10|c|` in dB. A zero coefficient gives negative infinity.
pub fn gain_db(coefficient: Complex64) -> f64 {
    20.0 * coefficient.norm().log10()
}

/// Return loss in dB.
///
/// The natural reading is `20·log10|Γ|`, negative for a passive load.
/// `positive_convention` flips the sign for displays that quote return
/// loss as a positive number.
pub fn return_loss_db(gamma: Complex64, positive_convention: bool) -> f64 {
    let db = gain_db(gamma);
    if positive_convention {
        -db
    } else {
        db
    }
}

/// Quality factor `|X| / R` of an impedance.
pub fn quality_factor(z: Complex64) -> RfResult<f64> {
    if z.re == 0.0 {
        return Err(RfError::DivisionSingularity {
            quantity: "quality factor",
        });
    }
    Ok(z.im.abs() / z.re)
}

/// Phase of a coefficient in degrees, in `(-180, 180]`.
pub fn phase_degrees(coefficient: Complex64) -> f64 {
    let deg = coefficient.arg().to_degrees();
    if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Group delay `-dφ/dω` at `index`, in seconds.
///
/// Interior points use the two neighbours; the first and last points fall
/// back to the single neighbour they have. The phase step is taken from
/// `c1 · conj(c0)`, which unwraps it into `(-π, π]`, so neighbouring points
/// must be less than half a turn apart.
pub fn group_delay(samples: &[ComplexSample], index: usize) -> RfResult<f64> {
    let n = samples.len();
    if index >= n {
        return Err(RfError::IndexOutOfRange { index, len: n });
    }
    let lo = &samples[index.saturating_sub(1)];
    let hi = &samples[(index + 1).min(n - 1)];
    if hi.freq <= lo.freq {
        return Err(RfError::DivisionSingularity {
            quantity: "group delay",
        });
    }

    let delta_phase = (hi.coefficient * lo.coefficient.conj()).arg();
    let delta_omega = TAU * (hi.freq - lo.freq) as f64;
    Ok(-delta_phase / delta_omega)
}

/// Group delay through a transmission path, reported one-way: half of
/// [`group_delay`] over the S21-like sequence.
pub fn transmission_group_delay(samples: &[ComplexSample], index: usize) -> RfResult<f64> {
    group_delay(samples, index).map(|delay| delay / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay_line(tau: f64, start: u64, step: u64, n: usize) -> Vec<ComplexSample> {
        (0..n as u64)
            .map(|i| {
                let f = start + i * step;
                ComplexSample::from_complex(f, Complex64::from_polar(0.8, -TAU * f as f64 * tau))
            })
            .collect()
    }

    #[test]
    fn vswr_of_example_point() {
        let gamma = Complex64::new(0.90, -0.10);
        let mag = gamma.norm();
        let expected = (1.0 + mag) / (1.0 - mag);
        assert!((vswr(gamma) - expected).abs() < 1e-12);
        assert!((vswr(gamma) - 20.17).abs() < 0.01);
    }

    #[test]
    fn vswr_is_at_least_one_and_monotonic() {
        let mut last = 0.0;
        for step in 0..100 {
            let mag = step as f64 / 100.0;
            let v = vswr(Complex64::from_polar(mag, 1.0));
            assert!(v >= 1.0);
            assert!(v > last);
            last = v;
        }
    }

    #[test]
    fn vswr_unbounded_for_total_reflection() {
        assert!(vswr(Complex64::new(1.0, 0.0)).is_infinite());
        assert!(vswr(Complex64::new(0.0, -1.5)).is_infinite());
    }

    #[test]
    fn return_loss_sign_convention() {
        let gamma = Complex64::new(0.1, 0.0);
        assert!((return_loss_db(gamma, false) + 20.0).abs() < 1e-9);
        assert!((return_loss_db(gamma, true) - 20.0).abs() < 1e-9);
        assert_eq!(return_loss_db(Complex64::new(0.0, 0.0), false), f64::NEG_INFINITY);
    }

    #[test]
    fn quality_factor_uses_reactance_magnitude() {
        assert!((quality_factor(Complex64::new(10.0, -25.0)).unwrap() - 2.5).abs() < 1e-12);
        assert!((quality_factor(Complex64::new(10.0, 25.0)).unwrap() - 2.5).abs() < 1e-12);
        assert!(quality_factor(Complex64::new(0.0, 25.0)).is_err());
    }

    #[test]
    fn phase_range() {
        assert!((phase_degrees(Complex64::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
        assert!((phase_degrees(Complex64::new(0.0, -1.0)) + 90.0).abs() < 1e-12);
        assert_eq!(phase_degrees(Complex64::new(-1.0, 0.0)), 180.0);
        assert_eq!(phase_degrees(Complex64::new(-1.0, -0.0)), 180.0);
    }

    #[test]
    fn group_delay_of_ideal_line() {
        let tau = 5e-9;
        let data = delay_line(tau, 100_000_000, 1_000_000, 11);
        for idx in [0, 5, 10] {
            let d = group_delay(&data, idx).unwrap();
            assert!((d - tau).abs() < 1e-15, "index {idx}: {d}");
        }
        let d = transmission_group_delay(&data, 5).unwrap();
        assert!((d - tau / 2.0).abs() < 1e-15);
    }

    #[test]
    fn group_delay_survives_phase_wrap() {
        // 200 ns wraps the raw phase every 5 MHz.
        let tau = 200e-9;
        let data = delay_line(tau, 50_000_000, 1_000_000, 40);
        for idx in 0..data.len() {
            let d = group_delay(&data, idx).unwrap();
            assert!((d - tau).abs() < 1e-12, "index {idx}: {d}");
        }
    }

    #[test]
    fn group_delay_degenerate_inputs() {
        let one = vec![ComplexSample::new(1_000, 0.5, 0.5)];
        assert!(group_delay(&one, 0).is_err());
        assert_eq!(
            group_delay(&one, 3),
            Err(RfError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(group_delay(&[], 0).is_err());
    }
}
