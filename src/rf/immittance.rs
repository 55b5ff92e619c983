use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::error::{RfError, RfResult};

/// Reference impedance used when none is configured, in ohms.
pub const DEFAULT_REFERENCE_IMPEDANCE: f64 = 50.0;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

// ---------------------------------------------------------------------------
// Reflection coefficient → impedance / admittance
// ---------------------------------------------------------------------------

/// Series impedance `Z0 (1 + Γ) / (1 - Γ)` seen at the port.
///
/// `Γ = 1` is an ideal open and has no finite impedance.
pub fn impedance(gamma: Complex64, z0: f64) -> RfResult<Complex64> {
    let denominator = 1.0 - gamma;
    if denominator == ZERO {
        return Err(RfError::DivisionSingularity {
            quantity: "impedance",
        });
    }
    Ok(z0 * (1.0 + gamma) / denominator)
}

/// Admittance `Y = 1 / Z`, in siemens.
pub fn admittance(z: Complex64) -> RfResult<Complex64> {
    if z == ZERO {
        return Err(RfError::DivisionSingularity {
            quantity: "admittance",
        });
    }
    Ok(z.inv())
}

/// Parallel-equivalent form of a series impedance.
///
/// Returns `Rp + j·Xp` where `Rp = 1/G` and `Xp = -1/B` for `Y = G + jB`,
/// i.e. the resistor and reactance that, placed in parallel, present the
/// same terminal impedance at this frequency. `Xp` keeps the sign of the
/// series reactance. A zero conductance or susceptance gives an infinite
/// (open) component.
pub fn parallel_equivalent(z: Complex64) -> RfResult<Complex64> {
    let y = admittance(z)?;
    let resistance = if y.re == 0.0 { f64::INFINITY } else { 1.0 / y.re };
    let reactance = if y.im == 0.0 { f64::INFINITY } else { -1.0 / y.im };
    Ok(Complex64::new(resistance, reactance))
}

// ---------------------------------------------------------------------------
// Reactance → component values
// ---------------------------------------------------------------------------

/// Which reactive component a reactance corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactiveElement {
    Capacitor,
    Inductor,
}

impl ReactiveElement {
    /// Negative reactance is capacitive; zero and positive count as inductive.
    pub fn for_reactance(reactance: f64) -> Self {
        if reactance < 0.0 {
            ReactiveElement::Capacitor
        } else {
            ReactiveElement::Inductor
        }
    }
}

/// Capacitance `-1 / (2π f X)` in farads.
///
/// Physically meaningful for `X < 0`; a positive reactance yields a negative
/// value, which is still reported so the caller can show both readings.
pub fn reactance_to_capacitance(reactance: f64, freq: u64) -> RfResult<f64> {
    if freq == 0 || reactance == 0.0 {
        return Err(RfError::DivisionSingularity {
            quantity: "capacitance",
        });
    }
    Ok(-1.0 / (TAU * freq as f64 * reactance))
}

/// Inductance `X / (2π f)` in henries. Physically meaningful for `X > 0`.
pub fn reactance_to_inductance(reactance: f64, freq: u64) -> RfResult<f64> {
    if freq == 0 {
        return Err(RfError::DivisionSingularity {
            quantity: "inductance",
        });
    }
    Ok(reactance / (TAU * freq as f64))
}
