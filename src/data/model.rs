use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ComplexSample – one measured point of a sweep
// ---------------------------------------------------------------------------

/// A single calibrated measurement: the swept frequency and the complex
/// reflection (S11-like) or transmission (S21-like) coefficient there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexSample {
    /// Frequency in Hz.
    pub freq: u64,
    /// Dimensionless complex coefficient.
    pub coefficient: Complex64,
}

impl ComplexSample {
    /// Build a sample from the real and imaginary parts of the coefficient.
    pub fn new(freq: u64, re: f64, im: f64) -> Self {
        Self {
            freq,
            coefficient: Complex64::new(re, im),
        }
    }

    pub fn from_complex(freq: u64, coefficient: Complex64) -> Self {
        Self { freq, coefficient }
    }
}

// ---------------------------------------------------------------------------
// SweepSnapshot – the immutable data a marker resolves against
// ---------------------------------------------------------------------------

/// One complete sweep: the reflection sequence and the (possibly empty)
/// transmission sequence, both ascending by frequency.
///
/// The sequences sit behind `Arc` so every marker of a session can hold the
/// same snapshot. A new sweep replaces the snapshot wholesale; it is never
/// edited in place.
#[derive(Debug, Clone)]
pub struct SweepSnapshot {
    pub s11: Arc<[ComplexSample]>,
    pub s21: Arc<[ComplexSample]>,
}

impl Default for SweepSnapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl SweepSnapshot {
    pub fn new(s11: Vec<ComplexSample>, s21: Vec<ComplexSample>) -> Self {
        Self {
            s11: Arc::from(s11),
            s21: Arc::from(s21),
        }
    }

    /// A snapshot with reflection data only.
    pub fn reflection_only(s11: Vec<ComplexSample>) -> Self {
        Self::new(s11, Vec::new())
    }

    /// Number of reflection points.
    pub fn len(&self) -> usize {
        self.s11.len()
    }

    /// Whether the snapshot holds no reflection points.
    pub fn is_empty(&self) -> bool {
        self.s11.is_empty()
    }

    /// Transmission data is usable only when it lines up point-for-point
    /// with the reflection data.
    pub fn has_transmission(&self) -> bool {
        !self.s21.is_empty() && self.s21.len() == self.s11.len()
    }
}
