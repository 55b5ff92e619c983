//! Marker readouts for swept network-analyzer measurements.
//!
//! A [`Marker`] picks the sample nearest to a frequency of interest in a
//! [`SweepSnapshot`] and derives impedance, admittance, series/parallel
//! equivalents, VSWR, return loss, Q, phase and group delay from it.
//! [`MarkerSession`] keeps several markers on one shared sweep.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod frequency;
pub mod marker;
pub mod rf;
pub mod state;

pub use color::MarkerColor;
pub use config::MarkerSettings;
pub use data::model::{ComplexSample, SweepSnapshot};
pub use data::resolver::{Resolution, resolve};
pub use error::{RfError, RfResult};
pub use marker::fields::{MetricKey, MetricSet, MetricValue};
pub use marker::{Marker, MarkerState};
pub use state::MarkerSession;
