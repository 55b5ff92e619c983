use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::RfError;

// ---------------------------------------------------------------------------
// MetricKey – stable identifiers a presentation layer binds to
// ---------------------------------------------------------------------------

/// One readout field of a marker. The serialized form is the lowercase key
/// (`"actualfreq"`, `"serlc"`, `"s21groupdelay"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    ActualFreq,
    Impedance,
    Admittance,
    SerR,
    SerLc,
    SerL,
    SerC,
    ParR,
    ParLc,
    ParL,
    ParC,
    Vswr,
    ReturnLoss,
    S11Q,
    S11Phase,
    S11GroupDelay,
    S21Gain,
    S21Phase,
    S21GroupDelay,
}

impl MetricKey {
    pub const ALL: [MetricKey; 19] = [
        MetricKey::ActualFreq,
        MetricKey::Impedance,
        MetricKey::Admittance,
        MetricKey::SerR,
        MetricKey::SerLc,
        MetricKey::SerL,
        MetricKey::SerC,
        MetricKey::ParR,
        MetricKey::ParLc,
        MetricKey::ParL,
        MetricKey::ParC,
        MetricKey::Vswr,
        MetricKey::ReturnLoss,
        MetricKey::S11Q,
        MetricKey::S11Phase,
        MetricKey::S11GroupDelay,
        MetricKey::S21Gain,
        MetricKey::S21Phase,
        MetricKey::S21GroupDelay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::ActualFreq => "actualfreq",
            MetricKey::Impedance => "impedance",
            MetricKey::Admittance => "admittance",
            MetricKey::SerR => "serr",
            MetricKey::SerLc => "serlc",
            MetricKey::SerL => "serl",
            MetricKey::SerC => "serc",
            MetricKey::ParR => "parr",
            MetricKey::ParLc => "parlc",
            MetricKey::ParL => "parl",
            MetricKey::ParC => "parc",
            MetricKey::Vswr => "vswr",
            MetricKey::ReturnLoss => "returnloss",
            MetricKey::S11Q => "s11q",
            MetricKey::S11Phase => "s11phase",
            MetricKey::S11GroupDelay => "s11groupdelay",
            MetricKey::S21Gain => "s21gain",
            MetricKey::S21Phase => "s21phase",
            MetricKey::S21GroupDelay => "s21groupdelay",
        }
    }

    /// Keys that need transmission data.
    pub fn is_transmission(self) -> bool {
        matches!(
            self,
            MetricKey::S21Gain | MetricKey::S21Phase | MetricKey::S21GroupDelay
        )
    }

    /// Display metadata for this key.
    pub fn info(self) -> &'static FieldInfo {
        // FIELDS is laid out in the same order as the enum.
        &FIELDS[self as usize]
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = RfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        MetricKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| RfError::UnknownField(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// Static description of a readout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub key: MetricKey,
    /// Short row label.
    pub name: &'static str,
    /// Longer text for a field picker.
    pub description: &'static str,
    /// Part of the default selection.
    pub default_active: bool,
}

const fn field(
    key: MetricKey,
    name: &'static str,
    description: &'static str,
    default_active: bool,
) -> FieldInfo {
    FieldInfo {
        key,
        name,
        description,
        default_active,
    }
}

pub static FIELDS: [FieldInfo; 19] = [
    field(MetricKey::ActualFreq, "Frequency", "Actual frequency", true),
    field(MetricKey::Impedance, "Impedance", "Impedance", true),
    field(MetricKey::Admittance, "Admittance", "Admittance", false),
    field(MetricKey::SerR, "Series R", "Series R", false),
    field(MetricKey::SerLc, "Series X", "Series equivalent L/C", false),
    field(MetricKey::SerL, "Series L", "Series equivalent L", true),
    field(MetricKey::SerC, "Series C", "Series equivalent C", true),
    field(MetricKey::ParR, "Parallel R", "Parallel R", true),
    field(MetricKey::ParLc, "Parallel X", "Parallel equivalent L/C", true),
    field(MetricKey::ParL, "Parallel L", "Parallel equivalent L", false),
    field(MetricKey::ParC, "Parallel C", "Parallel equivalent C", false),
    field(MetricKey::Vswr, "VSWR", "VSWR", true),
    field(MetricKey::ReturnLoss, "Return loss", "Return loss", true),
    field(MetricKey::S11Q, "Quality factor", "S11 Quality factor", true),
    field(MetricKey::S11Phase, "S11 Phase", "S11 Phase", true),
    field(MetricKey::S11GroupDelay, "S11 Group Delay", "S11 Group Delay", false),
    field(MetricKey::S21Gain, "S21 Gain", "S21 Gain", true),
    field(MetricKey::S21Phase, "S21 Phase", "S21 Phase", true),
    field(MetricKey::S21GroupDelay, "S21 Group Delay", "S21 Group Delay", false),
];

/// Fields shown by a freshly created marker.
pub const DEFAULT_FIELD_SELECTION: [MetricKey; 12] = [
    MetricKey::ActualFreq,
    MetricKey::Impedance,
    MetricKey::SerL,
    MetricKey::SerC,
    MetricKey::ParR,
    MetricKey::ParLc,
    MetricKey::Vswr,
    MetricKey::ReturnLoss,
    MetricKey::S11Q,
    MetricKey::S11Phase,
    MetricKey::S21Gain,
    MetricKey::S21Phase,
];

/// Owned copy of [`DEFAULT_FIELD_SELECTION`].
pub fn default_field_selection() -> Vec<MetricKey> {
    DEFAULT_FIELD_SELECTION.to_vec()
}

/// Parse a comma-separated key list such as `"actualfreq,vswr,s11q"`.
pub fn parse_field_list(s: &str) -> Result<Vec<MetricKey>, RfError> {
    s.split(',')
        .filter(|tok| !tok.trim().is_empty())
        .map(str::parse)
        .collect()
}

// ---------------------------------------------------------------------------
// MetricValue / MetricSet
// ---------------------------------------------------------------------------

/// A computed readout value.
///
/// Infinite reals stand for open or unbounded quantities (e.g. the parallel
/// reactance of a pure resistor, VSWR of a total reflection).
///
/// Serialized form: finite reals as numbers, complex values as `[re, im]`,
/// unavailable as `null`. JSON has no infinity, so non-finite reals are
/// written as the strings `"inf"`, `"-inf"` or `"nan"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Real(f64),
    Complex(Complex64),
    /// Not computable for this sample.
    Unavailable,
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            MetricValue::Complex(z) => Some(*z),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, MetricValue::Unavailable)
    }
}

impl<E> From<Result<f64, E>> for MetricValue {
    fn from(result: Result<f64, E>) -> Self {
        result.map_or(MetricValue::Unavailable, MetricValue::Real)
    }
}

fn non_finite_label(v: f64) -> &'static str {
    if v.is_nan() {
        "nan"
    } else if v > 0.0 {
        "inf"
    } else {
        "-inf"
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Real(v) if v.is_finite() => serializer.serialize_f64(*v),
            MetricValue::Real(v) => serializer.serialize_str(non_finite_label(*v)),
            MetricValue::Complex(z) => z.serialize(serializer),
            MetricValue::Unavailable => serializer.serialize_none(),
        }
    }
}

fn fmt_real(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "∞" } else { "-∞" });
    }
    let mag = v.abs();
    if mag == 0.0 || (1e-3..1e6).contains(&mag) {
        write!(f, "{v:.4}")
    } else {
        write!(f, "{v:.4e}")
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Real(v) => fmt_real(*v, f),
            MetricValue::Complex(z) => {
                fmt_real(z.re, f)?;
                f.write_str(if z.im < 0.0 { " - j" } else { " + j" })?;
                fmt_real(z.im.abs(), f)
            }
            MetricValue::Unavailable => f.write_str("-"),
        }
    }
}

/// Every metric of one resolved marker, keyed by [`MetricKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSet {
    values: BTreeMap<MetricKey, MetricValue>,
}

impl MetricSet {
    pub fn insert(&mut self, key: MetricKey, value: MetricValue) {
        self.values.insert(key, value);
    }

    /// Value for `key`; keys that were never filled in are unavailable.
    pub fn get(&self, key: MetricKey) -> MetricValue {
        self.values
            .get(&key)
            .copied()
            .unwrap_or(MetricValue::Unavailable)
    }

    /// Flat `(key, value)` rows in the order of `selection`.
    pub fn select(&self, selection: &[MetricKey]) -> Vec<(MetricKey, MetricValue)> {
        selection.iter().map(|&k| (k, self.get(k))).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, MetricValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}
