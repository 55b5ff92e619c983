/// Result type for RF conversions.
pub type RfResult<T> = Result<T, RfError>;

/// Errors raised by the numeric conversions.
///
/// None of these escape a [`crate::marker::fields::MetricSet`]: the readout
/// turns each one into [`crate::marker::fields::MetricValue::Unavailable`]
/// for the affected key only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RfError {
    #[error("Division singularity while computing {quantity}")]
    DivisionSingularity { quantity: &'static str },

    #[error("Sample index {index} out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid frequency: '{0}'")]
    InvalidFrequency(String),

    #[error("Unknown metric key: '{0}'")]
    UnknownField(String),
}
