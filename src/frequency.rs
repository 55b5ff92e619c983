use crate::error::{RfError, RfResult};

/// Parse a frequency string into whole hertz.
///
/// Accepts plain integers and decimals with an optional SI multiplier and an
/// optional `Hz` unit: `"144000000"`, `"144M"`, `"123.456 MHz"`, `"10k"`,
/// `"1.2GHz"`. A lowercase `m` means mega. An empty string is `0`, the
/// "unset" frequency.
pub fn parse_frequency(input: &str) -> RfResult<u64> {
    let invalid = || RfError::InvalidFrequency(input.to_string());

    let mut s = input.trim().replace('_', "");
    if s.is_empty() {
        return Ok(0);
    }
    if s.to_ascii_lowercase().ends_with("hz") {
        s.truncate(s.len() - 2);
    }
    let s = s.trim_end();

    let (number, multiplier) = match s.chars().last() {
        Some('k' | 'K') => (&s[..s.len() - 1], 1e3),
        Some('M' | 'm') => (&s[..s.len() - 1], 1e6),
        Some('G' | 'g') => (&s[..s.len() - 1], 1e9),
        _ => (s, 1.0),
    };
    let number = number.trim_end();

    // Whole numbers without a multiplier stay exact.
    if multiplier == 1.0 {
        if let Ok(hz) = number.parse::<u64>() {
            return Ok(hz);
        }
    }

    let value: f64 = number.parse().map_err(|_| invalid())?;
    let hz = (value * multiplier).round();
    if !hz.is_finite() || hz < 0.0 || hz > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(hz as u64)
}
