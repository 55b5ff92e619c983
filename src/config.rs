use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::marker::fields::{MetricKey, default_field_selection};
use crate::rf::immittance::DEFAULT_REFERENCE_IMPEDANCE;

// ---------------------------------------------------------------------------
// Marker settings
// ---------------------------------------------------------------------------

/// Per-marker computation and display settings.
///
/// Every field has a default, so a settings file only needs the entries it
/// changes:
///
/// ```json
/// { "reference_impedance": 75.0, "fields": ["actualfreq", "vswr"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerSettings {
    /// Reference impedance Z0 in ohms.
    pub reference_impedance: f64,
    /// Quote return loss as a positive number of dB.
    pub returnloss_is_positive: bool,
    /// Readout fields, in display order.
    pub fields: Vec<MetricKey>,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            reference_impedance: DEFAULT_REFERENCE_IMPEDANCE,
            returnloss_is_positive: false,
            fields: default_field_selection(),
        }
    }
}

impl MarkerSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: MarkerSettings =
            serde_json::from_str(text).context("parsing marker settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !(self.reference_impedance.is_finite() && self.reference_impedance > 0.0) {
            bail!(
                "reference_impedance must be a positive number of ohms, got {}",
                self.reference_impedance
            );
        }
        Ok(())
    }
}
