use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MarkerColor – opaque display colour carried by a marker
// ---------------------------------------------------------------------------

/// An sRGB colour with alpha. The numeric core never looks inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl MarkerColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    fn from_hsl(hue: f32) -> Self {
        let hsl = Hsl::new(hue, 0.75, 0.55);
        let rgb: Srgb = hsl.into_color();
        Self::rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Colour generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<MarkerColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| MarkerColor::from_hsl((i as f32 / n as f32) * 360.0))
        .collect()
}

/// Colour for the `index`-th marker of a session whose size is not known
/// up front. Hues advance by the golden angle so neighbours stay apart.
pub fn marker_color(index: usize) -> MarkerColor {
    const GOLDEN_ANGLE: f32 = 137.507_77;
    MarkerColor::from_hsl((index as f32 * GOLDEN_ANGLE) % 360.0)
}
