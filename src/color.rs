use std::collections::BTreeMap;
use std::fmt;

use palette::{Hsl, IntoColor, Mix, Srgb};
use serde::{Serialize, Serializer};

use crate::data::model::CustomerStatus;
use crate::data::prediction::RiskLevel;

// ---------------------------------------------------------------------------
// Rgb – a presentation-agnostic color
// ---------------------------------------------------------------------------

/// 8-bit RGB color. Serializes as a `#rrggbb` hex string so the presentation
/// layer can use it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

// ---------------------------------------------------------------------------
// Fixed dashboard colors
// ---------------------------------------------------------------------------

pub const PRIMARY: Rgb = Rgb::new(0x25, 0x96, 0xbe);
pub const CHURNED: Rgb = Rgb::new(0xff, 0x6b, 0x6b);
pub const STAYED: Rgb = Rgb::new(0x51, 0xcf, 0x66);
pub const JOINED: Rgb = Rgb::new(0x4d, 0xab, 0xf7);

pub const RISK_CRITICAL: Rgb = Rgb::new(0xff, 0x4b, 0x4b);
pub const RISK_HIGH: Rgb = Rgb::new(0xff, 0xa5, 0x00);
pub const RISK_MEDIUM: Rgb = Rgb::new(0xff, 0xd7, 0x00);
pub const RISK_LOW: Rgb = Rgb::new(0x51, 0xcf, 0x66);

/// Churn-category accent colors (reason bars are tinted by category).
pub const CATEGORY_COLORS: [(&str, Rgb); 5] = [
    ("Competitor", Rgb::new(0xe7, 0x4c, 0x3c)),
    ("Attitude", Rgb::new(0xe6, 0x7e, 0x22)),
    ("Dissatisfaction", Rgb::new(0xf3, 0x9c, 0x12)),
    ("Price", Rgb::new(0x9b, 0x59, 0xb6)),
    ("Other", Rgb::new(0x95, 0xa5, 0xa6)),
];

pub fn status_color(status: CustomerStatus) -> Rgb {
    match status {
        CustomerStatus::Joined => JOINED,
        CustomerStatus::Stayed => STAYED,
        CustomerStatus::Churned => CHURNED,
    }
}

pub fn risk_color(level: RiskLevel) -> Rgb {
    match level {
        RiskLevel::Critical => RISK_CRITICAL,
        RiskLevel::High => RISK_HIGH,
        RiskLevel::Medium => RISK_MEDIUM,
        RiskLevel::Low => RISK_LOW,
    }
}

pub fn category_color(category: &str) -> Rgb {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, c)| *c)
        .unwrap_or(Rgb::new(0x95, 0xa5, 0xa6))
}

// ---------------------------------------------------------------------------
// Generated palettes
// ---------------------------------------------------------------------------

/// `n` visually distinct colors from evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::new(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Sequential red ramp: one shade per value, darker for larger values.
/// Used by count-colored bars ("Reds" continuous scale).
pub fn reds_scale(values: &[f64]) -> Vec<Rgb> {
    let light = Srgb::new(0.996, 0.878, 0.824);
    let dark = Srgb::new(0.647, 0.059, 0.082);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    values
        .iter()
        .map(|&v| {
            let t = if max > min {
                ((v - min) / (max - min)) as f32
            } else {
                1.0
            };
            let mixed = light.into_linear().mix(dark.into_linear(), t);
            let rgb: Srgb = Srgb::from_linear(mixed);
            Rgb::new(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical color mapping
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category to generated colors; used for
/// columns without a fixed dashboard color (states, deal names, ...).
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let palette = generate_palette(values.len());
        ColorMap {
            mapping: values.into_iter().zip(palette).collect(),
            default_color: Rgb::new(0x95, 0xa5, 0xa6),
        }
    }

    pub fn color_for(&self, value: &str) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
