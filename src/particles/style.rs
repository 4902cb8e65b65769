use crate::theme::Rgb;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Visual style of a particle field. Each style carries its own fixed palette
/// and motif parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParticleStyle {
    /// Muted plum and amber discs and drifting streaks.
    Elegant,
    /// Bold primary-colored rotating polygons.
    Geometric,
    /// Soft blurred white glows that pulse in size.
    Light,
}

const ELEGANT_PALETTE: &[(Rgb, f32)] = &[
    (Rgb::new(0x2D, 0x2B, 0x3F), 1.0),
    (Rgb::new(0x4A, 0x44, 0x58), 1.0),
    (Rgb::new(0x8E, 0x7A, 0xB5), 1.0),
    (Rgb::new(0xB7, 0x84, 0xB7), 1.0),
    (Rgb::new(0xEC, 0xA8, 0x69), 1.0),
];

const GEOMETRIC_PALETTE: &[(Rgb, f32)] = &[
    (Rgb::new(0x2C, 0x3E, 0x50), 1.0),
    (Rgb::new(0x34, 0x98, 0xDB), 1.0),
    (Rgb::new(0xE7, 0x4C, 0x3C), 1.0),
    (Rgb::new(0xEC, 0xF0, 0xF1), 1.0),
    (Rgb::new(0xF1, 0xC4, 0x0F), 1.0),
];

const LIGHT_PALETTE: &[(Rgb, f32)] = &[
    (Rgb::new(0xFF, 0xFF, 0xFF), 0.8),
    (Rgb::new(0xFF, 0xFF, 0xFF), 0.6),
    (Rgb::new(0xFF, 0xFF, 0xFF), 0.4),
    (Rgb::new(0xFF, 0xFF, 0xFF), 0.2),
];

impl ParticleStyle {
    /// The fixed color palette for this style, as (color, base alpha) pairs.
    /// The base alpha multiplies each particle's own opacity.
    pub fn palette(self) -> &'static [(Rgb, f32)] {
        match self {
            ParticleStyle::Elegant => ELEGANT_PALETTE,
            ParticleStyle::Geometric => GEOMETRIC_PALETTE,
            ParticleStyle::Light => LIGHT_PALETTE,
        }
    }
}
