use std::fmt;

/// Seed substituted when the caller passes an empty string, so pages with no
/// recipient name still get a stable, friendly gradient.
pub const DEFAULT_SEED: &str = "Happy Birthday";

/// An HSL color with CSS-compatible formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    /// Hue in degrees, always in [0, 360).
    pub hue: u16,
    /// Saturation percentage (0-100).
    pub saturation: u8,
    /// Lightness percentage (0-100).
    pub lightness: u8,
}

impl Hsl {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self { hue: hue % 360, saturation, lightness }
    }

    /// Convert to RGB for surfaces that can't consume HSL directly.
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(f32::from(self.hue), f32::from(self.saturation), f32::from(self.lightness))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The two gradient stops derived from a recipient's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    /// First gradient stop (lighter pastel).
    pub primary: Hsl,
    /// Second gradient stop, biased 120° away on the color wheel.
    pub secondary: Hsl,
}

impl ColorPair {
    /// Sample the gradient between the two stops at `t` in [0, 1], taking the
    /// shorter arc around the hue wheel.
    pub fn lerp(&self, t: f32) -> Hsl {
        let t = t.clamp(0.0, 1.0);
        let from = f32::from(self.primary.hue);
        let to = f32::from(self.secondary.hue);
        let mut delta = to - from;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        let hue = (from + delta * t).rem_euclid(360.0);
        let saturation = f32::from(self.primary.saturation)
            + (f32::from(self.secondary.saturation) - f32::from(self.primary.saturation)) * t;
        let lightness = f32::from(self.primary.lightness)
            + (f32::from(self.secondary.lightness) - f32::from(self.primary.lightness)) * t;
        Hsl::new(hue as u16, saturation.round() as u8, lightness.round() as u8)
    }
}

/// Derive the two background gradient colors for a greeting page from the
/// recipient's name.
///
/// Two independent rolling accumulators consume the seed's UTF-16 code units
/// with distinct shift constants so the two hues decorrelate. Arithmetic wraps
/// at 32-bit signed boundaries; the hue bias of +120° keeps the pair apart on
/// the color wheel. Deterministic for any input, and collisions between
/// different seeds are fine since the output is purely cosmetic.
pub fn derive_color_pair(seed: &str) -> ColorPair {
    let seed = if seed.is_empty() { DEFAULT_SEED } else { seed };
    let mut acc_a: i32 = 0;
    let mut acc_b: i32 = 0;
    for unit in seed.encode_utf16() {
        let unit = i32::from(unit);
        acc_a = unit.wrapping_add(acc_a.wrapping_shl(5).wrapping_sub(acc_a));
        acc_b = unit.wrapping_add(acc_b.wrapping_shl(3).wrapping_sub(acc_b));
    }
    let hue_a = acc_a.rem_euclid(360) as u16;
    let hue_b = acc_b.wrapping_add(120).rem_euclid(360) as u16;
    ColorPair {
        primary: Hsl::new(hue_a, 80, 85),
        secondary: Hsl::new(hue_b, 80, 80),
    }
}

/// Convert HSL to RGB color
/// H: hue (0-360), S: saturation (0-100), L: lightness (0-100)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb::new(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Generate a rainbow color for a given position
/// total: total number of positions, index: current position (0-based)
pub fn rainbow_color(index: usize, total: usize) -> Rgb {
    let hue = (index as f32 / total.max(1) as f32) * 360.0;
    hsl_to_rgb(hue, 100.0, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::alice("Alice", 88, 88)]
    #[case::bob("Bob", 5, 269)]
    #[case::priya("Priya", 247, 151)]
    #[case::single_char("a", 97, 217)]
    #[case::emoji("🎂", 254, 230)]
    fn pinned_hues(#[case] seed: &str, #[case] hue_a: u16, #[case] hue_b: u16) {
        let pair = derive_color_pair(seed);
        assert_eq!(pair.primary, Hsl::new(hue_a, 80, 85));
        assert_eq!(pair.secondary, Hsl::new(hue_b, 80, 80));
    }

    #[test]
    fn empty_seed_uses_default_pair() {
        let pair = derive_color_pair("");
        assert_eq!(pair.primary.to_string(), "hsl(205, 80%, 85%)");
        assert_eq!(pair.secondary.to_string(), "hsl(341, 80%, 80%)");
        assert_eq!(pair, derive_color_pair(DEFAULT_SEED));
    }

    #[test]
    fn deterministic_across_calls() {
        for seed in ["Maria", "José", "龍", "a very long recipient name indeed"] {
            assert_eq!(derive_color_pair(seed), derive_color_pair(seed));
        }
    }

    #[test]
    fn hues_always_in_range() {
        let seeds = ["", "x", "Zoë", "💖🎉🎈", "name with spaces", "\u{0}\u{ffff}"];
        for seed in seeds {
            let pair = derive_color_pair(seed);
            assert!(pair.primary.hue < 360, "seed {seed:?}");
            assert!(pair.secondary.hue < 360, "seed {seed:?}");
        }
    }

    #[test]
    fn very_long_seed_does_not_overflow() {
        let seed = "Z".repeat(10_000);
        let pair = derive_color_pair(&seed);
        assert_eq!(pair.primary.hue, 48);
        assert_eq!(pair.secondary.hue, 288);
    }

    #[test]
    fn lerp_hits_both_endpoints() {
        let pair = derive_color_pair("Alice");
        assert_eq!(pair.lerp(0.0).hue, pair.primary.hue);
        assert_eq!(pair.lerp(1.0).hue, pair.secondary.hue);
        // Out-of-range samples clamp instead of extrapolating.
        assert_eq!(pair.lerp(-3.0), pair.lerp(0.0));
        assert_eq!(pair.lerp(7.0), pair.lerp(1.0));
    }

    #[test]
    fn lerp_takes_short_arc() {
        let pair = ColorPair {
            primary: Hsl::new(350, 80, 85),
            secondary: Hsl::new(10, 80, 80),
        };
        let mid = pair.lerp(0.5);
        assert_eq!(mid.hue, 0);
    }

    #[test]
    fn hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), Rgb::new(255, 255, 255));
    }
}
