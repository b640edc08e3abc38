use plotters::style::{RGBAColor, RGBColor};

/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self {
                r: byte(&hex[0..2])? as f32 / 255.0,
                g: byte(&hex[2..4])? as f32 / 255.0,
                b: byte(&hex[4..6])? as f32 / 255.0,
                a: 1.0,
            }),
            8 => Some(Self {
                r: byte(&hex[0..2])? as f32 / 255.0,
                g: byte(&hex[2..4])? as f32 / 255.0,
                b: byte(&hex[4..6])? as f32 / 255.0,
                a: byte(&hex[6..8])? as f32 / 255.0,
            }),
            _ => None,
        }
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Convert to an opaque [`RGBColor`] for plotters.
    #[inline]
    pub fn to_rgb(self) -> RGBColor {
        RGBColor(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Convert to an [`RGBAColor`] for plotters, keeping alpha.
    #[inline]
    pub fn to_rgba(self) -> RGBAColor {
        RGBAColor(channel(self.r), channel(self.g), channel(self.b), f64::from(self.a))
    }
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Piecewise-linear colormap over evenly spaced color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<Color>,
}

impl Colormap {
    /// Diverging blue → light grey → red map (Moreland's "coolwarm").
    pub fn coolwarm() -> Self {
        const STOPS: [&str; 5] = ["#3b4cc0", "#8db0fe", "#dddddd", "#f49a7b", "#b40426"];
        Self {
            stops: STOPS
                .iter()
                .filter_map(|hex| Color::from_hex(hex))
                .collect(),
        }
    }

    /// Sample the map at `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let idx = (pos.floor() as usize).min(last - 1);
        self.stops[idx].lerp(self.stops[idx + 1], (pos - idx as f64) as f32)
    }

    /// Color for item `index` of `count`, spreading items over the whole map.
    pub fn for_index(&self, index: usize, count: usize) -> Color {
        if count <= 1 {
            return self.at(0.0);
        }
        self.at(index as f64 / (count - 1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.to_rgb(), RGBColor(255, 128, 0));
        assert_eq!(Color::from_hex("#00000080").unwrap().a, 128.0 / 255.0);
        assert!(Color::from_hex("nope").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn coolwarm_endpoints() {
        let map = Colormap::coolwarm();
        assert_eq!(map.at(0.0).to_rgb(), RGBColor(0x3b, 0x4c, 0xc0));
        assert_eq!(map.at(1.0).to_rgb(), RGBColor(0xb4, 0x04, 0x26));
        assert_eq!(map.at(0.5).to_rgb(), RGBColor(0xdd, 0xdd, 0xdd));
    }

    #[test]
    fn at_clamps_out_of_range() {
        let map = Colormap::coolwarm();
        assert_eq!(map.at(-3.0), map.at(0.0));
        assert_eq!(map.at(7.0), map.at(1.0));
        assert_eq!(map.at(f64::NAN), map.at(0.0));
    }

    #[test]
    fn for_index_spans_the_map() {
        let map = Colormap::coolwarm();
        assert_eq!(map.for_index(0, 40), map.at(0.0));
        assert_eq!(map.for_index(39, 40), map.at(1.0));
        assert_eq!(map.for_index(0, 1), map.at(0.0));
    }
}
