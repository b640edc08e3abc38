use crate::colors::{Color, Colormap};
use share_config::PlotConfig;

/// Points per inch, used to convert font sizes to pixels.
const POINTS_PER_INCH: f64 = 72.0;

/// Resolved visual settings for the histogram figure.
///
/// Every size is in output pixels so the renderer never needs to know
/// about inches or points.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    pub bins: usize,
    pub background: Color,
    pub foreground: Color,
    pub colormap: Colormap,
    /// Tick label size.
    pub font_px: f64,
    /// Panel title size.
    pub title_px: f64,
    /// Outer margin of each panel.
    pub margin_px: u32,
    /// Axis line width.
    pub stroke_px: u32,
}

impl PlotStyle {
    /// Build a [`PlotStyle`] from the settings file's `[plot]` section.
    ///
    /// Invalid color strings fall back to black on white.
    pub fn from_config(cfg: &PlotConfig) -> Self {
        let dpi = f64::from(cfg.dpi.max(1));
        let font_px = f64::from(cfg.font_size) * dpi / POINTS_PER_INCH;

        Self {
            width:      pixels(cfg.width_in, dpi),
            height:     pixels(cfg.height_in, dpi),
            bins:       cfg.bins,
            background: Color::from_hex(&cfg.background).unwrap_or(Color::WHITE),
            foreground: Color::from_hex(&cfg.foreground).unwrap_or(Color::BLACK),
            colormap:   Colormap::coolwarm(),
            font_px,
            title_px:   font_px * 1.2,
            margin_px:  (font_px * 0.5).round().max(1.0) as u32,
            stroke_px:  (dpi / 100.0).round().max(1.0) as u32,
        }
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default())
    }
}

fn pixels(inches: f32, dpi: f64) -> u32 {
    (f64::from(inches.max(0.0)) * dpi).round().max(1.0) as u32
}
