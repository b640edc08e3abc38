use crate::histogram::Histogram;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use share_core::{Result, Series, ShareError, Telemetry};
use share_theme::PlotStyle;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Bundled so rendering never depends on system fonts.
static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Percentage series are always plotted on this axis.
const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Static description of one subplot.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub title: &'static str,
    pub x_label: &'static str,
    /// `None` renders an empty axis with `missing_label` as legend.
    pub series: Option<&'a Series>,
    /// Fixed x range, or `None` to fit the data.
    pub range: Option<(f64, f64)>,
    pub missing_label: &'static str,
}

/// The four panels in reading order: CPU, RAM, GPU, Thermal.
pub fn panels(telemetry: &Telemetry) -> [Panel<'_>; 4] {
    [
        Panel {
            title: "CPU",
            x_label: "Load [%]",
            series: Some(&telemetry.cpu),
            range: Some(PERCENT_RANGE),
            missing_label: "No data",
        },
        Panel {
            title: "RAM",
            x_label: "Usage [%]",
            series: Some(&telemetry.ram),
            range: Some(PERCENT_RANGE),
            missing_label: "No data",
        },
        Panel {
            title: "GPU",
            x_label: "Usage [%]",
            series: telemetry.gpu.as_ref(),
            range: None,
            missing_label: "No GPU",
        },
        Panel {
            title: "Thermal",
            x_label: "Temperature [°C]",
            series: Some(&telemetry.temp),
            range: None,
            missing_label: "No data",
        },
    ]
}

/// Render the 2×2 histogram figure to `path` (PNG) and return the path.
pub fn render(telemetry: &Telemetry, style: &PlotStyle, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    ensure_font()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.background.to_rgb()).map_err(render_err)?;

    for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels(telemetry)) {
        draw_panel(area, &panel, style)?;
    }

    root.present().map_err(render_err)?;
    info!(
        "Saved {}x{} plot to '{}'",
        style.width,
        style.height,
        path.display()
    );
    Ok(path.to_path_buf())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &Panel<'_>,
    style: &PlotStyle,
) -> Result<()> {
    let hist = panel
        .series
        .map(|s| Histogram::compute(s, style.bins, panel.range))
        .filter(|h| !h.is_empty());

    let (x_lo, x_hi) = hist
        .as_ref()
        .and_then(Histogram::range)
        .or(panel.range)
        .unwrap_or(PERCENT_RANGE);
    let y_hi = match hist.as_ref().map(Histogram::max_density) {
        Some(d) if d > 0.0 => d * 1.05,
        _ => 1.0,
    };
    debug!("{} panel: x {x_lo}..{x_hi}, y 0..{y_hi}", panel.title);

    let fg = style.foreground.to_rgb();
    let text = |px: f64| (FontFamily::SansSerif, px).into_font().color(&fg);
    let label_area = (style.font_px * 2.2).round() as u32;

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, text(style.title_px))
        .margin(style.margin_px)
        .x_label_area_size(label_area)
        .y_label_area_size((style.font_px * 3.2).round() as u32)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(6)
        .y_labels(6)
        .x_desc(panel.x_label)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.3}"))
        .label_style(text(style.font_px * 0.8))
        .axis_desc_style(text(style.font_px))
        .axis_style(ShapeStyle {
            color: style.foreground.to_rgba(),
            filled: false,
            stroke_width: style.stroke_px,
        })
        .draw()
        .map_err(render_err)?;

    match hist {
        Some(hist) => {
            let bins = hist.bins();
            chart
                .draw_series(bins.iter().enumerate().map(|(i, bin)| {
                    let fill = style.colormap.for_index(i, bins.len()).to_rgb();
                    Rectangle::new([(bin.lo, 0.0), (bin.hi, bin.density)], fill.filled())
                }))
                .map_err(render_err)?;
        }
        None => {
            let swatch = style.colormap.at(0.0).to_rgb();
            let r = (style.font_px * 0.3).round().max(1.0) as i32;
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
                .map_err(render_err)?
                .label(panel.missing_label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - r), (x + 2 * r, y + r)], swatch.filled())
                });

            let bg = style.background.to_rgba();
            let border = style.foreground.to_rgba();
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font(text(style.font_px))
                .background_style(&bg)
                .border_style(&border)
                .draw()
                .map_err(render_err)?;
        }
    }

    Ok(())
}

/// Register the bundled font once per process.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    REGISTERED
        .get_or_init(|| {
            register_font("sans-serif", FontStyle::Normal, DEJAVU_SANS)
                .map_err(|_| "bundled font is invalid".to_string())
        })
        .clone()
        .map_err(ShareError::Render)
}

fn render_err(e: impl std::fmt::Display) -> ShareError {
    ShareError::Render(e.to_string())
}
