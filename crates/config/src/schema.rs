use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `share.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Where the telemetry text files live.
    pub data: DataConfig,
    /// Histogram image settings.
    pub plot: PlotConfig,
    /// Bot API endpoint settings.
    pub telegram: TelegramConfig,
}

/// Telemetry data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `cpuLoad.txt`, `memFree.txt`, ...
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
        }
    }
}

/// Histogram figure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Output PNG path.
    pub output: PathBuf,
    /// Number of histogram bins per panel.
    pub bins: usize,
    /// Figure width in inches.
    pub width_in: f32,
    /// Figure height in inches.
    pub height_in: f32,
    /// Pixels per inch.
    pub dpi: u32,
    /// Base font size in points.
    pub font_size: f32,
    /// Figure background color (hex).
    pub background: String,
    /// Axis, label and title color (hex).
    pub foreground: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output:     PathBuf::from("./plot.png"),
            bins:       40,
            width_in:   10.0,
            height_in:  10.0,
            dpi:        400,
            font_size:  16.0,
            background: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
        }
    }
}

/// Bot API settings. Credentials live in a separate JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// API root, overridable for self-hosted Bot API servers.
    pub api_base: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base:     "https://api.telegram.org".to_string(),
            timeout_secs: 30,
        }
    }
}
