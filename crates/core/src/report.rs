use crate::error::Result;
use crate::series::{Averages, RawTelemetry, Telemetry};

/// Identity of the machine the telemetry was recorded on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub host_name: String,
    /// Distribution name split into whitespace tokens, e.g. `["Ubuntu", "24.04", "LTS"]`.
    pub distro: Vec<String>,
}

impl HostInfo {
    /// Distribution tokens joined with single spaces.
    pub fn distro_name(&self) -> String {
        self.distro.join(" ")
    }
}

/// Everything a single run produces before rendering and delivery.
#[derive(Debug, Clone)]
pub struct Report {
    pub host: HostInfo,
    pub telemetry: Telemetry,
    pub averages: Averages,
}

impl Report {
    /// Derive series and averages from raw readings.
    pub fn build(host: HostInfo, raw: RawTelemetry) -> Result<Self> {
        let telemetry = Telemetry::derive(raw)?;
        let averages = telemetry.averages()?;
        Ok(Self {
            host,
            telemetry,
            averages,
        })
    }
}
