use share_core::{Average, Report};

/// Build the text that accompanies the plot.
///
/// ```text
/// workstation with Ubuntu 24.04 LTS
/// CPU: 12.3%
/// RAM: 45.6%
/// GPU: N/A
/// Thermal: 48.0°C
/// ```
///
/// A missing GPU or temperature sensor reads `N/A`, without a unit.
pub fn format_summary(report: &Report) -> String {
    let avg = &report.averages;

    format!(
        "{} with {}\nCPU: {:.1}%\nRAM: {:.1}%\nGPU: {}\nThermal: {}",
        report.host.host_name,
        report.host.distro_name(),
        avg.cpu,
        avg.ram,
        with_unit(avg.gpu, "%"),
        with_unit(avg.temp, "°C"),
    )
}

fn with_unit(avg: Average, unit: &str) -> String {
    match avg {
        Average::Value(v) => format!("{v:.1}{unit}"),
        Average::Unavailable => avg.to_string(),
    }
}
