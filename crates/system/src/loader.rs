use share_core::{HostInfo, RawGpu, RawTelemetry, Report, Result, ShareError};
use std::path::Path;
use tracing::{debug, info, warn};

/// File names inside the data directory.
pub mod files {
    pub const NUM_CORES: &str = "numCores.txt";
    pub const CPU_LOAD: &str = "cpuLoad.txt";
    pub const CPU_TEMP: &str = "cpuTemp.txt";
    pub const MEM_FREE: &str = "memFree.txt";
    pub const MEM_TOTAL: &str = "memTotal.txt";
    pub const DISTRO_NAME: &str = "distroName.txt";
    pub const HOST_NAME: &str = "hostName.txt";
    pub const GPU_USED: &str = "gpuUsed.txt";
    pub const GPU_TOTAL: &str = "gpuTotal.txt";
}

/// Read every whitespace-separated number in `path`.
///
/// Blank lines are skipped and anything after `#` is a comment.
pub fn read_samples(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let raw = read(path)?;

    let mut samples = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        for token in strip_comment(line).split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| {
                ShareError::Data(format!(
                    "{}:{}: '{token}' is not a number",
                    path.display(),
                    idx + 1
                ))
            })?;
            samples.push(value);
        }
    }
    Ok(samples)
}

/// Read every whitespace-separated word in `path`.
pub fn read_tokens(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let raw = read(path.as_ref())?;
    Ok(raw
        .lines()
        .flat_map(|line| strip_comment(line).split_whitespace())
        .map(str::to_string)
        .collect())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ShareError::Data(format!("cannot read '{}': {e}", path.display())))
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(data, _)| data)
}

/// Host and distribution names.
pub fn load_host(dir: impl AsRef<Path>) -> Result<HostInfo> {
    let dir = dir.as_ref();
    let host = read_tokens(dir.join(files::HOST_NAME))?;
    if host.is_empty() {
        return Err(ShareError::Data(format!("{} is empty", files::HOST_NAME)));
    }

    Ok(HostInfo {
        host_name: host.join(" "),
        distro: read_tokens(dir.join(files::DISTRO_NAME))?,
    })
}

/// Read all numeric files. GPU files are optional.
pub fn load_raw(dir: impl AsRef<Path>) -> Result<RawTelemetry> {
    let dir = dir.as_ref();
    let sample = |name: &str| read_samples(dir.join(name));

    Ok(RawTelemetry {
        num_cores: sample(files::NUM_CORES)?,
        cpu_load:  sample(files::CPU_LOAD)?,
        cpu_temp:  sample(files::CPU_TEMP)?,
        mem_free:  sample(files::MEM_FREE)?,
        mem_total: sample(files::MEM_TOTAL)?,
        gpu:       load_gpu(dir),
    })
}

fn load_gpu(dir: &Path) -> Option<RawGpu> {
    let read_pair = || -> Result<RawGpu> {
        Ok(RawGpu {
            used:  read_samples(dir.join(files::GPU_USED))?,
            total: read_samples(dir.join(files::GPU_TOTAL))?,
        })
    };

    match read_pair() {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            debug!("No GPU data: {e}");
            None
        }
    }
}

/// Load, derive and average everything in `dir`.
pub fn load_report(dir: impl AsRef<Path>) -> Result<Report> {
    let dir = dir.as_ref();
    let host = load_host(dir)?;
    let report = Report::build(host, load_raw(dir)?)?;

    info!(
        "Loaded {} samples from '{}' (GPU: {})",
        report.telemetry.size(),
        dir.display(),
        if report.telemetry.gpu.is_some() { "yes" } else { "no" }
    );
    if report.telemetry.temp.is_empty() {
        warn!("{} has no samples; thermal average unavailable", files::CPU_TEMP);
    } else if report.telemetry.temp.len() != report.telemetry.size() {
        warn!(
            "Temperature has {} samples, CPU has {}",
            report.telemetry.temp.len(),
            report.telemetry.size()
        );
    }

    Ok(report)
}
