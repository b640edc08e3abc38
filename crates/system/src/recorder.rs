use crate::loader::files;
use share_core::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use sysinfo::{Components, System};
use tracing::{debug, info, warn};

/// One point-in-time reading, in the units the data files use.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// 1-minute load average.
    pub load_1: f64,
    pub num_cores: usize,
    /// Available RAM in kB.
    pub mem_free_kb: u64,
    /// Total RAM in kB.
    pub mem_total_kb: u64,
    /// Hottest sensor in milli-°C, `None` if no sensor is exposed.
    pub temp_millic: Option<i64>,
    /// `(used, total)` GPU memory in MiB, `None` without `nvidia-smi`.
    pub gpu_mib: Option<(f64, f64)>,
    pub host_name: String,
    pub distro: String,
}

/// Take a [`Sample`] of the running system.
pub fn probe() -> Sample {
    let sys = System::new_all();
    let components = Components::new_with_refreshed_list();

    let temp_millic = components
        .list()
        .iter()
        .filter_map(|c| c.temperature())
        .filter(|t| t.is_finite())
        .fold(None, |hottest: Option<f32>, t| Some(hottest.map_or(t, |h| h.max(t))))
        .map(|t| (f64::from(t) * 1000.0).round() as i64);

    let distro = match (System::name(), System::os_version()) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name,
        _ => System::long_os_version().unwrap_or_else(|| "unknown".to_string()),
    };

    Sample {
        load_1:       System::load_average().one,
        num_cores:    sys.cpus().len().max(1),
        mem_free_kb:  sys.available_memory() / 1024,
        mem_total_kb: sys.total_memory() / 1024,
        temp_millic,
        gpu_mib:      query_nvidia_smi(),
        host_name:    System::host_name().unwrap_or_else(|| "localhost".to_string()),
        distro,
    }
}

/// Ask `nvidia-smi` for memory usage of the first GPU.
fn query_nvidia_smi() -> Option<(f64, f64)> {
    let output = Command::new("nvidia-smi")
        .args([
            "--query-gpu=memory.used,memory.total",
            "--format=csv,noheader,nounits",
        ])
        .output()
        .map_err(|e| debug!("nvidia-smi unavailable: {e}"))
        .ok()?;

    if !output.status.success() {
        debug!("nvidia-smi exited with {}", output.status);
        return None;
    }

    parse_nvidia_smi(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the first `used, total` line of `nvidia-smi` CSV output.
pub fn parse_nvidia_smi(stdout: &str) -> Option<(f64, f64)> {
    let line = stdout.lines().find(|l| !l.trim().is_empty())?;
    let (used, total) = line.split_once(',')?;
    Some((used.trim().parse().ok()?, total.trim().parse().ok()?))
}

/// Append `sample` to the series files in `dir`, rewriting the single-value files.
///
/// Without a temperature sensor `cpuTemp.txt` is still created, so the
/// directory always loads; the thermal average then reads `N/A`.
pub fn append_sample(dir: impl AsRef<Path>, sample: &Sample) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    append(dir, files::CPU_LOAD, &format!("{:.2}", sample.load_1))?;
    append(dir, files::MEM_FREE, &sample.mem_free_kb.to_string())?;
    match sample.temp_millic {
        Some(t) => append(dir, files::CPU_TEMP, &t.to_string())?,
        None => {
            warn!("No temperature sensor found; no sample added to {}", files::CPU_TEMP);
            touch(dir, files::CPU_TEMP)?;
        }
    }
    if let Some((used, total)) = sample.gpu_mib {
        append(dir, files::GPU_USED, &used.to_string())?;
        append(dir, files::GPU_TOTAL, &total.to_string())?;
    }

    std::fs::write(dir.join(files::NUM_CORES), format!("{}\n", sample.num_cores))?;
    std::fs::write(dir.join(files::MEM_TOTAL), format!("{}\n", sample.mem_total_kb))?;
    std::fs::write(dir.join(files::HOST_NAME), format!("{}\n", sample.host_name))?;
    std::fs::write(dir.join(files::DISTRO_NAME), format!("{}\n", sample.distro))?;

    info!("Recorded sample in '{}'", dir.display());
    Ok(())
}

fn append(dir: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = open_append(dir, name)?;
    writeln!(file, "{value}")?;
    Ok(())
}

fn touch(dir: &Path, name: &str) -> Result<()> {
    open_append(dir, name)?;
    Ok(())
}

fn open_append(dir: &Path, name: &str) -> std::io::Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(name))
}
