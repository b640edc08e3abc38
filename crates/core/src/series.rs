use crate::error::{Result, ShareError};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered samples for a single telemetry metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<f64>);

impl Series {
    pub fn new(samples: Vec<f64>) -> Self {
        Self(samples)
    }

    pub fn samples(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean of all samples, `None` for an empty series.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Smallest and largest finite sample.
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.0
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl From<Vec<f64>> for Series {
    fn from(samples: Vec<f64>) -> Self {
        Self(samples)
    }
}

/// GPU memory readings as stored on disk.
#[derive(Debug, Clone, Default)]
pub struct RawGpu {
    pub used: Vec<f64>,
    pub total: Vec<f64>,
}

/// Numbers exactly as read from the data directory, before any derivation.
#[derive(Debug, Clone, Default)]
pub struct RawTelemetry {
    /// Number of CPU cores (one value, or one per sample).
    pub num_cores: Vec<f64>,
    /// 1-minute load average samples.
    pub cpu_load: Vec<f64>,
    /// Temperature samples in milli-degrees Celsius.
    pub cpu_temp: Vec<f64>,
    /// Free RAM samples (kB).
    pub mem_free: Vec<f64>,
    /// Total RAM (kB), one value or one per sample.
    pub mem_total: Vec<f64>,
    /// `None` when the GPU files are missing or unreadable.
    pub gpu: Option<RawGpu>,
}

/// Derived percentage / temperature series for one run.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    /// CPU load as a percentage of available cores.
    pub cpu: Series,
    /// RAM usage percentage.
    pub ram: Series,
    /// Temperature in °C.
    pub temp: Series,
    /// GPU memory usage percentage, `None` if no GPU data was recorded.
    pub gpu: Option<Series>,
}

impl Telemetry {
    /// Turn raw readings into percentage and temperature series.
    ///
    /// Divisor files (`num_cores`, `mem_total`, GPU total) may hold a single
    /// value that applies to every sample. A zero divisor is a data error.
    /// A malformed GPU pair (including a zero total) degrades to "no GPU"
    /// instead of failing the whole run.
    pub fn derive(raw: RawTelemetry) -> Result<Self> {
        let cpu = ratio(&raw.cpu_load, &raw.num_cores, "cpuLoad", "numCores")?
            .into_iter()
            .map(|v| v * 100.0)
            .collect();

        let ram = ratio(&raw.mem_free, &raw.mem_total, "memFree", "memTotal")?
            .into_iter()
            .map(|v| (1.0 - v) * 100.0)
            .collect();

        let temp = raw.cpu_temp.iter().map(|mc| mc / 1000.0).collect();

        let gpu = raw.gpu.and_then(|gpu| {
            match ratio(&gpu.used, &gpu.total, "gpuUsed", "gpuTotal") {
                Ok(values) => Some(Series::new(values.into_iter().map(|v| v * 100.0).collect())),
                Err(e) => {
                    tracing::warn!("GPU data ignored: {e}");
                    None
                }
            }
        });

        Ok(Self {
            cpu: Series::new(cpu),
            ram: Series::new(ram),
            temp: Series::new(temp),
            gpu,
        })
    }

    /// Number of data points (CPU samples).
    pub fn size(&self) -> usize {
        self.cpu.len()
    }

    /// Means of every series.
    ///
    /// CPU and RAM must have samples. Temperature and GPU fall back to
    /// [`Average::Unavailable`] on hosts without the sensor.
    pub fn averages(&self) -> Result<Averages> {
        let required = |name: &str, series: &Series| {
            series
                .mean()
                .ok_or_else(|| ShareError::Data(format!("{name} series has no samples")))
        };

        Ok(Averages {
            cpu: required("CPU", &self.cpu)?,
            ram: required("RAM", &self.ram)?,
            gpu: self.gpu.as_ref().and_then(Series::mean).into(),
            temp: self.temp.mean().into(),
        })
    }
}

/// Element-wise `num / den`, broadcasting a single-value side.
fn ratio(num: &[f64], den: &[f64], num_name: &str, den_name: &str) -> Result<Vec<f64>> {
    if den.iter().any(|d| *d == 0.0) {
        return Err(ShareError::Data(format!("{den_name} contains a zero divisor")));
    }

    match (num.len(), den.len()) {
        (n, d) if n == d => Ok(num.iter().zip(den).map(|(a, b)| a / b).collect()),
        (_, 1) => Ok(num.iter().map(|a| a / den[0]).collect()),
        (1, _) => Ok(den.iter().map(|b| num[0] / b).collect()),
        (n, d) => Err(ShareError::Data(format!(
            "{num_name} has {n} samples but {den_name} has {d}"
        ))),
    }
}

/// Mean of a series, or the "unavailable" sentinel for an absent sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Value(f64),
    Unavailable,
}

impl From<Option<f64>> for Average {
    fn from(mean: Option<f64>) -> Self {
        mean.map_or(Self::Unavailable, Self::Value)
    }
}

impl fmt::Display for Average {
    /// One decimal place, or `N/A`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.1}"),
            Self::Unavailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Averages mapping produced once per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub cpu: f64,
    pub ram: f64,
    pub gpu: Average,
    pub temp: Average,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawTelemetry {
        RawTelemetry {
            num_cores: vec![4.0],
            cpu_load: vec![1.0, 2.0, 4.0],
            cpu_temp: vec![40_000.0, 50_000.0],
            mem_free: vec![500.0, 250.0, 750.0],
            mem_total: vec![1000.0],
            gpu: None,
        }
    }

    #[test]
    fn mean_of_empty_series_is_none() {
        assert_eq!(Series::default().mean(), None);
    }

    #[test]
    fn derive_broadcasts_scalar_divisors() {
        let t = Telemetry::derive(raw()).unwrap();
        assert_eq!(t.cpu.samples(), &[25.0, 50.0, 100.0]);
        assert_eq!(t.ram.samples(), &[50.0, 75.0, 25.0]);
        assert_eq!(t.temp.samples(), &[40.0, 50.0]);
        assert_eq!(t.size(), 3);
        assert!(t.gpu.is_none());
    }

    #[test]
    fn derive_uses_per_sample_divisors() {
        let mut r = raw();
        r.mem_total = vec![1000.0, 500.0, 1000.0];
        let t = Telemetry::derive(r).unwrap();
        assert_eq!(t.ram.samples(), &[50.0, 50.0, 25.0]);
    }

    #[test]
    fn derive_rejects_mismatched_lengths() {
        let mut r = raw();
        r.mem_total = vec![1000.0, 1000.0];
        let err = Telemetry::derive(r).unwrap_err();
        assert!(err.to_string().contains("memFree has 3 samples but memTotal has 2"));
    }

    #[test]
    fn derive_rejects_zero_core_count() {
        let mut r = raw();
        r.num_cores = vec![0.0];
        assert!(matches!(Telemetry::derive(r), Err(ShareError::Data(_))));
    }

    #[test]
    fn malformed_gpu_degrades_to_unavailable() {
        let mut r = raw();
        r.gpu = Some(RawGpu {
            used: vec![1.0, 2.0, 3.0],
            total: vec![4.0, 4.0],
        });
        let t = Telemetry::derive(r).unwrap();
        assert!(t.gpu.is_none());
        assert_eq!(t.averages().unwrap().gpu, Average::Unavailable);
    }

    #[test]
    fn averages_include_gpu_when_present() {
        let mut r = raw();
        r.gpu = Some(RawGpu {
            used: vec![1.0, 3.0],
            total: vec![4.0],
        });
        let avg = Telemetry::derive(r).unwrap().averages().unwrap();
        assert!((avg.cpu - 175.0 / 3.0).abs() < 1e-9);
        assert_eq!(avg.ram, 50.0);
        assert_eq!(avg.temp, Average::Value(45.0));
        assert_eq!(avg.gpu, Average::Value(50.0));
    }

    #[test]
    fn derive_rejects_zero_memory_total() {
        let mut r = raw();
        r.mem_total = vec![1000.0, 0.0, 1000.0];
        let err = Telemetry::derive(r).unwrap_err();
        assert!(err.to_string().contains("memTotal contains a zero divisor"));
    }

    #[test]
    fn zero_gpu_total_degrades_to_unavailable() {
        let mut r = raw();
        r.gpu = Some(RawGpu {
            used: vec![1.0],
            total: vec![0.0],
        });
        let t = Telemetry::derive(r).unwrap();
        assert!(t.gpu.is_none());
        assert_eq!(t.averages().unwrap().gpu, Average::Unavailable);
    }

    #[test]
    fn averages_fail_on_empty_cpu_series() {
        let mut r = raw();
        r.cpu_load.clear();
        let t = Telemetry::derive(r).unwrap();
        let err = t.averages().unwrap_err();
        assert!(err.to_string().contains("CPU series has no samples"));
    }

    #[test]
    fn empty_temperature_is_unavailable() {
        let mut r = raw();
        r.cpu_temp.clear();
        let avg = Telemetry::derive(r).unwrap().averages().unwrap();
        assert_eq!(avg.temp, Average::Unavailable);
        assert_eq!(avg.cpu, 175.0 / 3.0);
    }

    #[test]
    fn average_displays_sentinel() {
        assert_eq!(Average::Value(12.345).to_string(), "12.3");
        assert_eq!(Average::Unavailable.to_string(), "N/A");
    }

    #[test]
    fn averages_serialize_sentinel_as_string() {
        let avg = Averages {
            cpu: 1.0,
            ram: 2.0,
            gpu: Average::Unavailable,
            temp: Average::Value(3.0),
        };
        let json = serde_json::to_value(avg).unwrap();
        assert_eq!(json["gpu"], "N/A");
        assert_eq!(json["temp"], 3.0);
        assert_eq!(json["cpu"], 1.0);
    }

    #[test]
    fn min_max_skips_non_finite() {
        let s = Series::new(vec![3.0, f64::NAN, -1.0, 7.5]);
        assert_eq!(s.min_max(), Some((-1.0, 7.5)));
    }
}
