pub mod error;
pub mod report;
pub mod series;

pub use error::{Result, ShareError};
pub use report::{HostInfo, Report};
pub use series::{Average, Averages, RawGpu, RawTelemetry, Series, Telemetry};
