//! Telemetry data directory: loading the text files and recording new samples.

pub mod loader;
pub mod recorder;

pub use loader::{files, load_host, load_raw, load_report, read_samples, read_tokens};
pub use recorder::{append_sample, probe, Sample};
