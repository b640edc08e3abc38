//! Histogram figure for a run's telemetry.
//!
//! [`histogram`] does the binning, [`plot`] draws the four panels with
//! plotters' bitmap backend.

pub mod histogram;
pub mod plot;

pub use histogram::{Bin, Histogram};
pub use plot::{panels, render, Panel};
