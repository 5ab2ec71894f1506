//! Sensor dashboard for AMD systems on Linux.
//!
//! The [`data`] module holds the collectors and the refresh scheduler; the
//! rest is the terminal front end that displays what they return.

pub mod action;
pub mod app;
pub mod components;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod theme;
pub mod tui;

pub use data::collector::Collector;
pub use data::snapshot::{CollectorResult, GpuReport, MetricKind, MetricSample, RefreshTick};
pub use data::source::{CommandRunner, FileReader, SourceConfig};
pub use data::RefreshScheduler;
pub use error::CollectorError;
