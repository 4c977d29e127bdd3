// Headless host: command line, main loop and frame capture.

pub mod capture;
pub mod config;
pub mod host;
pub mod logging;

pub use capture::{Capture, CaptureStats, CaptureSummary, Frame};
pub use config::{HostConfig, RunMode};
pub use host::{load_wads, Host, RunReport};
