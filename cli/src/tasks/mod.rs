//! The installer routine and its read-only inspector.
mod context;
pub mod symlinks;

pub use context::Context;
pub use symlinks::{FileReport, Inspection, Outcome, Report, inspect, install};
