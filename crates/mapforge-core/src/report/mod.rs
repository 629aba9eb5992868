//! Human-readable summaries of processing runs.

pub mod console;

pub use console::{format_batch_report, format_write_summary};
