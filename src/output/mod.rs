//! Output module
//!
//! Terminal formatting of run progress and summaries, and the on-disk layout
//! of the stdout/stderr sinks each task writes into.

mod console;
mod formatter;
mod sinks;

pub use console::Console;
pub use formatter::{Color, OutputFormat, ResultFormatter};
pub use sinks::{SinkLayout, SinkPair};
