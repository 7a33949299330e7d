//! Terminal output: a render sink backed by a terminal region.

mod output;
mod sink;

pub use output::OutputBuffer;
pub use sink::TerminalSink;
