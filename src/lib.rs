//! # Typewriter
//!
//! A rate-adaptive typewriter console for frame-driven scenes.
//!
//! Text is revealed one character at a time onto a fixed grid of glyph
//! cells, paced by a host frame clock. However much text arrives, the
//! console speeds up so the whole backlog finishes within one reveal window.
//!
//! ## Core Concepts
//!
//! - **Segment queue**: FIFO of text runs and line breaks awaiting reveal
//! - **Adaptive rate**: every append re-paces the backlog to fit the window
//! - **Deadline drop**: a backlog that misses its window is discarded
//! - **Render sinks**: an in-memory [`GlyphGrid`] or a [`TerminalSink`]
//! - **Tickers**: a host-driven [`FrameTicker`] or a wall-clock [`TickerActor`]
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use typewriter::{ConsoleConfig, FrameTicker, GlyphGrid, TypewriterConsole};
//!
//! let ticker = Rc::new(FrameTicker::new());
//! let grid = GlyphGrid::new(2, 8);
//! let mut console =
//!     TypewriterConsole::initialize(ConsoleConfig::new(2, 8, 500.0, 10), grid, ticker.clone())?;
//!
//! console.append("hello")?;
//! ticker.run_frames(5, 100.0);
//! assert_eq!(console.with_sink(|g| g.row_text(0))?, "hello   ");
//! # Ok::<(), typewriter::ConsoleError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod console;
pub mod error;
pub mod ffi;
pub mod sink;
pub mod terminal;
pub mod ticker;

// Re-exports for convenience
pub use config::ConsoleConfig;
pub use console::{ConsoleSnapshot, TypewriterConsole};
pub use error::ConsoleError;
pub use sink::{CellFlags, GlyphCell, GlyphGrid, RenderSink, Rgb};
pub use terminal::{OutputBuffer, TerminalSink};
pub use ticker::{FrameTicker, FrameTime, Tick, TickCallback, TickFlow, TickHandle, Ticker, TickerActor};
