//! Typewriter console: rate-adaptive text reveal on a fixed glyph grid.
//!
//! Text can arrive at any moment and in any amount. Every append re-paces the
//! entire unrevealed backlog so it finishes within one fixed window, and a
//! backlog that still misses its window is dropped rather than trickled out.
//!
//! # Architecture
//!
//! - [`segment`]: FIFO queue of text runs and line breaks
//! - [`rate`]: per-character interval and rolling deadline
//! - [`cursor`]: grid position, wrap and scroll-up
//! - `driver`: per-frame reveal loop registered on a [`Ticker`]
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use typewriter::{ConsoleConfig, FrameTicker, GlyphGrid, TypewriterConsole};
//!
//! let ticker = Rc::new(FrameTicker::new());
//! let config = ConsoleConfig::new(3, 5, 1000.0, 10);
//! let grid = GlyphGrid::new(3, 5);
//! let mut console = TypewriterConsole::initialize(config, grid, ticker.clone()).unwrap();
//!
//! console.append("AB\nCDE").unwrap();
//! ticker.run_frames(10, 100.0);
//!
//! let lines = console.with_sink(|grid| grid.lines()).unwrap();
//! assert_eq!(lines, vec!["AB   ", "CDE  ", "     "]);
//! assert!(!console.is_running());
//! ```

pub mod cursor;
mod driver;
pub mod rate;
pub mod segment;

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::sink::RenderSink;
use crate::ticker::{TickFlow, Ticker};
use driver::ConsoleState;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error};

/// Point-in-time view of the scheduler, for hosts and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleSnapshot {
    /// Pending segments (runs and breaks).
    pub pending_segments: usize,
    /// Pending reveal units (characters and breaks).
    pub pending_units: usize,
    /// Pending equivalent length used for pacing.
    pub pending_equivalent: usize,
    /// Current per-character interval.
    pub interval_ms: f64,
    /// Time accrued toward the next reveal.
    pub accumulated_ms: f64,
    /// Deadline of the current reveal window.
    pub deadline_ms: f64,
    /// Cursor `(row, col)`.
    pub cursor: (u16, u16),
    /// Whether a tick registration is live.
    pub running: bool,
}

/// A typewriter console bound to a render sink and a ticker.
///
/// The console is inert until the first [`append`](Self::append). While it
/// has pending content it keeps one callback registered on the ticker and
/// drops the registration once the backlog drains or expires.
pub struct TypewriterConsole<S: RenderSink + 'static, T: Ticker + 'static> {
    /// `None` once released.
    state: Option<Rc<RefCell<ConsoleState<S>>>>,
    ticker: Rc<T>,
}

impl<S: RenderSink + 'static, T: Ticker + 'static> TypewriterConsole<S, T> {
    /// Create a console drawing into `sink` and paced by `ticker`.
    ///
    /// The sink must be at least as large as the configured grid.
    pub fn initialize(config: ConsoleConfig, sink: S, ticker: Rc<T>) -> Result<Self, ConsoleError> {
        config.validate()?;
        if sink.rows() < config.rows || sink.cols() < config.cols {
            return Err(ConsoleError::InvalidGrid {
                rows: sink.rows(),
                cols: sink.cols(),
            });
        }

        debug!(rows = config.rows, cols = config.cols, window_ms = config.window_ms, "console initialized");
        Ok(Self {
            state: Some(Rc::new(RefCell::new(ConsoleState::new(config, sink)))),
            ticker,
        })
    }

    fn state(&self) -> Result<&Rc<RefCell<ConsoleState<S>>>, ConsoleError> {
        self.state.as_ref().ok_or_else(|| {
            error!("typewriter console used after release");
            ConsoleError::NotInitialized
        })
    }

    /// Queue text for reveal.
    ///
    /// Newlines become line breaks. The whole backlog, old and new, is
    /// re-paced to finish within one window from now.
    pub fn append(&mut self, text: &str) -> Result<(), ConsoleError> {
        let state = self.state()?;
        let mut inner = state.try_borrow_mut().map_err(|_| ConsoleError::Reentrant)?;

        inner.enqueue(text, self.ticker.now_ms());

        if !inner.is_running() && !inner.queue.is_empty() {
            let weak_state = Rc::downgrade(state);
            let weak_ticker = Rc::downgrade(&self.ticker);
            let handle = self.ticker.register(Box::new(move |frame| {
                let Some(state) = weak_state.upgrade() else {
                    return TickFlow::Stop;
                };
                let Ok(mut inner) = state.try_borrow_mut() else {
                    return TickFlow::Continue;
                };
                inner.on_frame(frame, || {
                    weak_ticker.upgrade().map_or(frame.now_ms, |t| t.now_ms())
                })
            }));
            inner.tick_handle = Some(handle);
            debug!(?handle, "typewriter running");
        }

        Ok(())
    }

    /// Blank the grid and home the cursor. Pending text is kept.
    pub fn clear(&mut self) -> Result<(), ConsoleError> {
        let state = self.state()?;
        let mut inner = state.try_borrow_mut().map_err(|_| ConsoleError::Reentrant)?;
        let inner = &mut *inner;
        for row in 0..inner.config.rows {
            for col in 0..inner.config.cols {
                inner.sink.clear_cell(row, col);
            }
        }
        inner.cursor.home();
        Ok(())
    }

    /// Stop animating and drop all state. Safe to call more than once.
    pub fn release(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        match state.try_borrow_mut() {
            Ok(mut inner) => {
                if let Some(handle) = inner.tick_handle.take() {
                    self.ticker.deregister(handle);
                }
                inner.queue.clear();
            }
            // Mid-tick: the callback only holds a weak reference and stops
            // on its next frame
            Err(_) => debug!("console released during its own tick"),
        }
        debug!("console released");
    }

    /// Whether the console has been released.
    pub const fn is_released(&self) -> bool {
        self.state.is_none()
    }

    /// Whether a ticker registration is live.
    pub fn is_running(&self) -> bool {
        self.state
            .as_ref()
            .and_then(|s| s.try_borrow().ok().map(|inner| inner.is_running()))
            .unwrap_or(false)
    }

    /// Inspect the scheduler.
    pub fn snapshot(&self) -> Result<ConsoleSnapshot, ConsoleError> {
        let inner = self.state()?.try_borrow().map_err(|_| ConsoleError::Reentrant)?;
        Ok(ConsoleSnapshot {
            pending_segments: inner.queue.len(),
            pending_units: inner.queue.unit_count(),
            pending_equivalent: inner.pending_equivalent(),
            interval_ms: inner.rate.interval_ms(),
            accumulated_ms: inner.rate.accumulated_ms(),
            deadline_ms: inner.rate.deadline_ms(),
            cursor: inner.cursor.position(),
            running: inner.is_running(),
        })
    }

    /// Run `f` with shared access to the sink.
    pub fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, ConsoleError> {
        let inner = self.state()?.try_borrow().map_err(|_| ConsoleError::Reentrant)?;
        Ok(f(&inner.sink))
    }

    /// Run `f` with exclusive access to the sink, e.g. to present a frame.
    pub fn with_sink_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, ConsoleError> {
        let mut inner = self.state()?.try_borrow_mut().map_err(|_| ConsoleError::Reentrant)?;
        Ok(f(&mut inner.sink))
    }

    /// The ticker this console is paced by.
    pub fn ticker(&self) -> &Rc<T> {
        &self.ticker
    }
}

impl<S: RenderSink + 'static, T: Ticker + 'static> Drop for TypewriterConsole<S, T> {
    fn drop(&mut self) {
        self.release();
    }
}
