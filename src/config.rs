//! Console configuration.

use crate::error::ConsoleError;

/// Default grid height in rows.
pub const DEFAULT_ROWS: u16 = 8;
/// Default grid width in columns.
pub const DEFAULT_COLS: u16 = 40;
/// Default reveal window for the whole backlog.
pub const DEFAULT_WINDOW_MS: f64 = 2000.0;
/// Default equivalent length of one line break.
pub const DEFAULT_BREAK_EQUIVALENT_CHARS: usize = 10;
/// Default cap on the elapsed time consumed by a single tick.
pub const DEFAULT_MAX_FRAME_DELTA_MS: f64 = 100.0;
/// Default interval used when nothing is pending.
pub const DEFAULT_FALLBACK_INTERVAL_MS: f64 = 50.0;

/// Configuration for a [`TypewriterConsole`](crate::TypewriterConsole).
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Grid height in rows.
    pub rows: u16,
    /// Grid width in columns.
    pub cols: u16,
    /// Every append gives the whole backlog this long to finish revealing.
    pub window_ms: f64,
    /// How many characters' worth of time a line break takes.
    pub break_equivalent_chars: usize,
    /// Elapsed time per tick is clamped to this value.
    pub max_frame_delta_ms: f64,
    /// Reveal interval used when the backlog is empty.
    pub fallback_interval_ms: f64,
    /// Whether an append discards the partially accrued time of the previous rate.
    pub reset_accumulator_on_append: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            window_ms: DEFAULT_WINDOW_MS,
            break_equivalent_chars: DEFAULT_BREAK_EQUIVALENT_CHARS,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
            fallback_interval_ms: DEFAULT_FALLBACK_INTERVAL_MS,
            reset_accumulator_on_append: true,
        }
    }
}

impl ConsoleConfig {
    /// Create a configuration with the given grid and pacing, other fields default.
    pub fn new(rows: u16, cols: u16, window_ms: f64, break_equivalent_chars: usize) -> Self {
        Self {
            rows,
            cols,
            window_ms,
            break_equivalent_chars,
            ..Self::default()
        }
    }

    /// Set the per-tick elapsed time clamp.
    #[must_use]
    pub const fn with_max_frame_delta(mut self, max_frame_delta_ms: f64) -> Self {
        self.max_frame_delta_ms = max_frame_delta_ms;
        self
    }

    /// Set the interval used when the backlog is empty.
    #[must_use]
    pub const fn with_fallback_interval(mut self, fallback_interval_ms: f64) -> Self {
        self.fallback_interval_ms = fallback_interval_ms;
        self
    }

    /// Choose whether appends reset the fractional time accumulator.
    #[must_use]
    pub const fn with_reset_accumulator(mut self, reset: bool) -> Self {
        self.reset_accumulator_on_append = reset;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConsoleError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let timings = [
            ("window_ms", self.window_ms),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
            ("fallback_interval_ms", self.fallback_interval_ms),
        ];
        for (field, value) in timings {
            if !value.is_finite() || value < 0.0 {
                return Err(ConsoleError::InvalidTiming { field, value });
            }
        }

        Ok(())
    }
}
