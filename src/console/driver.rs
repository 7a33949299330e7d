//! Frame driver: per-tick reveal progress.
//!
//! ```text
//!            append (queue non-empty)
//!   ┌──────┐ ─────────────────────────▶ ┌─────────┐
//!   │ Idle │                            │ Running │ ──┐ tick: reveal due units
//!   └──────┘ ◀───────────────────────── └─────────┘ ◀─┘
//!            queue drained / deadline passed
//! ```

use super::cursor::GridCursor;
use super::rate::{equivalent_length, RateController};
use super::segment::{SegmentQueue, Unit};
use crate::config::ConsoleConfig;
use crate::sink::RenderSink;
use crate::ticker::{FrameTime, TickFlow, TickHandle};
use tracing::{debug, info, trace, warn};

/// Everything one console owns between calls.
pub(crate) struct ConsoleState<S> {
    pub(crate) config: ConsoleConfig,
    pub(crate) queue: SegmentQueue,
    pub(crate) rate: RateController,
    pub(crate) cursor: GridCursor,
    pub(crate) sink: S,
    /// Live ticker registration; `Some` exactly while running.
    pub(crate) tick_handle: Option<TickHandle>,
}

impl<S: RenderSink> ConsoleState<S> {
    pub(crate) fn new(config: ConsoleConfig, sink: S) -> Self {
        Self {
            rate: RateController::new(config.window_ms, config.fallback_interval_ms),
            cursor: GridCursor::new(config.rows, config.cols),
            queue: SegmentQueue::new(),
            tick_handle: None,
            sink,
            config,
        }
    }

    pub(crate) const fn is_running(&self) -> bool {
        self.tick_handle.is_some()
    }

    pub(crate) fn pending_equivalent(&self) -> usize {
        equivalent_length(self.queue.iter(), self.config.break_equivalent_chars)
    }

    /// Queue `text` and re-pace the whole backlog from `now_ms`.
    pub(crate) fn enqueue(&mut self, text: &str, now_ms: f64) {
        let added = self.queue.push_text(text);
        let total = self.pending_equivalent();
        self.rate
            .retime(total, now_ms, self.config.reset_accumulator_on_append);
        debug!(
            added,
            pending = self.queue.len(),
            equivalent = total,
            interval_ms = self.rate.interval_ms(),
            deadline_ms = self.rate.deadline_ms(),
            "text appended"
        );
    }

    /// Drop the backlog and go idle.
    fn abandon(&mut self, now_ms: f64) -> TickFlow {
        info!(
            dropped_units = self.queue.unit_count(),
            now_ms,
            deadline_ms = self.rate.deadline_ms(),
            "reveal window expired, dropping backlog"
        );
        self.queue.clear();
        self.go_idle()
    }

    fn go_idle(&mut self) -> TickFlow {
        self.tick_handle = None;
        debug!("typewriter idle");
        TickFlow::Stop
    }

    /// Reveal the unit at the head of the queue.
    fn reveal_one(&mut self) -> bool {
        let cursor = &mut self.cursor;
        let sink = &mut self.sink;
        self.queue
            .pop_with(|unit| match unit {
                Unit::Glyph(glyph) => cursor.write_glyph(sink, glyph),
                Unit::Break => cursor.line_break(sink),
            })
            .is_some()
    }

    /// Run one frame. `now` reads the ticker clock for in-loop deadline checks.
    pub(crate) fn on_frame(&mut self, frame: FrameTime, now: impl Fn() -> f64) -> TickFlow {
        if !self.is_running() {
            return TickFlow::Stop;
        }

        let mut delta_ms = frame.delta_ms.max(0.0);
        if delta_ms > self.config.max_frame_delta_ms {
            warn!(
                delta_ms,
                clamped_to = self.config.max_frame_delta_ms,
                "frame delta clamped"
            );
            delta_ms = self.config.max_frame_delta_ms;
        }

        if self.rate.expired(frame.now_ms) {
            return self.abandon(frame.now_ms);
        }

        self.rate.accrue(delta_ms);
        if self.rate.interval_ms() <= 0.0 {
            warn!(interval_ms = self.rate.interval_ms(), "degenerate reveal interval");
        }

        let due = self.rate.due_units(!self.queue.is_empty());
        if due > 0 {
            trace!(due, accumulated_ms = self.rate.accumulated_ms(), "revealing");
            for _ in 0..due {
                let now_ms = now();
                if self.rate.expired(now_ms) {
                    return self.abandon(now_ms);
                }
                if !self.reveal_one() {
                    break;
                }
            }
            self.rate.settle();
        }

        if self.queue.is_empty() {
            self.go_idle()
        } else {
            TickFlow::Continue
        }
    }
}
