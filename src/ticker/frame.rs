//! `FrameTicker`: a host-driven, single-threaded animation loop.

use super::{FrameTime, TickCallback, TickFlow, TickHandle, Ticker};
use std::cell::{Cell, RefCell};

type Registration = (TickHandle, TickCallback);

/// Single-threaded ticker advanced explicitly by the host.
///
/// Each [`advance`](Self::advance) moves the clock and runs every live
/// callback once. Callbacks registered during a frame start on the next one;
/// callbacks deregistered during a frame are not called again.
pub struct FrameTicker {
    now_ms: Cell<f64>,
    frame: Cell<u64>,
    next_id: Cell<u64>,
    /// Live registrations (empty while a frame is dispatching).
    active: RefCell<Vec<Registration>>,
    /// Registrations waiting for the next frame.
    incoming: RefCell<Vec<Registration>>,
    /// Handles deregistered while their callback was out for dispatch.
    cancelled: RefCell<Vec<TickHandle>>,
    dispatching: Cell<bool>,
}

impl std::fmt::Debug for FrameTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTicker")
            .field("now_ms", &self.now_ms.get())
            .field("frame", &self.frame.get())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTicker {
    /// Create a ticker with its clock at zero.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a ticker with its clock at `now_ms`.
    pub const fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
            frame: Cell::new(0),
            next_id: Cell::new(0),
            active: RefCell::new(Vec::new()),
            incoming: RefCell::new(Vec::new()),
            cancelled: RefCell::new(Vec::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }

    /// Number of live registrations, including ones starting next frame.
    pub fn listener_count(&self) -> usize {
        let cancelled = self.cancelled.borrow();
        let live = |list: &RefCell<Vec<Registration>>| {
            list.try_borrow()
                .map(|l| l.iter().filter(|(h, _)| !cancelled.contains(h)).count())
                .unwrap_or(0)
        };
        live(&self.active) + live(&self.incoming)
    }

    /// Move the clock forward by `delta_ms` and run one frame.
    ///
    /// Negative deltas are treated as zero. Calling `advance` from inside a
    /// callback does nothing.
    pub fn advance(&self, delta_ms: f64) {
        if self.dispatching.get() {
            return;
        }
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let now_ms = self.now_ms.get() + delta_ms;
        self.now_ms.set(now_ms);
        self.frame.set(self.frame.get() + 1);

        let mut batch = std::mem::take(&mut *self.active.borrow_mut());
        batch.append(&mut self.incoming.borrow_mut());

        let frame = FrameTime { now_ms, delta_ms };
        self.dispatching.set(true);
        let mut kept = Vec::with_capacity(batch.len());
        for (handle, mut callback) in batch {
            if self.cancelled.borrow().contains(&handle) {
                continue;
            }
            if callback(frame) == TickFlow::Continue {
                kept.push((handle, callback));
            }
        }
        self.dispatching.set(false);

        let mut cancelled = self.cancelled.borrow_mut();
        kept.retain(|(handle, _)| !cancelled.contains(handle));
        cancelled.clear();
        *self.active.borrow_mut() = kept;
    }

    /// Advance `frames` times by `delta_ms` each.
    pub fn run_frames(&self, frames: usize, delta_ms: f64) {
        for _ in 0..frames {
            self.advance(delta_ms);
        }
    }
}

impl Ticker for FrameTicker {
    fn register(&self, callback: TickCallback) -> TickHandle {
        let handle = TickHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.incoming.borrow_mut().push((handle, callback));
        handle
    }

    fn deregister(&self, handle: TickHandle) {
        self.incoming.borrow_mut().retain(|(h, _)| *h != handle);
        if self.dispatching.get() {
            self.cancelled.borrow_mut().push(handle);
        } else {
            self.active.borrow_mut().retain(|(h, _)| *h != handle);
        }
    }

    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn counter(ticker: &FrameTicker, stop_after: usize) -> (TickHandle, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let handle = ticker.register(Box::new(move |_| {
            seen.set(seen.get() + 1);
            if seen.get() >= stop_after {
                TickFlow::Stop
            } else {
                TickFlow::Continue
            }
        }));
        (handle, calls)
    }

    #[test]
    fn test_frame_ticker_clock() {
        let ticker = FrameTicker::starting_at(10.0);
        ticker.advance(16.0);
        ticker.advance(-5.0);
        assert!((ticker.now_ms() - 26.0).abs() < f64::EPSILON);
        assert_eq!(ticker.frame(), 2);
    }

    #[test]
    fn test_frame_ticker_passes_frame_time() {
        let ticker = FrameTicker::new();
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        ticker.register(Box::new(move |frame| {
            sink.set(Some(frame));
            TickFlow::Continue
        }));

        ticker.advance(20.0);
        assert_eq!(seen.get(), Some(FrameTime { now_ms: 20.0, delta_ms: 20.0 }));
    }

    #[test]
    fn test_frame_ticker_stop_drops_registration() {
        let ticker = FrameTicker::new();
        let (_, calls) = counter(&ticker, 2);
        assert_eq!(ticker.listener_count(), 1);

        ticker.run_frames(5, 16.0);
        assert_eq!(calls.get(), 2);
        assert_eq!(ticker.listener_count(), 0);
    }

    #[test]
    fn test_frame_ticker_deregister() {
        let ticker = FrameTicker::new();
        let (handle, calls) = counter(&ticker, usize::MAX);
        ticker.advance(16.0);
        ticker.deregister(handle);
        ticker.deregister(handle);
        ticker.advance(16.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(ticker.listener_count(), 0);
    }

    #[test]
    fn test_frame_ticker_deregister_during_dispatch() {
        let ticker = Rc::new(FrameTicker::new());
        let (victim, calls) = counter(&ticker, usize::MAX);

        let weak = Rc::downgrade(&ticker);
        ticker.register(Box::new(move |_| {
            if let Some(t) = weak.upgrade() {
                t.deregister(victim);
            }
            TickFlow::Stop
        }));

        // Victim runs first this frame, then gets cancelled
        ticker.advance(16.0);
        ticker.advance(16.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(ticker.listener_count(), 0);
    }

    #[test]
    fn test_frame_ticker_register_during_dispatch_starts_next_frame() {
        let ticker = Rc::new(FrameTicker::new());
        let late_calls = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&ticker);
        let late = late_calls.clone();
        ticker.register(Box::new(move |_| {
            if let Some(t) = weak.upgrade() {
                let late = late.clone();
                t.register(Box::new(move |_| {
                    late.set(late.get() + 1);
                    TickFlow::Continue
                }));
            }
            TickFlow::Stop
        }));

        ticker.advance(16.0);
        assert_eq!(late_calls.get(), 0);
        ticker.advance(16.0);
        assert_eq!(late_calls.get(), 1);
    }
}
