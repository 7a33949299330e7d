//! Tickers: the animation loop the console subscribes to.
//!
//! The console registers a per-frame callback when it has something to
//! reveal and lets the registration lapse once it is idle again. Anything
//! that can run callbacks once per frame and report its clock can host it:
//!
//! - [`FrameTicker`]: single-threaded loop advanced by the host
//! - [`TickerActor`]: wall-clock tick source on its own thread, meant to feed
//!   a `FrameTicker`
//!
//! ```text
//! ┌──────────────┐   Tick (delta)   ┌─────────────┐  FrameTime  ┌──────────┐
//! │ TickerActor  │ ───────────────▶ │ FrameTicker │ ──────────▶ │ Console  │
//! └──────────────┘   crossbeam      └─────────────┘  callbacks  └──────────┘
//! ```

mod actor;
mod frame;

pub use actor::{Tick, TickerActor};
pub use frame::FrameTicker;

/// Timing handed to a tick callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// The ticker clock at this frame, in milliseconds.
    pub now_ms: f64,
    /// Time since the previous frame, in milliseconds.
    pub delta_ms: f64,
}

/// What a tick callback wants after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// Keep calling me every frame.
    Continue,
    /// Drop this registration.
    Stop,
}

/// Identifies one registration on a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(pub(crate) u64);

/// A per-frame callback.
pub type TickCallback = Box<dyn FnMut(FrameTime) -> TickFlow>;

/// An animation loop that runs registered callbacks once per frame.
///
/// Methods take `&self`: callbacks may register or deregister while the
/// ticker is dispatching, so implementations use interior mutability.
pub trait Ticker {
    /// Start calling `callback` every frame.
    fn register(&self, callback: TickCallback) -> TickHandle;

    /// Stop calling the callback behind `handle`. Unknown handles are ignored.
    fn deregister(&self, handle: TickHandle);

    /// Current clock in milliseconds.
    fn now_ms(&self) -> f64;
}
