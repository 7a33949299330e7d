//! `TickerActor`: wall-clock frame source on its own thread.
//!
//! Hosts that have no animation loop of their own spawn one of these and
//! forward its ticks into a [`FrameTicker`], which then drives the consoles
//! on the host thread. The thread never blocks on a slow host: when the
//! channel is full the tick is skipped and its time rolls into the next one.

use super::FrameTicker;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Longest single sleep, so shutdown is noticed promptly.
const MAX_SLEEP: Duration = Duration::from_millis(1);

/// One wall-clock frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Frame counter, including frames that were skipped.
    pub frame: u64,
    /// Time since the actor started.
    pub elapsed: Duration,
    /// Time since the last tick that was delivered.
    pub delta: Duration,
}

impl Tick {
    /// `delta` in fractional milliseconds.
    #[inline]
    pub fn delta_ms(&self) -> f64 {
        self.delta.as_secs_f64() * 1000.0
    }
}

/// Owns the clock thread and the receiving end of its channel.
pub struct TickerActor {
    worker: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    ticks: Receiver<Tick>,
}

impl TickerActor {
    /// Start emitting a tick every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the clock thread.
    pub fn spawn(interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, ticks) = bounded(2);

        let worker = {
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("typewriter-ticker".to_string())
                .spawn(move || clock_loop(&tx, &stop, interval))?
        };

        Ok(Self {
            worker: Some(worker),
            stop,
            ticks,
        })
    }

    /// The channel ticks arrive on.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.ticks
    }

    /// Advance `frames` once per tick already waiting, without blocking.
    ///
    /// Returns how many ticks were forwarded.
    pub fn forward_to(&self, frames: &FrameTicker) -> usize {
        let mut forwarded = 0;
        loop {
            match self.ticks.try_recv() {
                Ok(tick) => {
                    frames.advance(tick.delta_ms());
                    forwarded += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return forwarded,
            }
        }
    }

    /// Ask the clock thread to exit.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop the clock thread and wait for it.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn clock_loop(tx: &Sender<Tick>, stop: &AtomicBool, interval: Duration) {
    let started = Instant::now();
    let mut delivered_at = started;
    let mut due = started + interval;
    let mut frame = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now < due {
            thread::sleep((due - now).min(MAX_SLEEP));
            continue;
        }

        let tick = Tick {
            frame,
            elapsed: now - started,
            delta: now - delivered_at,
        };
        if tx.try_send(tick).is_ok() {
            delivered_at = now;
        }
        frame += 1;

        due += interval;
        // Fell more than a frame behind: restart the schedule from now
        if due < now {
            due = now + interval;
        }
    }
}
