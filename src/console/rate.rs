//! Rate controller: keeps the whole backlog inside one reveal window.
//!
//! Every append re-derives the per-character interval from the *entire*
//! pending backlog, so a burst arriving mid-reveal speeds up old and new
//! content together, and resets the deadline to a full window from now.

use super::segment::Segment;

/// Sum the equivalent length of `segments`.
///
/// Text counts its remaining characters; each break counts
/// `break_equivalent_chars`.
pub fn equivalent_length<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
    break_equivalent_chars: usize,
) -> usize {
    segments
        .into_iter()
        .map(|s| s.equivalent_len(break_equivalent_chars))
        .sum()
}

/// Interval that spreads `total_equivalent` characters across `window_ms`.
///
/// Falls back to `fallback_ms` when nothing is pending.
#[allow(clippy::cast_precision_loss)]
pub fn recompute_interval(total_equivalent: usize, window_ms: f64, fallback_ms: f64) -> f64 {
    if total_equivalent > 0 {
        window_ms / total_equivalent as f64
    } else {
        fallback_ms
    }
}

/// Pacing state: interval, accrued time and the rolling deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct RateController {
    window_ms: f64,
    fallback_ms: f64,
    interval_ms: f64,
    accumulated_ms: f64,
    deadline_ms: f64,
}

impl RateController {
    /// Create an idle controller.
    pub const fn new(window_ms: f64, fallback_ms: f64) -> Self {
        Self {
            window_ms,
            fallback_ms,
            interval_ms: fallback_ms,
            accumulated_ms: 0.0,
            deadline_ms: 0.0,
        }
    }

    /// Re-derive the interval for a backlog of `total_equivalent` and give it
    /// a fresh window starting at `now_ms`.
    pub fn retime(&mut self, total_equivalent: usize, now_ms: f64, reset_accumulator: bool) {
        self.interval_ms = recompute_interval(total_equivalent, self.window_ms, self.fallback_ms);
        self.deadline_ms = now_ms + self.window_ms;
        if reset_accumulator {
            self.accumulated_ms = 0.0;
        }
    }

    /// Whether `now_ms` is past the deadline.
    #[inline]
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms > self.deadline_ms
    }

    /// Add elapsed time.
    #[inline]
    pub fn accrue(&mut self, delta_ms: f64) {
        self.accumulated_ms += delta_ms;
    }

    /// Units due for reveal given the accrued time.
    ///
    /// A non-positive interval still guarantees one unit while work remains.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn due_units(&self, has_pending: bool) -> usize {
        if !has_pending {
            0
        } else if self.interval_ms > 0.0 {
            (self.accumulated_ms / self.interval_ms).floor() as usize
        } else {
            1
        }
    }

    /// Spend the accrued time for revealed units, keeping the fractional remainder.
    pub fn settle(&mut self) {
        if self.interval_ms > 0.0 {
            self.accumulated_ms %= self.interval_ms;
        } else {
            self.accumulated_ms = 0.0;
        }
    }

    /// Forget accrued time.
    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }

    /// Current per-character interval.
    #[inline]
    pub const fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Time accrued toward the next reveal.
    #[inline]
    pub const fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    /// Absolute time by which the backlog must be revealed.
    #[inline]
    pub const fn deadline_ms(&self) -> f64 {
        self.deadline_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::segment::split_segments;

    #[test]
    fn test_equivalent_length() {
        let segments = split_segments("AB\nCDE");
        assert_eq!(equivalent_length(&segments, 10), 15);
        assert_eq!(equivalent_length(&segments, 0), 5);
        assert_eq!(equivalent_length(&[], 10), 0);
    }

    #[test]
    fn test_recompute_interval() {
        assert!((recompute_interval(15, 1000.0, 50.0) - 1000.0 / 15.0).abs() < 1e-9);
        assert!((recompute_interval(0, 1000.0, 50.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_retime_resets_deadline_not_extends() {
        let mut rate = RateController::new(2000.0, 50.0);
        rate.retime(100, 0.0, true);
        assert!((rate.deadline_ms() - 2000.0).abs() < f64::EPSILON);

        rate.retime(200, 1500.0, true);
        assert!((rate.deadline_ms() - 3500.0).abs() < f64::EPSILON);
        assert!((rate.interval_ms() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_due_units_and_remainder() {
        let mut rate = RateController::new(1000.0, 50.0);
        rate.retime(10, 0.0, true);
        rate.accrue(250.0);
        assert_eq!(rate.due_units(true), 2);
        assert_eq!(rate.due_units(false), 0);

        rate.settle();
        assert!((rate.accumulated_ms() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_window_still_progresses() {
        let mut rate = RateController::new(0.0, 50.0);
        rate.retime(10, 0.0, true);
        assert!(rate.interval_ms() <= 0.0);
        rate.accrue(16.0);
        assert_eq!(rate.due_units(true), 1);
        rate.settle();
        assert!(rate.accumulated_ms().abs() < f64::EPSILON);
    }

    #[test]
    fn test_retime_can_keep_accumulator() {
        let mut rate = RateController::new(1000.0, 50.0);
        rate.accrue(30.0);
        rate.retime(10, 0.0, false);
        assert!((rate.accumulated_ms() - 30.0).abs() < f64::EPSILON);
        rate.retime(10, 0.0, true);
        assert!(rate.accumulated_ms().abs() < f64::EPSILON);
    }
}
