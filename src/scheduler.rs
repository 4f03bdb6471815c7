//! Fixed-timestep scheduling.
//!
//! Wall-clock frame time is fed into a [`FixedStep`] accumulator which hands
//! back whole simulation ticks.  Slower sub-actions (fire polling, spawning)
//! are metered by [`Interval`]s counted in ticks, so their ordering relative
//! to the simulation is fixed and reproducible.

use std::time::Duration;

/// Upper bound on ticks run for a single frame.  After a long stall the
/// simulation skips ahead instead of replaying every missed tick.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Number of ticks closest to `period_ms` at `tick_hz`, never less than one.
pub fn ticks_for(period_ms: u64, tick_hz: u32) -> u64 {
    let ticks = period_ms
        .saturating_mul(u64::from(tick_hz))
        .saturating_add(500)
        / 1000;
    ticks.max(1)
}

#[derive(Clone, Debug)]
pub struct FixedStep {
    step: Duration,
    accumulated: Duration,
}

impl FixedStep {
    pub fn new(tick_hz: u32) -> Self {
        FixedStep {
            step: (Duration::from_secs(1) / tick_hz.max(1)).max(Duration::from_nanos(1)),
            accumulated: Duration::ZERO,
        }
    }

    /// Add `elapsed` wall time and return how many whole ticks are now due.
    pub fn consume(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.step {
            self.accumulated -= self.step;
            due += 1;
            if due == MAX_CATCH_UP_TICKS {
                if self.accumulated >= self.step {
                    log::debug!("Dropping {:?} of simulation backlog", self.accumulated);
                }
                self.accumulated = self.accumulated.min(self.step - Duration::from_nanos(1));
                break;
            }
        }
        due
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

/// Fires on every `period`-th call to [`Interval::tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    period: u64,
    count: u64,
}

impl Interval {
    pub fn every(period: u64) -> Self {
        Interval {
            period: period.max(1),
            count: 0,
        }
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_for_default_periods() {
        assert_eq!(ticks_for(100, 60), 6);
        assert_eq!(ticks_for(2000, 60), 120);
        assert_eq!(ticks_for(1, 60), 1);
    }

    #[test]
    fn ticks_for_saturates_on_huge_periods() {
        assert_eq!(ticks_for(u64::MAX, 60), u64::MAX / 1000);
        assert_eq!(ticks_for(1_000_000_000_000_000_000, 1000), u64::MAX / 1000);
    }

    #[test]
    fn fixed_step_never_shrinks_to_zero() {
        let mut fs = FixedStep::new(u32::MAX);
        assert_eq!(fs.consume(Duration::from_millis(16)), MAX_CATCH_UP_TICKS);
        assert_eq!(fs.consume(Duration::ZERO), 0);
    }

    #[test]
    fn fixed_step_accumulates_partial_frames() {
        let mut fs = FixedStep::new(60);
        assert_eq!(fs.consume(Duration::from_millis(10)), 0);
        assert_eq!(fs.consume(Duration::from_millis(10)), 1);
        assert_eq!(fs.consume(Duration::from_millis(33)), 2);
    }

    #[test]
    fn fixed_step_caps_catch_up() {
        let mut fs = FixedStep::new(60);
        assert_eq!(fs.consume(Duration::from_secs(5)), MAX_CATCH_UP_TICKS);
        // The backlog was dropped, not carried over.
        assert_eq!(fs.consume(Duration::ZERO), 0);
    }

    #[test]
    fn interval_fires_on_period() {
        let mut iv = Interval::every(3);
        let fired: Vec<bool> = (0..7).map(|_| iv.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true, false]);
    }
}
