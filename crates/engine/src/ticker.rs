//! Fixed-timestep pacing for the update side.

use std::thread;
use std::time::{Duration, Instant};

/// Outcome of polling a [`FixedTicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// First poll: the clock starts now, nothing to simulate yet.
    Started,
    /// Less than one interval since the last tick.
    TooSoon { remaining: Duration },
    /// At least one interval passed; advance the simulation by this much.
    Elapsed(Duration),
}

/// Minimum-interval ticker on a monotonic clock.
///
/// A tick fires once at least `interval` has passed since the previous one, and
/// reports the whole elapsed time (not a multiple of `interval`), so a late tick
/// simply advances further.
#[derive(Debug, Clone)]
pub struct FixedTicker {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Ticker for `frame_rate` updates per second (minimum 1).
    pub fn from_frame_rate(frame_rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / frame_rate.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide what `now` means for the simulation. Pure apart from updating the
    /// last-tick timestamp when a tick fires.
    pub fn poll(&mut self, now: Instant) -> Tick {
        let Some(last) = self.last else {
            self.last = Some(now);
            return Tick::Started;
        };

        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.interval {
            return Tick::TooSoon {
                remaining: self.interval - elapsed,
            };
        }

        self.last = Some(now);
        Tick::Elapsed(elapsed)
    }

    /// Block until the next tick and return the elapsed time it reports.
    pub fn wait(&mut self) -> Duration {
        loop {
            match self.poll(Instant::now()) {
                Tick::Started => thread::sleep(self.interval),
                Tick::TooSoon { remaining } => thread::sleep(remaining),
                Tick::Elapsed(dt) => return dt,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn first_poll_only_starts_the_clock() {
        let mut t = FixedTicker::new(16 * MS);
        assert_eq!(t.poll(Instant::now()), Tick::Started);
    }

    #[test]
    fn too_soon_reports_remaining_time() {
        let mut t = FixedTicker::new(16 * MS);
        let t0 = Instant::now();
        t.poll(t0);
        assert_eq!(t.poll(t0 + 10 * MS), Tick::TooSoon { remaining: 6 * MS });
        assert_eq!(t.poll(t0 + 15 * MS), Tick::TooSoon { remaining: MS });
    }

    #[test]
    fn late_tick_reports_full_elapsed_time() {
        let mut t = FixedTicker::new(16 * MS);
        let t0 = Instant::now();
        t.poll(t0);
        assert_eq!(t.poll(t0 + 16 * MS), Tick::Elapsed(16 * MS));
        assert_eq!(t.poll(t0 + 56 * MS), Tick::Elapsed(40 * MS));
        assert_eq!(t.poll(t0 + 60 * MS), Tick::TooSoon { remaining: 12 * MS });
    }

    #[test]
    fn frame_rate_sets_interval() {
        assert_eq!(FixedTicker::from_frame_rate(50).interval(), 20 * MS);
        assert_eq!(FixedTicker::from_frame_rate(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn wait_returns_at_least_one_interval() {
        let mut t = FixedTicker::new(2 * MS);
        let dt = t.wait();
        assert!(dt >= 2 * MS);
    }
}
