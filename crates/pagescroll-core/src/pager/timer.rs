//! One-shot deadline timer
//!
//! Nothing runs in the background: the owner checks the timer against a clock
//! reading, so a cancelled or dropped timer can never fire late.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleTimer {
    deadline: Option<Instant>,
}

impl SettleTimer {
    /// Arm the timer, replacing any earlier deadline
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Armed and not yet expired
    #[inline]
    pub fn is_pending(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Disarm and return true if the deadline has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = SettleTimer::default();
        timer.arm(start, Duration::from_millis(1000));

        assert!(timer.is_pending(start + Duration::from_millis(999)));
        assert!(!timer.fire(start + Duration::from_millis(999)));
        assert!(timer.fire(start + Duration::from_millis(1000)));
        assert!(!timer.fire(start + Duration::from_millis(2000)));
        assert_eq!(timer, SettleTimer::default());
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let start = Instant::now();
        let mut timer = SettleTimer::default();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();

        assert!(!timer.is_pending(start));
        assert!(!timer.fire(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_rearm_supersedes() {
        let start = Instant::now();
        let mut timer = SettleTimer::default();
        timer.arm(start, Duration::from_millis(100));
        timer.arm(start + Duration::from_millis(50), Duration::from_millis(100));

        assert!(!timer.fire(start + Duration::from_millis(120)));
        assert!(timer.is_pending(start + Duration::from_millis(149)));
        assert!(timer.fire(start + Duration::from_millis(150)));
    }
}
