//! Fixed-delay retry.
//!
//! Every failure is treated the same way: there is no jitter and no
//! distinction between rate limits, timeouts or server errors.

use std::fmt::Display;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Delays slept before the second, third and fourth attempts.
pub const DEFAULT_DELAYS: [Duration; 3] = [
    Duration::from_millis(500),
    Duration::from_millis(1000),
    Duration::from_millis(2000),
];

/// Retry schedule: one immediate attempt, then one more per delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    delays: Vec<Duration>,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::new(DEFAULT_DELAYS.to_vec())
    }
}

impl Backoff {
    pub fn new(delays: Vec<Duration>) -> Self {
        Backoff { delays }
    }

    /// Total number of attempts this schedule allows.
    pub fn attempts(&self) -> usize {
        self.delays.len() + 1
    }

    /// Call `f` until it succeeds or the schedule runs out, returning the
    /// first success or the last error.
    pub fn run<T, E, F>(&self, mut f: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut last = match f() {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };

        for (i, delay) in self.delays.iter().enumerate() {
            debug!(
                attempt = i + 1,
                of = self.attempts(),
                retry_in_ms = delay.as_millis() as u64,
                error = %last,
                "request failed, retrying"
            );
            if !delay.is_zero() {
                thread::sleep(*delay);
            }
            match f() {
                Ok(v) => return Ok(v),
                Err(e) => last = e,
            }
        }

        debug!(attempts = self.attempts(), error = %last, "giving up");
        Err(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> Backoff {
        Backoff::new(vec![Duration::ZERO; 3])
    }

    #[test]
    fn default_schedule_is_half_one_two_seconds() {
        let b = Backoff::default();
        assert_eq!(b.attempts(), 4);
        assert_eq!(b.delays, DEFAULT_DELAYS.to_vec());
    }

    #[test]
    fn first_success_is_not_retried() {
        let mut calls = 0;
        let out: Result<&str, String> = instant().run(|| {
            calls += 1;
            Ok("done")
        });
        assert_eq!(out, Ok("done"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn fails_twice_then_succeeds_after_three_calls() {
        let mut calls = 0;
        let out: Result<u32, String> = instant().run(|| {
            calls += 1;
            if calls <= 2 {
                Err(format!("failure {calls}"))
            } else {
                Ok(42)
            }
        });
        assert_eq!(out, Ok(42));
        assert_eq!(calls, 3);
    }

    #[test]
    fn always_failing_call_runs_four_times_and_returns_last_error() {
        let mut calls = 0;
        let out: Result<(), String> = instant().run(|| {
            calls += 1;
            Err(format!("failure {calls}"))
        });
        assert_eq!(out, Err("failure 4".to_string()));
        assert_eq!(calls, 4);
    }

    #[test]
    fn delays_are_actually_slept() {
        let b = Backoff::new(vec![Duration::from_millis(20), Duration::from_millis(20)]);
        let start = std::time::Instant::now();
        let _: Result<(), &str> = b.run(|| Err("nope"));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
