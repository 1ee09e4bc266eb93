//! Bounded retries with a single fallback attempt
//!
//! The primary task is attempted up to `max_attempts` times with a fixed,
//! blocking delay between attempts (none after the last). When every primary
//! attempt fails and a fallback is configured, the fallback gets exactly one
//! attempt. A failed fallback is reported as [`Outcome::Failed`], never as an
//! error: callers log it and move on to the next component.

use super::{Fetch, FetchTask};
use crate::core::output;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(3))
    }
}

/// Result of acquiring one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The primary source succeeded on attempt `attempts` (1-based).
    Primary { attempts: u32 },
    /// The primary was exhausted and the fallback succeeded.
    Fallback,
    /// Nothing succeeded. `reason` is the last error seen.
    Failed { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Run `primary` under `policy`, then `fallback` once if needed.
pub fn acquire(
    fetcher: &dyn Fetch,
    primary: &FetchTask,
    fallback: Option<&FetchTask>,
    policy: &RetryPolicy,
) -> Outcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match fetcher.fetch(primary) {
            Ok(()) => return Outcome::Primary { attempts: attempt },
            Err(e) => {
                last_error = format!("{:#}", e);
                output::warning(&format!(
                    "attempt {}/{} failed for {}: {}",
                    attempt, max_attempts, primary.locator, last_error
                ));
            }
        }
        if attempt < max_attempts && !policy.delay.is_zero() {
            std::thread::sleep(policy.delay);
        }
    }

    let Some(fallback) = fallback else {
        output::error(&format!(
            "giving up on {} after {} attempts",
            primary.locator, max_attempts
        ));
        return Outcome::Failed { reason: last_error };
    };

    output::info(&format!("trying fallback source {}", fallback.locator));
    match fetcher.fetch(fallback) {
        Ok(()) => Outcome::Fallback,
        Err(e) => {
            let reason = format!("{:#}", e);
            output::warning(&format!(
                "fallback {} failed: {}",
                fallback.locator, reason
            ));
            Outcome::Failed { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::acquire::Backend;
    use anyhow::bail;
    use std::cell::RefCell;

    /// Fails the first `failures` calls for each locator, then succeeds.
    struct Flaky {
        failures: usize,
        fail_locators: Vec<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl Flaky {
        fn new(failures: usize, fail_locators: Vec<&'static str>) -> Self {
            Self {
                failures,
                fail_locators,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls_for(&self, locator: &str) -> usize {
            self.calls.borrow().iter().filter(|c| *c == locator).count()
        }
    }

    impl Fetch for Flaky {
        fn fetch(&self, task: &FetchTask) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(task.locator.clone());
            if self.fail_locators.contains(&task.locator.as_str()) {
                bail!("permanent failure");
            }
            if self.calls_for(&task.locator) <= self.failures {
                bail!("transient failure");
            }
            Ok(())
        }
    }

    fn task(locator: &str) -> FetchTask {
        FetchTask::new(locator, "/tmp/unused", Backend::Http)
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[test]
    fn test_first_attempt_success() {
        let fetcher = Flaky::new(0, vec![]);
        let outcome = acquire(&fetcher, &task("p"), Some(&task("f")), &policy(5));
        assert_eq!(outcome, Outcome::Primary { attempts: 1 });
        assert_eq!(fetcher.calls_for("f"), 0);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let fetcher = Flaky::new(2, vec![]);
        let outcome = acquire(&fetcher, &task("p"), None, &policy(5));
        assert_eq!(outcome, Outcome::Primary { attempts: 3 });
    }

    #[test]
    fn test_exactly_max_attempts_then_one_fallback() {
        let fetcher = Flaky::new(0, vec!["p", "f"]);
        let outcome = acquire(&fetcher, &task("p"), Some(&task("f")), &policy(4));
        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(fetcher.calls_for("p"), 4);
        assert_eq!(fetcher.calls_for("f"), 1);
    }

    #[test]
    fn test_fallback_success() {
        let fetcher = Flaky::new(0, vec!["p"]);
        let outcome = acquire(&fetcher, &task("p"), Some(&task("f")), &policy(3));
        assert_eq!(outcome, Outcome::Fallback);
        assert!(outcome.is_success());
    }

    #[test]
    fn test_no_fallback_reports_last_error() {
        let fetcher = Flaky::new(0, vec!["p"]);
        let outcome = acquire(&fetcher, &task("p"), None, &policy(2));
        assert_eq!(
            outcome,
            Outcome::Failed {
                reason: "permanent failure".to_string()
            }
        );
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let fetcher = Flaky::new(0, vec![]);
        let p = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        };
        assert_eq!(
            acquire(&fetcher, &task("p"), None, &p),
            Outcome::Primary { attempts: 1 }
        );
    }
}
