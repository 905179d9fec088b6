use std::time::Duration;

/// How many times a fallible operation is attempted and how long to wait
/// between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The classifier rejected the error; no retry was made
    #[error("{0}")]
    Fatal(E),

    /// Every attempt failed with a transient error
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op`, retrying while `is_transient` accepts the error and attempts remain.
    ///
    /// Blocks the current thread during the delay; callers hold synchronous
    /// resources (a SQLite connection) across the whole operation.
    pub fn run<T, E, F, C>(
        &self,
        operation: &str,
        mut op: F,
        is_transient: C,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        C: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !is_transient(&e) => return Err(RetryError::Fatal(e)),
                Err(e) if attempt >= max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    })
                }
                Err(e) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Transient failure, retrying in {:?}",
                        self.delay
                    );
                    std::thread::sleep(self.delay);
                }
            }
        }
    }
}
