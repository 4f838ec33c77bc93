use std::time::Duration;

/// How many times to try again, and how long to wait in between.
///
/// `attempts` counts retries after the first try: a policy with
/// `attempts = 5` allows six tries in total and sleeps at most five times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Never retry.
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Total number of tries, the first one included.
    pub fn tries(&self) -> u32 {
        self.attempts.saturating_add(1)
    }

    /// Sleep for one retry interval.
    pub async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(5, 6)]
    #[case(u32::MAX, u32::MAX)]
    fn test_tries(#[case] attempts: u32, #[case] expected: u32) {
        assert_eq!(RetryPolicy::new(attempts, Duration::ZERO).tries(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_for_interval() {
        let policy = RetryPolicy::new(1, Duration::from_secs(30));
        let start = tokio::time::Instant::now();
        policy.pause().await;
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }
}
