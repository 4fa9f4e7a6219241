//! Eventual consistency helpers for timing-dependent checks.
//!
//! `up` returns once the tool has started the containers, not once the
//! target service inside them is listening, and a UDP datagram is handled
//! asynchronously by the service. Verification callbacks poll through these
//! helpers instead of sleeping for a fixed time.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Categories of eventual consistency with their maximum wait.
#[derive(Debug, Clone, Copy)]
pub enum ConsistencyCategory {
    /// Target service accepting HTTP after `up` (image start + bind).
    ServiceStartup,

    /// A sent datagram becoming visible through `/udp`.
    DatagramDelivery,
}

impl ConsistencyCategory {
    /// Get the maximum timeout for this consistency category.
    pub fn timeout(&self) -> Duration {
        match self {
            ConsistencyCategory::ServiceStartup => Duration::from_secs(30),
            ConsistencyCategory::DatagramDelivery => Duration::from_secs(5),
        }
    }

    /// Get the initial retry delay for exponential backoff.
    fn initial_delay(&self) -> Duration {
        match self {
            ConsistencyCategory::ServiceStartup => Duration::from_millis(500),
            ConsistencyCategory::DatagramDelivery => Duration::from_millis(50),
        }
    }
}

/// Assert that a condition becomes true within the timeout for the given consistency category.
///
/// Uses exponential backoff with the following strategy:
/// - Initial delay: per category
/// - Exponential multiplier: 2x
/// - Maximum attempts: Until timeout is reached
pub async fn assert_eventually<F, Fut>(
    category: ConsistencyCategory,
    mut condition: F,
) -> Result<(), String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let timeout = category.timeout();
    let mut delay = category.initial_delay();
    let start = std::time::Instant::now();

    loop {
        if condition().await {
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(format!(
                "Condition not met within {:?} (category: {:?})",
                timeout, category
            ));
        }

        sleep(delay).await;

        delay *= 2;

        // Cap delay at remaining time
        let remaining = timeout.saturating_sub(elapsed);
        if delay > remaining {
            delay = remaining;
        }
    }
}
