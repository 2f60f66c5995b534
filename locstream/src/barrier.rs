//! Readiness barrier: a single-shot, resettable gate.
//!
//! Commands whose results surface only as delegate callbacks must not be
//! issued before a stream consumer is attached, or the hardware silently
//! loses the result. The barrier makes that ordering explicit: the bridge
//! calls [`arm`](ReadinessBarrier::arm) when a consumer attaches and
//! [`reset`](ReadinessBarrier::reset) when it detaches, while gated commands
//! [`wait`](ReadinessBarrier::wait) before touching the provider.
//!
//! Any number of commands may wait concurrently against a single attach /
//! detach pair. All waiters are released together on `arm()`; there is no
//! ordering guarantee among them.

use std::sync::Arc;

use tokio::sync::watch;

/// Single-shot, resettable synchronization gate.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Debug, Clone)]
pub struct ReadinessBarrier {
    armed: Arc<watch::Sender<bool>>,
}

impl ReadinessBarrier {
    /// Create a barrier in the not-ready state.
    pub fn new() -> Self {
        let (armed, _) = watch::channel(false);
        Self {
            armed: Arc::new(armed),
        }
    }

    /// Mark the barrier ready, releasing all current and future waiters.
    ///
    /// Arming an already-armed barrier is a no-op.
    pub fn arm(&self) {
        self.armed
            .send_if_modified(|armed| !std::mem::replace(armed, true));
    }

    /// Return the barrier to not-ready; subsequent [`wait`](Self::wait) calls
    /// suspend again until the next [`arm`](Self::arm).
    pub fn reset(&self) {
        self.armed
            .send_if_modified(|armed| std::mem::replace(armed, false));
    }

    /// Whether the barrier is currently armed.
    pub fn is_armed(&self) -> bool {
        *self.armed.borrow()
    }

    /// Suspend until the barrier is armed; returns immediately if it already
    /// is. Dropping the returned future before it resolves has no effect on
    /// the barrier or other waiters.
    pub async fn wait(&self) {
        let mut rx = self.armed.subscribe();
        // The sender lives inside self, so the channel cannot close while we
        // hold &self.
        let _ = rx.wait_for(|armed| *armed).await;
    }
}

impl Default for ReadinessBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_wait_returns_immediately_when_armed() {
        let barrier = ReadinessBarrier::new();
        barrier.arm();
        timeout(Duration::from_millis(100), barrier.wait())
            .await
            .expect("armed barrier should not suspend");
    }

    #[tokio::test]
    async fn test_wait_suspends_until_armed() {
        let barrier = ReadinessBarrier::new();

        let waiter = {
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
            })
        };

        // Give the waiter a chance to reach the suspension point.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        barrier.arm();
        timeout(Duration::from_millis(200), waiter)
            .await
            .expect("waiter should be released by arm()")
            .unwrap();
    }

    #[tokio::test]
    async fn test_all_waiters_released_together() {
        let barrier = ReadinessBarrier::new();
        let mut waiters = Vec::new();
        for _ in 0..8 {
            let barrier = barrier.clone();
            waiters.push(tokio::spawn(async move { barrier.wait().await }));
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        barrier.arm();

        for waiter in waiters {
            timeout(Duration::from_millis(200), waiter)
                .await
                .expect("every waiter should be released")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_reset_suspends_subsequent_waits() {
        let barrier = ReadinessBarrier::new();
        barrier.arm();
        barrier.wait().await;

        barrier.reset();
        assert!(!barrier.is_armed());
        let result = timeout(Duration::from_millis(50), barrier.wait()).await;
        assert!(result.is_err(), "wait after reset should suspend again");
    }

    #[tokio::test]
    async fn test_double_arm_is_noop() {
        let barrier = ReadinessBarrier::new();
        barrier.arm();
        barrier.arm();
        assert!(barrier.is_armed());
        barrier.wait().await;

        // A single reset undoes any number of arms.
        barrier.reset();
        assert!(!barrier.is_armed());
    }

    #[tokio::test]
    async fn test_cancelled_wait_leaves_barrier_untouched() {
        let barrier = ReadinessBarrier::new();
        {
            let pending = barrier.wait();
            drop(pending);
        }
        assert!(!barrier.is_armed());

        barrier.arm();
        barrier.wait().await;
    }
}
