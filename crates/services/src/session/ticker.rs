use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use practice_core::Clock;
use practice_core::time::elapsed_secs;

/// Cancellable 1-second stopwatch publisher.
///
/// Publishes clamped elapsed seconds for one measurement window into a
/// `watch` channel once per second. Dropping the handle aborts the task, so
/// replacing the field that owns a `Ticker` is enough to guarantee the old
/// cadence is dead before a new one starts.
#[derive(Debug)]
pub struct Ticker {
    handle: tokio::task::JoinHandle<()>,
    live: Arc<AtomicUsize>,
}

impl Ticker {
    /// Spawn a ticker measuring from `started_at`.
    ///
    /// `live` counts handles currently alive; it exists so tests can assert
    /// the one-ticker invariant under rapid question churn.
    #[must_use]
    pub fn spawn(
        clock: Clock,
        started_at: DateTime<Utc>,
        tx: watch::Sender<u64>,
        live: Arc<AtomicUsize>,
    ) -> Self {
        live.fetch_add(1, Ordering::SeqCst);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick fires immediately; skip it so the cadence starts one
            // second after the window opens.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(elapsed_secs(started_at, clock.now())).is_err() {
                    break;
                }
            }
        });

        Self { handle, live }
    }

    /// Number of ticker handles currently alive for this counter.
    #[must_use]
    pub fn live_count(live: &Arc<AtomicUsize>) -> usize {
        live.load(Ordering::SeqCst)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::time::fixed_now;

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_once_per_second() {
        let (tx, mut rx) = watch::channel(0_u64);
        let live = Arc::new(AtomicUsize::new(0));
        let mut clock = Clock::fixed(fixed_now());

        // Pretend three seconds pass on the wall clock.
        clock.advance(chrono::Duration::seconds(3));
        let ticker = Ticker::spawn(clock, fixed_now(), tx, live.clone());
        assert_eq!(Ticker::live_count(&live), 1);

        // Let the task register its interval before moving the test clock.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 3);

        drop(ticker);
        assert_eq!(Ticker::live_count(&live), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_before_first_tick_publishes_nothing() {
        let (tx, rx) = watch::channel(0_u64);
        let live = Arc::new(AtomicUsize::new(0));

        let ticker = Ticker::spawn(Clock::fixed(fixed_now()), fixed_now(), tx, live.clone());
        drop(ticker);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(*rx.borrow(), 0);
        assert_eq!(Ticker::live_count(&live), 0);
    }
}
