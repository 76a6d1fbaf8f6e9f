use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::error::Result;

/// One unit of periodic work.
#[async_trait]
pub trait PeriodicJob: Send + 'static {
    /// Short label used in log fields.
    fn name(&self) -> &'static str;

    /// Run once. An error is logged by the engine and the next tick proceeds.
    async fn tick(&mut self) -> Result<()>;
}

/// Drives a [`PeriodicJob`] every `every` until shutdown.
pub struct PeriodicEngine<J> {
    job: J,
    every: Duration,
}

impl<J: PeriodicJob> PeriodicEngine<J> {
    pub fn new(job: J, every: Duration) -> Self {
        Self { job, every }
    }

    /// Main loop. The first tick fires one full interval after start. Returns
    /// the number of ticks executed once `shutdown` broadcasts `true` or its
    /// sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let name = self.job.name();
        if *shutdown.borrow() {
            return 0;
        }
        info!(job = name, every_secs = self.every.as_secs_f64(), "periodic task started");

        let mut interval = tokio::time::interval_at(Instant::now() + self.every, self.every);
        // A slow tick must not cause a burst of catch-up ticks.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut runs: u64 = 0;
        loop {
            tokio::select! {
                // Shutdown wins over a tick that is due at the same time.
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(job = name, runs, "periodic task shutting down");
                        break;
                    }
                }
                _ = interval.tick() => {
                    runs += 1;
                    if let Err(e) = self.job.tick().await {
                        error!(job = name, run = runs, "tick failed: {e}");
                    }
                }
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use airsync_store::StoreError;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        runs: Arc<AtomicU64>,
        fail: bool,
    }

    #[async_trait]
    impl PeriodicJob for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn tick(&mut self) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SchedulerError::Store(StoreError::Unavailable(
                    "intentional failure".to_string(),
                )));
            }
            Ok(())
        }
    }

    /// Sleeps longer than the interval and records how many ticks overlap.
    struct Slow {
        active: Arc<AtomicUsize>,
        max_active: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PeriodicJob for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn tick(&mut self) -> Result<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counting(fail: bool) -> (Counting, Arc<AtomicU64>) {
        let runs = Arc::new(AtomicU64::new(0));
        (
            Counting {
                runs: runs.clone(),
                fail,
            },
            runs,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn one_second_interval_runs_two_to_four_times_in_three_seconds() {
        let (job, runs) = counting(false);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(PeriodicEngine::new(job, Duration::from_secs(1)).run(rx));

        tokio::time::sleep(Duration::from_secs(3)).await;
        tx.send(true).unwrap();
        let ticks = handle.await.unwrap();

        let n = runs.load(Ordering::SeqCst);
        assert!((2..=4).contains(&n), "ran {n} times");
        assert_eq!(ticks, n);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_interval() {
        let (job, runs) = counting(false);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(PeriodicEngine::new(job, Duration::from_secs(10)).run(rx));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_ticks_do_not_stop_the_engine() {
        let (job, runs) = counting(true);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(PeriodicEngine::new(job, Duration::from_secs(1)).run(rx));

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(runs.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_ticks_never_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let job = Slow {
            active: active.clone(),
            max_active: max_active.clone(),
        };
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(PeriodicEngine::new(job, Duration::from_secs(1)).run(rx));

        tokio::time::sleep(Duration::from_secs(12)).await;
        tx.send(true).unwrap();
        let ticks = handle.await.unwrap();

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        // 2.5 s ticks on a 1 s interval with skipped catch-up: far fewer than 12.
        assert!(ticks >= 3 && ticks <= 5, "ran {ticks} ticks");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_stops_the_engine() {
        let (job, _runs) = counting(false);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(PeriodicEngine::new(job, Duration::from_secs(1)).run(rx));
        drop(tx);
        assert_eq!(handle.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn already_signalled_shutdown_returns_immediately() {
        let (job, runs) = counting(false);
        let (_tx, rx) = watch::channel(true);
        let ticks = PeriodicEngine::new(job, Duration::from_secs(1)).run(rx).await;
        assert_eq!(ticks, 0);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
