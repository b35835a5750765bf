// Polling task - one panel's spawned refresh loop
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owns a spawned refresh loop. Dropping or cancelling the task aborts it,
/// which also drops any request future it is currently awaiting.
#[derive(Debug)]
pub struct PollingTask {
    handle: JoinHandle<()>,
}

impl PollingTask {
    /// Run `initial` once, then `tick` on every period if `every` is set.
    /// Without a period the task finishes after the initial run.
    pub fn spawn<I, T, F>(every: Option<Duration>, initial: I, mut tick: T) -> Self
    where
        I: Future<Output = ()> + Send + 'static,
        T: FnMut() -> F + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            initial.await;

            let Some(period) = every else {
                return;
            };
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial run covered it.
            interval.tick().await;
            loop {
                interval.tick().await;
                tick().await;
            }
        });

        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_one_shot_task_runs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let _task = PollingTask::spawn(
            None,
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            || async {},
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_periodic_task_ticks_until_cancelled() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let task = PollingTask::spawn(Some(Duration::from_millis(10)), async {}, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        task.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 3, "expected several ticks, saw {}", seen);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }
}
