use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Delayed prefetch timers. Pending timers are aborted on [`cancel_all`] and on drop,
/// so nothing fires after the owner is gone.
///
/// [`cancel_all`]: PrefetchSchedule::cancel_all
#[derive(Debug, Default)]
pub struct PrefetchSchedule {
    timers: Vec<JoinHandle<()>>,
}

impl PrefetchSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, runtime: &Handle, delay: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.timers.retain(|timer| !timer.is_finished());
        self.timers.push(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        }));
    }

    pub fn pending(&self) -> usize {
        self.timers
            .iter()
            .filter(|timer| !timer.is_finished())
            .count()
    }

    pub fn cancel_all(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }
}

impl Drop for PrefetchSchedule {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn timers_fire_after_their_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut schedule = PrefetchSchedule::new();
        for delay_ms in [100, 200] {
            let fired = Arc::clone(&fired);
            schedule.schedule(&Handle::current(), Duration::from_millis(delay_ms), move || {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(schedule.pending(), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(schedule.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_schedule_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut schedule = PrefetchSchedule::new();
            let fired = Arc::clone(&fired);
            schedule.schedule(&Handle::current(), Duration::from_millis(50), move || {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
