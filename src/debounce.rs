use std::time::Duration;
use tokio::task::JoinHandle;

/// A cancel-and-restart timer.
///
/// Every `arm` aborts the previous timer and starts a new one tagged with a
/// fresh generation. A fire notification is only honoured by [`Debouncer::take_fired`]
/// when its generation is the live one, so a notification that was already
/// queued when the timer got cancelled is ignored.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)starts the timer. `on_fire` receives the generation once the delay
    /// elapses without another `arm` or `cancel`.
    pub fn arm<F>(&mut self, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        if self.cancel() {
            tracing::debug!("Debounce timer restarted");
        }
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        }));
        tracing::debug!("Debounce timer armed (generation {}, {:?})", generation, delay);
        generation
    }

    /// Stops any pending timer. Safe to call when nothing is pending.
    ///
    /// Returns whether a timer was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes a fire notification. Returns `true` only for the live generation.
    pub fn take_fired(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            tracing::debug!("Ignoring stale debounce fire (generation {})", generation);
            false
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(600));

        let tx1 = tx.clone();
        debouncer.arm(move |g| {
            let _ = tx1.send(g);
        });
        tokio::time::advance(Duration::from_millis(300)).await;
        let second = debouncer.arm(move |g| {
            let _ = tx.send(g);
        });

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, second);
        assert!(debouncer.take_fired(fired));
        assert!(!debouncer.is_pending());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_noop_safe() {
        let mut debouncer = Debouncer::new(Duration::from_millis(600));
        assert!(!debouncer.cancel());
        assert!(!debouncer.cancel());

        debouncer.arm(|_| {});
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_after_cancel_is_ignored() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let generation = debouncer.arm(|_| {});
        debouncer.cancel();
        assert!(!debouncer.take_fired(generation));
    }
}
