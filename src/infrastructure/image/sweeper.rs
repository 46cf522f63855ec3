//! Background task that keeps the image caches within capacity.
//!
//! Every sweep logs the size of each cache at `info` level.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{Instant, interval_at};
use tracing::{debug, info};

use super::bounded_cache::SweepableCache;

/// Default sweep period in seconds.
pub const DEFAULT_SWEEP_SECS: u64 = 600;

/// Periodically trims every registered cache to capacity.
pub struct CacheSweeper {
    period: Duration,
    caches: Vec<Arc<dyn SweepableCache>>,
    running: Arc<AtomicBool>,
}

impl CacheSweeper {
    /// Creates a stopped sweeper over `caches`.
    #[must_use]
    pub fn new(period: Duration, caches: Vec<Arc<dyn SweepableCache>>) -> Self {
        Self {
            period,
            caches,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Trims every cache once and returns the total number of evicted entries.
    pub fn sweep_once(&self) -> usize {
        sweep_all(&self.caches)
    }

    /// Spawns the sweep loop. The first sweep runs one `period` after start.
    ///
    /// The loop ends at the first tick after [`Self::stop`]; abort the
    /// returned handle to end it right away.
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let period = self.period;
        let caches = self.caches.clone();
        let running = self.running.clone();

        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);

            while running.load(Ordering::SeqCst) {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                sweep_all(&caches);
            }

            debug!("Cache sweeper stopped");
        })
    }

    /// Asks the sweep loop to finish.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the sweep loop was started and not stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sweep_all(caches: &[Arc<dyn SweepableCache>]) -> usize {
    let mut evicted = 0;
    for cache in caches {
        let removed = cache.sweep();
        evicted += removed;
        info!(cache = cache.name(), size = cache.size(), evicted = removed, "Cache swept");
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::image::bounded_cache::BoundedCache;

    #[test]
    fn test_sweep_once_on_caches_within_capacity() {
        let cache = Arc::new(BoundedCache::new("downloads", 3));
        cache.insert(1, 1);
        cache.insert(2, 2);
        let caches: Vec<Arc<dyn SweepableCache>> = vec![cache.clone() as Arc<dyn SweepableCache>];
        let sweeper = CacheSweeper::new(Duration::from_secs(600), caches);

        assert_eq!(sweeper.sweep_once(), 0);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop() {
        let cache: Arc<BoundedCache<u32, u32>> = Arc::new(BoundedCache::new("avatars", 3));
        let sweeper = CacheSweeper::new(
            Duration::from_secs(600),
            vec![cache as Arc<dyn SweepableCache>],
        );

        let handle = sweeper.start();
        assert!(sweeper.is_running());

        tokio::time::advance(Duration::from_secs(601)).await;
        sweeper.stop();
        tokio::time::advance(Duration::from_secs(601)).await;

        handle.await.unwrap();
        assert!(!sweeper.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_task_ends_before_next_tick() {
        let cache: Arc<BoundedCache<u32, u32>> = Arc::new(BoundedCache::new("downloads", 3));
        let sweeper = CacheSweeper::new(
            Duration::from_secs(600),
            vec![cache as Arc<dyn SweepableCache>],
        );

        let handle = sweeper.start();
        sweeper.stop();
        handle.abort();

        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(!sweeper.is_running());
    }
}
