//! Fixed-size batch scheduling
//!
//! Items are split into consecutive groups. Groups run one after another and
//! the items inside a group run concurrently, so at most `batch_size`
//! classification calls are outstanding at any time.

use futures::future::join_all;
use std::future::Future;
use std::ops::Range;
use tracing::debug;

/// Default number of items processed concurrently
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Processes items in sequential groups of bounded size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    batch_size: usize,
}

impl BatchScheduler {
    /// Create a scheduler; a size of 0 is treated as 1
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Index ranges of the groups `len` items would be split into
    pub fn batches(&self, len: usize) -> Vec<Range<usize>> {
        (0..len)
            .step_by(self.batch_size)
            .map(|start| start..(start + self.batch_size).min(len))
            .collect()
    }

    /// Run `processor` over `items`, one group at a time.
    ///
    /// A group is joined before the next one starts. The scheduler never
    /// inspects outputs: per-item failure handling belongs to `processor`.
    /// Outputs are returned in input order.
    pub async fn process<T, F, Fut>(&self, items: Vec<T>, processor: F) -> Vec<Fut::Output>
    where
        F: Fn(T) -> Fut,
        Fut: Future,
    {
        let total = items.len();
        let mut outputs = Vec::with_capacity(total);
        let mut items = items.into_iter();

        for (index, range) in self.batches(total).into_iter().enumerate() {
            debug!(batch = index, size = range.len(), total, "processing batch");
            let group: Vec<_> = items.by_ref().take(range.len()).map(&processor).collect();
            outputs.extend(join_all(group).await);
        }

        outputs
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_twelve_items_make_three_batches() {
        let scheduler = BatchScheduler::new(5);
        assert_eq!(scheduler.batches(12), vec![0..5, 5..10, 10..12]);
    }

    #[test]
    fn test_zero_batch_size_is_coerced() {
        let scheduler = BatchScheduler::new(0);
        assert_eq!(scheduler.batch_size(), 1);
        assert_eq!(scheduler.batches(2), vec![0..1, 1..2]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let scheduler = BatchScheduler::default();
        let outputs = scheduler.process(Vec::<u32>::new(), |n| async move { n }).await;
        assert!(outputs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_groups_run_in_order_with_bounded_concurrency() {
        let scheduler = BatchScheduler::new(5);
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let started = Mutex::new(Vec::new());
        let finished = Mutex::new(Vec::new());

        let outputs = scheduler
            .process((0..12).collect(), |n: usize| {
                let in_flight = &in_flight;
                let peak = &peak;
                let started = &started;
                let finished = &finished;
                async move {
                    started.lock().push(n);
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);

                    // Later items finish first inside a group.
                    tokio::time::sleep(Duration::from_millis(100 - n as u64)).await;

                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    finished.lock().push(n);
                    n * 10
                }
            })
            .await;

        assert_eq!(outputs, (0..12).map(|n| n * 10).collect::<Vec<_>>());
        assert_eq!(peak.load(Ordering::SeqCst), 5);

        // Every item of a group starts before any item of the next group.
        let started = started.lock();
        assert_eq!(&started[..5], &[0, 1, 2, 3, 4]);
        let finished = finished.lock();
        let group_of = |n: usize| n / 5;
        for window in finished.windows(2) {
            assert!(group_of(window[0]) <= group_of(window[1]));
        }
        assert_eq!(&finished[10..], &[11, 10]);
    }

    #[tokio::test]
    async fn test_failures_do_not_halt_the_group() {
        let scheduler = BatchScheduler::new(3);
        let outputs = scheduler
            .process(vec![1, 2, 3, 4], |n: i32| async move {
                if n == 2 {
                    Err("boom")
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(outputs, vec![Ok(1), Err("boom"), Ok(3), Ok(4)]);
    }
}
