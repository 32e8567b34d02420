use std::collections::{BTreeMap, VecDeque};

use parking_lot::Mutex;

use super::{Work, Worklist};

/// Strict global priority order: a map from `dist / delta` bucket to a FIFO
/// queue; `get` always serves the lowest non-empty bucket. Least concurrency,
/// closest to sequential Dijkstra ordering.
pub struct OrderedWorklist {
    delta: u64,
    buckets: Mutex<BTreeMap<u64, VecDeque<Work>>>,
}

impl OrderedWorklist {
    pub fn new(delta: u64) -> OrderedWorklist {
        OrderedWorklist {
            delta: delta.max(1),
            buckets: Mutex::new(BTreeMap::new()),
        }
    }

    fn bucket(&self, dist: u64) -> u64 {
        dist / self.delta
    }
}

impl Worklist for OrderedWorklist {
    fn put(&self, work: Work, _slot: usize) {
        self.buckets
            .lock()
            .entry(self.bucket(work.dist))
            .or_default()
            .push_back(work);
    }

    fn get(&self, _slot: usize) -> Option<Work> {
        let mut buckets = self.buckets.lock();
        let mut entry = buckets.first_entry()?;
        let work = entry.get_mut().pop_front();
        // empty buckets are pruned so first_entry stays the global minimum
        if entry.get().is_empty() {
            entry.remove();
        }
        work
    }

    fn len(&self) -> usize {
        self.buckets.lock().values().map(|q| q.len()).sum()
    }
}
