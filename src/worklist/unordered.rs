use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{Work, Worklist};

/// Baseline policy: one shared first-in-first-out queue, no ordering beyond
/// arrival.
pub struct UnorderedWorklist {
    queue: Mutex<VecDeque<Work>>,
}

impl UnorderedWorklist {
    pub fn new() -> UnorderedWorklist {
        UnorderedWorklist {
            queue: Mutex::new(VecDeque::new()),
        }
    }
}

impl Worklist for UnorderedWorklist {
    fn put(&self, work: Work, _slot: usize) {
        self.queue.lock().push_back(work);
    }

    fn get(&self, _slot: usize) -> Option<Work> {
        self.queue.lock().pop_front()
    }

    fn len(&self) -> usize {
        self.queue.lock().len()
    }
}
