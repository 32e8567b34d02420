use parking_lot::Mutex;

use super::{Work, Worklist};

/// Opposite baseline: one shared stack, most-recently-inserted first. Best
/// locality, worst fairness.
pub struct Lifo {
    stack: Mutex<Vec<Work>>,
}

impl Lifo {
    pub fn new() -> Lifo {
        Lifo {
            stack: Mutex::new(Vec::new()),
        }
    }
}

impl Worklist for Lifo {
    fn put(&self, work: Work, _slot: usize) {
        self.stack.lock().push(work);
    }

    fn get(&self, _slot: usize) -> Option<Work> {
        self.stack.lock().pop()
    }

    fn len(&self) -> usize {
        self.stack.lock().len()
    }
}
