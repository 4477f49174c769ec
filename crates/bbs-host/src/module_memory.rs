use std::sync::{Arc, Mutex, MutexGuard};

use bbs_mem::SegmentedMemory;

/// Memory of one loaded module, shared by every channel running that module.
///
/// Module and host-reserved segments are global to all sessions, so every access
/// goes through one lock. Channel queues are not behind this lock.
#[derive(Debug, Clone, Default)]
pub struct ModuleMemory {
    inner: Arc<Mutex<SegmentedMemory>>,
}

impl ModuleMemory {
    pub fn new(memory: SegmentedMemory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(memory)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, SegmentedMemory> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl From<SegmentedMemory> for ModuleMemory {
    fn from(memory: SegmentedMemory) -> Self {
        Self::new(memory)
    }
}
