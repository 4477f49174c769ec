use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// The byte-chunk queues and status word of one session.
///
/// Chunks keep arrival order. Dequeuing removes exactly one chunk; peeking never
/// mutates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelIoQueue {
    inbound: VecDeque<Vec<u8>>,
    outbound: VecDeque<Vec<u8>>,
    status: u16,
    status_changed: bool,
}

impl ChannelIoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data received from the client.
    pub fn push_inbound(&mut self, chunk: impl Into<Vec<u8>>) {
        self.inbound.push_back(chunk.into());
    }

    pub fn pop_inbound(&mut self) -> Option<Vec<u8>> {
        self.inbound.pop_front()
    }

    pub fn peek_inbound(&self) -> Option<&[u8]> {
        self.inbound.front().map(Vec::as_slice)
    }

    pub fn peek_inbound_len(&self) -> Option<usize> {
        self.inbound.front().map(Vec::len)
    }

    pub fn clear_inbound(&mut self) {
        self.inbound.clear();
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    /// Data to be sent to the client.
    pub fn push_outbound(&mut self, chunk: impl Into<Vec<u8>>) {
        self.outbound.push_back(chunk.into());
    }

    pub fn pop_outbound(&mut self) -> Option<Vec<u8>> {
        self.outbound.pop_front()
    }

    pub fn drain_outbound(&mut self) -> Vec<Vec<u8>> {
        self.outbound.drain(..).collect()
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_changed(&self) -> bool {
        self.status_changed
    }

    pub fn inject_status(&mut self, status: u16) {
        self.status = status;
        self.status_changed = true;
    }

    /// Returns the injected status once, clearing the changed flag.
    pub fn take_status_change(&mut self) -> Option<u16> {
        std::mem::take(&mut self.status_changed).then_some(self.status)
    }
}

/// Shared handle to one channel's queues.
///
/// Each channel is driven by a single session, so the lock is uncontended in
/// practice; it only exists so the session layer and the dispatcher can both hold
/// the handle.
#[derive(Debug, Clone, Default)]
pub struct ChannelHandle {
    inner: Arc<Mutex<ChannelIoQueue>>,
}

impl ChannelHandle {
    pub fn lock(&self) -> MutexGuard<'_, ChannelIoQueue> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Channel number to queue mapping, owned by the session layer.
#[derive(Debug, Default)]
pub struct ChannelTable {
    channels: RwLock<HashMap<u16, ChannelHandle>>,
}

impl ChannelTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<u16, ChannelHandle>> {
        match self.channels.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<u16, ChannelHandle>> {
        match self.channels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Establishes `channel`, or returns the existing handle if it is already open.
    pub fn open(&self, channel: u16) -> ChannelHandle {
        self.write().entry(channel).or_default().clone()
    }

    /// Tears down `channel`, dropping anything still queued on it.
    pub fn close(&self, channel: u16) -> Option<ChannelHandle> {
        self.write().remove(&channel)
    }

    pub fn get(&self, channel: u16) -> Option<ChannelHandle> {
        self.read().get(&channel).cloned()
    }

    pub fn contains(&self, channel: u16) -> bool {
        self.read().contains_key(&channel)
    }

    pub fn channels(&self) -> Vec<u16> {
        let mut numbers: Vec<u16> = self.read().keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }
}
