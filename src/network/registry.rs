//! Connection Registry
//!
//! Tracks the sockets being served so shutdown can close them.

use std::collections::HashMap;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::Result;

/// Handles to every live connection, keyed by a registration id
#[derive(Default)]
pub(crate) struct Registry {
    next_id: AtomicU64,
    streams: Mutex<HashMap<u64, TcpStream>>,
}

impl Registry {
    /// Keep a clone of `stream` until the returned guard is dropped
    pub(crate) fn register(&self, stream: &TcpStream) -> Result<Registration<'_>> {
        let clone = stream.try_clone()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.streams.lock().insert(id, clone);
        Ok(Registration { registry: self, id })
    }

    /// Shut down both directions of every registered socket
    ///
    /// Blocked reads on the other handles return immediately afterwards.
    pub(crate) fn close_all(&self) -> usize {
        let streams = self.streams.lock();
        for stream in streams.values() {
            // Already-closed peers report NotConnected here
            let _ = stream.shutdown(Shutdown::Both);
        }
        streams.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.streams.lock().len()
    }
}

/// Removes its connection from the registry when dropped
pub(crate) struct Registration<'a> {
    registry: &'a Registry,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.streams.lock().remove(&self.id);
    }
}
