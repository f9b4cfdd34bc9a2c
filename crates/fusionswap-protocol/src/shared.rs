//! Thread-safe handle for multi-threaded hosts.
//!
//! All access goes through one lock, so transactions are applied strictly
//! one after another in lock-acquisition order. When two resolvers race for
//! the same segment, whichever acquires the lock first wins and the other
//! fails validation against the committed state.

use std::sync::Arc;

use fusionswap_custody::{Clock, EventSink, SystemClock, TracingEventSink};
use parking_lot::Mutex;

use crate::SwapProtocol;

/// Cloneable, lock-protected [`SwapProtocol`].
pub struct SharedSwapProtocol<C: Clock = SystemClock, E: EventSink = TracingEventSink> {
    inner: Arc<Mutex<SwapProtocol<C, E>>>,
}

impl<C: Clock, E: EventSink> SharedSwapProtocol<C, E> {
    #[must_use]
    pub fn new(protocol: SwapProtocol<C, E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(protocol)),
        }
    }

    /// Run `f` with exclusive access. Any protocol call made inside is a
    /// single transaction against the latest committed state.
    pub fn with<R>(&self, f: impl FnOnce(&mut SwapProtocol<C, E>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Run a read-only query.
    pub fn read<R>(&self, f: impl FnOnce(&SwapProtocol<C, E>) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl<C: Clock, E: EventSink> Clone for SharedSwapProtocol<C, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
