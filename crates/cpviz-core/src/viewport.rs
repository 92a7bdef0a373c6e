#![forbid(unsafe_code)]

//! Host viewport signalling.
//!
//! The host owns a [`Container`] (its drawing surface) and reports size
//! changes through [`ViewportSignal::notify`]. Consumers register with
//! [`ViewportSignal::subscribe`] and receive a [`Subscription`] handle; the
//! registration lives exactly as long as that handle.
//!
//! # Delivery
//!
//! Notifications are latest-wins: each subscription keeps one pending slot,
//! and a burst of notifications between two polls collapses to the last
//! size. Debouncing beyond that is left to the host.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); one plot lives on
//! one UI thread.

use crate::geometry::Size;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// A unique identifier for a viewport subscription.
pub type SubId = u64;

#[derive(Debug, Default)]
struct SignalState {
    current: Size,
    next_id: SubId,
    pending: BTreeMap<SubId, Option<Size>>,
}

/// Broadcast point for "viewport size changed" notifications.
///
/// Cloning yields another handle to the same signal.
#[derive(Debug, Clone, Default)]
pub struct ViewportSignal {
    state: Rc<RefCell<SignalState>>,
}

impl ViewportSignal {
    /// Create a signal reporting `initial` as the current size.
    pub fn new(initial: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(SignalState {
                current: initial,
                ..SignalState::default()
            })),
        }
    }

    /// Last size reported by the host.
    pub fn current(&self) -> Size {
        self.state.borrow().current
    }

    /// Report a new viewport size. Overwrites any undelivered size.
    pub fn notify(&self, size: Size) {
        let mut state = self.state.borrow_mut();
        state.current = size;
        for slot in state.pending.values_mut() {
            *slot = Some(size);
        }
    }

    /// Register a listener. Dropping the returned handle unregisters it.
    pub fn subscribe(&self) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.pending.insert(id, None);
        #[cfg(feature = "tracing")]
        tracing::debug!(sub_id = id, "viewport subscription registered");
        Subscription {
            id,
            signal: Rc::downgrade(&self.state),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

/// Handle to a viewport registration.
///
/// Unsubscribes on drop. Outliving the signal is harmless.
#[derive(Debug)]
pub struct Subscription {
    id: SubId,
    signal: Weak<RefCell<SignalState>>,
}

impl Subscription {
    /// Identifier of this registration.
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Take the most recent undelivered size, if any.
    pub fn take_pending(&self) -> Option<Size> {
        let state = self.signal.upgrade()?;
        let mut state = state.borrow_mut();
        state.pending.get_mut(&self.id).and_then(Option::take)
    }

    /// Whether the signal still exists and this registration is live.
    pub fn is_active(&self) -> bool {
        self.signal
            .upgrade()
            .is_some_and(|s| s.borrow().pending.contains_key(&self.id))
    }

    /// Explicitly unregister. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.signal.upgrade() {
            state.borrow_mut().pending.remove(&self.id);
            #[cfg(feature = "tracing")]
            tracing::debug!(sub_id = self.id, "viewport subscription dropped");
        }
    }
}

/// The host's drawing surface: a client size plus its resize signal.
#[derive(Debug, Clone)]
pub struct Container {
    signal: ViewportSignal,
}

impl Container {
    /// A container whose client area is `width` x `height`.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            signal: ViewportSignal::new(Size::new(width, height)),
        }
    }

    /// Current client size.
    pub fn client_size(&self) -> Size {
        self.signal.current()
    }

    /// The container's resize signal.
    pub fn signal(&self) -> &ViewportSignal {
        &self.signal
    }

    /// Host-side: the container was resized.
    pub fn resize(&self, width: f64, height: f64) {
        self.signal.notify(Size::new(width, height));
    }
}
