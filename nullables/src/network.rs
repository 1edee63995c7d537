//! Nullable transport: an in-process mailbox between domains.
//!
//! Stands in for the relay that carries cross-domain messages. Tests control
//! delivery explicitly, including the adversarial cases a real transport is
//! supposed to rule out (duplicates, reordering).

use std::cell::RefCell;
use std::collections::VecDeque;

/// A test transport that queues messages instead of relaying them.
pub struct NullTransport<M> {
    in_flight: RefCell<VecDeque<M>>,
    /// Every message ever sent, in send order.
    sent: RefCell<Vec<M>>,
}

impl<M: Clone> NullTransport<M> {
    pub fn new() -> Self {
        Self {
            in_flight: RefCell::new(VecDeque::new()),
            sent: RefCell::new(Vec::new()),
        }
    }

    /// Hand a message to the transport.
    pub fn send(&self, message: M) {
        self.sent.borrow_mut().push(message.clone());
        self.in_flight.borrow_mut().push_back(message);
    }

    /// Take the oldest in-flight message.
    pub fn deliver_next(&self) -> Option<M> {
        self.in_flight.borrow_mut().pop_front()
    }

    /// Take the newest in-flight message (out-of-order delivery).
    pub fn deliver_latest(&self) -> Option<M> {
        self.in_flight.borrow_mut().pop_back()
    }

    /// Drain everything in flight, oldest first.
    pub fn deliver_all(&self) -> Vec<M> {
        self.in_flight.borrow_mut().drain(..).collect()
    }

    /// Re-queue a copy of the `index`-th message ever sent (duplicate delivery).
    pub fn replay(&self, index: usize) -> bool {
        let Some(message) = self.sent.borrow().get(index).cloned() else {
            return false;
        };
        self.in_flight.borrow_mut().push_back(message);
        true
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.borrow().len()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl<M: Clone> Default for NullTransport<M> {
    fn default() -> Self {
        Self::new()
    }
}
