//! Synchronous listener dispatch with veto support.
//!
//! A [`Dispatcher`] holds the listeners registered by a widget's owner.
//! Emitting an event calls them in connection order; any listener may answer
//! [`Verdict::Veto`], which stops the dispatch and is reported back to the
//! emitter so it can roll back the tentative change. Non-cancelable events
//! simply ignore the verdict.
//!
//! # Example
//!
//! ```
//! use horizon_propgrid_core::{Dispatcher, Verdict};
//!
//! let mut changing = Dispatcher::<i32>::new();
//! changing.connect(|value| if *value < 0 { Verdict::Veto } else { Verdict::Accept });
//!
//! assert!(changing.emit(&5).is_accepted());
//! assert!(changing.emit(&-1).is_vetoed());
//! ```

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a listener connection.
    ///
    /// Use this ID to disconnect a listener via [`Dispatcher::disconnect`].
    pub struct ConnectionId;
}

/// A listener's answer to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    /// Let the operation proceed.
    #[default]
    Accept,
    /// Cancel the operation. Only meaningful for cancelable events.
    Veto,
}

impl Verdict {
    #[inline]
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accept
    }

    #[inline]
    pub fn is_vetoed(self) -> bool {
        self == Verdict::Veto
    }
}

impl From<bool> for Verdict {
    /// `true` accepts, `false` vetoes.
    fn from(accept: bool) -> Self {
        if accept { Verdict::Accept } else { Verdict::Veto }
    }
}

type Listener<E> = Box<dyn FnMut(&E) -> Verdict>;

/// An ordered set of listeners for events of type `E`.
pub struct Dispatcher<E> {
    listeners: SlotMap<ConnectionId, Listener<E>>,
    order: Vec<ConnectionId>,
    blocked: bool,
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.order.len())
            .field("blocked", &self.blocked)
            .finish()
    }
}

impl<E> Dispatcher<E> {
    /// Create a dispatcher with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            order: Vec::new(),
            blocked: false,
        }
    }

    /// Register a listener. Listeners run in registration order.
    pub fn connect<F>(&mut self, listener: F) -> ConnectionId
    where
        F: FnMut(&E) -> Verdict + 'static,
    {
        let id = self.listeners.insert(Box::new(listener));
        self.order.push(id);
        id
    }

    /// Register a listener that never vetoes.
    pub fn observe<F>(&mut self, mut observer: F) -> ConnectionId
    where
        F: FnMut(&E) + 'static,
    {
        self.connect(move |event| {
            observer(event);
            Verdict::Accept
        })
    }

    /// Remove a listener.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        if self.listeners.remove(id).is_some() {
            self.order.retain(|c| *c != id);
            true
        } else {
            false
        }
    }

    /// Remove every listener.
    pub fn disconnect_all(&mut self) {
        self.listeners.clear();
        self.order.clear();
    }

    /// Get the number of connected listeners.
    pub fn connection_count(&self) -> usize {
        self.order.len()
    }

    /// Block dispatch temporarily. While blocked every emit is accepted
    /// without calling any listener.
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Deliver `event` to the listeners, stopping at the first veto.
    pub fn emit(&mut self, event: &E) -> Verdict {
        if self.blocked {
            tracing::trace!(target: targets::DISPATCH, "dispatcher blocked, skipping emit");
            return Verdict::Accept;
        }

        for id in &self.order {
            if let Some(listener) = self.listeners.get_mut(*id)
                && listener(event).is_vetoed()
            {
                tracing::debug!(target: targets::DISPATCH, "event vetoed by listener");
                return Verdict::Veto;
            }
        }
        Verdict::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_calls_listeners_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = Dispatcher::<u32>::new();
        let l1 = log.clone();
        d.observe(move |v| l1.borrow_mut().push(("first", *v)));
        let l2 = log.clone();
        d.observe(move |v| l2.borrow_mut().push(("second", *v)));

        assert!(d.emit(&7).is_accepted());
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_veto_short_circuits() {
        let calls = Rc::new(RefCell::new(0));
        let mut d = Dispatcher::<()>::new();
        d.connect(|_| Verdict::Veto);
        let c = calls.clone();
        d.observe(move |_| *c.borrow_mut() += 1);

        assert!(d.emit(&()).is_vetoed());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_disconnect() {
        let mut d = Dispatcher::<()>::new();
        let id = d.connect(|_| Verdict::Veto);
        assert_eq!(d.connection_count(), 1);
        assert!(d.disconnect(id));
        assert!(!d.disconnect(id));
        assert!(d.emit(&()).is_accepted());
    }

    #[test]
    fn test_blocked_accepts_everything() {
        let mut d = Dispatcher::<()>::new();
        d.connect(|_| Verdict::Veto);
        d.set_blocked(true);
        assert!(d.emit(&()).is_accepted());
        d.set_blocked(false);
        assert!(d.emit(&()).is_vetoed());
    }

    #[test]
    fn test_verdict_from_bool() {
        assert_eq!(Verdict::from(true), Verdict::Accept);
        assert_eq!(Verdict::from(false), Verdict::Veto);
    }
}
