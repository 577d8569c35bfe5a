//! Payload-less change notification with explicit unsubscribe handles.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

#[derive(Clone, Default)]
/// Fan-out of "collection changed" signals to registered listeners.
///
/// Listeners run in subscription order. They may subscribe, unsubscribe or read the store while
/// being notified; changes to the listener set apply from the next notification.
pub struct ChangeNotifier {
    inner: Rc<RefCell<ListenerRegistry>>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ChangeNotifier {
    /// Registers `listener` and returns the handle that removes it.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> NoteSubscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id = registry.next_id.saturating_add(1);
        registry.listeners.insert(id, Rc::new(listener));
        NoteSubscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Invokes every registered listener once.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self.inner.borrow().listeners.values().cloned().collect();
        for listener in snapshot {
            listener();
        }
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[must_use = "dropping the handle keeps the listener registered; call `unsubscribe` to remove it"]
#[derive(Debug)]
/// Handle returned by [`ChangeNotifier::subscribe`].
///
/// Dropping the handle leaves the listener registered.
pub struct NoteSubscription {
    id: u64,
    registry: Weak<RefCell<ListenerRegistry>>,
}

impl NoteSubscription {
    /// Returns the listener id, unique per notifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes the listener. Returns `false` when it was already gone.
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.borrow_mut().listeners.remove(&self.id).is_some())
            .unwrap_or(false)
    }
}
