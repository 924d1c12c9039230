//! Change notification for grid model listeners

use std::fmt;
use std::rc::Rc;

use super::grid::GridModel;
use super::group::GroupId;

/// What changed in the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// Some state changed; listeners should re-read what they display
    Updated,
    /// The group list was replaced wholesale (new grid, undo/redo, load, discard)
    GroupsReplaced,
    /// Groups were created by a merge or split and should become the selection
    GroupsSelected(Vec<GroupId>),
}

/// A listener registered with a [`GridModel`].
///
/// Notification is synchronous and receives the model by shared reference,
/// so a listener cannot start another mutation from inside `notify`.
pub trait ModelObserver {
    fn notify(&self, model: &GridModel, event: &ModelEvent);
}

/// Registered listeners in registration order.
///
/// The same listener may be registered more than once and is then notified
/// once per registration.
#[derive(Default, Clone)]
pub struct ObserverList {
    observers: Vec<Rc<dyn ModelObserver>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Rc<dyn ModelObserver>) {
        self.observers.push(observer);
    }

    /// Remove one registration of `observer`. Returns false if it was not registered.
    pub fn unregister(&mut self, observer: &Rc<dyn ModelObserver>) -> bool {
        match self.observers.iter().position(|o| Rc::ptr_eq(o, observer)) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify_all(&self, model: &GridModel, event: &ModelEvent) {
        for observer in &self.observers {
            observer.notify(model, event);
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.observers.len())
            .finish()
    }
}
