//! Controllers and the optional prepare capability.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::DirectorHandle;

/// Shared handle to a controller created by the
/// [`ControllerFactory`](crate::ControllerFactory).
pub type ControllerRef<V> = Rc<RefCell<dyn Controller<V>>>;

/// Access to `Any` for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The object paired with a view root in a [`Scene`](crate::Scene).
///
/// `V` is the view root type of the display surface. Controllers that want
/// to drive scene changes themselves return `Some(self)` from [`act`](Self::act).
pub trait Controller<V>: AsAny {
    /// The prepare capability, if this controller has it.
    fn act(&mut self) -> Option<&mut dyn Act<V>> {
        None
    }
}

impl<V: 'static> dyn Controller<V> {
    pub fn downcast_ref<C: Controller<V>>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }

    pub fn downcast_mut<C: Controller<V>>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut::<C>()
    }

    pub fn is<C: Controller<V>>(&self) -> bool {
        self.as_any().is::<C>()
    }
}

/// Called once on a freshly created controller, before its scene is registered.
///
/// The handle stays valid for the lifetime of the director and can be kept
/// to request scene changes later.
pub trait Act<V> {
    fn prepare(&mut self, director: DirectorHandle<V>, root: &V);
}
