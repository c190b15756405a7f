//! Deferred scene requests from controllers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::scene::Scene;
use super::transition::Transition;

pub(crate) type BoxedFactory<V> = Box<dyn FnOnce(Option<&V>, &Scene<V>) -> Box<dyn Transition>>;

pub(crate) enum Request<V> {
    Show(String),
    ShowWith(String, BoxedFactory<V>),
}

impl<V> Request<V> {
    pub(crate) fn target(&self) -> &str {
        match self {
            Request::Show(name) | Request::ShowWith(name, _) => name,
        }
    }
}

pub(crate) type RequestQueue<V> = Rc<RefCell<VecDeque<Request<V>>>>;

/// A controller's way back to the director that prepared it.
///
/// Requests are queued and carried out, in order, during the director's next
/// [`update`](super::SceneDirector::update). Failures at that point are
/// logged, since there is no caller left to return them to.
pub struct DirectorHandle<V> {
    requests: RequestQueue<V>,
}

impl<V> DirectorHandle<V> {
    pub(crate) fn new(requests: RequestQueue<V>) -> Self {
        Self { requests }
    }

    /// Ask for `name` to be shown without a transition.
    pub fn show(&self, name: impl Into<String>) {
        self.requests
            .borrow_mut()
            .push_back(Request::Show(name.into()));
    }

    /// Ask for `name` to be shown through the transition built by `factory`.
    pub fn show_with<F, T>(&self, name: impl Into<String>, factory: F)
    where
        F: FnOnce(Option<&V>, &Scene<V>) -> T + 'static,
        T: Transition + 'static,
    {
        let boxed: BoxedFactory<V> = Box::new(
            move |current: Option<&V>, next: &Scene<V>| -> Box<dyn Transition> {
                Box::new(factory(current, next))
            },
        );
        self.requests
            .borrow_mut()
            .push_back(Request::ShowWith(name.into(), boxed));
    }

    pub fn show_animated<T>(&self, name: impl Into<String>, transition: T)
    where
        T: Transition + 'static,
    {
        self.show_with(name, move |_, _| transition);
    }

    /// Number of requests waiting for the next update.
    pub fn pending_requests(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl<V> Clone for DirectorHandle<V> {
    fn clone(&self) -> Self {
        Self {
            requests: Rc::clone(&self.requests),
        }
    }
}

impl<V> fmt::Debug for DirectorHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queued: Vec<String> = self
            .requests
            .borrow()
            .iter()
            .map(|r| r.target().to_string())
            .collect();
        f.debug_struct("DirectorHandle")
            .field("queued", &queued)
            .finish()
    }
}
