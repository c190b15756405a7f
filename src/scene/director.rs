//! Scene director: named scene registry and scene switching.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};

use super::handle::{DirectorHandle, Request, RequestQueue};
use super::scene::{Scene, SceneId};
use super::transition::{Completion, Transition};
use crate::config::{DirectorConfig, TransitionPolicy};
use crate::controller::{Controller, ControllerRef};
use crate::error::DirectorError;
use crate::inject::ControllerFactory;
use crate::loader::{LoadedView, ViewLoader};
use crate::surface::DisplaySurface;

/// Observable switching state of a director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectorState<'a> {
    /// Nothing is switching. `current` is `None` until the first show.
    Idle { current: Option<&'a str> },
    /// A transition towards `pending` is running.
    Transitioning {
        current: Option<&'a str>,
        pending: &'a str,
    },
}

struct InFlight {
    token: u64,
    target: String,
    transition: Box<dyn Transition>,
}

struct Pending {
    token: u64,
    target: String,
}

/// Owns the display surface and decides which scene is on it.
///
/// The director is responsible for:
/// - Preparing scenes through the [`ViewLoader`] and registering them by name
/// - Tracking the scene currently displayed
/// - Switching scenes, immediately or at the end of a [`Transition`]
///
/// It is meant to be driven from the thread that owns the surface. Hosts call
/// [`update`](Self::update) once per frame to advance transitions and to run
/// requests queued through [`DirectorHandle`]s.
///
/// # Example
///
/// ```
/// use stagehand::{Controller, ControllerFactory, HeadlessSurface, SceneDirector, StaticViews};
/// use stagehand::{injectable, DirectorConfig};
///
/// #[derive(Default)]
/// struct Home {
///     greeting: String,
/// }
/// injectable!(Home { greeting: String });
/// impl Controller<&'static str> for Home {}
///
/// let mut factory = ControllerFactory::new();
/// factory.register::<Home>("Home");
/// let views = StaticViews::new().view("home.view", "Home", || "home");
///
/// let mut director = SceneDirector::with_factory(
///     HeadlessSurface::new(),
///     views,
///     factory,
///     DirectorConfig::new(),
/// );
/// director.prepare("home", "home.view")?;
/// director.show("home")?;
/// assert_eq!(director.current(), Some("home"));
/// # Ok::<(), stagehand::DirectorError>(())
/// ```
pub struct SceneDirector<S: DisplaySurface, L> {
    surface: S,
    loader: L,
    factory: ControllerFactory<S::View>,
    config: DirectorConfig,

    /// All registered scenes by name.
    scenes: HashMap<String, Scene<S::View>>,

    /// Name of the scene last put on the surface.
    current: Option<String>,

    /// Started transitions whose completion has not arrived yet.
    in_flight: Vec<InFlight>,

    /// The transition whose completion will switch scenes.
    pending: Option<Pending>,

    next_token: u64,
    switches: u64,
    completion_tx: Sender<u64>,
    completion_rx: Receiver<u64>,
    requests: RequestQueue<S::View>,
}

impl<S, L> SceneDirector<S, L>
where
    S: DisplaySurface,
    L: ViewLoader<S::View>,
{
    /// A director whose controllers get no injected dependencies.
    pub fn new(surface: S, loader: L) -> Self {
        Self::with_factory(surface, loader, ControllerFactory::new(), DirectorConfig::default())
    }

    pub fn with_factory(
        mut surface: S,
        loader: L,
        factory: ControllerFactory<S::View>,
        config: DirectorConfig,
    ) -> Self {
        if let Some(title) = &config.title {
            surface.set_title(title);
        }
        let (completion_tx, completion_rx) = unbounded();
        Self {
            surface,
            loader,
            factory,
            config,
            scenes: HashMap::new(),
            current: None,
            in_flight: Vec::new(),
            pending: None,
            next_token: 0,
            switches: 0,
            completion_tx,
            completion_rx,
            requests: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Load the view at `location` and register it as `name`.
    ///
    /// A controller with the [`Act`](crate::Act) capability is prepared before
    /// the scene is registered. An existing scene with the same name is
    /// replaced. The displayed scene is not touched.
    pub fn prepare(
        &mut self,
        name: impl Into<String>,
        location: &str,
    ) -> Result<ControllerRef<S::View>, DirectorError> {
        let name = name.into();
        let LoadedView { root, controller } = self.loader.load(location, &self.factory)?;

        if let Some(act) = controller.borrow_mut().act() {
            act.prepare(self.handle(), &root);
        }

        let scene = Scene::new(SceneId::new(name.clone()), root, Rc::clone(&controller));
        if self.scenes.insert(name.clone(), scene).is_some() {
            debug!(scene = %name, location, "replaced prepared scene");
        } else {
            debug!(scene = %name, location, "prepared scene");
        }
        Ok(controller)
    }

    /// Remove `name` from the registry.
    ///
    /// Discarding the displayed scene leaves it on the surface.
    pub fn discard(&mut self, name: &str) -> Option<Scene<S::View>> {
        let removed = self.scenes.remove(name);
        if removed.is_some() {
            debug!(scene = name, "discarded scene");
        }
        removed
    }

    /// Put the scene registered as `name` on the surface.
    pub fn show(&mut self, name: &str) -> Result<(), DirectorError> {
        if !self.scenes.contains_key(name) {
            return Err(DirectorError::UnpreparedScene(name.to_string()));
        }
        self.admit(name)?;
        self.apply(name)
    }

    /// Switch to `name` at the end of the transition built by `factory`.
    ///
    /// `factory` receives the surface's current content and the next scene.
    /// Returns once the transition is started; the displayed scene changes
    /// when the transition fires its completion.
    pub fn show_with<F, T>(&mut self, name: &str, factory: F) -> Result<(), DirectorError>
    where
        F: FnOnce(Option<&S::View>, &Scene<S::View>) -> T,
        T: Transition + 'static,
    {
        if !self.scenes.contains_key(name) {
            return Err(DirectorError::UnpreparedScene(name.to_string()));
        }
        self.admit(name)?;

        let Some(next) = self.scenes.get(name) else {
            return Err(DirectorError::UnpreparedScene(name.to_string()));
        };
        let transition = factory(self.surface.current_content(), next);
        self.start(name, Box::new(transition));
        Ok(())
    }

    /// Switch to `name` at the end of `transition`.
    pub fn show_animated<T>(&mut self, name: &str, transition: T) -> Result<(), DirectorError>
    where
        T: Transition + 'static,
    {
        self.show_with(name, move |_, _| transition)
    }

    /// Advance transitions to host time `time` and run queued requests.
    ///
    /// Returns true if a scene was put on the surface.
    pub fn update(&mut self, time: f32) -> bool {
        let before = self.switches;

        self.run_requests();
        for flight in &mut self.in_flight {
            flight.transition.update(time);
        }
        self.apply_completions();

        self.switches != before
    }

    /// Check whether a transition is waiting to switch scenes.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> DirectorState<'_> {
        let current = self.current.as_deref();
        match &self.pending {
            Some(pending) => DirectorState::Transitioning {
                current,
                pending: &pending.target,
            },
            None => DirectorState::Idle { current },
        }
    }

    /// Get the name of the scene currently displayed.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn scene(&self, name: &str) -> Option<&Scene<S::View>> {
        self.scenes.get(name)
    }

    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    /// Borrow the controller of `name` as a `C`.
    ///
    /// `None` if the scene is unknown, the controller is not a `C`, or it is
    /// currently borrowed mutably.
    pub fn controller<C: Controller<S::View>>(&self, name: &str) -> Option<Ref<'_, C>> {
        let scene = self.scenes.get(name)?;
        let borrowed = scene.controller().try_borrow().ok()?;
        Ref::filter_map(borrowed, |c| c.downcast_ref::<C>()).ok()
    }

    /// A handle controllers can keep to request scene changes.
    pub fn handle(&self) -> DirectorHandle<S::View> {
        DirectorHandle::new(Rc::clone(&self.requests))
    }

    pub fn set_title(&mut self, title: &str) {
        self.surface.set_title(title);
    }

    /// Make the surface visible.
    pub fn reveal(&mut self) {
        self.surface.reveal();
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn factory(&self) -> &ControllerFactory<S::View> {
        &self.factory
    }

    /// Register more controller types after construction.
    pub fn factory_mut(&mut self) -> &mut ControllerFactory<S::View> {
        &mut self.factory
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// Apply the transition policy to a new show request.
    fn admit(&mut self, requested: &str) -> Result<(), DirectorError> {
        let Some(pending) = &self.pending else {
            return Ok(());
        };
        match self.config.transition_policy {
            TransitionPolicy::Reject => Err(DirectorError::TransitionInFlight {
                requested: requested.to_string(),
                pending: pending.target.clone(),
            }),
            TransitionPolicy::Supersede => {
                debug!(superseded = %pending.target, by = requested, "superseding pending transition");
                self.pending = None;
                Ok(())
            }
            TransitionPolicy::Overlap => Ok(()),
        }
    }

    fn start(&mut self, target: &str, mut transition: Box<dyn Transition>) {
        let token = self.next_token;
        self.next_token += 1;

        self.pending = Some(Pending {
            token,
            target: target.to_string(),
        });
        transition.on_completion(Completion::new(token, self.completion_tx.clone()));
        transition.play();
        self.in_flight.push(InFlight {
            token,
            target: target.to_string(),
            transition,
        });
        debug!(scene = target, token, "started transition");

        // Transitions may complete synchronously from play().
        self.apply_completions();
    }

    fn apply_completions(&mut self) {
        while let Ok(token) = self.completion_rx.try_recv() {
            self.complete(token);
        }
    }

    fn complete(&mut self, token: u64) {
        let Some(index) = self.in_flight.iter().position(|f| f.token == token) else {
            debug!(token, "ignoring repeated or unknown completion");
            return;
        };
        let flight = self.in_flight.remove(index);

        let is_pending = self.pending.as_ref().is_some_and(|p| p.token == token);
        if is_pending {
            self.pending = self.next_pending();
        } else if self.config.transition_policy != TransitionPolicy::Overlap {
            debug!(scene = %flight.target, token, "superseded transition completed");
            return;
        }

        if let Err(e) = self.apply(&flight.target) {
            warn!(scene = %flight.target, error = %e, "transition completed for a discarded scene");
        }
    }

    /// Under `Overlap` every flight still switches scenes, so the newest one
    /// left takes over as pending. Otherwise nothing is pending any more.
    fn next_pending(&self) -> Option<Pending> {
        if self.config.transition_policy != TransitionPolicy::Overlap {
            return None;
        }
        self.in_flight.last().map(|flight| Pending {
            token: flight.token,
            target: flight.target.clone(),
        })
    }

    fn run_requests(&mut self) {
        loop {
            let Some(request) = self.requests.borrow_mut().pop_front() else {
                break;
            };
            let result = match request {
                Request::Show(name) => self.show(&name).map_err(|e| (name, e)),
                Request::ShowWith(name, factory) => {
                    self.show_with(&name, factory).map_err(|e| (name, e))
                }
            };
            if let Err((name, e)) = result {
                warn!(scene = %name, error = %e, "queued scene request failed");
            }
        }
    }

    fn apply(&mut self, name: &str) -> Result<(), DirectorError> {
        let scene = self
            .scenes
            .get(name)
            .ok_or_else(|| DirectorError::UnpreparedScene(name.to_string()))?;
        self.surface.set_content(scene.root().clone());
        self.current = Some(name.to_string());
        self.switches += 1;
        debug!(scene = name, "showing scene");
        Ok(())
    }
}
