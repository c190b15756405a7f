//! Scene management for Stagehand.
//!
//! This module pairs view roots with their controllers under stable names and
//! decides which one is on the display surface.
//!
//! # Overview
//!
//! A scene is a view root plus the controller created for it. The
//! [`SceneDirector`]:
//! - Prepares scenes ahead of time (loading never happens on show)
//! - Switches scenes immediately or through a [`Transition`]
//! - Lets controllers with the [`Act`](crate::Act) capability queue their own
//!   scene changes through a [`DirectorHandle`]
//!
//! # Example
//!
//! ```
//! use stagehand::scene::{Fade, SceneDirector};
//! use stagehand::{injectable, Controller, ControllerFactory, DirectorConfig, HeadlessSurface, StaticViews};
//!
//! #[derive(Default)]
//! struct Menu;
//! injectable!(Menu {});
//! impl Controller<&'static str> for Menu {}
//!
//! let mut factory = ControllerFactory::new();
//! factory.register::<Menu>("Menu");
//! let views = StaticViews::new()
//!     .view("home.view", "Menu", || "home")
//!     .view("settings.view", "Menu", || "settings");
//!
//! let mut director =
//!     SceneDirector::with_factory(HeadlessSurface::new(), views, factory, DirectorConfig::new());
//! director.prepare("home", "home.view")?;
//! director.prepare("settings", "settings.view")?;
//! director.show("home")?;
//!
//! // Switch to settings through half a second of black.
//! director.show_animated("settings", Fade::to_black(0.5))?;
//! director.update(0.0);
//! assert_eq!(director.current(), Some("home"));
//! director.update(0.5);
//! assert_eq!(director.current(), Some("settings"));
//! # Ok::<(), stagehand::DirectorError>(())
//! ```

mod director;
mod handle;
pub mod scene;
mod transition;

pub use director::{DirectorState, SceneDirector};
pub use handle::DirectorHandle;
pub use scene::{Scene, SceneId};
pub use transition::{Completion, Easing, Fade, FadeKind, FadePhase, Immediate, Transition};
