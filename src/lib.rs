//! # Stagehand
//!
//! **Named scenes and animated scene switching for windowed applications.**
//!
//! Load every screen of an application once, give it a name, and switch
//! between them with a single call. Controllers get their settings injected
//! from configuration files, process properties and shared services.
//!
//! ## Quick Start
//!
//! ```
//! use stagehand::*;
//!
//! #[derive(Default)]
//! struct Home {
//!     api_url: String,
//! }
//!
//! injectable!(Home { api_url: String => "apiUrl" });
//! impl Controller<&'static str> for Home {}
//!
//! let properties = Properties::from_iter([("apiUrl", "http://localhost:8080")]);
//! let mut factory = ControllerFactory::with_dependencies(
//!     Dependencies::new().properties(properties),
//!     EmbeddedResources::new(),
//! );
//! factory.register::<Home>("Home");
//!
//! let views = StaticViews::new().view("home.view", "Home", || "home");
//! let mut director =
//!     SceneDirector::with_factory(HeadlessSurface::new(), views, factory, DirectorConfig::new());
//!
//! director.prepare("home", "home.view")?;
//! director.show("home")?;
//!
//! let home = director.controller::<Home>("home").unwrap();
//! assert_eq!(home.api_url, "http://localhost:8080");
//! # Ok::<(), stagehand::DirectorError>(())
//! ```
//!
//! ## Pieces
//!
//! - [`SceneDirector`] owns the [`DisplaySurface`] and the scene registry.
//! - [`ViewLoader`] turns a location into a view root and its controller.
//! - [`ControllerFactory`] creates controllers and resolves their [`Injectable`] fields.
//! - [`Transition`]s run on the host clock and tell the director when to switch.

mod config;
mod controller;
mod error;
pub mod inject;
mod loader;
mod properties;
mod resources;
pub mod scene;
mod surface;

pub use config::{DirectorConfig, TransitionPolicy};
pub use controller::{Act, AsAny, Controller, ControllerRef};
pub use error::{
    AssignError, DirectorError, InstantiationError, LoadError, PropertiesError, SourceError,
};
pub use inject::{
    CONFIG_FILE, ControllerConfig, ControllerFactory, Dependencies, Diagnostic, FieldResolver,
    FromValue, Injectable, InjectableField, Instantiator, ResolutionReport, TypedValues, Value,
    ValueSource,
};
pub use loader::{LoadedView, StaticViews, ViewLoader};
pub use properties::Properties;
pub use resources::{DirResources, EmbeddedResources, ResourceStore};
pub use scene::{
    Completion, DirectorHandle, DirectorState, Easing, Fade, FadeKind, FadePhase, Immediate,
    Scene, SceneDirector, SceneId, Transition,
};
pub use surface::{DisplaySurface, HeadlessSurface, WindowSurface};

// Re-export glam's color vector for fade colors
pub use glam::Vec4;
