//! Building view roots and their controllers from a location.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::controller::ControllerRef;
use crate::error::LoadError;
use crate::inject::ControllerFactory;

/// A view root and the controller created for it.
pub struct LoadedView<V> {
    pub root: V,
    pub controller: ControllerRef<V>,
}

/// Turns a view location into a [`LoadedView`].
///
/// Implementations parse whatever view description format the host uses and
/// create the controller through `factory`, so the controller arrives with
/// its injectable fields already resolved.
pub trait ViewLoader<V> {
    fn load(
        &mut self,
        location: &str,
        factory: &ControllerFactory<V>,
    ) -> Result<LoadedView<V>, LoadError>;
}

impl<V, F> ViewLoader<V> for F
where
    F: FnMut(&str, &ControllerFactory<V>) -> Result<LoadedView<V>, LoadError>,
{
    fn load(
        &mut self,
        location: &str,
        factory: &ControllerFactory<V>,
    ) -> Result<LoadedView<V>, LoadError> {
        self(location, factory)
    }
}

struct ViewEntry<V> {
    build: Rc<dyn Fn() -> V>,
    controller: String,
}

/// Loader over a fixed table of locations.
///
/// Each location names a function building the view root and the registered
/// controller type to pair it with.
pub struct StaticViews<V> {
    entries: HashMap<String, ViewEntry<V>>,
}

impl<V: 'static> StaticViews<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn view<F>(mut self, location: impl Into<String>, controller: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> V + 'static,
    {
        self.entries.insert(
            location.into(),
            ViewEntry {
                build: Rc::new(build),
                controller: controller.into(),
            },
        );
        self
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<V: 'static> Default for StaticViews<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for StaticViews<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, &v.controller)))
            .finish()
    }
}

impl<V: 'static> ViewLoader<V> for StaticViews<V> {
    fn load(
        &mut self,
        location: &str,
        factory: &ControllerFactory<V>,
    ) -> Result<LoadedView<V>, LoadError> {
        let entry = self.entries.get(location).ok_or_else(|| LoadError::NotFound {
            location: location.to_string(),
        })?;
        let controller = factory.create_named(&entry.controller)?;
        Ok(LoadedView {
            root: (entry.build)(),
            controller,
        })
    }
}
