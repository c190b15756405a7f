//! Scene definition and identifier types.

use std::fmt;

use crate::controller::ControllerRef;

/// Name a scene is registered under in a [`SceneDirector`](super::SceneDirector).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SceneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SceneId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SceneId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for SceneId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A prepared view root and its controller, registered under a name.
///
/// Scenes are never changed after registration; preparing the same name
/// again replaces the whole scene.
pub struct Scene<V> {
    /// Name the scene is registered under.
    pub id: SceneId,
    root: V,
    controller: ControllerRef<V>,
}

impl<V> Scene<V> {
    pub(crate) fn new(id: SceneId, root: V, controller: ControllerRef<V>) -> Self {
        Self {
            id,
            root,
            controller,
        }
    }

    /// The view root shown on the display surface.
    pub fn root(&self) -> &V {
        &self.root
    }

    pub fn controller(&self) -> &ControllerRef<V> {
        &self.controller
    }

    pub fn into_parts(self) -> (V, ControllerRef<V>) {
        (self.root, self.controller)
    }
}

impl<V: Clone> Clone for Scene<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            root: self.root.clone(),
            controller: self.controller.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Scene<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
