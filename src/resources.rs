//! Lookup of per-controller resources.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Finds text resources that live next to a controller type.
///
/// `namespace` is a `::`-separated module path such as `app::screens::home`.
/// A missing resource is `Ok(None)`; `Err` is reserved for resources that
/// exist but cannot be read.
pub trait ResourceStore {
    fn open(&self, namespace: &str, name: &str) -> io::Result<Option<String>>;
}

/// Resources stored on disk, one directory per namespace segment.
///
/// `app::screens::home` + `config.properties` resolves to
/// `<root>/app/screens/home/config.properties`.
#[derive(Clone, Debug)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a resource would be read from.
    pub fn path_for(&self, namespace: &str, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(namespace.split("::").filter(|s| !s.is_empty()));
        path.push(name);
        path
    }
}

impl ResourceStore for DirResources {
    fn open(&self, namespace: &str, name: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(namespace, name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resources held in memory, typically filled with `include_str!`.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedResources {
    entries: HashMap<(String, String), String>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(namespace, name, text);
        self
    }

    pub fn insert(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.entries
            .insert((namespace.into(), name.into()), text.into());
    }
}

impl ResourceStore for EmbeddedResources {
    fn open(&self, namespace: &str, name: &str) -> io::Result<Option<String>> {
        Ok(self
            .entries
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_resources_map_namespace_to_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("app").join("home");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("config.properties"), "apiUrl=http://x\n").unwrap();

        let store = DirResources::new(dir.path());
        let text = store.open("app::home", "config.properties").unwrap();
        assert_eq!(text.as_deref(), Some("apiUrl=http://x\n"));
    }

    #[test]
    fn dir_resources_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirResources::new(dir.path());
        assert!(store.open("app::nowhere", "config.properties").unwrap().is_none());
    }

    #[test]
    fn embedded_resources_lookup() {
        let store = EmbeddedResources::new().with("app::home", "config.properties", "a=1");
        assert_eq!(
            store.open("app::home", "config.properties").unwrap().as_deref(),
            Some("a=1")
        );
        assert!(store.open("app::other", "config.properties").unwrap().is_none());
    }
}
