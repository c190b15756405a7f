//! Candidate suppliers of injected values.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::error;

use super::Value;
use crate::error::{PropertiesError, SourceError};
use crate::properties::Properties;
use crate::resources::ResourceStore;

/// Name of the per-controller configuration resource.
pub const CONFIG_FILE: &str = "config.properties";

/// What a source is asked for when resolving one field.
#[derive(Clone, Copy, Debug)]
pub struct Lookup<'a> {
    /// Override name if declared, else the field name.
    pub name: &'a str,
    /// Declared type of the field.
    pub type_id: TypeId,
}

/// A candidate supplier of values, consulted in priority order.
///
/// `Ok(None)` means "nothing for this name": the next source is tried.
pub trait ValueSource {
    /// Short label used in diagnostics.
    fn name(&self) -> &'static str;

    fn lookup(&self, key: &Lookup<'_>) -> Result<Option<Value>, SourceError>;
}

impl ValueSource for Properties {
    fn name(&self) -> &'static str {
        "process properties"
    }

    fn lookup(&self, key: &Lookup<'_>) -> Result<Option<Value>, SourceError> {
        Ok(self.get(key.name).map(Value::text))
    }
}

/// Per-controller configuration, read from the controller's `config.properties`.
///
/// Nothing is read until [`load`](Self::load) is called. A missing resource is
/// an empty configuration.
#[derive(Clone, Debug, Default)]
pub struct ControllerConfig {
    raw: Option<String>,
    properties: Properties,
    loaded: bool,
}

impl ControllerConfig {
    /// Configuration backed by the given resource text, if any.
    pub fn new(raw: Option<String>) -> Self {
        Self {
            raw,
            properties: Properties::new(),
            loaded: false,
        }
    }

    /// An empty configuration that is already loaded.
    pub fn empty() -> Self {
        Self {
            raw: None,
            properties: Properties::new(),
            loaded: true,
        }
    }

    /// Locate and load the configuration of a controller namespace.
    ///
    /// Read and parse failures are logged and yield an empty configuration.
    pub fn for_namespace(store: &dyn ResourceStore, namespace: &str) -> Self {
        let raw = match store.open(namespace, CONFIG_FILE) {
            Ok(raw) => raw,
            Err(e) => {
                error!(namespace, file = CONFIG_FILE, error = %e, "failed to read controller configuration");
                return Self::empty();
            }
        };

        let mut config = Self::new(raw);
        if let Err(e) = config.load() {
            error!(namespace, file = CONFIG_FILE, error = %e, "failed to parse controller configuration");
            return Self::empty();
        }
        config
    }

    /// Parse the backing resource. Does nothing once a load has succeeded.
    pub fn load(&mut self) -> Result<(), PropertiesError> {
        if self.loaded {
            return Ok(());
        }
        if let Some(raw) = &self.raw {
            self.properties = Properties::parse(raw)?;
        }
        self.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.names()
    }
}

impl ValueSource for ControllerConfig {
    fn name(&self) -> &'static str {
        "controller configuration"
    }

    fn lookup(&self, key: &Lookup<'_>) -> Result<Option<Value>, SourceError> {
        Ok(self.get(key.name).map(Value::text))
    }
}

/// Caller-supplied function creating values from a lookup name.
#[derive(Clone)]
pub struct Instantiator {
    func: Rc<dyn Fn(&str) -> Option<Value>>,
}

impl Instantiator {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// An instantiator that never produces anything.
    pub fn absent() -> Self {
        Self::new(|_| None)
    }

    pub fn call(&self, name: &str) -> Option<Value> {
        (self.func)(name)
    }
}

impl Default for Instantiator {
    fn default() -> Self {
        Self::absent()
    }
}

impl fmt::Debug for Instantiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Instantiator(..)")
    }
}

impl ValueSource for Instantiator {
    fn name(&self) -> &'static str {
        "instantiator"
    }

    fn lookup(&self, key: &Lookup<'_>) -> Result<Option<Value>, SourceError> {
        Ok(self.call(key.name))
    }
}

/// Shared objects keyed by the type of the field they fill.
#[derive(Clone, Default)]
pub struct TypedValues {
    values: HashMap<TypeId, Value>,
}

impl TypedValues {
    /// Make `value` available to every injectable field of type `Rc<T>`.
    pub fn provide<T: Any>(&mut self, value: Rc<T>) {
        self.values.insert(TypeId::of::<Rc<T>>(), Value::Shared(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for TypedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedValues")
            .field("len", &self.values.len())
            .finish()
    }
}

impl ValueSource for TypedValues {
    fn name(&self) -> &'static str {
        "typed dependencies"
    }

    fn lookup(&self, key: &Lookup<'_>) -> Result<Option<Value>, SourceError> {
        Ok(self.values.get(&key.type_id).cloned())
    }
}

/// Everything the factory can inject besides per-controller configuration.
///
/// Built once by the application and handed to the
/// [`ControllerFactory`](crate::ControllerFactory).
#[derive(Clone, Debug, Default)]
pub struct Dependencies {
    pub(crate) properties: Properties,
    pub(crate) instantiator: Instantiator,
    pub(crate) typed: TypedValues,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide named properties.
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn instantiator<F>(mut self, func: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + 'static,
    {
        self.instantiator = Instantiator::new(func);
        self
    }

    /// Inject `value` into fields declared as `Rc<T>` that no named source filled.
    pub fn provide<T: Any>(mut self, value: Rc<T>) -> Self {
        self.typed.provide(value);
        self
    }

    pub fn process_properties(&self) -> &Properties {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::EmbeddedResources;

    fn key(name: &str) -> Lookup<'_> {
        Lookup {
            name,
            type_id: TypeId::of::<String>(),
        }
    }

    #[test]
    fn config_is_empty_until_loaded() {
        let mut config = ControllerConfig::new(Some("apiUrl=http://x".to_string()));
        assert!(config.get("apiUrl").is_none());

        config.load().unwrap();
        assert_eq!(config.get("apiUrl"), Some("http://x"));
        assert_eq!(config.names().collect::<Vec<_>>(), vec!["apiUrl"]);
    }

    #[test]
    fn config_load_is_idempotent() {
        let mut config = ControllerConfig::new(Some("a=1".to_string()));
        config.load().unwrap();
        config.load().unwrap();
        assert_eq!(config.get("a"), Some("1"));
    }

    #[test]
    fn missing_config_resource_is_empty() {
        let store = EmbeddedResources::new();
        let config = ControllerConfig::for_namespace(&store, "app::home");
        assert!(config.is_loaded());
        assert_eq!(config.names().count(), 0);
    }

    #[test]
    fn malformed_config_resource_is_empty() {
        let store = EmbeddedResources::new().with("app::home", CONFIG_FILE, "bad=\\uZZZZ");
        let config = ControllerConfig::for_namespace(&store, "app::home");
        assert!(config.get("bad").is_none());
    }

    #[test]
    fn instantiator_defaults_to_absent() {
        let inst = Instantiator::default();
        assert!(inst.lookup(&key("anything")).unwrap().is_none());
    }

    #[test]
    fn typed_values_match_on_rc_type() {
        struct Api;
        let mut typed = TypedValues::default();
        typed.provide(Rc::new(Api));

        let hit = Lookup {
            name: "client",
            type_id: TypeId::of::<Rc<Api>>(),
        };
        assert!(typed.lookup(&hit).unwrap().is_some());
        assert!(typed.lookup(&key("client")).unwrap().is_none());
    }
}
