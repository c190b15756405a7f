//! Creation of injected controllers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::{ControllerConfig, Dependencies, FieldResolver, Injectable, ResolutionReport};
use crate::controller::{Controller, ControllerRef};
use crate::error::InstantiationError;
use crate::resources::{EmbeddedResources, ResourceStore};

type Constructor<V> = fn(&ControllerFactory<V>) -> ControllerRef<V>;

/// Builds controllers and injects their fields.
///
/// View loaders call [`create_named`](Self::create_named) with the controller
/// type named in the view description. Types must be registered first; the
/// registration is the type's no-argument construction path.
pub struct ControllerFactory<V> {
    dependencies: Dependencies,
    resources: Box<dyn ResourceStore>,
    constructors: HashMap<String, Constructor<V>>,
}

impl<V: 'static> ControllerFactory<V> {
    /// A factory with no dependencies and no configuration resources.
    pub fn new() -> Self {
        Self::with_dependencies(Dependencies::default(), EmbeddedResources::new())
    }

    pub fn with_dependencies(
        dependencies: Dependencies,
        resources: impl ResourceStore + 'static,
    ) -> Self {
        Self {
            dependencies,
            resources: Box::new(resources),
            constructors: HashMap::new(),
        }
    }

    /// Register `C` under `type_name`.
    pub fn register<C>(&mut self, type_name: impl Into<String>) -> &mut Self
    where
        C: Controller<V> + Injectable + Default + 'static,
    {
        self.constructors.insert(type_name.into(), construct::<V, C>);
        self
    }

    /// Register `C` under its full Rust type name.
    pub fn register_type<C>(&mut self) -> &mut Self
    where
        C: Controller<V> + Injectable + Default + 'static,
    {
        self.register::<C>(std::any::type_name::<C>())
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Create and inject the controller registered under `type_name`.
    pub fn create_named(&self, type_name: &str) -> Result<ControllerRef<V>, InstantiationError> {
        let construct = self
            .constructors
            .get(type_name)
            .ok_or_else(|| InstantiationError::new(type_name))?;
        debug!(controller = type_name, "creating controller");
        Ok(construct(self))
    }

    /// Create and inject a `C`.
    pub fn create<C: Injectable + Default>(&self) -> C {
        let mut controller = C::default();
        self.resolve(&mut controller);
        controller
    }

    /// Inject an existing instance.
    ///
    /// Sources, highest priority first: the controller's `config.properties`,
    /// process properties, the instantiator, then type-keyed dependencies.
    pub fn resolve<C: Injectable>(&self, controller: &mut C) -> ResolutionReport {
        let config = self.config_for::<C>();
        FieldResolver::new()
            .source(&config)
            .source(&self.dependencies.properties)
            .source(&self.dependencies.instantiator)
            .source(&self.dependencies.typed)
            .resolve(controller)
    }

    /// Loaded configuration of `C`. Empty if the resource is missing or broken.
    pub fn config_for<C: Injectable>(&self) -> ControllerConfig {
        ControllerConfig::for_namespace(self.resources.as_ref(), C::namespace())
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }
}

impl<V: 'static> Default for ControllerFactory<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ControllerFactory<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerFactory")
            .field("dependencies", &self.dependencies)
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn construct<V, C>(factory: &ControllerFactory<V>) -> ControllerRef<V>
where
    V: 'static,
    C: Controller<V> + Injectable + Default + 'static,
{
    Rc::new(RefCell::new(factory.create::<C>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::{CONFIG_FILE, Value};
    use crate::properties::Properties;

    #[derive(Default)]
    struct Client {
        base: String,
    }

    #[derive(Default)]
    struct Home {
        api_url: String,
        title: String,
        client: Rc<Client>,
    }

    crate::injectable!(Home {
        api_url: String => "apiUrl",
        title: String,
        client: Rc<Client>,
    });

    impl Controller<()> for Home {}

    fn factory(config: &str, props: &[(&str, &str)]) -> ControllerFactory<()> {
        let resources =
            EmbeddedResources::new().with(module_path!(), CONFIG_FILE, config.to_string());
        let dependencies = Dependencies::new()
            .properties(props.iter().copied().collect::<Properties>())
            .instantiator(|name| (name == "title").then(|| Value::text("from instantiator")));
        ControllerFactory::with_dependencies(dependencies, resources)
    }

    #[test]
    fn configuration_beats_process_properties() {
        let factory = factory("apiUrl=http://x\n", &[("apiUrl", "http://y")]);
        let home: Home = factory.create();
        assert_eq!(home.api_url, "http://x");
    }

    #[test]
    fn process_properties_used_without_configuration() {
        let factory = factory("", &[("apiUrl", "http://y")]);
        let home: Home = factory.create();
        assert_eq!(home.api_url, "http://y");
        assert_eq!(home.title, "from instantiator");
    }

    #[test]
    fn typed_dependency_fills_remaining_field() {
        let resources = EmbeddedResources::new();
        let dependencies = Dependencies::new().provide(Rc::new(Client {
            base: "http://z".to_string(),
        }));
        let factory: ControllerFactory<()> =
            ControllerFactory::with_dependencies(dependencies, resources);

        let mut home = Home::default();
        let report = factory.resolve(&mut home);
        assert_eq!(home.client.base, "http://z");
        assert_eq!(report.source_of("client"), Some("typed dependencies"));
        assert_eq!(report.unresolved().collect::<Vec<_>>(), vec!["api_url", "title"]);
    }

    #[test]
    fn unregistered_type_fails_to_instantiate() {
        let factory = ControllerFactory::<()>::new();
        let err = factory.create_named("app::Missing").err().unwrap();
        assert_eq!(err.type_name, "app::Missing");
    }

    #[test]
    fn registered_type_is_created_and_injected() {
        let mut factory = factory("apiUrl=http://x\n", &[]);
        factory.register::<Home>("Home");

        let controller = factory.create_named("Home").unwrap();
        let borrowed = controller.borrow();
        let home = borrowed.downcast_ref::<Home>().unwrap();
        assert_eq!(home.api_url, "http://x");
    }

    #[test]
    fn register_type_uses_full_type_name() {
        let mut factory = factory("", &[]);
        assert!(!factory.is_registered(std::any::type_name::<Home>()));

        factory.register_type::<Home>();
        assert!(factory.is_registered(std::any::type_name::<Home>()));
        assert!(!factory.is_registered("Home"));

        let controller = factory.create_named(std::any::type_name::<Home>()).unwrap();
        assert!(controller.borrow().is::<Home>());
    }
}
