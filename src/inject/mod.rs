//! Controller field injection.
//!
//! Controllers declare which of their fields may be supplied from outside by
//! implementing [`Injectable`] (normally through the
//! [`injectable!`](crate::injectable) macro). The [`ControllerFactory`] builds
//! controllers and fills those fields, trying for each one, in order:
//!
//! 1. the controller's own `config.properties`,
//! 2. the process-wide [`Properties`](crate::Properties),
//! 3. the application's instantiator function,
//! 4. shared objects registered by type.
//!
//! The first source producing a value the field accepts wins. Fields nothing
//! can fill keep their default value and are reported with a warning.

mod factory;
mod field;
mod resolver;
mod source;
mod value;

pub use factory::ControllerFactory;
pub use field::{Injectable, InjectableField};
pub use resolver::{Diagnostic, FieldResolver, ResolutionReport};
pub use source::{
    CONFIG_FILE, ControllerConfig, Dependencies, Instantiator, Lookup, TypedValues, ValueSource,
};
pub use value::{FromValue, Value};
