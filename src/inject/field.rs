//! The injection capability implemented by controllers.

use std::any::TypeId;

use super::Value;
use crate::error::AssignError;

/// A controller field eligible for injection.
#[derive(Clone, Copy, Debug)]
pub struct InjectableField {
    /// The field's own name.
    pub name: &'static str,
    /// Lookup name overriding `name`, if any.
    pub lookup: Option<&'static str>,
    /// The declared type, as written.
    pub type_name: &'static str,
    /// Identity of the declared type, used by type-keyed dependencies.
    pub type_id: fn() -> TypeId,
}

impl InjectableField {
    /// The name sources are queried with.
    pub fn lookup_name(&self) -> &'static str {
        self.lookup.unwrap_or(self.name)
    }
}

/// Controllers that accept externally resolved values.
///
/// Usually implemented with the [`injectable!`](crate::injectable) macro:
///
/// ```
/// use stagehand::injectable;
///
/// #[derive(Default)]
/// struct Home {
///     api_url: String,
///     retries: u32,
/// }
///
/// injectable!(Home {
///     api_url: String => "apiUrl",
///     retries: u32,
/// });
/// ```
pub trait Injectable {
    fn injectable_fields() -> &'static [InjectableField]
    where
        Self: Sized;

    /// Store `value` into the field called `field`.
    fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError>;

    /// Namespace the controller's resources are resolved in.
    ///
    /// Defaults to the module path of the type.
    fn namespace() -> &'static str
    where
        Self: Sized,
    {
        namespace_of(std::any::type_name::<Self>())
    }
}

/// Strip the type name (and any generic arguments) from a type path.
pub(crate) fn namespace_of(type_path: &'static str) -> &'static str {
    let base = type_path.split('<').next().unwrap_or(type_path);
    match base.rfind("::") {
        Some(idx) => &base[..idx],
        None => "",
    }
}

/// Implement [`Injectable`] for a struct from a list of its fields.
///
/// Each entry is `field: Type`, optionally followed by `=> "lookupName"`.
/// Values are converted with [`FromValue`](crate::FromValue). The namespace
/// is the module the macro is invoked in.
#[macro_export]
macro_rules! injectable {
    ($ty:ty { $($field:ident : $fty:ty $(=> $lookup:literal)?),* $(,)? }) => {
        impl $crate::Injectable for $ty {
            fn injectable_fields() -> &'static [$crate::InjectableField] {
                const FIELDS: &[$crate::InjectableField] = &[
                    $(
                        $crate::InjectableField {
                            name: stringify!($field),
                            lookup: $crate::__lookup_name!($($lookup)?),
                            type_name: stringify!($fty),
                            type_id: ::std::any::TypeId::of::<$fty>,
                        },
                    )*
                ];
                FIELDS
            }

            fn assign(
                &mut self,
                field: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::AssignError> {
                let _ = &value;
                match field {
                    $(
                        stringify!($field) => {
                            self.$field = <$fty as $crate::FromValue>::from_value(value)?;
                            Ok(())
                        }
                    )*
                    other => Err($crate::AssignError::UnknownField(other.to_string())),
                }
            }

            fn namespace() -> &'static str {
                module_path!()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __lookup_name {
    () => {
        None
    };
    ($lookup:literal) => {
        Some($lookup)
    };
}
