//! Injected values and their conversion into field types.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::AssignError;

/// A value produced by a [`ValueSource`](super::ValueSource).
///
/// Configuration files and process properties only ever produce text.
/// Instantiators and type-keyed dependencies can hand out shared objects.
#[derive(Clone)]
pub enum Value {
    Text(String),
    Shared(Rc<dyn Any>),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn shared<T: Any>(value: T) -> Self {
        Value::Shared(Rc::new(value))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Shared(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Shared(_) => "shared",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Shared(_) => f.write_str("Shared(..)"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Conversion from an injected [`Value`] into a concrete field type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, AssignError>;
}

fn mismatch<T>(value: &Value) -> AssignError {
    AssignError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: value.kind(),
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Shared(ref rc) => rc
                .downcast_ref::<String>()
                .cloned()
                .ok_or_else(|| mismatch::<String>(&value)),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Text(s) => Ok(PathBuf::from(s)),
            Value::Shared(ref rc) => rc
                .downcast_ref::<PathBuf>()
                .cloned()
                .ok_or_else(|| mismatch::<PathBuf>(&value)),
        }
    }
}

macro_rules! from_parsed_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, AssignError> {
                    match value {
                        Value::Text(s) => s.trim().parse::<$ty>().map_err(|_| AssignError::Parse {
                            expected: stringify!($ty),
                            value: s,
                        }),
                        Value::Shared(ref rc) => rc
                            .downcast_ref::<$ty>()
                            .copied()
                            .ok_or_else(|| mismatch::<$ty>(&value)),
                    }
                }
            }
        )*
    };
}

from_parsed_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: Any> FromValue for Rc<T> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Shared(rc) => rc.downcast::<T>().map_err(|_| AssignError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: "shared",
            }),
            Value::Text(_) => Err(mismatch::<Rc<T>>(&value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, AssignError> {
        T::from_value(value).map(Some)
    }
}
