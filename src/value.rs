//! Entry values
//!
//! A [`Value`] is either a scalar, holding the raw text exactly as it was
//! parsed, or a vector of further values. Typed accessors never store their
//! result; they convert the scalar text on every call.

use crate::error::AccessError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// The two shapes a value can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Vector,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => f.write_str("scalar"),
            ValueKind::Vector => f.write_str("vector"),
        }
    }
}

/// An entry value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw text payload
    Scalar(String),
    /// Boxed to keep the recursive type sized
    Vector(Box<IniArray>),
}

/// Array storage; most arrays in configuration files are short
pub type IniArray = SmallVec<[Value; 4]>;

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(String::new())
    }
}

impl Value {
    /// Creates a scalar from any text
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    /// Creates a vector from a sequence of values
    pub fn vector<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Vector(Box::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates an empty vector
    pub fn empty_vector() -> Self {
        Value::Vector(Box::default())
    }

    /// Returns which variant this value holds
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vector(_) => ValueKind::Vector,
        }
    }

    /// Returns true if the value is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Returns true if the value is a vector
    pub fn is_vector(&self) -> bool {
        matches!(self, Value::Vector(_))
    }

    /// Returns true for a scalar with empty text. Vectors are never empty in
    /// this sense, since their rendering always includes the brackets.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Scalar(text) if text.is_empty())
    }

    /// Replaces this value with another one
    pub fn set(&mut self, value: impl Into<Value>) {
        *self = value.into();
    }

    /// Returns the scalar payload
    pub fn as_str(&self) -> Result<&str, AccessError> {
        match self {
            Value::Scalar(text) => Ok(text),
            Value::Vector(_) => Err(self.mismatch(ValueKind::Scalar)),
        }
    }

    /// Returns the string rendering of either variant
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Returns the elements of a vector
    pub fn as_vector(&self) -> Result<&IniArray, AccessError> {
        match self {
            Value::Vector(items) => Ok(items),
            Value::Scalar(_) => Err(self.mismatch(ValueKind::Vector)),
        }
    }

    /// Returns the elements of a vector for modification
    pub fn as_vector_mut(&mut self) -> Result<&mut IniArray, AccessError> {
        match self {
            Value::Vector(items) => Ok(items),
            Value::Scalar(_) => Err(AccessError::VariantMismatch {
                expected: ValueKind::Vector,
                found: ValueKind::Scalar,
            }),
        }
    }

    /// Appends an element to a vector
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), AccessError> {
        self.as_vector_mut()?.push(value.into());
        Ok(())
    }

    /// Parses the scalar as `i32`
    ///
    /// Empty text yields `Ok(default)`. Non-empty text that does not parse is
    /// `Err(AccessError::Conversion)`, never the default.
    pub fn as_int(&self, default: i32) -> Result<i32, AccessError> {
        self.convert(default, "i32")
    }

    /// Parses the scalar as `u32`; see [`Value::as_int`] for the empty case
    pub fn as_uint(&self, default: u32) -> Result<u32, AccessError> {
        self.convert(default, "u32")
    }

    /// Parses the scalar as `i64`; see [`Value::as_int`] for the empty case
    pub fn as_long(&self, default: i64) -> Result<i64, AccessError> {
        self.convert(default, "i64")
    }

    /// Parses the scalar as `u64`; see [`Value::as_int`] for the empty case
    pub fn as_ulong(&self, default: u64) -> Result<u64, AccessError> {
        self.convert(default, "u64")
    }

    /// Parses the scalar as `f32`; see [`Value::as_int`] for the empty case
    pub fn as_float(&self, default: f32) -> Result<f32, AccessError> {
        self.convert(default, "f32")
    }

    /// Parses the scalar as `f64`; see [`Value::as_int`] for the empty case
    pub fn as_double(&self, default: f64) -> Result<f64, AccessError> {
        self.convert(default, "f64")
    }

    /// Loose boolean coercion
    ///
    /// Empty text yields `default`, `"true"` and `"false"` map to themselves,
    /// and any other text must be an integer, which is true when nonzero.
    pub fn as_bool(&self, default: bool) -> Result<bool, AccessError> {
        match self.as_str()? {
            "" => Ok(default),
            "true" => Ok(true),
            "false" => Ok(false),
            text => text
                .parse::<i64>()
                .map(|n| n != 0)
                .map_err(|_| AccessError::Conversion {
                    text: text.to_string(),
                    target: "bool",
                }),
        }
    }

    fn convert<T: FromStr>(&self, default: T, target: &'static str) -> Result<T, AccessError> {
        let text = self.as_str()?;
        if text.is_empty() {
            return Ok(default);
        }
        text.parse::<T>().map_err(|_| AccessError::Conversion {
            text: text.to_string(),
            target,
        })
    }

    fn mismatch(&self, expected: ValueKind) -> AccessError {
        AccessError::VariantMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(text) => f.write_str(text),
            Value::Vector(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(text)
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::vector(items)
    }
}

impl From<IniArray> for Value {
    fn from(items: IniArray) -> Self {
        Value::Vector(Box::new(items))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Vector(Box::new(iter.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rendering() {
        let value = Value::scalar("hello");
        assert_eq!(value.as_str().unwrap(), "hello");
        assert_eq!(value.as_string(), "hello");
        assert!(value.is_scalar());
        assert!(!value.is_vector());
    }

    #[test]
    fn test_vector_rendering() {
        let value = Value::vector([Value::vector(["1", "2"]), Value::scalar("x")]);
        assert_eq!(value.as_string(), "[[1, 2], x]");
        assert_eq!(Value::empty_vector().as_string(), "[]");
    }

    #[test]
    fn test_numeric_accessors() {
        let value = Value::scalar("42");
        assert_eq!(value.as_int(0).unwrap(), 42);
        assert_eq!(value.as_uint(0).unwrap(), 42);
        assert_eq!(value.as_long(0).unwrap(), 42);
        assert_eq!(value.as_ulong(0).unwrap(), 42);
        assert_eq!(value.as_float(0.0).unwrap(), 42.0);
        assert_eq!(value.as_double(0.0).unwrap(), 42.0);

        let value = Value::scalar("-3.5");
        assert_eq!(value.as_double(0.0).unwrap(), -3.5);
        assert!(value.as_int(0).is_err());
    }

    #[test]
    fn test_empty_scalar_yields_default() {
        let value = Value::default();
        assert!(value.is_empty());
        assert_eq!(value.as_int(7).unwrap(), 7);
        assert_eq!(value.as_uint(8).unwrap(), 8);
        assert_eq!(value.as_long(-9).unwrap(), -9);
        assert_eq!(value.as_ulong(10).unwrap(), 10);
        assert_eq!(value.as_float(1.5).unwrap(), 1.5);
        assert_eq!(value.as_double(2.5).unwrap(), 2.5);
        assert!(value.as_bool(true).unwrap());
        assert!(!value.as_bool(false).unwrap());
    }

    #[test]
    fn test_conversion_error_is_distinct() {
        let value = Value::scalar("not a number");
        match value.as_int(0) {
            Err(AccessError::Conversion { text, target }) => {
                assert_eq!(text, "not a number");
                assert_eq!(target, "i32");
            }
            other => panic!("Expected conversion error, got {:?}", other),
        }
        assert!(Value::scalar("-1").as_uint(0).is_err());
    }

    #[test]
    fn test_bool_coercion() {
        assert!(Value::scalar("true").as_bool(false).unwrap());
        assert!(!Value::scalar("false").as_bool(true).unwrap());
        assert!(Value::scalar("1").as_bool(false).unwrap());
        assert!(Value::scalar("-12").as_bool(false).unwrap());
        assert!(!Value::scalar("0").as_bool(true).unwrap());
        assert!(Value::scalar("yes").as_bool(false).is_err());
        assert!(Value::scalar("TRUE").as_bool(false).is_err());
    }

    #[test]
    fn test_variant_mismatch() {
        let scalar = Value::scalar("1");
        assert_eq!(
            scalar.as_vector().unwrap_err(),
            AccessError::VariantMismatch {
                expected: ValueKind::Vector,
                found: ValueKind::Scalar,
            }
        );

        let vector = Value::vector(["1"]);
        assert!(matches!(
            vector.as_str(),
            Err(AccessError::VariantMismatch { .. })
        ));
        assert!(matches!(
            vector.as_int(0),
            Err(AccessError::VariantMismatch { .. })
        ));
        assert!(!vector.is_empty());
    }

    #[test]
    fn test_conversions_and_push() {
        assert_eq!(Value::from(42), Value::scalar("42"));
        assert_eq!(Value::from(true), Value::scalar("true"));
        assert_eq!(Value::from(2.5f64), Value::scalar("2.5"));

        let mut value = Value::from(vec![1, 2]);
        value.push(3).unwrap();
        let items = value.as_vector().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_int(0).unwrap(), 3);

        let mut scalar = Value::scalar("x");
        assert!(scalar.push(1).is_err());
        scalar.set(vec!["a"]);
        assert!(scalar.is_vector());
    }

    #[test]
    fn test_serde_shape() {
        let value = Value::vector([Value::scalar("a"), Value::vector(["b"])]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!(["a", ["b"]]));

        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
