//! # Type-erased values
//!
//! Listeners are late-bound: their parameter types are only checked when
//! an event fires. Everything that crosses the emitter boundary is
//! therefore carried as a [`Value`].
//!
//! - [`Value`]: one type-erased, reference-counted value
//! - [`Payload`]: the ordered arguments of a firing, shared by every listener
//! - [`Values`]: the ordered results of one listener

use crate::error::ListenerError;
use std::{
    any::{Any, type_name},
    fmt,
    ops::Deref,
    sync::Arc,
};

/// A type-erased, thread-safe value.
///
/// Cloning is O(1); the underlying value is shared.
///
/// # Example
///
/// ```rust
/// use hearken_core::Value;
///
/// let value = Value::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// assert_eq!(value.extract::<u8>(), None);
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub(crate) fn from_boxed(inner: Box<dyn Any + Send + Sync>, type_name: &'static str) -> Self {
        Self {
            inner: Arc::from(inner),
            type_name,
        }
    }

    /// Name of the concrete type held by this value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the value holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        (*self.inner).is::<T>()
    }

    /// Borrow the value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).downcast_ref::<T>()
    }

    /// Clone the value out as a `T`.
    pub fn extract<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

/// The ordered arguments of one firing.
///
/// A payload is immutable and reference-counted, so the same payload is
/// handed to every listener of a firing, including listeners running on
/// other threads.
#[derive(Clone, Default)]
pub struct Payload(Arc<[Value]>);

impl Payload {
    /// Create a payload from owned values.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into())
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload carries no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the arguments as a slice.
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Convert the argument at `position` into a `T`.
    pub fn extract<T: Any + Clone>(&self, position: usize) -> Result<T, ListenerError> {
        let value = self.0.get(position).ok_or(ListenerError::ArgumentCount {
            expected: position + 1,
            found: self.0.len(),
        })?;
        value.extract::<T>().ok_or(ListenerError::ArgumentType {
            position,
            expected: type_name::<T>(),
            found: value.type_name(),
        })
    }
}

impl Deref for Payload {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Value>> for Payload {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl FromIterator<Value> for Payload {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// The ordered results produced by one listener.
///
/// A listener returning `()` produces no values, a listener returning
/// `Values` produces exactly those, and any other return type produces a
/// single value.
#[derive(Clone, Debug, Default)]
pub struct Values(Vec<Value>);

impl Values {
    /// Create a result sequence from owned values.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Shape a listener's return value into a result sequence.
    pub fn from_return<R: Any + Send + Sync>(ret: R) -> Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(ret);
        let boxed = match boxed.downcast::<Values>() {
            Ok(values) => return *values,
            Err(other) => other,
        };
        if (*boxed).is::<()>() {
            return Self::default();
        }
        Self(vec![Value::from_boxed(boxed, type_name::<R>())])
    }

    /// Borrow the result at `index` as a `T`.
    pub fn get_as<T: Any>(&self, index: usize) -> Option<&T> {
        self.0.get(index).and_then(Value::downcast_ref::<T>)
    }

    /// Consume into the underlying vector.
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for Values {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Value>> for Values {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Values {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Values {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build a [`Payload`] from a list of expressions.
///
/// ```rust
/// use hearken_core::payload;
///
/// let payload = payload![3, 4, "label"];
/// assert_eq!(payload.len(), 3);
/// assert_eq!(payload[2].downcast_ref::<&str>(), Some(&"label"));
/// ```
#[macro_export]
macro_rules! payload {
    () => {
        $crate::Payload::default()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Payload::new(::std::vec![$($crate::Value::new($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_downcast() {
        let value = Value::new(String::from("hello"));
        assert!(value.is::<String>());
        assert!(!value.is::<&str>());
        assert_eq!(value.extract::<String>().as_deref(), Some("hello"));
    }

    #[test]
    fn test_value_clone_shares_inner() {
        let value = Value::new(vec![1, 2, 3]);
        let cloned = value.clone();
        let a = value.downcast_ref::<Vec<i32>>().map(|v| v.as_ptr());
        let b = cloned.downcast_ref::<Vec<i32>>().map(|v| v.as_ptr());
        assert_eq!(a, b);
    }

    #[test]
    fn test_payload_extract_type_mismatch() {
        let payload = payload![1_i32, "two"];
        assert_eq!(payload.extract::<i32>(0).ok(), Some(1));

        let err = payload.extract::<i32>(1).unwrap_err();
        match err {
            ListenerError::ArgumentType {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 1);
                assert_eq!(expected, "i32");
                assert_eq!(found, "&str");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_payload_extract_out_of_range() {
        let payload = payload![1_i32];
        assert!(matches!(
            payload.extract::<i32>(3),
            Err(ListenerError::ArgumentCount {
                expected: 4,
                found: 1
            })
        ));
    }

    #[test]
    fn test_payload_from_unit_is_empty() {
        let payload = Payload::from(());
        assert!(payload.is_empty());
        assert!(payload![].is_empty());
    }

    #[test]
    fn test_values_from_unit_is_empty() {
        assert!(Values::from_return(()).is_empty());
    }

    #[test]
    fn test_values_from_single_return() {
        let values = Values::from_return(7_i32);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get_as::<i32>(0), Some(&7));
        assert_eq!(values[0].type_name(), "i32");
    }

    #[test]
    fn test_values_passthrough() {
        let values = Values::from_return(Values::new(vec![Value::new(1_u8), Value::new("x")]));
        assert_eq!(values.len(), 2);
        assert_eq!(values.get_as::<u8>(0), Some(&1));
        assert_eq!(values.get_as::<&str>(1), Some(&"x"));
    }

    #[test]
    fn test_payload_as_slice_shares_arguments() {
        let payload = payload![1_i32, "two"];
        let cloned = payload.clone();
        match payload.as_slice() {
            [first, second] => {
                assert_eq!(first.downcast_ref::<i32>(), Some(&1));
                assert_eq!(second.downcast_ref::<&str>(), Some(&"two"));
            }
            other => panic!("unexpected arguments: {other:?}"),
        }
        assert!(std::ptr::eq(payload.as_slice(), cloned.as_slice()));
    }

    #[test]
    fn test_values_into_inner() {
        let values = Values::from_return(Values::new(vec![Value::new(2_u8), Value::new(3_u8)]));
        let inner = values.into_inner();
        let bytes: Vec<u8> = inner.iter().filter_map(Value::extract::<u8>).collect();
        assert_eq!(bytes, vec![2, 3]);
    }
}
