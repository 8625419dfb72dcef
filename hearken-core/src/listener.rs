//! # Listener descriptors
//!
//! A [`Listener`] is built once, at registration time, from any callable.
//! It carries:
//!
//! 1. the callable's declared [`Arity`], used to filter listeners against
//!    a payload before anything runs;
//! 2. a uniform adapter that takes a [`Payload`] and returns [`Values`],
//!    converting each positional argument to the parameter type on the way
//!    in and shaping the return value on the way out.
//!
//! Plain closures and functions of up to eight parameters convert through
//! [`IntoListener`]. Any-arity listeners are built with
//! [`Listener::variadic`] or [`Listener::try_variadic`].

use crate::{
    error::{BoxError, ListenerError},
    value::{Payload, Values},
};
use std::{
    any::{Any, type_name},
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

/// Number of positional parameters a listener accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any number of arguments.
    Variadic,
}

impl Arity {
    /// Returns `true` if a payload of `len` arguments can be passed.
    pub fn accepts(self, len: usize) -> bool {
        match self {
            Arity::Exact(n) => n == len,
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Variadic => f.write_str("variadic"),
        }
    }
}

type Invoke = dyn Fn(&Payload) -> Result<Values, ListenerError> + Send + Sync;

/// A registered callable with its arity and invocation adapter.
///
/// Cloning is O(1).
#[derive(Clone)]
pub struct Listener {
    arity: Arity,
    name: &'static str,
    invoke: Arc<Invoke>,
}

impl Listener {
    /// Build a listener from any supported callable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hearken_core::{Arity, Listener, payload};
    ///
    /// let add = Listener::new(|a: i32, b: i32| a + b);
    /// assert_eq!(add.arity(), Arity::Exact(2));
    ///
    /// let out = add.call(&payload![3, 4]).unwrap();
    /// assert_eq!(out.get_as::<i32>(0), Some(&7));
    /// ```
    pub fn new<F, Args>(listener: F) -> Self
    where
        F: IntoListener<Args>,
    {
        listener.into_listener()
    }

    /// Build an any-arity listener that sees the whole payload.
    pub fn variadic<F, R>(listener: F) -> Self
    where
        F: Fn(&Payload) -> R + Send + Sync + 'static,
        R: Any + Send + Sync,
    {
        Self::from_parts(Arity::Variadic, type_name::<F>(), move |payload| {
            Ok(Values::from_return(listener(payload)))
        })
    }

    /// Build an any-arity listener that may fail.
    pub fn try_variadic<F>(listener: F) -> Self
    where
        F: Fn(&Payload) -> Result<Values, BoxError> + Send + Sync + 'static,
    {
        Self::from_parts(Arity::Variadic, type_name::<F>(), move |payload| {
            listener(payload).map_err(ListenerError::Custom)
        })
    }

    /// Build a listener from an explicit arity and adapter.
    ///
    /// The adapter is only ever called with payloads whose length the
    /// arity accepts when invoked through an emitter.
    pub fn from_parts<F>(arity: Arity, name: &'static str, invoke: F) -> Self
    where
        F: Fn(&Payload) -> Result<Values, ListenerError> + Send + Sync + 'static,
    {
        Self {
            arity,
            name,
            invoke: Arc::new(invoke),
        }
    }

    /// Declared parameter count.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Diagnostic name (the callable's type name).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this listener can be called with `payload`.
    pub fn accepts(&self, payload: &Payload) -> bool {
        self.arity.accepts(payload.len())
    }

    /// Invoke the listener.
    ///
    /// A panic inside the listener is caught and reported as
    /// [`ListenerError::Panicked`].
    pub fn call(&self, payload: &Payload) -> Result<Values, ListenerError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.invoke)(payload))) {
            Ok(result) => result,
            Err(panic) => Err(ListenerError::Panicked(panic_message(panic.as_ref()))),
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("arity", &self.arity)
            .field("name", &self.name)
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Conversion of a callable into a [`Listener`].
///
/// `Args` is the tuple of parameter types and only serves to keep the
/// implementations for different arities apart.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a listener",
    label = "not a supported listener callable",
    note = "Listeners are `Fn` closures of up to 8 owned `Clone + Send + Sync + 'static` parameters returning a `Send + Sync + 'static` value."
)]
pub trait IntoListener<Args>: Send + Sync + 'static {
    /// Build the listener descriptor.
    fn into_listener(self) -> Listener;
}

impl IntoListener<Listener> for Listener {
    fn into_listener(self) -> Listener {
        self
    }
}

macro_rules! impl_into_listener {
    ($arity:literal; $($arg:ident $pos:literal),*) => {
        impl<F, R, $($arg,)*> IntoListener<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Any + Send + Sync,
            $($arg: Any + Clone + Send + Sync,)*
        {
            fn into_listener(self) -> Listener {
                Listener::from_parts(Arity::Exact($arity), type_name::<F>(), move |payload: &Payload| {
                    if payload.len() != $arity {
                        return Err(ListenerError::ArgumentCount {
                            expected: $arity,
                            found: payload.len(),
                        });
                    }
                    let ret = (self)($(payload.extract::<$arg>($pos)?),*);
                    Ok(Values::from_return(ret))
                })
            }
        }
    };
}

impl_into_listener!(0;);
impl_into_listener!(1; A0 0);
impl_into_listener!(2; A0 0, A1 1);
impl_into_listener!(3; A0 0, A1 1, A2 2);
impl_into_listener!(4; A0 0, A1 1, A2 2, A3 3);
impl_into_listener!(5; A0 0, A1 1, A2 2, A3 3, A4 4);
impl_into_listener!(6; A0 0, A1 1, A2 2, A3 3, A4 4, A5 5);
impl_into_listener!(7; A0 0, A1 1, A2 2, A3 3, A4 4, A5 5, A6 6);
impl_into_listener!(8; A0 0, A1 1, A2 2, A3 3, A4 4, A5 5, A6 6, A7 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{payload, value::Value};

    #[test]
    fn test_arity_from_signature() {
        assert_eq!(Listener::new(|| ()).arity(), Arity::Exact(0));
        assert_eq!(Listener::new(|_: u8| ()).arity(), Arity::Exact(1));
        assert_eq!(
            Listener::new(|_: u8, _: u8, _: u8| ()).arity(),
            Arity::Exact(3)
        );
        assert_eq!(
            Listener::variadic(|p: &Payload| p.len()).arity(),
            Arity::Variadic
        );
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(1));
        assert!(Arity::Variadic.accepts(0));
        assert!(Arity::Variadic.accepts(9));
    }

    #[test]
    fn test_call_converts_arguments() {
        let listener = Listener::new(|name: String, times: usize| name.repeat(times));
        let out = listener.call(&payload![String::from("ab"), 3_usize]).unwrap();
        assert_eq!(out.get_as::<String>(0).map(String::as_str), Some("ababab"));
    }

    #[test]
    fn test_call_reports_type_fault() {
        let listener = Listener::new(|a: i32| a);
        let err = listener.call(&payload!["not an int"]).unwrap_err();
        assert!(matches!(err, ListenerError::ArgumentType { position: 0, .. }));
    }

    #[test]
    fn test_call_reports_count_fault() {
        let listener = Listener::new(|a: i32, b: i32| a - b);
        let err = listener.call(&payload![1]).unwrap_err();
        assert!(matches!(
            err,
            ListenerError::ArgumentCount {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_call_catches_panic() {
        let listener = Listener::new(|| -> i32 { panic!("boom") });
        match listener.call(&Payload::default()) {
            Err(ListenerError::Panicked(msg)) => assert_eq!(msg, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unit_return_yields_no_values() {
        let listener = Listener::new(|_: i32| {});
        assert!(listener.call(&payload![1]).unwrap().is_empty());
    }

    #[test]
    fn test_multi_value_return() {
        let listener = Listener::new(|a: i32, b: i32| Values::new(vec![Value::new(a / b), Value::new(a % b)]));
        let out = listener.call(&payload![7, 2]).unwrap();
        assert_eq!(out.get_as::<i32>(0), Some(&3));
        assert_eq!(out.get_as::<i32>(1), Some(&1));
    }

    #[test]
    fn test_try_variadic_error() {
        let listener = Listener::try_variadic(|p: &Payload| {
            if p.is_empty() {
                Err("empty payload".into())
            } else {
                Ok(Values::default())
            }
        });
        assert!(listener.call(&payload![1]).is_ok());
        let err = listener.call(&Payload::default()).unwrap_err();
        assert_eq!(err.to_string(), "empty payload");
    }

    #[test]
    fn test_function_item_listener() {
        fn double(x: u64) -> u64 {
            x * 2
        }
        let listener = Listener::new(double);
        let out = listener.call(&payload![21_u64]).unwrap();
        assert_eq!(out.get_as::<u64>(0), Some(&42));
    }
}
