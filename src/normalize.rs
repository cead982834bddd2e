//! Normalization of panic payloads into [`Caught`] values.

use core::any::Any;
use core::fmt;
use core::num::{ParseFloatError, ParseIntError};
use core::str::{ParseBoolError, Utf8Error};
use std::io;
use std::string::FromUtf8Error;

use crate::caught::{BoxError, Caught, Value};

/// Turn a panic payload into a [`Caught`].
///
/// - a `Caught` is returned unchanged;
/// - a `Box<dyn Error + Send + Sync>` and the common std error types are
///   wrapped with their concrete type preserved;
/// - strings, chars, numbers and booleans become foreign failures whose
///   message names the value;
/// - anything else becomes a foreign failure with an opaque message.
///
/// Foreign failures keep the raw payload, see [`Caught::into_payload`].
///
/// # Examples
///
/// ```
/// use catch_error::{normalize, Kind};
///
/// let caught = normalize(Box::new("oops"));
/// assert_eq!(caught.kind(), Kind::Foreign);
/// assert_eq!(caught.message(), "Non-error value thrown: oops");
/// ```
pub fn normalize(payload: Box<dyn Any + Send>) -> Caught {
    let payload = match payload.downcast::<Caught>() {
        Ok(caught) => return *caught,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<BoxError>() {
        Ok(e) => return Caught::wrap_box(*e),
        Err(payload) => payload,
    };
    let payload = match known_error(payload) {
        Ok(caught) => return caught,
        Err(payload) => payload,
    };

    let thrown = scalar(&*payload);
    let caught = Caught::foreign(thrown, payload);
    tracing::debug!(thrown = caught.message(), "normalized non-error failure");
    caught
}

// Recognizes error types commonly raised with `panic_any`. Other error types
// are not nameable from a `dyn Any` and must be raised with `throw`.
macro_rules! recognize {
    ($payload:ident: $($ty:ty),+ $(,)?) => {
        $(
            let $payload = match $payload.downcast::<$ty>() {
                Ok(e) => return Ok(Caught::new(*e)),
                Err(payload) => payload,
            };
        )+
    };
}

fn known_error(payload: Box<dyn Any + Send>) -> Result<Caught, Box<dyn Any + Send>> {
    recognize!(payload:
        io::Error,
        fmt::Error,
        ParseIntError,
        ParseFloatError,
        ParseBoolError,
        Utf8Error,
        FromUtf8Error,
    );
    Err(payload)
}

macro_rules! scalar_of {
    ($payload:ident: $($ty:ty),+ $(,)?) => {
        $(
            if let Some(v) = $payload.downcast_ref::<$ty>() {
                return Some(Value::from(*v));
            }
        )+
    };
}

fn scalar(payload: &(dyn Any + Send)) -> Option<Value> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return Some(Value::from(*s));
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return Some(Value::from(s.as_str()));
    }
    scalar_of!(payload:
        char, bool,
        i8, i16, i32, i64, isize,
        u8, u16, u32, u64, usize,
        f32, f64,
    );
    None
}
