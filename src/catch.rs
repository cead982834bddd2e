//! Synchronous catch boundaries.

use core::any::Any;
use core::panic::Location;
use std::panic::{self, AssertUnwindSafe};

use crate::caught::{BoxError, Caught};
use crate::normalize::normalize;
use crate::Outcome;

/// Conversion of an `Err` value into a [`Caught`].
///
/// Implemented for everything that converts into a [`BoxError`]:
/// - every `E: Error + Send + Sync + 'static`, with its concrete type kept;
/// - `Caught` itself, which converts without being wrapped again;
/// - `Box<dyn Error + Send + Sync>` and, with the `anyhow` feature,
///   `anyhow::Error`;
/// - `&str` and `String`, which become message errors.
pub trait IntoCaught {
    /// Convert into a `Caught`, preserving the concrete error type.
    fn into_caught(self) -> Caught;
}

impl<E: Into<BoxError>> IntoCaught for E {
    #[inline]
    fn into_caught(self) -> Caught {
        Caught::wrap_box(self.into())
    }
}

/// Run `f`, returning its value or the failure it raised.
///
/// A panic inside `f` is captured and normalized (see [`normalize`]) instead
/// of unwinding further. `f` is called exactly once. The installed panic hook
/// still runs for panics raised with `panic!`.
///
/// Values touched by `f` may be left mid-update when it panics; `catch` does
/// not require `f` to be `UnwindSafe`.
///
/// # Examples
///
/// ```
/// use catch_error::catch;
///
/// assert_eq!(catch(|| 42).unwrap(), 42);
///
/// let err = catch(|| -> i32 { std::panic::panic_any("oops") }).unwrap_err();
/// assert!(err.is_foreign());
/// assert!(err.message().contains("oops"));
/// ```
#[track_caller]
pub fn catch<T, F>(f: F) -> Outcome<T>
where
    F: FnOnce() -> T,
{
    let loc = Location::caller();
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| absorb(payload, loc))
}

/// Run a fallible `f`, returning its value or the failure it raised or returned.
///
/// `Err(e)` is converted with [`IntoCaught`], keeping the concrete type of
/// `e`. Panics are handled as in [`catch`].
///
/// # Examples
///
/// ```
/// use catch_error::try_catch;
///
/// let err = try_catch(|| "x".parse::<i32>()).unwrap_err();
/// assert!(err.is::<std::num::ParseIntError>());
/// ```
#[track_caller]
pub fn try_catch<T, E, F>(f: F) -> Outcome<T>
where
    E: IntoCaught,
    F: FnOnce() -> Result<T, E>,
{
    let loc = Location::caller();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(convert(e, loc)),
        Err(payload) => Err(absorb(payload, loc)),
    }
}

/// Raise `e` so that an enclosing catch boundary receives it unchanged.
///
/// The call site is recorded as a frame. Unlike `panic!`, the panic hook is
/// not invoked.
///
/// # Examples
///
/// ```
/// use catch_error::{catch, throw};
/// use std::io;
///
/// let err = catch(|| -> () { throw(io::Error::other("net fail")) }).unwrap_err();
/// assert!(err.is::<io::Error>());
/// assert_eq!(err.message(), "net fail");
/// ```
#[track_caller]
pub fn throw<E: IntoCaught>(e: E) -> ! {
    e.into_caught().at(Location::caller()).throw()
}

/// Normalize a captured panic payload and record the catch site.
pub(crate) fn absorb(payload: Box<dyn Any + Send>, loc: &'static Location<'static>) -> Caught {
    let caught = normalize(payload).at(loc);
    tracing::debug!(
        kind = ?caught.kind(),
        at = %loc,
        "absorbed panic: {}",
        caught.message()
    );
    caught
}

/// Convert an `Err` value and record the catch site.
pub(crate) fn convert<E: IntoCaught>(e: E, loc: &'static Location<'static>) -> Caught {
    let caught = e.into_caught().at(loc);
    tracing::trace!(at = %loc, "converted error: {}", caught.message());
    caught
}
