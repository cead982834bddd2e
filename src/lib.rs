//! catch-error - Turn raised failures into plain return values
//!
//! # Overview
//!
//! `catch-error` runs a closure or drives a future inside a catch boundary and
//! hands back an [`Outcome<T>`]: `Ok` with the value, or `Err` with a
//! [`Caught`] describing the failure. Nothing raised inside the boundary
//! escapes it.
//!
//! A failure that is already an error value (anything implementing
//! `std::error::Error`) keeps its concrete type and fields, recoverable with
//! [`Caught::downcast`]. Any other raised value (a string, a number, an
//! arbitrary panic payload) is normalized into a `Caught` of kind
//! [`Kind::Foreign`] whose message starts with `Non-error value thrown: `,
//! with the original payload retained.
//!
//! # Quick Start
//!
//! ```
//! use catch_error::{catch, throw, Caught};
//!
//! assert_eq!(catch(|| 42).unwrap(), 42);
//!
//! let err = catch(|| -> i32 { throw(Caught::msg("bad")) }).unwrap_err();
//! assert_eq!(err.message(), "bad");
//! ```
//!
//! # Entry points
//!
//! | Input | Function | Method form |
//! |-------|----------|-------------|
//! | `FnOnce() -> T` | [`catch`] | |
//! | `FnOnce() -> Result<T, E>` | [`try_catch`] | |
//! | future of `T` | [`catch_async`] | [`CatchExt::catch_error`] |
//! | future of `Result<T, E>` | [`try_catch_async`] | [`TryCatchExt::try_catch_error`] |
//! | `FnOnce() -> impl Future` | [`catch_async_fn`], [`try_catch_async_fn`] | |
//! | `Result<T, E>` | | [`ResultExt::caught`] |
//! | `fn` / `async fn` item | `#[catching]` | |
//!
//! # Raising
//!
//! | Raised with | Result |
//! |-------------|--------|
//! | [`throw(e)`](throw), [`Caught::throw`] | `e` unchanged, type preserved |
//! | `panic_any(e)` for common std errors | `e` unchanged, type preserved |
//! | `panic!("..")`, `panic_any(42)` | [`Kind::Foreign`], scalar in [`Caught::thrown`] |
//! | `panic_any(anything_else)` | [`Kind::Foreign`], raw value in [`Caught::into_payload`] |
//! | `Err(e)` from a `try_` boundary | converted with [`IntoCaught`]: error types, `Box<dyn Error>`, `anyhow::Error` |
//!
//! # Features
//!
//! - `macros` (default): the `#[catching]` attribute.
//! - `serde`: `Serialize`/`Deserialize` for [`Caught`] and [`Value`].
//! - `anyhow`: `From<anyhow::Error>` for [`Caught`]. `anyhow::Result` also
//!   works with the `try_` entry points without this feature.

// ============================================================
// Modules
// ============================================================

mod catch;
mod caught;
mod ext;
mod future;
mod macros;
mod normalize;

// ============================================================
// Re-exports
// ============================================================

pub use catch::{catch, throw, try_catch, IntoCaught};
pub use caught::{BoxError, Caught, FrameView, Kind, Value, FOREIGN_PREFIX, FRAME_LIMIT};
pub use ext::{CatchExt, ResultExt, TryCatchExt};
pub use future::{catch_async, catch_async_fn, try_catch_async, try_catch_async_fn, Catching, TryCatching};
pub use normalize::normalize;

/// Rewrite a function so it returns an [`Outcome`] instead of raising.
///
/// - a return type `R` becomes `Outcome<R>`;
/// - a return type written as `Result<T, E>` becomes `Outcome<T>`; `Err`
///   values are converted, with `&str` and `String` errors normalized as
///   foreign failures;
/// - `async fn` bodies run inside [`catch_async`], others inside [`catch`].
///
/// ```
/// use catch_error::catching;
///
/// #[catching]
/// fn parse(input: &str) -> Result<i32, std::num::ParseIntError> {
///     input.trim().parse()
/// }
///
/// assert_eq!(parse(" 7 ").unwrap(), 7);
/// assert!(parse("x").unwrap_err().is::<std::num::ParseIntError>());
/// ```
#[cfg(feature = "macros")]
pub use catch_error_macros::catching;

// ============================================================
// Type aliases
// ============================================================

/// Result of a catch boundary: the value, or the failure as a [`Caught`].
pub type Outcome<T> = core::result::Result<T, Caught>;

// Internal helpers for macros
#[doc(hidden)]
pub mod __private {
    pub use crate::macros::{__ErrWrap, __IntoCaught};
}
