//! Extension traits for futures and `Result` types.

use core::future::IntoFuture;
use core::panic::Location;

use crate::catch::{convert, IntoCaught};
use crate::future::{catch_async, try_catch_async, Catching, TryCatching};
use crate::Outcome;

/// Method form of [`catch_async`] for anything that can be awaited.
pub trait CatchExt: IntoFuture + Sized {
    /// Wrap this computation so it resolves to an [`Outcome`].
    fn catch_error(self) -> Catching<Self::IntoFuture>;
}

impl<F: IntoFuture> CatchExt for F {
    #[track_caller]
    fn catch_error(self) -> Catching<F::IntoFuture> {
        catch_async(self)
    }
}

/// Method form of [`try_catch_async`] for fallible computations.
pub trait TryCatchExt<T, E>: IntoFuture<Output = Result<T, E>> + Sized {
    /// Wrap this computation so both panics and `Err` outputs resolve to `Err(Caught)`.
    fn try_catch_error(self) -> TryCatching<Self::IntoFuture>;
}

impl<F, T, E> TryCatchExt<T, E> for F
where
    F: IntoFuture<Output = Result<T, E>>,
    E: IntoCaught,
{
    #[track_caller]
    fn try_catch_error(self) -> TryCatching<F::IntoFuture> {
        try_catch_async(self)
    }
}

/// Extension trait for converting a `Result` into an [`Outcome`].
pub trait ResultExt<T> {
    /// Convert the error with [`IntoCaught`], recording the call site as a frame.
    fn caught(self) -> Outcome<T>;
}

impl<T, E: IntoCaught> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn caught(self) -> Outcome<T> {
        let loc = Location::caller();
        self.map_err(|e| convert(e, loc))
    }
}
