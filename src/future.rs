//! Asynchronous catch boundaries.

use core::future::{Future, IntoFuture};
use core::panic::Location;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use std::panic::{self, AssertUnwindSafe};

use pin_project_lite::pin_project;

use crate::catch::{absorb, convert, IntoCaught};
use crate::caught::Caught;
use crate::Outcome;

pin_project! {
    /// Future returned by [`catch_async`] and [`catch_async_fn`].
    ///
    /// Resolves to `Ok` with the output of the wrapped future, or to `Err` if
    /// polling it panicked. It never panics out of `poll` on behalf of the
    /// wrapped future.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct Catching<F> {
        #[pin]
        state: State<F>,
        location: &'static Location<'static>,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<F> {
        Running {
            #[pin]
            future: F,
        },
        // `Some` when the wrapped function panicked before producing a future,
        // `None` once the result has been returned.
        Settled {
            caught: Option<Caught>,
        },
    }
}

impl<F> Catching<F> {
    fn running(future: F, location: &'static Location<'static>) -> Self {
        Self {
            state: State::Running { future },
            location,
        }
    }

    fn failed(caught: Caught, location: &'static Location<'static>) -> Self {
        Self {
            state: State::Settled {
                caught: Some(caught),
            },
            location,
        }
    }
}

impl<F: Future> Future for Catching<F> {
    type Output = Outcome<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        let output = match this.state.as_mut().project() {
            StateProj::Running { future } => {
                match panic::catch_unwind(AssertUnwindSafe(|| future.poll(cx))) {
                    Ok(Poll::Pending) => return Poll::Pending,
                    Ok(Poll::Ready(value)) => Ok(value),
                    Err(payload) => Err(absorb(payload, *this.location)),
                }
            }
            StateProj::Settled { caught } => match caught.take() {
                Some(caught) => Err(caught),
                None => panic!("`Catching` polled after completion"),
            },
        };
        // Settling drops the wrapped future, whose destructor may panic too.
        let mut state = this.state;
        let settled =
            panic::catch_unwind(AssertUnwindSafe(|| state.set(State::Settled { caught: None })));
        Poll::Ready(match (output, settled) {
            (Ok(_), Err(payload)) => Err(absorb(payload, *this.location)),
            (output, _) => output,
        })
    }
}

pin_project! {
    /// Future returned by [`try_catch_async`] and [`try_catch_async_fn`].
    ///
    /// Like [`Catching`], and additionally converts an `Err` output with
    /// [`IntoCaught`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct TryCatching<F> {
        #[pin]
        inner: Catching<F>,
    }
}

impl<F, T, E> Future for TryCatching<F>
where
    F: Future<Output = Result<T, E>>,
    E: IntoCaught,
{
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let location = this.inner.location;
        Poll::Ready(match ready!(this.inner.poll(cx)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(convert(e, location)),
            Err(caught) => Err(caught),
        })
    }
}

/// Wrap an in-flight computation so it resolves to an [`Outcome`].
///
/// The returned future resolves to the computation's value, or to the
/// normalized failure if polling it panicked.
///
/// # Examples
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// use catch_error::catch_async;
///
/// assert_eq!(catch_async(async { 5 }).await.unwrap(), 5);
/// # });
/// ```
#[track_caller]
pub fn catch_async<F: IntoFuture>(future: F) -> Catching<F::IntoFuture> {
    Catching::running(future.into_future(), Location::caller())
}

/// Wrap a fallible in-flight computation so it resolves to an [`Outcome`].
///
/// `Err(e)` outputs are converted with [`IntoCaught`]; panics are handled as
/// in [`catch_async`].
#[track_caller]
pub fn try_catch_async<F, T, E>(future: F) -> TryCatching<F::IntoFuture>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: IntoCaught,
{
    TryCatching {
        inner: Catching::running(future.into_future(), Location::caller()),
    }
}

/// Call `f` now and wrap the computation it produces.
///
/// If `f` panics before producing a computation, the returned future resolves
/// to that failure on its first poll.
#[track_caller]
pub fn catch_async_fn<F, Fut>(f: F) -> Catching<Fut::IntoFuture>
where
    F: FnOnce() -> Fut,
    Fut: IntoFuture,
{
    let location = Location::caller();
    match panic::catch_unwind(AssertUnwindSafe(|| f().into_future())) {
        Ok(future) => Catching::running(future, location),
        Err(payload) => Catching::failed(absorb(payload, location), location),
    }
}

/// Fallible counterpart of [`catch_async_fn`].
#[track_caller]
pub fn try_catch_async_fn<F, Fut, T, E>(f: F) -> TryCatching<Fut::IntoFuture>
where
    F: FnOnce() -> Fut,
    Fut: IntoFuture<Output = Result<T, E>>,
    E: IntoCaught,
{
    TryCatching {
        inner: catch_async_fn(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{throw, Kind, Value};
    use std::io;
    use std::task::Waker;

    // Minimal executor for futures that never return Pending.
    fn poll_once<F: Future>(future: F) -> Poll<F::Output> {
        let mut future = Box::pin(future);
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        future.as_mut().poll(&mut cx)
    }

    fn noop_waker() -> Waker {
        use std::sync::Arc;
        use std::task::Wake;

        struct Noop;
        impl Wake for Noop {
            fn wake(self: Arc<Self>) {}
        }
        Waker::from(Arc::new(Noop))
    }

    #[test]
    fn test_ready_value() {
        assert!(matches!(poll_once(catch_async(async { 5 })), Poll::Ready(Ok(5))));
    }

    #[test]
    fn test_panic_while_polling() {
        let future = catch_async(async {
            if true {
                throw(io::Error::other("net fail"));
            }
            1
        });
        match poll_once(future) {
            Poll::Ready(Err(caught)) => {
                assert_eq!(caught.message(), "net fail");
                assert!(caught.is::<io::Error>());
            }
            other => panic!("unexpected poll result: {:?}", other.map(|r| r.is_ok())),
        }
    }

    #[test]
    fn test_fn_panicking_before_future() {
        let future = catch_async_fn(|| -> core::future::Ready<u8> { std::panic::panic_any("early") });
        match poll_once(future) {
            Poll::Ready(Err(caught)) => {
                assert_eq!(caught.kind(), Kind::Foreign);
                assert_eq!(caught.thrown().and_then(Value::as_str), Some("early"));
            }
            _ => panic!("expected the early failure"),
        }
    }

    #[test]
    fn test_try_catching_converts_err() {
        let future = try_catch_async(async { Err::<u8, _>(io::Error::other("refused")) });
        match poll_once(future) {
            Poll::Ready(Err(caught)) => assert!(caught.is::<io::Error>()),
            _ => panic!("expected a converted error"),
        }
    }

    #[test]
    fn test_panicking_drop_is_caught() {
        struct Flaky;

        impl Future for Flaky {
            type Output = u8;

            fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<u8> {
                Poll::Ready(1)
            }
        }

        impl Drop for Flaky {
            fn drop(&mut self) {
                std::panic::panic_any("dropped mid-flight");
            }
        }

        match poll_once(catch_async(Flaky)) {
            Poll::Ready(Err(caught)) => {
                assert!(caught.is_foreign());
                assert_eq!(caught.thrown().and_then(Value::as_str), Some("dropped mid-flight"));
            }
            _ => panic!("expected the drop failure"),
        }
    }

    #[test]
    fn test_pending_is_forwarded() {
        let future = catch_async(core::future::pending::<u8>());
        assert!(poll_once(future).is_pending());
    }

    #[test]
    #[should_panic(expected = "polled after completion")]
    fn test_poll_after_completion_panics() {
        let mut future = Box::pin(catch_async(async { 1 }));
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let _ = future.as_mut().poll(&mut cx);
        let _ = future.as_mut().poll(&mut cx);
    }
}
