//! Benchmarks for catch boundaries.
//!
//! Compares each boundary against the equivalent plain call so the overhead
//! of `catch_unwind`, normalization and frame recording is visible.
//!
//! Run with: cargo bench

use catch_error::{catch, catch_async, normalize, throw, try_catch, Caught};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::future::Future;
use std::io;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

// ============================================================
// Test helpers
// ============================================================

#[inline(never)]
fn io_err(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, msg)
}

#[inline(never)]
fn fallible_ok() -> Result<i32, io::Error> {
    Ok(42)
}

#[inline(never)]
fn fallible_err() -> Result<i32, io::Error> {
    Err(io_err("fail"))
}

struct Noop;

impl Wake for Noop {
    fn wake(self: Arc<Self>) {}
}

fn block_on_ready<F: Future>(future: F) -> F::Output {
    let waker = Waker::from(Arc::new(Noop));
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(out) => out,
        Poll::Pending => unreachable!("benchmark futures are always ready"),
    }
}

// ============================================================
// 1. Success path
// ============================================================

fn bench_plain_call(c: &mut Criterion) {
    c.bench_function("plain_call", |b| b.iter(|| black_box(fallible_ok())));
}

fn bench_catch_ok(c: &mut Criterion) {
    c.bench_function("catch_ok", |b| b.iter(|| black_box(catch(|| black_box(42)))));
}

fn bench_try_catch_ok(c: &mut Criterion) {
    c.bench_function("try_catch_ok", |b| b.iter(|| black_box(try_catch(fallible_ok))));
}

fn bench_catch_async_ok(c: &mut Criterion) {
    c.bench_function("catch_async_ok", |b| {
        b.iter(|| black_box(block_on_ready(catch_async(async { black_box(42) }))))
    });
}

// ============================================================
// 2. Failure path
// ============================================================

fn bench_try_catch_err(c: &mut Criterion) {
    c.bench_function("try_catch_err", |b| b.iter(|| black_box(try_catch(fallible_err))));
}

fn bench_catch_throw(c: &mut Criterion) {
    c.bench_function("catch_throw", |b| {
        b.iter(|| black_box(catch(|| -> i32 { throw(io_err("fail")) })))
    });
}

fn bench_normalize_foreign(c: &mut Criterion) {
    c.bench_function("normalize_foreign", |b| {
        b.iter(|| black_box(normalize(Box::new(black_box("oops")))))
    });
}

fn bench_normalize_passthrough(c: &mut Criterion) {
    c.bench_function("normalize_passthrough", |b| {
        b.iter(|| black_box(normalize(Box::new(Caught::msg("bad")))))
    });
}

criterion_group!(
    success,
    bench_plain_call,
    bench_catch_ok,
    bench_try_catch_ok,
    bench_catch_async_ok,
);
criterion_group!(
    failure,
    bench_try_catch_err,
    bench_catch_throw,
    bench_normalize_foreign,
    bench_normalize_passthrough,
);
criterion_main!(success, failure);
