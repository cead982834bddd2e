//! How different raised values come out of a catch boundary.

use catch_error::{catch, throw, Caught};
use std::io;
use std::panic::panic_any;

#[derive(Debug)]
struct Checkpoint {
    step: u32,
}

fn describe(label: &str, caught: Caught) {
    println!("{label}");
    println!("  kind:    {:?}", caught.kind());
    println!("  message: {}", caught.message());
    if let Some(value) = caught.thrown() {
        println!("  thrown:  {value}");
        if let Some(code) = value.as_i64() {
            println!("  exit:    {}", code.clamp(1, 255));
        }
    }
    for frame in caught.frames() {
        println!("  at       {}:{}:{}", frame.file, frame.line, frame.col);
    }
    if let Some(payload) = caught.into_payload() {
        if let Some(checkpoint) = payload.downcast_ref::<Checkpoint>() {
            println!("  payload: {checkpoint:?}");
        }
    }
}

fn main() {
    // Keep the default hook from printing every absorbed panic.
    std::panic::set_hook(Box::new(|_| {}));

    let cases: Vec<(&str, catch_error::Outcome<()>)> = vec![
        ("error value", catch(|| throw(io::Error::other("disk full")))),
        ("message", catch(|| throw(Caught::msg("bad")))),
        ("string", catch(|| panic!("oops"))),
        ("number", catch(|| panic_any(42_i64))),
        ("struct", catch(|| panic_any(Checkpoint { step: 3 }))),
    ];

    for (label, outcome) in cases {
        if let Err(caught) = outcome {
            describe(label, caught);
        }
    }
}
