//! Support code for the `#[catching]` attribute.

mod helpers;

pub use helpers::*;
