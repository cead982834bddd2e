//! Helper types for code generated by `#[catching]`.

use crate::catch::IntoCaught;
use crate::caught::{Caught, Value};

// ============================================================
// Error wrapper for method-based conversion
// Uses inherent impls (highest priority) for string errors,
// trait impl as fallback for any E: IntoCaught
// ============================================================

/// Wrapper for `Err` conversion in generated code. Uses method resolution
/// priority: inherent impls for string errors, trait impl for error types.
#[doc(hidden)]
pub struct __ErrWrap<E>(pub E);

// Inherent impl for &str - highest priority
impl __ErrWrap<&str> {
    #[inline]
    pub fn __into_caught(self) -> Caught {
        Caught::foreign(Some(Value::from(self.0)), Box::new(self.0.to_owned()))
    }
}

// Inherent impl for String
impl __ErrWrap<String> {
    #[inline]
    pub fn __into_caught(self) -> Caught {
        Caught::foreign(Some(Value::from(self.0.as_str())), Box::new(self.0))
    }
}

/// Trait for fallback conversion of any error type.
#[doc(hidden)]
pub trait __IntoCaught {
    fn __into_caught(self) -> Caught;
}

impl<E: IntoCaught> __IntoCaught for __ErrWrap<E> {
    #[inline]
    fn __into_caught(self) -> Caught {
        self.0.into_caught()
    }
}
