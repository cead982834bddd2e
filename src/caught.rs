//! The error value produced by every catch boundary.

use core::any::Any;
use core::fmt;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::{Mutex, OnceLock, PoisonError};

use smallvec::SmallVec;

/// Boxed error trait object accepted and stored by [`Caught`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Prefix of the message given to failures that were not error values.
pub const FOREIGN_PREFIX: &str = "Non-error value thrown: ";

/// Frames stored inline before spilling to the heap.
const INLINE_FRAMES: usize = 4;

/// Maximum number of frames kept on a single error. Later frames are dropped.
pub const FRAME_LIMIT: usize = 16;

// ============================================================
// Core types
// ============================================================

/// How a failure reached the catch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Kind {
    /// The failure was already an error value and is carried unchanged.
    Propagated,
    /// The failure was some other value (a string, a number, an arbitrary
    /// panic payload) and was normalized into an error.
    Foreign,
}

/// Error value returned by `catch` and friends.
///
/// A `Caught` always has a human-readable [`message`](Caught::message). When
/// the failure was an error value, the original value is kept with its
/// concrete type and can be recovered with [`downcast`](Caught::downcast) or
/// inspected with [`downcast_ref`](Caught::downcast_ref). When the failure was
/// not an error value, the original payload is retained: its scalar form via
/// [`thrown`](Caught::thrown) and the raw payload via
/// [`into_payload`](Caught::into_payload).
///
/// # Examples
///
/// ```
/// use catch_error::{catch, throw, Caught};
///
/// let err = catch(|| -> i32 { throw(Caught::msg("bad")) }).unwrap_err();
/// assert_eq!(err.message(), "bad");
/// ```
pub struct Caught {
    pub(crate) source: BoxError,
    pub(crate) kind: Kind,
    /// Computed on first access, pre-set when the message is already known.
    pub(crate) message: OnceLock<String>,
    pub(crate) thrown: Option<Value>,
    pub(crate) payload: Option<Payload>,
    pub(crate) frames: SmallVec<[Location; INLINE_FRAMES]>,
}

/// Source location of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    pub(crate) file: Cow<'static, str>,
    pub(crate) line: u32,
    pub(crate) col: u32,
}

/// Raw payload of a foreign failure.
///
/// Kept behind a mutex so `Caught` stays `Sync` while holding a `dyn Any + Send`.
pub(crate) struct Payload(Mutex<Box<dyn Any + Send>>);

impl Payload {
    pub(crate) fn new(payload: Box<dyn Any + Send>) -> Self {
        Self(Mutex::new(payload))
    }

    fn into_inner(self) -> Box<dyn Any + Send> {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

/// Error used for message-only values (`Caught::msg`, deserialized errors).
#[derive(Debug)]
pub(crate) struct Message(pub(crate) String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// Error standing in for a non-error payload.
#[derive(Debug)]
pub(crate) struct ForeignError(pub(crate) String);

impl fmt::Display for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for ForeignError {}

// ============================================================
// Value - scalar form of a foreign payload
// ============================================================

/// Scalar form of a non-error value that was thrown.
///
/// With the `serde` feature it serializes as the bare scalar. Non-negative
/// integers read back as `Int` when they fit, so compare numbers through
/// [`as_i64`](Value::as_i64) or [`as_u64`](Value::as_u64).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// String value (also used for `char` payloads)
    String(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Null value, only produced by deserialization
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
        }
    }
}

impl Value {
    /// The string form, for `&str`, `String` and `char` payloads.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an `i64`, for integer payloads of either signedness that fit.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            Value::Uint(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// The value as a `u64`, for non-negative integer payloads.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Int(n) => u64::try_from(n).ok(),
            Value::Uint(n) => Some(n),
            _ => None,
        }
    }

    /// The value as an `f64`, for float payloads.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(n) => Some(n),
            _ => None,
        }
    }

    /// The boolean, for `bool` payloads.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_value_from {
    ($variant:ident as $repr:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $repr)
                }
            }
        )*
    };
}

impl_value_from!(Int as i64: i8, i16, i32, i64, isize);
impl_value_from!(Uint as u64: u8, u16, u32, u64, usize);
impl_value_from!(Float as f64: f32, f64);

// ============================================================
// FrameView
// ============================================================

/// View into a single frame of the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameView<'a> {
    /// Source file path
    pub file: &'a str,
    /// Line number
    pub line: u32,
    /// Column number
    pub col: u32,
}

// ============================================================
// Caught implementation
// ============================================================

impl Caught {
    /// Wrap an error value.
    ///
    /// If `e` is itself a `Caught` it is returned unchanged.
    pub fn new<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        Self::wrap_box(Box::new(e))
    }

    /// Wrap an already-boxed error value.
    ///
    /// A boxed `Caught` is unboxed rather than wrapped a second time.
    pub fn wrap_box(e: BoxError) -> Self {
        match e.downcast::<Caught>() {
            Ok(caught) => *caught,
            Err(e) => Self::from_parts(e, Kind::Propagated),
        }
    }

    /// Create a message-only error.
    pub fn msg(message: impl Into<String>) -> Self {
        let message = message.into();
        let caught = Self::from_parts(Box::new(Message(message.clone())), Kind::Propagated);
        let _ = caught.message.set(message);
        caught
    }

    /// Normalize a non-error value whose scalar form is known.
    pub(crate) fn foreign(thrown: Option<Value>, payload: Box<dyn Any + Send>) -> Self {
        let message = match &thrown {
            Some(value) => format!("{}{}", FOREIGN_PREFIX, value),
            None => format!("{}<opaque payload>", FOREIGN_PREFIX),
        };
        let mut caught = Self::from_parts(Box::new(ForeignError(message.clone())), Kind::Foreign);
        let _ = caught.message.set(message);
        caught.thrown = thrown;
        caught.payload = Some(Payload::new(payload));
        caught
    }

    fn from_parts(source: BoxError, kind: Kind) -> Self {
        Self {
            source,
            kind,
            message: OnceLock::new(),
            thrown: None,
            payload: None,
            frames: SmallVec::new(),
        }
    }

    /// Add a frame with location information.
    ///
    /// Frames beyond [`FRAME_LIMIT`] are dropped.
    pub fn frame(mut self, file: &'static str, line: u32, col: u32) -> Self {
        self.push_frame(Location {
            file: Cow::Borrowed(file),
            line,
            col,
        });
        self
    }

    /// Add a frame for a caller location.
    pub(crate) fn at(self, loc: &'static core::panic::Location<'static>) -> Self {
        self.frame(loc.file(), loc.line(), loc.column())
    }

    pub(crate) fn push_frame(&mut self, loc: Location) {
        if self.frames.len() < FRAME_LIMIT {
            self.frames.push(loc);
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| self.source.to_string())
    }

    /// How this failure reached the catch boundary.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether this error was normalized from a non-error value.
    #[inline]
    pub fn is_foreign(&self) -> bool {
        self.kind == Kind::Foreign
    }

    /// Whether the wrapped error is of type `T`.
    #[inline]
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.source.is::<T>()
    }

    /// Try to downcast to a specific error type.
    #[inline]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }

    /// Try to downcast and consume the error, returning the original value.
    pub fn downcast<T: StdError + 'static>(self) -> Result<T, Self> {
        if !self.source.is::<T>() {
            return Err(self);
        }
        let Self {
            source,
            kind,
            message,
            thrown,
            payload,
            frames,
        } = self;
        match source.downcast::<T>() {
            Ok(e) => Ok(*e),
            Err(source) => Err(Self {
                source,
                kind,
                message,
                thrown,
                payload,
                frames,
            }),
        }
    }

    /// Get the wrapped error as a trait object.
    pub fn root(&self) -> &(dyn StdError + 'static) {
        &*self.source
    }

    /// Scalar form of the non-error value that was thrown, if it had one.
    pub fn thrown(&self) -> Option<&Value> {
        self.thrown.as_ref()
    }

    /// Take the raw payload of a foreign failure.
    ///
    /// Returns `None` for propagated errors and for errors that were
    /// deserialized.
    pub fn into_payload(self) -> Option<Box<dyn Any + Send>> {
        self.payload.map(Payload::into_inner)
    }

    /// Iterate over recorded frames, most recent last.
    pub fn frames(&self) -> impl Iterator<Item = FrameView<'_>> {
        self.frames.iter().map(|loc| FrameView {
            file: &loc.file,
            line: loc.line,
            col: loc.col,
        })
    }

    /// Number of recorded frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Raise this error again.
    ///
    /// The panic payload is this `Caught`, so an enclosing `catch` receives it
    /// unchanged. The panic hook is not invoked.
    pub fn throw(self) -> ! {
        std::panic::resume_unwind(Box::new(self))
    }
}

// ============================================================
// Display and Error implementations
// ============================================================

impl fmt::Debug for Caught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caught")
            .field("kind", &self.kind)
            .field("message", &self.message())
            .field("source", &self.source)
            .field("thrown", &self.thrown)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Caught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())?;

        if f.alternate() && !self.frames.is_empty() {
            write!(f, "\n\nTrace (most recent last):")?;
            for loc in &self.frames {
                write!(f, "\n  {}:{}:{}", loc.file, loc.line, loc.col)?;
            }
        }

        Ok(())
    }
}

impl StdError for Caught {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if self.kind == Kind::Foreign || self.source.is::<Message>() {
            return None;
        }
        Some(&*self.source)
    }
}

impl From<&str> for Caught {
    fn from(s: &str) -> Self {
        Self::msg(s)
    }
}

impl From<String> for Caught {
    fn from(s: String) -> Self {
        Self::msg(s)
    }
}

// ============================================================
// anyhow interop
// ============================================================

#[cfg(feature = "anyhow")]
impl From<anyhow::Error> for Caught {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<Caught>() {
            Ok(caught) => caught,
            Err(e) => Self::wrap_box(e.into()),
        }
    }
}

// ============================================================
// Serde support
// ============================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct SerializedFrame {
        file: String,
        line: u32,
        col: u32,
    }

    #[derive(Serialize, Deserialize)]
    struct SerializedCaught {
        kind: Kind,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thrown: Option<Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        trace: Vec<SerializedFrame>,
    }

    impl Serialize for Caught {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SerializedCaught {
                kind: self.kind,
                message: self.message().to_owned(),
                thrown: self.thrown.clone(),
                trace: self
                    .frames
                    .iter()
                    .map(|loc| SerializedFrame {
                        file: loc.file.to_string(),
                        line: loc.line,
                        col: loc.col,
                    })
                    .collect(),
            }
            .serialize(serializer)
        }
    }

    // The concrete error type does not survive serialization; the result
    // carries the message, kind, scalar payload and trace.
    impl<'de> Deserialize<'de> for Caught {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let serialized = SerializedCaught::deserialize(deserializer)?;
            let source: BoxError = match serialized.kind {
                Kind::Propagated => Box::new(Message(serialized.message.clone())),
                Kind::Foreign => Box::new(ForeignError(serialized.message.clone())),
            };
            let mut caught = Caught::from_parts(source, serialized.kind);
            let _ = caught.message.set(serialized.message);
            caught.thrown = serialized.thrown;
            for f in serialized.trace {
                caught.push_frame(Location {
                    file: Cow::Owned(f.file),
                    line: f.line,
                    col: f.col,
                });
            }
            Ok(caught)
        }
    }
}
