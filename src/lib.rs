//! # bytewrap
//!
//! A compact, self-describing binary codec.
//!
//! Every encoded value is a *wrap*: a one-byte descriptor, an optional big-endian
//! length prefix, and the payload. Wraps carry enough metadata to be decoded without
//! an external schema and can be concatenated into a stream that is walked with
//! [`scan::next_wrap`] or [`wraps`].
//!
//! - Fixed-width scalars: `i64`, `i32`, `i16`, `u16` (UTF-16 code unit), `f32`, `f64`, `bool`
//! - Variable-length values: `String`/`str`, raw bytes ([`Bytes`]), lists (`Vec<T>`) and maps
//!   (`HashMap`, `BTreeMap`)
//! - A dynamic [`Value`] type for callers that pick element types at runtime
//!
//! All values are big-endian on the wire. Descriptor values are listed in
//! [`core::DESCRIPTORS`] and are part of the wire format.
//!
//! ## Feature Flags
//!
//! - `indexmap` — Enables wrapping of `indexmap::IndexMap`.
//! - `ahash` — Enables wrapping of `ahash::AHashMap`.
//! - `smol_str` — Enables `smol_str::SmolStr` as a string value and list/map element.

pub mod collection;
pub mod core;
mod features;
pub mod packed;
pub mod scalar;
pub mod scan;
pub mod value;

use bytes::{Bytes, BytesMut};

pub use crate::core::TypeKind;
pub use scan::{next_wrap, wrap_len, wraps, WrapIter};
pub use value::{decode_list, decode_map, decode_value, encode_list, encode_map, Value};

/// Errors that can occur while wrapping or unwrapping values.
#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    /// A zero-length buffer was passed where a wrap was expected.
    #[error("Empty input")]
    EmptyInput,
    /// The descriptor byte does not belong to any known type band.
    #[error("Invalid descriptor: 0x{0:02X}")]
    InvalidDescriptor(u8),
    /// The descriptor names a different kind than the caller asked for.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeKind, actual: TypeKind },
    /// A declared or fixed length disagrees with the bytes actually present.
    #[error("Length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A decoded map has a different number of keys and values.
    #[error("Count mismatch: {keys} keys but {values} values")]
    CountMismatch { keys: usize, values: usize },
    /// A map payload did not hold exactly a key block and a value block.
    #[error("Map payload must hold {expected} packed sections, got {actual}")]
    SectionCount { expected: usize, actual: usize },
    /// No caster exists for the requested element type.
    #[error("Unsupported element type: {0}")]
    UnsupportedType(TypeKind),
    /// A string payload is not valid UTF-8.
    #[error(transparent)]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// A payload is too large for a four-byte length.
    #[error("Payload of {0} bytes exceeds the four-byte length limit")]
    LengthOverflow(usize),
}

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, WrapError>;

/// Types that can be written as a self-describing wrap.
pub trait Wrap {
    /// Appends the complete wrap (descriptor, length prefix, payload) to `writer`.
    fn wrap(&self, writer: &mut BytesMut) -> Result<()>;
}

/// Types that can be read back from exactly one wrap.
///
/// # Errors
/// Fails with [`WrapError::EmptyInput`], [`WrapError::TypeMismatch`] or
/// [`WrapError::LengthMismatch`] when the buffer is not a well-formed wrap of this type.
pub trait Unwrap: Sized {
    /// Decodes `wrap`, which must contain exactly one wrap and nothing else.
    fn unwrap(wrap: &[u8]) -> Result<Self>;
}

/// Cast-encoding: the untagged canonical bytes of a list or map element.
///
/// Elements inside a list or map carry no descriptor of their own, so the decoder
/// must name the element type. Scalars cast to their fixed-width big-endian bytes,
/// strings to UTF-8, and raw bytes pass through unchanged.
pub trait Cast: Sized {
    /// The kind this element type casts as.
    const KIND: TypeKind;

    /// Appends the element's canonical bytes to `writer`.
    fn cast(&self, writer: &mut BytesMut) -> Result<()>;

    /// Rebuilds an element from its canonical bytes.
    fn uncast(bytes: &[u8]) -> Result<Self>;
}

/// Wraps a value into a new buffer.
///
/// # Example
/// ```rust
/// use bytewrap::{unwrap, wrap};
///
/// let bytes = wrap(&300i32).unwrap();
/// assert_eq!(bytes.len(), 5);
/// let back: i32 = unwrap(&bytes).unwrap();
/// assert_eq!(back, 300);
/// ```
pub fn wrap<T: Wrap + ?Sized>(value: &T) -> Result<Bytes> {
    let mut writer = BytesMut::new();
    value.wrap(&mut writer)?;
    Ok(writer.freeze())
}

/// Unwraps a value of the requested type.
///
/// # Example
/// ```rust
/// use bytewrap::{unwrap, wrap};
///
/// let bytes = wrap("Hi").unwrap();
/// assert_eq!(&bytes[..], &[26, 2, b'H', b'i']);
/// let back: String = unwrap(&bytes).unwrap();
/// assert_eq!(back, "Hi");
/// ```
pub fn unwrap<T: Unwrap>(wrap: &[u8]) -> Result<T> {
    T::unwrap(wrap)
}

/// Wraps a borrowed byte slice as a raw-bytes wrap.
pub fn wrap_bytes(value: &[u8]) -> Result<Bytes> {
    let mut writer = BytesMut::with_capacity(value.len() + 5);
    crate::core::encode_bytes(value, &mut writer)?;
    Ok(writer.freeze())
}

/// Checks that `wrap` is non-empty and its descriptor classifies as `expected`.
///
/// This is the general sanity check to run before dispatching to a specific
/// [`Unwrap`] implementation. It does not validate the payload length.
pub fn check_type(wrap: &[u8], expected: TypeKind) -> Result<TypeKind> {
    let descriptor = *wrap.first().ok_or(WrapError::EmptyInput)?;
    let actual = crate::core::classify(descriptor)?;
    if actual != expected {
        return Err(WrapError::TypeMismatch { expected, actual });
    }
    Ok(actual)
}
