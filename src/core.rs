use std::fmt;
use std::ops::RangeInclusive;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::scalar::Scalar;
use crate::{Cast, Result, Unwrap, Wrap, WrapError};

/// Descriptor tags used in the wrap format.
///
/// These tags are written as the first byte of each wrap. Fixed-width kinds own one
/// value each. Variable-length kinds own a band of [`BAND_WIDTH`] values where
/// `tag - base` is the number of big-endian length bytes that follow.
///
/// - Tags and bands are stable and part of the wire format.
/// - 0, 8, 9 and everything from 30 upwards are unassigned.

pub const TAG_INT64: u8 = 1;
pub const TAG_INT32: u8 = 2;
pub const TAG_INT16: u8 = 3;
///< UTF-16 code unit
pub const TAG_CHAR: u8 = 4;
pub const TAG_FLOAT32: u8 = 5;
pub const TAG_FLOAT64: u8 = 6;
pub const TAG_BOOLEAN: u8 = 7;
///< Raw bytes, 10..=14
pub const TAG_BYTES_BASE: u8 = 10;
///< List, 15..=19
pub const TAG_LIST_BASE: u8 = 15;
///< Map, 20..=24
pub const TAG_MAP_BASE: u8 = 20;
///< UTF-8 string, 25..=29
pub const TAG_STRING_BASE: u8 = 25;

/// Number of descriptor values reserved by each variable-length kind.
pub const BAND_WIDTH: u8 = 5;
/// Largest length prefix, in bytes.
pub const MAX_LENGTH_BYTES: usize = 4;

/// The eleven kinds a descriptor byte can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Integer64,
    Integer32,
    Integer16,
    /// A UTF-16 code unit.
    Char,
    Float32,
    Float64,
    Boolean,
    Bytes,
    List,
    Map,
    Text,
}

/// One row of the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub kind: TypeKind,
    pub base: u8,
    /// Number of consecutive tag values owned, 1 for fixed kinds.
    pub width: u8,
    /// Payload size of a fixed kind, `None` for variable kinds.
    pub fixed_size: Option<usize>,
}

impl Descriptor {
    const fn fixed(kind: TypeKind, base: u8, size: usize) -> Self {
        Self {
            kind,
            base,
            width: 1,
            fixed_size: Some(size),
        }
    }

    const fn band(kind: TypeKind, base: u8) -> Self {
        Self {
            kind,
            base,
            width: BAND_WIDTH,
            fixed_size: None,
        }
    }

    /// Whether `tag` falls inside this row.
    pub const fn contains(&self, tag: u8) -> bool {
        tag >= self.base && tag - self.base < self.width
    }
}

/// The complete wire-format descriptor table, indexed by `TypeKind as usize`.
pub const DESCRIPTORS: [Descriptor; 11] = [
    Descriptor::fixed(TypeKind::Integer64, TAG_INT64, 8),
    Descriptor::fixed(TypeKind::Integer32, TAG_INT32, 4),
    Descriptor::fixed(TypeKind::Integer16, TAG_INT16, 2),
    Descriptor::fixed(TypeKind::Char, TAG_CHAR, 2),
    Descriptor::fixed(TypeKind::Float32, TAG_FLOAT32, 4),
    Descriptor::fixed(TypeKind::Float64, TAG_FLOAT64, 8),
    Descriptor::fixed(TypeKind::Boolean, TAG_BOOLEAN, 1),
    Descriptor::band(TypeKind::Bytes, TAG_BYTES_BASE),
    Descriptor::band(TypeKind::List, TAG_LIST_BASE),
    Descriptor::band(TypeKind::Map, TAG_MAP_BASE),
    Descriptor::band(TypeKind::Text, TAG_STRING_BASE),
];

/// Checks that rows are in `TypeKind` order, that no two rows share a tag,
/// and that every band fits below 256.
pub const fn descriptor_table_is_valid(table: &[Descriptor]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let row = &table[i];
        if row.kind as usize != i || row.width == 0 || row.base as usize + row.width as usize > 256 {
            return false;
        }
        if (row.width == 1) != row.fixed_size.is_some() {
            return false;
        }
        let mut j = i + 1;
        while j < table.len() {
            let other = &table[j];
            let row_end = row.base as usize + row.width as usize;
            let other_end = other.base as usize + other.width as usize;
            if (row.base as usize) < other_end && (other.base as usize) < row_end {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(descriptor_table_is_valid(&DESCRIPTORS));

impl TypeKind {
    /// All kinds, in descriptor-table order.
    pub const ALL: [TypeKind; 11] = [
        TypeKind::Integer64,
        TypeKind::Integer32,
        TypeKind::Integer16,
        TypeKind::Char,
        TypeKind::Float32,
        TypeKind::Float64,
        TypeKind::Boolean,
        TypeKind::Bytes,
        TypeKind::List,
        TypeKind::Map,
        TypeKind::Text,
    ];

    /// The table row for this kind.
    pub const fn descriptor(self) -> Descriptor {
        DESCRIPTORS[self as usize]
    }

    /// The base tag value.
    pub const fn base(self) -> u8 {
        self.descriptor().base
    }

    /// All tag values owned by this kind.
    pub const fn descriptor_range(self) -> RangeInclusive<u8> {
        let row = self.descriptor();
        row.base..=row.base + (row.width - 1)
    }

    /// Payload size for fixed-width kinds.
    pub const fn fixed_width(self) -> Option<usize> {
        self.descriptor().fixed_size
    }

    pub const fn is_variable(self) -> bool {
        self.descriptor().fixed_size.is_none()
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Integer64 => "integer64",
            TypeKind::Integer32 => "integer32",
            TypeKind::Integer16 => "integer16",
            TypeKind::Char => "char",
            TypeKind::Float32 => "float32",
            TypeKind::Float64 => "float64",
            TypeKind::Boolean => "boolean",
            TypeKind::Bytes => "bytes",
            TypeKind::List => "list",
            TypeKind::Map => "map",
            TypeKind::Text => "text",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a descriptor byte to its kind.
///
/// # Errors
/// Returns [`WrapError::InvalidDescriptor`] if the byte lies outside every row.
pub fn classify(descriptor: u8) -> Result<TypeKind> {
    DESCRIPTORS
        .iter()
        .find(|row| row.contains(descriptor))
        .map(|row| row.kind)
        .ok_or(WrapError::InvalidDescriptor(descriptor))
}

/// Number of length-prefix bytes used for a payload of `payload_size` bytes.
///
/// The thresholds are inclusive at 255, 65535 and 16777216. The last one is one past
/// what three bytes can hold; the writer widens that single size to four bytes
/// (see [`put_header`]).
pub const fn required_length_bytes(payload_size: usize) -> usize {
    if payload_size <= 0xFF {
        1
    } else if payload_size <= 0xFFFF {
        2
    } else if payload_size <= 0x0100_0000 {
        3
    } else {
        4
    }
}

/// The decoded leading part of a wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: TypeKind,
    /// Bytes of length prefix after the descriptor.
    pub prefix_len: usize,
    /// Declared (variable) or fixed payload size.
    pub payload_len: usize,
}

impl Header {
    /// Descriptor plus prefix.
    pub fn header_len(&self) -> usize {
        1 + self.prefix_len
    }

    /// Size of the whole wrap.
    pub fn total_len(&self) -> usize {
        self.header_len().saturating_add(self.payload_len)
    }
}

/// Reads the descriptor and length prefix at the start of `bytes`.
///
/// Only the header itself must be present; the payload is not inspected.
pub fn read_header(bytes: &[u8]) -> Result<Header> {
    let descriptor = *bytes.first().ok_or(WrapError::EmptyInput)?;
    let kind = classify(descriptor)?;
    header_for(kind, descriptor, bytes)
}

fn header_for(kind: TypeKind, descriptor: u8, bytes: &[u8]) -> Result<Header> {
    if let Some(size) = kind.fixed_width() {
        return Ok(Header {
            kind,
            prefix_len: 0,
            payload_len: size,
        });
    }
    let prefix_len = (descriptor - kind.base()) as usize;
    if bytes.len() < 1 + prefix_len {
        return Err(WrapError::LengthMismatch {
            expected: 1 + prefix_len,
            actual: bytes.len(),
        });
    }
    let payload_len = if prefix_len == 0 {
        0
    } else {
        (&bytes[1..1 + prefix_len]).get_uint(prefix_len) as usize
    };
    Ok(Header {
        kind,
        prefix_len,
        payload_len,
    })
}

/// Writes the descriptor and length prefix for a variable-length payload.
///
/// # Errors
/// Returns [`WrapError::LengthOverflow`] if `len` does not fit four bytes.
pub fn put_header(writer: &mut BytesMut, kind: TypeKind, len: usize) -> Result<()> {
    debug_assert!(kind.is_variable());
    if len > u32::MAX as usize {
        return Err(WrapError::LengthOverflow(len));
    }
    let mut prefix_len = required_length_bytes(len);
    // 16777216 is classed as three bytes but needs four.
    if prefix_len < MAX_LENGTH_BYTES && len >> (8 * prefix_len) != 0 {
        prefix_len += 1;
    }
    writer.put_u8(kind.base() + prefix_len as u8);
    writer.put_uint(len as u64, prefix_len);
    Ok(())
}

/// Validates `wrap` as exactly one wrap of `expected` kind and returns its payload.
pub fn payload_of(wrap: &[u8], expected: TypeKind) -> Result<&[u8]> {
    let descriptor = *wrap.first().ok_or(WrapError::EmptyInput)?;
    let actual = classify(descriptor)?;
    if actual != expected {
        return Err(WrapError::TypeMismatch { expected, actual });
    }
    let header = header_for(actual, descriptor, wrap)?;
    let payload = &wrap[header.header_len()..];
    if payload.len() != header.payload_len {
        return Err(WrapError::LengthMismatch {
            expected: header.payload_len,
            actual: payload.len(),
        });
    }
    Ok(payload)
}

/// Writes a raw-bytes wrap.
pub(crate) fn encode_bytes(value: &[u8], writer: &mut BytesMut) -> Result<()> {
    put_header(writer, TypeKind::Bytes, value.len())?;
    writer.put_slice(value);
    Ok(())
}

/// Writes a string wrap.
pub(crate) fn encode_text(value: &str, writer: &mut BytesMut) -> Result<()> {
    put_header(writer, TypeKind::Text, value.len())?;
    writer.put_slice(value.as_bytes());
    Ok(())
}

pub(crate) fn decode_text(wrap: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(payload_of(wrap, TypeKind::Text)?)?)
}

// --- scalars ---
macro_rules! impl_scalar_wrap {
    ($($t:ty),*) => {
        $(
            impl Wrap for $t {
                fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
                    writer.reserve(1 + <$t as Scalar>::WIDTH);
                    writer.put_u8(<$t as Scalar>::KIND.base());
                    self.put_be(writer);
                    Ok(())
                }
            }

            impl Unwrap for $t {
                fn unwrap(wrap: &[u8]) -> Result<Self> {
                    <$t as Scalar>::from_be(payload_of(wrap, <$t as Scalar>::KIND)?)
                }
            }

            impl Cast for $t {
                const KIND: TypeKind = <$t as Scalar>::KIND;

                fn cast(&self, writer: &mut BytesMut) -> Result<()> {
                    self.put_be(writer);
                    Ok(())
                }

                fn uncast(bytes: &[u8]) -> Result<Self> {
                    <$t as Scalar>::from_be(bytes)
                }
            }
        )*
    };
}

impl_scalar_wrap!(i64, i32, i16, u16, f32, f64, bool);

// --- String ---
impl Wrap for str {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        encode_text(self, writer)
    }
}

impl Wrap for String {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        encode_text(self, writer)
    }
}

impl Unwrap for String {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        decode_text(wrap).map(str::to_owned)
    }
}

impl Cast for String {
    const KIND: TypeKind = TypeKind::Text;

    fn cast(&self, writer: &mut BytesMut) -> Result<()> {
        writer.put_slice(self.as_bytes());
        Ok(())
    }

    fn uncast(bytes: &[u8]) -> Result<Self> {
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }
}

// --- Bytes ---
impl Wrap for Bytes {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        encode_bytes(self, writer)
    }
}

impl Unwrap for Bytes {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        payload_of(wrap, TypeKind::Bytes).map(Bytes::copy_from_slice)
    }
}

impl Cast for Bytes {
    const KIND: TypeKind = TypeKind::Bytes;

    fn cast(&self, writer: &mut BytesMut) -> Result<()> {
        writer.put_slice(self);
        Ok(())
    }

    fn uncast(bytes: &[u8]) -> Result<Self> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}
