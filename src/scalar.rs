//! Fixed-width scalar encoding.
//!
//! Every scalar kind maps to a fixed number of big-endian bytes. Floats are written
//! as the raw IEEE-754 bit pattern of the equal-width unsigned integer, so NaN
//! payloads and signed zeros survive a round trip unchanged.

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::TypeKind;
use crate::{Result, WrapError};

/// A value with a fixed-width big-endian encoding.
pub trait Scalar: Sized + Copy {
    /// The descriptor kind of this scalar.
    const KIND: TypeKind;
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Appends exactly [`Self::WIDTH`] bytes to `writer`.
    fn put_be(self, writer: &mut BytesMut);

    /// Reads a value from exactly [`Self::WIDTH`] bytes.
    ///
    /// # Errors
    /// Returns [`WrapError::LengthMismatch`] if `bytes` has any other size.
    fn from_be(bytes: &[u8]) -> Result<Self>;
}

/// Encodes a scalar into a new buffer of [`Scalar::WIDTH`] bytes.
pub fn encode<T: Scalar>(value: T) -> Bytes {
    let mut writer = BytesMut::with_capacity(T::WIDTH);
    value.put_be(&mut writer);
    writer.freeze()
}

/// Decodes a scalar from exactly [`Scalar::WIDTH`] bytes.
pub fn decode<T: Scalar>(bytes: &[u8]) -> Result<T> {
    T::from_be(bytes)
}

#[inline]
fn exact<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| WrapError::LengthMismatch {
        expected: N,
        actual: bytes.len(),
    })
}

macro_rules! impl_int_scalar {
    ($($t:ty => $kind:ident, $put:ident;)*) => {
        $(
            impl Scalar for $t {
                const KIND: TypeKind = TypeKind::$kind;
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn put_be(self, writer: &mut BytesMut) {
                    writer.$put(self);
                }

                fn from_be(bytes: &[u8]) -> Result<Self> {
                    Ok(<$t>::from_be_bytes(exact(bytes)?))
                }
            }
        )*
    };
}

impl_int_scalar! {
    i64 => Integer64, put_i64;
    i32 => Integer32, put_i32;
    i16 => Integer16, put_i16;
    u16 => Char, put_u16;
}

impl Scalar for f32 {
    const KIND: TypeKind = TypeKind::Float32;
    const WIDTH: usize = 4;

    fn put_be(self, writer: &mut BytesMut) {
        writer.put_u32(self.to_bits());
    }

    fn from_be(bytes: &[u8]) -> Result<Self> {
        Ok(f32::from_bits(u32::from_be_bytes(exact(bytes)?)))
    }
}

impl Scalar for f64 {
    const KIND: TypeKind = TypeKind::Float64;
    const WIDTH: usize = 8;

    fn put_be(self, writer: &mut BytesMut) {
        writer.put_u64(self.to_bits());
    }

    fn from_be(bytes: &[u8]) -> Result<Self> {
        Ok(f64::from_bits(u64::from_be_bytes(exact(bytes)?)))
    }
}

/// Booleans are one byte: 1 for `true`, 0 for `false`.
///
/// Decoding accepts any non-zero byte as `true`.
impl Scalar for bool {
    const KIND: TypeKind = TypeKind::Boolean;
    const WIDTH: usize = 1;

    fn put_be(self, writer: &mut BytesMut) {
        writer.put_u8(u8::from(self));
    }

    fn from_be(bytes: &[u8]) -> Result<Self> {
        let [byte] = exact::<1>(bytes)?;
        Ok(byte > 0)
    }
}
