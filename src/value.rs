//! Dynamically typed values.
//!
//! [`Value`] is the closed set of element types a list or map can hold. Element
//! casting is picked by matching on the variant, and the element type of a list
//! or map is always named by the caller as a [`TypeKind`].

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use bytes::{BufMut, Bytes, BytesMut};

use crate::collection::{read_list, read_map, write_list, write_map};
use crate::core::{classify, payload_of};
use crate::scalar::Scalar;
use crate::{Result, TypeKind, Unwrap, Wrap, WrapError};

/// A single scalar, string or raw-bytes value.
///
/// Equality and hashing compare floats by bit pattern, so `NaN == NaN` and
/// `0.0 != -0.0`. This keeps decoded values usable as map keys.
#[derive(Debug, Clone)]
pub enum Value {
    Integer64(i64),
    Integer32(i32),
    Integer16(i16),
    /// A UTF-16 code unit.
    Char(u16),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Bytes(Bytes),
    Text(String),
}

impl Value {
    /// The wire kind of this value.
    pub fn kind(&self) -> TypeKind {
        match self {
            Value::Integer64(_) => TypeKind::Integer64,
            Value::Integer32(_) => TypeKind::Integer32,
            Value::Integer16(_) => TypeKind::Integer16,
            Value::Char(_) => TypeKind::Char,
            Value::Float32(_) => TypeKind::Float32,
            Value::Float64(_) => TypeKind::Float64,
            Value::Boolean(_) => TypeKind::Boolean,
            Value::Bytes(_) => TypeKind::Bytes,
            Value::Text(_) => TypeKind::Text,
        }
    }

    /// Returns the value as a string slice, if it is a `Text` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value widened to i64, if it is an integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer64(v) => Some(*v),
            Value::Integer32(v) => Some(i64::from(*v)),
            Value::Integer16(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Appends the untagged canonical bytes of this value.
    pub fn cast(&self, writer: &mut BytesMut) {
        match self {
            Value::Integer64(v) => v.put_be(writer),
            Value::Integer32(v) => v.put_be(writer),
            Value::Integer16(v) => v.put_be(writer),
            Value::Char(v) => v.put_be(writer),
            Value::Float32(v) => v.put_be(writer),
            Value::Float64(v) => v.put_be(writer),
            Value::Boolean(v) => v.put_be(writer),
            Value::Bytes(b) => writer.put_slice(b),
            Value::Text(s) => writer.put_slice(s.as_bytes()),
        }
    }

    /// Rebuilds a value of `kind` from its canonical bytes.
    ///
    /// # Errors
    /// Returns [`WrapError::UnsupportedType`] for list and map kinds, which have
    /// no element caster.
    pub fn uncast(kind: TypeKind, bytes: &[u8]) -> Result<Self> {
        Ok(match kind {
            TypeKind::Integer64 => Value::Integer64(Scalar::from_be(bytes)?),
            TypeKind::Integer32 => Value::Integer32(Scalar::from_be(bytes)?),
            TypeKind::Integer16 => Value::Integer16(Scalar::from_be(bytes)?),
            TypeKind::Char => Value::Char(Scalar::from_be(bytes)?),
            TypeKind::Float32 => Value::Float32(Scalar::from_be(bytes)?),
            TypeKind::Float64 => Value::Float64(Scalar::from_be(bytes)?),
            TypeKind::Boolean => Value::Boolean(Scalar::from_be(bytes)?),
            TypeKind::Bytes => Value::Bytes(Bytes::copy_from_slice(bytes)),
            TypeKind::Text => Value::Text(std::str::from_utf8(bytes)?.to_owned()),
            TypeKind::List | TypeKind::Map => return Err(WrapError::UnsupportedType(kind)),
        })
    }

    fn cast_checked(&self, expected: TypeKind) -> Result<Bytes> {
        let actual = self.kind();
        if actual != expected {
            return Err(WrapError::TypeMismatch { expected, actual });
        }
        let mut writer = BytesMut::new();
        self.cast(&mut writer);
        Ok(writer.freeze())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer64(a), Value::Integer64(b)) => a == b,
            (Value::Integer32(a), Value::Integer32(b)) => a == b,
            (Value::Integer16(a), Value::Integer16(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::Integer64(v) => v.hash(state),
            Value::Integer32(v) => v.hash(state),
            Value::Integer16(v) => v.hash(state),
            Value::Char(v) => v.hash(state),
            Value::Float32(v) => v.to_bits().hash(state),
            Value::Float64(v) => v.to_bits().hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from!(
    i64 => Integer64,
    i32 => Integer32,
    i16 => Integer16,
    u16 => Char,
    f32 => Float32,
    f64 => Float64,
    bool => Boolean,
    Bytes => Bytes,
    String => Text
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl Wrap for Value {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        match self {
            Value::Integer64(v) => v.wrap(writer),
            Value::Integer32(v) => v.wrap(writer),
            Value::Integer16(v) => v.wrap(writer),
            Value::Char(v) => v.wrap(writer),
            Value::Float32(v) => v.wrap(writer),
            Value::Float64(v) => v.wrap(writer),
            Value::Boolean(v) => v.wrap(writer),
            Value::Bytes(b) => b.wrap(writer),
            Value::Text(s) => s.wrap(writer),
        }
    }
}

impl Unwrap for Value {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        decode_value(wrap)
    }
}

/// Decodes any scalar, string or raw-bytes wrap without knowing its type up front.
///
/// # Errors
/// List and map wraps return [`WrapError::UnsupportedType`]: their element types
/// are not recorded on the wire.
pub fn decode_value(wrap: &[u8]) -> Result<Value> {
    let descriptor = *wrap.first().ok_or(WrapError::EmptyInput)?;
    let kind = classify(descriptor)?;
    if matches!(kind, TypeKind::List | TypeKind::Map) {
        return Err(WrapError::UnsupportedType(kind));
    }
    Value::uncast(kind, payload_of(wrap, kind)?)
}

fn ensure_castable(kind: TypeKind) -> Result<()> {
    match kind {
        TypeKind::List | TypeKind::Map => Err(WrapError::UnsupportedType(kind)),
        _ => Ok(()),
    }
}

/// Encodes a homogeneous list whose elements are all of kind `element`.
///
/// # Errors
/// Returns [`WrapError::TypeMismatch`] if any item has another kind, and
/// [`WrapError::UnsupportedType`] if `element` is a list or map.
pub fn encode_list(items: &[Value], element: TypeKind) -> Result<Bytes> {
    ensure_castable(element)?;
    let elements = items
        .iter()
        .map(|item| item.cast_checked(element))
        .collect::<Result<Vec<_>>>()?;
    let mut writer = BytesMut::new();
    write_list(&elements, &mut writer)?;
    Ok(writer.freeze())
}

/// Decodes a list wrap, casting each element back as `element`.
pub fn decode_list(wrap: &[u8], element: TypeKind) -> Result<Vec<Value>> {
    ensure_castable(element)?;
    read_list(wrap)?
        .into_iter()
        .map(|bytes| Value::uncast(element, bytes))
        .collect()
}

/// Encodes a mapping with keys of kind `key` and values of kind `value`.
///
/// Accepts anything that iterates `(&Value, &Value)`, such as `&HashMap<Value, Value>`.
pub fn encode_map<'a, I>(entries: I, key: TypeKind, value: TypeKind) -> Result<Bytes>
where
    I: IntoIterator<Item = (&'a Value, &'a Value)>,
{
    ensure_castable(key)?;
    ensure_castable(value)?;
    let pairs = entries
        .into_iter()
        .map(|(k, v)| Ok((k.cast_checked(key)?, v.cast_checked(value)?)))
        .collect::<Result<Vec<_>>>()?;
    let mut writer = BytesMut::new();
    write_map(&pairs, &mut writer)?;
    Ok(writer.freeze())
}

/// Decodes a map wrap into a key/value association.
///
/// Colliding keys are not reported; the one that comes later on the wire wins.
pub fn decode_map(wrap: &[u8], key: TypeKind, value: TypeKind) -> Result<HashMap<Value, Value>> {
    ensure_castable(key)?;
    ensure_castable(value)?;
    read_map(wrap)?
        .into_iter()
        .map(|(k, v)| Ok((Value::uncast(key, k)?, Value::uncast(value, v)?)))
        .collect()
}
