//! List and map wraps.
//!
//! A list wrap is `[list descriptor][length][bytes wrap]` where the inner bytes wrap
//! holds a packed block of cast-encoded elements. A map wrap has the same envelope
//! with the map band, and its packed block holds exactly two entries: the packed
//! keys, then the packed values.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::{encode_bytes, payload_of, put_header};
use crate::packed;
use crate::{Cast, Result, TypeKind, Unwrap, Wrap, WrapError};

/// Wraps an already packed block as `kind` around an inner raw-bytes wrap.
pub(crate) fn wrap_block(kind: TypeKind, block: &[u8], writer: &mut BytesMut) -> Result<()> {
    let mut inner = BytesMut::with_capacity(block.len() + 5);
    encode_bytes(block, &mut inner)?;
    put_header(writer, kind, inner.len())?;
    writer.put_slice(&inner);
    Ok(())
}

/// Strips the `kind` envelope and the inner raw-bytes wrap, returning the packed block.
pub(crate) fn unwrap_block(wrap: &[u8], kind: TypeKind) -> Result<&[u8]> {
    let inner = payload_of(wrap, kind)?;
    payload_of(inner, TypeKind::Bytes)
}

/// Cast-encodes a single element into its own buffer.
pub(crate) fn cast_bytes<T: Cast>(item: &T) -> Result<Bytes> {
    let mut writer = BytesMut::new();
    item.cast(&mut writer)?;
    Ok(writer.freeze())
}

/// Writes a list wrap from already cast-encoded elements.
pub(crate) fn write_list<I>(elements: I, writer: &mut BytesMut) -> Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let block = packed::pack(elements)?;
    wrap_block(TypeKind::List, &block, writer)
}

/// Returns the cast-encoded elements of a list wrap.
pub(crate) fn read_list(wrap: &[u8]) -> Result<Vec<&[u8]>> {
    packed::unpack(unwrap_block(wrap, TypeKind::List)?)
}

/// Writes a map wrap from cast-encoded key/value pairs.
///
/// Pairs stay together until this point so the key block and the value block are
/// always built from the same ordering.
pub(crate) fn write_map(pairs: &[(Bytes, Bytes)], writer: &mut BytesMut) -> Result<()> {
    let keys = packed::pack(pairs.iter().map(|(k, _)| k))?;
    let values = packed::pack(pairs.iter().map(|(_, v)| v))?;
    let block = packed::pack([keys, values])?;
    wrap_block(TypeKind::Map, &block, writer)
}

/// Returns the cast-encoded key/value pairs of a map wrap.
pub(crate) fn read_map(wrap: &[u8]) -> Result<Vec<(&[u8], &[u8])>> {
    let sections = packed::unpack(unwrap_block(wrap, TypeKind::Map)?)?;
    let [keys, values] = sections[..] else {
        tracing::debug!(sections = sections.len(), "map payload has wrong section count");
        return Err(WrapError::SectionCount {
            expected: 2,
            actual: sections.len(),
        });
    };
    let keys = packed::unpack(keys)?;
    let values = packed::unpack(values)?;
    if keys.len() != values.len() {
        tracing::debug!(keys = keys.len(), values = values.len(), "map key/value count mismatch");
        return Err(WrapError::CountMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }
    Ok(keys.into_iter().zip(values).collect())
}

/// Wraps any iterator of `(key, value)` references as a map.
pub fn wrap_entries<'a, K, V, I>(entries: I, writer: &mut BytesMut) -> Result<()>
where
    K: Cast + 'a,
    V: Cast + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let pairs = entries
        .into_iter()
        .map(|(k, v)| Ok((cast_bytes(k)?, cast_bytes(v)?)))
        .collect::<Result<Vec<_>>>()?;
    write_map(&pairs, writer)
}

/// Unwraps a map into `(key, value)` pairs in wire order.
///
/// Duplicate keys are not detected here; collecting into a map keeps the last one.
pub fn unwrap_entries<K: Cast, V: Cast>(wrap: &[u8]) -> Result<Vec<(K, V)>> {
    read_map(wrap)?
        .into_iter()
        .map(|(k, v)| Ok((K::uncast(k)?, V::uncast(v)?)))
        .collect()
}

// --- Vec<T> / [T] ---
/// Encodes a slice as a list of cast-encoded elements.
impl<T: Cast> Wrap for [T] {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        let elements = self.iter().map(cast_bytes).collect::<Result<Vec<_>>>()?;
        write_list(&elements, writer)
    }
}

impl<T: Cast> Wrap for Vec<T> {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        self.as_slice().wrap(writer)
    }
}

impl<T: Cast> Unwrap for Vec<T> {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        read_list(wrap)?.into_iter().map(T::uncast).collect()
    }
}

// --- HashMap ---
impl<K: Cast, V: Cast, S> Wrap for HashMap<K, V, S> {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        wrap_entries(self, writer)
    }
}

impl<K, V, S> Unwrap for HashMap<K, V, S>
where
    K: Cast + Eq + Hash,
    V: Cast,
    S: BuildHasher + Default,
{
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        Ok(unwrap_entries(wrap)?.into_iter().collect())
    }
}

// --- BTreeMap ---
impl<K: Cast, V: Cast> Wrap for BTreeMap<K, V> {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        wrap_entries(self, writer)
    }
}

impl<K: Cast + Ord, V: Cast> Unwrap for BTreeMap<K, V> {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        Ok(unwrap_entries(wrap)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TAG_BYTES_BASE, TAG_LIST_BASE, TAG_MAP_BASE};

    #[test]
    fn list_layout() {
        let bytes = crate::wrap(&vec![1i16, -1]).unwrap();
        // inner packed block: two entries of 4 + 2 bytes
        let block = [0, 0, 0, 2, 0x00, 0x01, 0, 0, 0, 2, 0xFF, 0xFF];
        let mut expected = vec![TAG_LIST_BASE + 1, 14, TAG_BYTES_BASE + 1, 12];
        expected.extend_from_slice(&block);
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn empty_list_and_map() {
        let bytes = crate::wrap(&Vec::<i32>::new()).unwrap();
        assert_eq!(&bytes[..], &[TAG_LIST_BASE + 1, 2, TAG_BYTES_BASE + 1, 0]);
        assert!(Vec::<i32>::unwrap(&bytes).unwrap().is_empty());

        let map: HashMap<i32, String> = HashMap::new();
        let bytes = crate::wrap(&map).unwrap();
        assert_eq!(
            &bytes[..],
            &[TAG_MAP_BASE + 1, 10, TAG_BYTES_BASE + 1, 8, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert!(HashMap::<i32, String>::unwrap(&bytes).unwrap().is_empty());
    }

    #[test]
    fn list_element_type_is_out_of_band() {
        let bytes = crate::wrap(&vec![1i32, 2, 3]).unwrap();
        // three 4-byte elements read back as one-byte booleans fail on width
        assert!(matches!(
            Vec::<bool>::unwrap(&bytes),
            Err(WrapError::LengthMismatch { expected: 1, actual: 4 })
        ));
    }

    #[test]
    fn list_is_not_a_map() {
        let bytes = crate::wrap(&vec![1i32]).unwrap();
        let err = HashMap::<i32, i32>::unwrap(&bytes).unwrap_err();
        assert!(matches!(
            err,
            WrapError::TypeMismatch {
                expected: TypeKind::Map,
                actual: TypeKind::List
            }
        ));
    }

    #[test]
    fn uneven_map_sections_are_rejected() {
        let keys = packed::pack([1i32.to_be_bytes(), 2i32.to_be_bytes()]).unwrap();
        let values = packed::pack([7i32.to_be_bytes()]).unwrap();
        let block = packed::pack([keys, values]).unwrap();
        let mut buf = BytesMut::new();
        wrap_block(TypeKind::Map, &block, &mut buf).unwrap();

        let err = HashMap::<i32, i32>::unwrap(&buf).unwrap_err();
        assert!(matches!(err, WrapError::CountMismatch { keys: 2, values: 1 }));
    }

    #[test]
    fn map_needs_two_sections() {
        let block = packed::pack([packed::pack([[1u8]]).unwrap()]).unwrap();
        let mut buf = BytesMut::new();
        wrap_block(TypeKind::Map, &block, &mut buf).unwrap();

        let err = BTreeMap::<i32, i32>::unwrap(&buf).unwrap_err();
        assert!(matches!(err, WrapError::SectionCount { expected: 2, actual: 1 }));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let pairs = vec![
            (cast_bytes(&1i32).unwrap(), cast_bytes(&10i32).unwrap()),
            (cast_bytes(&1i32).unwrap(), cast_bytes(&20i32).unwrap()),
        ];
        let mut buf = BytesMut::new();
        write_map(&pairs, &mut buf).unwrap();

        let entries = unwrap_entries::<i32, i32>(&buf).unwrap();
        assert_eq!(entries, vec![(1, 10), (1, 20)]);
        let map = HashMap::<i32, i32>::unwrap(&buf).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&1], 20);
    }
}
