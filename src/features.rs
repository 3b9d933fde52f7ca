#[cfg(feature = "ahash")]
use ahash::AHashMap;
#[allow(unused_imports)]
use bytes::{BufMut, BytesMut};
#[cfg(feature = "indexmap")]
use indexmap::IndexMap;
#[cfg(feature = "smol_str")]
use smol_str::SmolStr;

#[allow(unused_imports)]
use crate::collection::{unwrap_entries, wrap_entries};
#[cfg(feature = "smol_str")]
use crate::core::{decode_text, encode_text};
#[allow(unused_imports)]
use crate::*;

// --- IndexMap ---
/// Wire order follows insertion order.
#[cfg(feature = "indexmap")]
impl<K: Cast, V: Cast, S> Wrap for IndexMap<K, V, S> {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        wrap_entries(self, writer)
    }
}

/// Keeps wire order; a repeated key keeps its first position and its last value.
#[cfg(feature = "indexmap")]
impl<K, V, S> Unwrap for IndexMap<K, V, S>
where
    K: Cast + Eq + std::hash::Hash,
    V: Cast,
    S: std::hash::BuildHasher + Default,
{
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        Ok(unwrap_entries(wrap)?.into_iter().collect())
    }
}

// --- AHashMap ---
#[cfg(feature = "ahash")]
impl<K: Cast, V: Cast> Wrap for AHashMap<K, V> {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        wrap_entries(self.iter(), writer)
    }
}

#[cfg(feature = "ahash")]
impl<K: Cast + Eq + std::hash::Hash, V: Cast> Unwrap for AHashMap<K, V> {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        Ok(unwrap_entries(wrap)?.into_iter().collect())
    }
}

// --- SmolStr ---
/// Encodes a `SmolStr` exactly like a `String`.
#[cfg(feature = "smol_str")]
impl Wrap for SmolStr {
    fn wrap(&self, writer: &mut BytesMut) -> Result<()> {
        encode_text(self.as_str(), writer)
    }
}

#[cfg(feature = "smol_str")]
impl Unwrap for SmolStr {
    fn unwrap(wrap: &[u8]) -> Result<Self> {
        decode_text(wrap).map(SmolStr::new)
    }
}

#[cfg(feature = "smol_str")]
impl Cast for SmolStr {
    const KIND: TypeKind = TypeKind::Text;

    fn cast(&self, writer: &mut BytesMut) -> Result<()> {
        writer.put_slice(self.as_bytes());
        Ok(())
    }

    fn uncast(bytes: &[u8]) -> Result<Self> {
        Ok(SmolStr::new(std::str::from_utf8(bytes)?))
    }
}
