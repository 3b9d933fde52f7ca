//! Packed blocks: `[u32 big-endian length][payload]` repeated, with no outer length.
//!
//! A packed block is never self-describing. It only appears as the payload of a
//! raw-bytes wrap inside a list or map wrap, and the caller's decode path supplies
//! the element type.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Result, WrapError};

const LENGTH_SIZE: usize = 4;

/// Appends one length-prefixed entry per item, in input order.
///
/// # Errors
/// Returns [`WrapError::LengthOverflow`] if an item is longer than `u32::MAX` bytes.
pub fn pack_into<I>(writer: &mut BytesMut, items: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    for item in items {
        let item = item.as_ref();
        let len = u32::try_from(item.len()).map_err(|_| WrapError::LengthOverflow(item.len()))?;
        writer.reserve(LENGTH_SIZE + item.len());
        writer.put_u32(len);
        writer.put_slice(item);
    }
    Ok(())
}

/// Packs items into a new block.
pub fn pack<I>(items: I) -> Result<Bytes>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut writer = BytesMut::new();
    pack_into(&mut writer, items)?;
    Ok(writer.freeze())
}

/// Splits a block back into its entries.
///
/// Reading stops once fewer than four bytes remain; a short trailing remainder is
/// ignored. Use [`unpack_strict`] to reject it instead.
///
/// # Errors
/// Returns [`WrapError::LengthMismatch`] if an entry declares more bytes than remain.
pub fn unpack(block: &[u8]) -> Result<Vec<&[u8]>> {
    let (items, _) = split_entries(block)?;
    Ok(items)
}

/// Like [`unpack`], but a non-empty trailing remainder is a length mismatch.
pub fn unpack_strict(block: &[u8]) -> Result<Vec<&[u8]>> {
    let (items, remainder) = split_entries(block)?;
    if remainder != 0 {
        return Err(WrapError::LengthMismatch {
            expected: LENGTH_SIZE,
            actual: remainder,
        });
    }
    Ok(items)
}

fn split_entries(block: &[u8]) -> Result<(Vec<&[u8]>, usize)> {
    let mut items = Vec::new();
    let mut rest = block;
    while rest.len() >= LENGTH_SIZE {
        let len = (&rest[..LENGTH_SIZE]).get_u32() as usize;
        let body = &rest[LENGTH_SIZE..];
        if body.len() < len {
            tracing::debug!(declared = len, available = body.len(), "packed entry overruns block");
            return Err(WrapError::LengthMismatch {
                expected: len,
                actual: body.len(),
            });
        }
        items.push(&body[..len]);
        rest = &body[len..];
    }
    Ok((items, rest.len()))
}
