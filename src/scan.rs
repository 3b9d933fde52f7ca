//! Walking a concatenation of wraps.
//!
//! A stream is just wraps laid end to end with no index. The size of each wrap is
//! recovered from its descriptor and, for variable kinds, its length prefix.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::core::read_header;
use crate::{Result, WrapError};

/// Returns the byte range of the wrap that starts at `offset`.
///
/// Only the descriptor and the length prefix are inspected; the payload is not
/// validated.
///
/// # Errors
/// - [`WrapError::EmptyInput`] if `offset` is at or past the end of `bytes`.
/// - [`WrapError::InvalidDescriptor`] if the byte at `offset` names no kind.
/// - [`WrapError::LengthMismatch`] if the wrap runs past the end of `bytes`.
pub fn next_wrap(bytes: &[u8], offset: usize) -> Result<Range<usize>> {
    let rest = match bytes.get(offset..) {
        Some(rest) if !rest.is_empty() => rest,
        _ => return Err(WrapError::EmptyInput),
    };
    let header = read_header(rest).inspect_err(|e| {
        tracing::debug!(offset, error = %e, "unreadable wrap header");
    })?;
    let total = header.total_len();
    if total > rest.len() {
        tracing::debug!(offset, kind = %header.kind, total, available = rest.len(), "wrap runs past end of stream");
        return Err(WrapError::LengthMismatch {
            expected: total,
            actual: rest.len(),
        });
    }
    tracing::trace!(offset, kind = %header.kind, total, "isolated wrap");
    Ok(offset..offset + total)
}

/// Size of the wrap at the start of `bytes`.
pub fn wrap_len(bytes: &[u8]) -> Result<usize> {
    next_wrap(bytes, 0).map(|range| range.len())
}

/// Iterator over the wraps of a stream, in order.
///
/// Each item is the complete byte slice of one wrap. After the first error the
/// iterator yields nothing more; a broken wrap ends the stream.
#[derive(Debug, Clone)]
pub struct WrapIter<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> WrapIter<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    /// Offset of the next wrap to be read.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset.min(self.bytes.len())..]
    }
}

impl<'a> Iterator for WrapIter<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        match next_wrap(self.bytes, self.offset) {
            Ok(range) => {
                self.offset = range.end;
                Some(Ok(&self.bytes[range]))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for WrapIter<'_> {}

/// Iterates the wraps in `bytes`.
pub fn wraps(bytes: &[u8]) -> WrapIter<'_> {
    WrapIter::new(bytes)
}
