use crate::common::ExtractError;
use core::mem::size_of;

/// Abstraction for walking through an entire gif source.
///
/// Every read is bounds checked; a read that would pass the end of the slice fails with
/// [`ExtractError::TruncatedInput`] and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    #[inline]
    fn truncated(&self, needed: usize) -> ExtractError {
        ExtractError::TruncatedInput {
            offset: self.offset,
            needed,
        }
    }

    pub(crate) fn take_slice(&mut self, len: usize) -> Result<&'a [u8], ExtractError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or_else(|| self.truncated(len))?;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or_else(|| self.truncated(len))?;
        self.offset = end;
        Ok(slice)
    }

    pub(crate) fn take_byte(&mut self) -> Result<u8, ExtractError> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or_else(|| self.truncated(size_of::<u8>()))?;
        self.offset += size_of::<u8>();
        Ok(byte)
    }

    /// Like [`Self::take_byte`], but `None` at the end of the stream instead of an error
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        self.take_byte().ok()
    }

    #[inline]
    pub(crate) fn take_arr<const N: usize>(&mut self) -> Result<[u8; N], ExtractError> {
        let mut arr = [0; N];
        arr.copy_from_slice(self.take_slice(N)?);
        Ok(arr)
    }

    pub(crate) fn take_u16_le(&mut self) -> Result<u16, ExtractError> {
        self.take_arr().map(u16::from_le_bytes)
    }

    pub(crate) fn seek_by(&mut self, len: usize) -> Result<(), ExtractError> {
        self.take_slice(len).map(|_| ())
    }

    pub(crate) fn get_offset(&self) -> usize {
        self.offset
    }

    /// Bytes between `start` and the current offset
    pub(crate) fn span_from(&self, start: usize) -> &'a [u8] {
        &self.bytes[start.min(self.offset)..self.offset]
    }
}
