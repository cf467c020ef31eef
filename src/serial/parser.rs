//! Bounds-checked byte cursor used by every EMF+ decoder.
//!
//! This module provides the [`crate::serial::parser::Parser`] type. The end of the slice handed to
//! [`crate::serial::parser::Parser::new`] plays the role of the readable limit: nothing at or past
//! it is ever read, and every variable-length or conditionally present field is checked against it
//! before a single byte is copied out.
//!
//! # Key Components
//!
//! ## Moving the cursor
//! - [`crate::serial::parser::Parser::advance_by`] - Move forward by a number of bytes
//! - [`crate::serial::parser::Parser::sub_parser`] - Fence off an embedded object
//!
//! ## Reading fields
//! - [`crate::serial::parser::Parser::read_le`] / [`crate::serial::parser::Parser::read_be`] -
//!   Primitive reads
//! - [`crate::serial::parser::Parser::read`] / [`crate::serial::parser::Parser::read_array`] -
//!   Fixed-size wire values and arrays of them
//! - [`crate::serial::parser::Parser::read_array_if`] - Conditionally present arrays
//! - [`crate::serial::parser::Parser::read_utf16`] - UTF-16LE text
//!
//! # Usage Examples
//!
//! ```rust
//! use emfplus::Parser;
//!
//! let data = [0x01, 0x40, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_le::<u16>()?, 0x4001);
//! parser.advance_by(2)?;
//! assert_eq!(parser.read_le::<u32>()?, 16);
//! assert!(!parser.has_more_data());
//! # Ok::<(), emfplus::Error>(())
//! ```

use widestring::U16String;

use crate::{
    serial::{
        io::{read_be_at, read_le_at, EmfIO},
        Wire,
    },
    Result,
};

/// A cursor over a byte slice whose end is the readable limit.
///
/// `Parser` never reads past the end of its slice. Any read that would do so fails with
/// [`crate::Error::OutOfBounds`] and leaves the cursor where it was.
///
/// # Examples
///
/// ```rust
/// use emfplus::Parser;
///
/// let data = [0x02, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x14, 0x00];
/// let mut parser = Parser::new(&data);
///
/// let count = parser.read_le::<u32>()? as usize;
/// let values: Vec<u16> = parser.read_array(count)?;
/// assert_eq!(values, vec![10, 20]);
/// # Ok::<(), emfplus::Error>(())
/// ```
#[derive(Clone)]
pub struct Parser<'a> {
    /// Record or object bytes, ending at the readable limit
    data: &'a [u8],
    /// Offset of the next unread byte
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] from a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total number of bytes this parser covers, read or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` for a parser over an empty slice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` while unread bytes remain before the readable limit.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Skip `step` bytes, typically a reserved field or padding.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `step` bytes remain, without moving.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        let end = self.calc_end_position(step)?;
        self.position = end;
        Ok(())
    }

    /// Offset of the next byte to be read.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// The whole slice, including bytes already consumed.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes left between the cursor and the readable limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Ensures that at least `needed` bytes are available from the current position.
    ///
    /// Every decoder calls this before a variable-length read.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `needed` bytes remain.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(out_of_bounds_error!());
        }
        Ok(())
    }

    /// Ensures that `count` elements of `unit` bytes each are available.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the product overflows or exceeds what remains.
    pub fn ensure_elements(&self, count: usize, unit: usize) -> Result<()> {
        let needed = count
            .checked_mul(unit)
            .ok_or_else(|| out_of_bounds_error!())?;
        self.ensure(needed)
    }

    /// Offset just past a field of `length` bytes starting at the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the sum overflows or passes the readable limit.
    pub fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self
            .position
            .checked_add(length)
            .ok_or_else(|| out_of_bounds_error!())?;

        if end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(end)
    }

    /// Look at the next little-endian `T` and leave the cursor where it is.
    ///
    /// Used to tell the 7-bit and 15-bit relative coordinate forms apart by their first byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `T` does not fit before the readable limit.
    pub fn peek_le<T: EmfIO>(&self) -> Result<T> {
        let mut offset = self.position;
        read_le_at::<T>(self.data, &mut offset)
    }

    /// Read a little-endian primitive, the byte order of every EMF+ field.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `T` does not fit before the readable limit.
    pub fn read_le<T: EmfIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a big-endian primitive. Only the 15-bit relative coordinate is stored this way.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `T` does not fit before the readable limit.
    pub fn read_be<T: EmfIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read one fixed-size wire value.
    ///
    /// The whole value is bounds checked up front, so a failure never leaves the cursor in the
    /// middle of a value.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `T::SIZE` bytes remain.
    pub fn read<T: Wire>(&mut self) -> Result<T> {
        self.ensure(T::SIZE)?;
        T::read(self)
    }

    /// Read `count` consecutive wire values.
    ///
    /// The full extent is checked before anything is allocated, so a hostile element count cannot
    /// trigger a huge allocation.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the array does not fit in the remaining data.
    pub fn read_array<T: Wire>(&mut self, count: usize) -> Result<Vec<T>> {
        self.ensure_elements(count, T::SIZE)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(T::read(self)?);
        }
        Ok(values)
    }

    /// Read an array whose presence is governed by a flag.
    ///
    /// The field still occupies its place in the layout: when `present` is `false` the cursor
    /// moves past `count` elements and `None` is returned.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the field does not fit in the remaining data,
    /// whether or not it is stored.
    pub fn read_array_if<T: Wire>(
        &mut self,
        present: bool,
        count: usize,
    ) -> Result<Option<Vec<T>>> {
        if present {
            return self.read_array(count).map(Some);
        }

        self.skip_array::<T>(count)?;
        Ok(None)
    }

    /// Advance past `count` wire values without storing them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the array does not fit in the remaining data.
    pub fn skip_array<T: Wire>(&mut self, count: usize) -> Result<()> {
        self.ensure_elements(count, T::SIZE)?;
        self.position += count * T::SIZE;
        Ok(())
    }

    /// Borrow the next `length` bytes without copying them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Returns all bytes from the cursor to the end and moves the cursor to the end.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.position.min(self.data.len())..];
        self.position = self.data.len();
        bytes
    }

    /// Read `chars` UTF-16LE code units.
    ///
    /// The text is kept as raw code units. Unpaired surrogates are valid in the format and are
    /// preserved.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the text does not fit in the remaining data.
    pub fn read_utf16(&mut self, chars: usize) -> Result<U16String> {
        let units: Vec<u16> = self.read_array(chars)?;
        Ok(U16String::from_vec(units))
    }

    /// Builds a parser over the next `length` bytes and advances past them.
    ///
    /// Used for embedded objects that carry their own size prefix, so that the nested decoder
    /// cannot read into its siblings.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `length` bytes are not available.
    pub fn sub_parser(&mut self, length: usize) -> Result<Parser<'a>> {
        Ok(Parser::new(self.read_bytes(length)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_read_sequence() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_le::<u16>().unwrap(), 0x0201);
        assert_eq!(parser.read_be::<u16>().unwrap(), 0x0304);
        assert_eq!(parser.remaining(), 2);
        assert!(parser.read_le::<u32>().is_err());
        assert_eq!(parser.pos(), 4);
    }

    #[test]
    fn test_empty_input_fails_every_read() {
        let mut parser = Parser::new(&[]);
        assert!(parser.is_empty());
        assert!(matches!(parser.read_le::<u8>(), Err(Error::OutOfBounds { .. })));
        assert!(parser.read::<f32>().is_err());
        assert!(parser.read_array::<u16>(1).is_err());
        assert!(parser.read_bytes(1).is_err());
        assert!(parser.read_utf16(1).is_err());
        assert!(parser.read_array::<u16>(0).unwrap().is_empty());
    }

    #[test]
    fn test_read_array_rejects_huge_counts() {
        let data = [0u8; 8];
        let mut parser = Parser::new(&data);
        assert!(parser.read_array::<u32>(usize::MAX).is_err());
        assert!(parser.read_array::<u32>(3).is_err());
        assert_eq!(parser.pos(), 0);
        assert_eq!(parser.read_array::<u32>(2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_read_array_if() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00];
        let mut parser = Parser::new(&data);

        let skipped = parser.read_array_if::<u16>(false, 2).unwrap();
        assert!(skipped.is_none());
        assert_eq!(parser.pos(), 4);

        let present = parser.read_array_if::<u16>(true, 1).unwrap();
        assert_eq!(present, Some(vec![3]));

        let mut parser = Parser::new(&data);
        assert!(parser.read_array_if::<u16>(false, 4).is_err());
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn test_read_utf16() {
        let data = [0x48, 0x00, 0x69, 0x00];
        let mut parser = Parser::new(&data);
        let text = parser.read_utf16(2).unwrap();
        assert_eq!(text.to_string_lossy(), "Hi");
    }

    #[test]
    fn test_sub_parser_is_fenced() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);
        let mut sub = parser.sub_parser(2).unwrap();
        assert_eq!(sub.read_le::<u16>().unwrap(), 0x0201);
        assert!(sub.read_le::<u8>().is_err());
        assert_eq!(parser.read_le::<u16>().unwrap(), 0x0403);
    }

    #[test]
    fn test_peek_le() {
        let data = [0x01, 0x02];
        let parser = Parser::new(&data);
        assert_eq!(parser.peek_le::<u16>().unwrap(), 0x0201);
        assert_eq!(parser.pos(), 0);
        assert!(parser.peek_le::<u32>().is_err());
    }
}
