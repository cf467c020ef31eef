//! Endian-aware reading and writing of primitive values.
//!
//! This is the lowest layer of the codec. Every multi-byte field of an EMF+ record goes through
//! one of the functions here, which convert between host values and a byte buffer in either byte
//! order. EMF+ is little-endian throughout, with the single exception of the 15-bit relative
//! coordinate encoding which is stored big-endian so that its marker bit lands in the first byte.
//!
//! # Key Components
//!
//! - [`crate::serial::io::EmfIO`] - Trait describing a primitive that can be converted to and from
//!   a fixed-size byte array
//! - [`crate::serial::io::read_le_at`] / [`crate::serial::io::read_be_at`] - Read at an offset and
//!   advance it
//! - [`crate::serial::io::push_le`] / [`crate::serial::io::push_be`] - Append to a growable
//!   buffer
//!
//! # Usage Examples
//!
//! ```rust
//! use emfplus::serial::io::{push_le, read_le_at};
//!
//! let mut data = Vec::new();
//! push_le(&mut data, 0x4001_u16);
//! push_le(&mut data, 12_u32);
//!
//! let mut offset = 0;
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 0x4001);
//! assert_eq!(read_le_at::<u32>(&data, &mut offset)?, 12);
//! assert!(read_le_at::<u8>(&data, &mut offset).is_err());
//! # Ok::<(), emfplus::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All functions are pure and operate only on the buffers passed to them.

use crate::Result;

/// Trait for primitive types that can be moved between host values and raw bytes.
///
/// Each implementation names the fixed-size byte array it converts through. One byte types are
/// never swapped, which falls out naturally from `from_le_bytes`/`from_be_bytes` on `[u8; 1]`.
pub trait EmfIO: Sized + Copy {
    /// Byte array representation of this type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_emf_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl EmfIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_emf_io!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
);

fn checked_range(len: usize, offset: usize, type_len: usize) -> Result<std::ops::Range<usize>> {
    let end = offset
        .checked_add(type_len)
        .ok_or_else(|| out_of_bounds_error!())?;
    if end > len {
        return Err(out_of_bounds_error!());
    }
    Ok(offset..end)
}

/// Read a value of type `T` from the start of `data` in little-endian byte order.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: EmfIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a value of type `T` from the start of `data` in big-endian byte order.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_be<T: EmfIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Read a little-endian `T` at `offset` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: EmfIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let range = checked_range(data.len(), *offset, std::mem::size_of::<T>())?;
    let Ok(read) = data[range.clone()].try_into() else {
        return Err(out_of_bounds_error!());
    };
    *offset = range.end;
    Ok(T::from_le_bytes(read))
}

/// Read a big-endian `T` at `offset` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_be_at<T: EmfIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let range = checked_range(data.len(), *offset, std::mem::size_of::<T>())?;
    let Ok(read) = data[range.clone()].try_into() else {
        return Err(out_of_bounds_error!());
    };
    *offset = range.end;
    Ok(T::from_be_bytes(read))
}

/// Append `value` to a growable buffer in little-endian byte order.
pub fn push_le<T: EmfIO>(out: &mut Vec<u8>, value: T) {
    out.extend_from_slice(value.to_le_bytes().as_ref());
}

/// Append `value` to a growable buffer in big-endian byte order.
pub fn push_be<T: EmfIO>(out: &mut Vec<u8>, value: T) {
    out.extend_from_slice(value.to_be_bytes().as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102);
    }

    #[test]
    fn read_le_i32() {
        let result = read_le::<i32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x04030201);
    }

    #[test]
    fn read_le_f32() {
        let bytes = 1.5_f32.to_le_bytes();
        let result = read_le::<f32>(&bytes).unwrap();
        assert_eq!(result, 1.5);
    }

    #[test]
    fn read_single_byte_is_never_swapped() {
        assert_eq!(read_le::<u8>(&TEST_BUFFER).unwrap(), 0x01);
        assert_eq!(read_be::<u8>(&TEST_BUFFER).unwrap(), 0x01);
        assert_eq!(read_be::<i8>(&[0xFF]).unwrap(), -1);
    }

    #[test]
    fn read_at_advances() {
        let mut offset = 2;
        let result = read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0403);
        assert_eq!(offset, 4);

        let result = read_be_at::<u32>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x05060708);
        assert_eq!(offset, 8);
    }

    #[test]
    fn read_past_end_fails_without_advancing() {
        let mut offset = 6;
        let result = read_le_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_le_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
    }

    #[test]
    fn read_empty_fails() {
        assert!(read_le::<u8>(&[]).is_err());
    }

    #[test]
    fn push_helpers() {
        let mut out = Vec::new();
        push_le(&mut out, 0x8001_u16);
        push_be(&mut out, 0x8001_u16);
        push_le(&mut out, -2_i32);
        assert_eq!(out, [0x01, 0x80, 0x80, 0x01, 0xFE, 0xFF, 0xFF, 0xFF]);
    }
}
