//! Serialization primitives shared by every object and record codec.
//!
//! The module is split into three layers:
//!
//! - [`crate::serial::io`] - endian-aware scalar reads and writes at an offset
//! - [`crate::serial::parser`] - a bounds-checked cursor used by every decoder
//! - [`crate::serial::builder`] - the two-pass field list serializer used by every encoder
//!
//! Fixed-size wire values (scalars, colors, points, rectangles, matrices) implement [`Wire`], which
//! lets the parser read arrays of them after a single bounds check and lets the builder measure
//! them before writing.

pub mod builder;
pub mod io;
pub mod parser;

pub use builder::{serialize, serialized_len, Field};
pub use parser::Parser;

use crate::Result;

/// A value with a fixed little-endian wire representation.
pub trait Wire: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decode one value at the parser cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than [`Wire::SIZE`] bytes remain.
    fn read(parser: &mut Parser<'_>) -> Result<Self>;

    /// Append the encoded value to `out`.
    fn write(&self, out: &mut Vec<u8>);
}

/// Object safe view of something that can be appended to a field list.
///
/// Implemented for every [`Wire`] type and for `Vec`s of them, which is what lets a
/// [`Field::Item`] refer to a single color as well as to a point array.
pub trait Encode {
    /// Number of bytes [`Encode::encode_into`] will append.
    fn encoded_len(&self) -> usize;

    /// Append the encoded bytes to `out`.
    fn encode_into(&self, out: &mut Vec<u8>);
}

/// Implements [`Encode`] for `T` and `Vec<T>` of [`Wire`] types.
macro_rules! impl_encode {
    ($($ty:ty),* $(,)?) => {
        $(
            impl crate::serial::Encode for $ty {
                fn encoded_len(&self) -> usize {
                    <$ty as crate::serial::Wire>::SIZE
                }

                fn encode_into(&self, out: &mut Vec<u8>) {
                    crate::serial::Wire::write(self, out);
                }
            }

            impl crate::serial::Encode for Vec<$ty> {
                fn encoded_len(&self) -> usize {
                    self.len() * <$ty as crate::serial::Wire>::SIZE
                }

                fn encode_into(&self, out: &mut Vec<u8>) {
                    for item in self {
                        crate::serial::Wire::write(item, out);
                    }
                }
            }
        )*
    };
}

macro_rules! impl_wire_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wire for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn read(parser: &mut Parser<'_>) -> Result<Self> {
                    parser.read_le::<$ty>()
                }

                fn write(&self, out: &mut Vec<u8>) {
                    io::push_le(out, *self);
                }
            }
        )*
    };
}

impl_wire_primitive!(u8, i8, u16, i16, u32, i32, f32);
impl_encode!(u8, i8, u16, i16, u32, i32, f32);
