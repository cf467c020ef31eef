//! Path point type bytes and their run length encoded form.
//!
//! A point type byte carries the [`PathPointKind`] in its low nibble and [`PathPointFlags`] in its
//! high nibble. The run length encoded form packs a run of identical bytes into one 16-bit word:
//! bit 15 marks a Bezier run, bits 8-13 hold the run length (1..=63) and bits 0-7 the type byte.

use crate::{
    serial::Parser,
    types::{PathPointFlags, PathPointKind},
    Result,
};

/// Mask of the kind nibble of a point type byte.
pub const KIND_MASK: u8 = 0x0F;
/// Mask of the flag nibble of a point type byte.
pub const FLAG_MASK: u8 = 0xF0;
/// Longest run a single RLE word can hold.
pub const MAX_RUN: usize = 63;

const RLE_BEZIER: u16 = 0x8000;
const RLE_RUN_SHIFT: u16 = 8;
const RLE_RUN_MASK: u16 = 0x3F;
const RLE_TYPE_MASK: u16 = 0x00FF;

/// Combine a kind and flags into a point type byte.
#[must_use]
pub fn point_type(kind: PathPointKind, flags: PathPointFlags) -> u8 {
    #[allow(clippy::cast_possible_truncation)]
    let kind = kind.value() as u8;
    kind | (flags.bits() & FLAG_MASK)
}

/// Split a point type byte into its kind and flags.
///
/// # Errors
/// Returns [`crate::Error::UnknownIdentifier`] if the low nibble is not a known kind.
pub fn split_point_type(byte: u8) -> Result<(PathPointKind, PathPointFlags)> {
    let kind = PathPointKind::try_from(u32::from(byte & KIND_MASK))?;
    Ok((kind, PathPointFlags::from_bits_retain(byte & FLAG_MASK)))
}

/// Returns `true` if the type byte closes its subpath.
#[must_use]
pub fn closes_subpath(byte: u8) -> bool {
    byte & PathPointFlags::CLOSE_SUBPATH.bits() != 0
}

/// One RLE word.
#[must_use]
pub fn rle_word(bezier: bool, run: u8, byte: u8) -> u16 {
    let mut word = ((u16::from(run) & RLE_RUN_MASK) << RLE_RUN_SHIFT) | u16::from(byte);
    if bezier {
        word |= RLE_BEZIER;
    }
    word
}

/// Split an RLE word into (bezier, run length, type byte).
#[must_use]
pub fn split_rle_word(word: u16) -> (bool, u8, u8) {
    #[allow(clippy::cast_possible_truncation)]
    let run = ((word >> RLE_RUN_SHIFT) & RLE_RUN_MASK) as u8;
    #[allow(clippy::cast_possible_truncation)]
    let byte = (word & RLE_TYPE_MASK) as u8;
    (word & RLE_BEZIER != 0, run, byte)
}

/// Run length encode a sequence of type bytes.
///
/// Runs longer than [`MAX_RUN`] are split.
#[must_use]
pub fn encode_rle(types: &[u8]) -> Vec<u16> {
    let mut words = Vec::new();
    let mut rest = types;
    while let Some(&byte) = rest.first() {
        let run = rest
            .iter()
            .take(MAX_RUN)
            .take_while(|&&other| other == byte)
            .count();
        let bezier = u32::from(byte & KIND_MASK) == PathPointKind::Bezier.value();
        // run <= MAX_RUN
        #[allow(clippy::cast_possible_truncation)]
        let run = run as u8;
        words.push(rle_word(bezier, run, byte));
        rest = &rest[usize::from(run)..];
    }
    words
}

/// Read RLE words at the cursor until `count` type bytes have been produced.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for a zero length run or a run that overshoots `count`,
/// and [`crate::Error::OutOfBounds`] if the words are truncated.
pub fn decode_rle(parser: &mut Parser<'_>, count: usize) -> Result<Vec<u8>> {
    // Each two-byte word yields at most MAX_RUN types.
    let mut types = Vec::with_capacity(count.min(parser.remaining().saturating_mul(MAX_RUN / 2)));
    while types.len() < count {
        let word: u16 = parser.read_le()?;
        let (_, run, byte) = split_rle_word(word);
        let run = usize::from(run);
        if run == 0 {
            return Err(malformed_error!("Path point type run of length zero"));
        }
        if types.len() + run > count {
            return Err(malformed_error!(
                "Path point type runs describe more than {} points",
                count
            ));
        }
        types.resize(types.len() + run, byte);
    }
    Ok(types)
}

/// Byte length of the RLE words describing `count` points at the start of `data`.
///
/// # Errors
/// Same as [`decode_rle`].
pub fn rle_len(data: &[u8], count: usize) -> Result<usize> {
    let mut parser = Parser::new(data);
    decode_rle(&mut parser, count)?;
    Ok(parser.pos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_type_byte() {
        let byte = point_type(PathPointKind::Line, PathPointFlags::CLOSE_SUBPATH);
        assert_eq!(byte, 0x81);
        assert!(closes_subpath(byte));
        let (kind, flags) = split_point_type(byte).unwrap();
        assert_eq!(kind, PathPointKind::Line);
        assert_eq!(flags, PathPointFlags::CLOSE_SUBPATH);
        assert!(split_point_type(0x02).is_err());
    }

    #[test]
    fn test_rle_runs() {
        let mut types = vec![0x00];
        types.extend(std::iter::repeat(0x03).take(70));
        types.push(0x81);

        let words = encode_rle(&types);
        assert_eq!(words, vec![0x0100, 0xBF03, 0x8703, 0x0181]);

        let mut bytes = Vec::new();
        for word in &words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        let mut parser = Parser::new(&bytes);
        assert_eq!(decode_rle(&mut parser, types.len()).unwrap(), types);
        assert!(!parser.has_more_data());
        assert_eq!(rle_len(&bytes, types.len()).unwrap(), 8);
    }

    #[test]
    fn test_rle_rejects_bad_runs() {
        let zero_run = 0x0001_u16.to_le_bytes();
        assert!(decode_rle(&mut Parser::new(&zero_run), 1).is_err());

        let long_run = rle_word(false, 5, 0x01).to_le_bytes();
        assert!(decode_rle(&mut Parser::new(&long_run), 3).is_err());

        assert!(decode_rle(&mut Parser::new(&[]), 1).is_err());
        assert!(decode_rle(&mut Parser::new(&[]), 0).unwrap().is_empty());
    }
}
