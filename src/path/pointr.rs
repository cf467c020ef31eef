//! Relative point encoding built from 7-bit and 15-bit signed integers.
//!
//! A relative point stores the difference to the previous point, starting from (0, 0). Each
//! coordinate is either an Integer7 (one byte, bit 7 clear, range -64..=63) or an Integer15 (two
//! bytes, bit 15 set, range -16384..=16383). Integer15 is the only big-endian value in the format:
//! the marker bit has to be in the first byte a reader sees.

use crate::{
    serial::Parser,
    types::PointF,
    Error, Result,
};

/// Smallest Integer7 value.
pub const INT7_MIN: i32 = -64;
/// Largest Integer7 value.
pub const INT7_MAX: i32 = 63;
/// Smallest Integer15 value.
pub const INT15_MIN: i32 = -16384;
/// Largest Integer15 value.
pub const INT15_MAX: i32 = 16383;

const INT7_MARKER: u8 = 0x80;
const INT7_SIGN: u8 = 0x40;
const INT7_MASK: u8 = 0x7F;
const INT15_MARKER: u16 = 0x8000;
const INT15_SIGN: u16 = 0x4000;
const INT15_MASK: u16 = 0x7FFF;

/// Encode an Integer7.
///
/// # Errors
/// Returns [`Error::OutOfRange`] if `value` is outside -64..=63.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn encode_integer7(value: i32) -> Result<u8> {
    if !(INT7_MIN..=INT7_MAX).contains(&value) {
        return Err(Error::OutOfRange {
            what: "Integer7",
            value: i64::from(value),
        });
    }
    Ok((value as u8) & INT7_MASK)
}

/// Encode an Integer15, returning its big-endian bytes.
///
/// # Errors
/// Returns [`Error::OutOfRange`] if `value` is outside -16384..=16383.
pub fn encode_integer15(value: i32) -> Result<[u8; 2]> {
    if !(INT15_MIN..=INT15_MAX).contains(&value) {
        return Err(Error::OutOfRange {
            what: "Integer15",
            value: i64::from(value),
        });
    }
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let word = ((value as u16) & INT15_MASK) | INT15_MARKER;
    Ok(word.to_be_bytes())
}

/// Decode one Integer7 or Integer15 at the cursor.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the value is truncated.
pub fn read_integer(parser: &mut Parser<'_>) -> Result<i32> {
    let first: u8 = parser.peek_le()?;
    if first & INT7_MARKER == 0 {
        parser.advance_by(1)?;
        let value = i32::from(first & INT7_MASK);
        return Ok(if first & INT7_SIGN != 0 { value - 0x80 } else { value });
    }

    let word: u16 = parser.read_be()?;
    let value = i32::from(word & INT15_MASK);
    Ok(if word & INT15_SIGN != 0 {
        value - 0x8000
    } else {
        value
    })
}

/// Append the narrowest encoding of `value`, clamping it to the Integer15 range.
///
/// Returns the value that was actually written.
pub fn push_integer(out: &mut Vec<u8>, value: i32) -> i32 {
    let clamped = value.clamp(INT15_MIN, INT15_MAX);
    if clamped != value {
        log::warn!("relative coordinate {} clamped to {}", value, clamped);
    }

    if let Ok(byte) = encode_integer7(clamped) {
        out.push(byte);
    } else if let Ok(bytes) = encode_integer15(clamped) {
        out.extend_from_slice(&bytes);
    }
    clamped
}

/// Encode absolute points as a relative point run.
///
/// Coordinates are rounded to integers. Deltas are taken against the position actually encoded so
/// far, so a clamped delta is caught up by the following points instead of drifting.
#[must_use]
pub fn encode_relative_points(points: &[PointF]) -> Vec<u8> {
    let mut out = Vec::with_capacity(points.len() * 2);
    let (mut x, mut y) = (0_i32, 0_i32);
    for point in points {
        let target_x = round_to_i32(point.x);
        let target_y = round_to_i32(point.y);
        x += push_integer(&mut out, target_x.saturating_sub(x));
        y += push_integer(&mut out, target_y.saturating_sub(y));
    }
    out
}

/// Decode `count` relative points into absolute points.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the run is truncated and [`Error::Malformed`] if the running
/// position leaves the `i32` range.
pub fn decode_relative_points(parser: &mut Parser<'_>, count: usize) -> Result<Vec<PointF>> {
    // Every point takes at least two bytes.
    parser.ensure_elements(count, 2)?;

    let mut points = Vec::with_capacity(count);
    let (mut x, mut y) = (0_i32, 0_i32);
    for index in 0..count {
        x = accumulate(x, read_integer(parser)?, index)?;
        y = accumulate(y, read_integer(parser)?, index)?;
        #[allow(clippy::cast_precision_loss)]
        let point = PointF::new(x as f32, y as f32);
        points.push(point);
    }
    Ok(points)
}

fn accumulate(position: i32, delta: i32, index: usize) -> Result<i32> {
    position.checked_add(delta).ok_or_else(|| {
        malformed_error!(
            "Relative point {} moves {} by {} past the coordinate range",
            index,
            position,
            delta
        )
    })
}

/// Byte length of a run of `count` relative points at the start of `data`.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the run does not fit in `data`.
pub fn relative_points_len(data: &[u8], count: usize) -> Result<usize> {
    let mut parser = Parser::new(data);
    for _ in 0..count.saturating_mul(2) {
        read_integer(&mut parser)?;
    }
    Ok(parser.pos())
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i32(value: f32) -> i32 {
    // `as` saturates, NaN becomes 0
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer7_limits() {
        assert_eq!(encode_integer7(63).unwrap(), 0x3F);
        assert_eq!(encode_integer7(-64).unwrap(), 0x40);
        assert_eq!(encode_integer7(-1).unwrap(), 0x7F);
        assert!(encode_integer7(64).is_err());
        assert!(encode_integer7(-65).is_err());
    }

    #[test]
    fn test_integer15_limits() {
        assert_eq!(encode_integer15(64).unwrap(), [0x80, 0x40]);
        assert_eq!(encode_integer15(-1).unwrap(), [0xFF, 0xFF]);
        assert_eq!(encode_integer15(INT15_MIN).unwrap(), [0xC0, 0x00]);
        assert!(encode_integer15(INT15_MAX + 1).is_err());
    }

    #[test]
    fn test_read_integer_both_widths() {
        let data = [0x7F, 0x80, 0x40, 0xC0, 0x00, 0x3F];
        let mut parser = Parser::new(&data);
        assert_eq!(read_integer(&mut parser).unwrap(), -1);
        assert_eq!(read_integer(&mut parser).unwrap(), 64);
        assert_eq!(read_integer(&mut parser).unwrap(), INT15_MIN);
        assert_eq!(read_integer(&mut parser).unwrap(), 63);
        assert!(read_integer(&mut parser).is_err());
    }

    #[test]
    fn test_truncated_integer15() {
        let mut parser = Parser::new(&[0x80]);
        assert!(read_integer(&mut parser).is_err());
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn test_relative_round_trip_boundaries() {
        let points = vec![
            PointF::new(0.0, 0.0),
            PointF::new(63.0, 0.0),
            PointF::new(127.0, 64.0),
            PointF::new(127.0, 0.0),
            PointF::new(-20000.0, 5.0),
        ];
        let encoded = encode_relative_points(&points);
        assert_eq!(relative_points_len(&encoded, points.len()).unwrap(), encoded.len());

        let decoded = decode_relative_points(&mut Parser::new(&encoded), points.len()).unwrap();
        assert_eq!(&decoded[..4], &points[..4]);
        // -20127 does not fit in one delta
        assert_eq!(decoded[4].x, 127.0 + INT15_MIN as f32);
    }

    #[test]
    fn test_clamped_delta_catches_up() {
        let points = vec![PointF::new(20000.0, 0.0), PointF::new(20000.0, 0.0)];
        let encoded = encode_relative_points(&points);
        let decoded = decode_relative_points(&mut Parser::new(&encoded), 2).unwrap();
        assert_eq!(decoded[0].x, INT15_MAX as f32);
        assert_eq!(decoded[1].x, 20000.0);
    }

    #[test]
    fn test_decode_position_overflow() {
        // 140000 maximal x deltas of 16383 pass i32::MAX at the 131084th point
        let count = 140_000;
        let mut data = Vec::with_capacity(count * 3);
        for _ in 0..count {
            data.extend_from_slice(&[0xBF, 0xFF, 0x00]);
        }
        let result = decode_relative_points(&mut Parser::new(&data), count);
        assert!(matches!(result, Err(Error::Malformed { .. })));

        let data = [0xC0, 0x00, 0x00].repeat(count);
        let result = decode_relative_points(&mut Parser::new(&data), count);
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_relative_points(&mut Parser::new(&[]), 1).is_err());
        assert!(decode_relative_points(&mut Parser::new(&[]), 0).unwrap().is_empty());
    }
}
