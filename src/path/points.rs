//! Point arrays in their three wire forms.
//!
//! Records and path objects share one coordinate scheme selected by two bits of a flags word:
//! relative ([`FLAG_RELATIVE`]) wins over compressed ([`FLAG_COMPRESSED`]), and with neither set
//! the points are stored as `f32` pairs. Decoded points are always [`PointF`], the encoding is
//! carried next to them so a parsed value re-encodes to the same bytes.

use crate::{
    path::pointr,
    serial::{Parser, Wire},
    types::{points_to_i16, Point16, PointF},
    Result,
};

/// Points are 16-bit integers (`C`).
pub const FLAG_COMPRESSED: u16 = 0x4000;
/// Point types are run length encoded (`R`).
pub const FLAG_RLE: u16 = 0x1000;
/// Points are relative Integer7/Integer15 deltas (`P`).
pub const FLAG_RELATIVE: u16 = 0x0800;

/// Wire form of a point array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointEncoding {
    /// `f32` pairs, 8 bytes per point
    #[default]
    Float,
    /// `i16` pairs, 4 bytes per point
    Int16,
    /// Relative deltas, 2 to 4 bytes per point
    Relative,
}

impl PointEncoding {
    /// Pick the encoding announced by a flags word.
    #[must_use]
    pub fn from_flags(flags: u16) -> Self {
        if flags & FLAG_RELATIVE != 0 {
            PointEncoding::Relative
        } else if flags & FLAG_COMPRESSED != 0 {
            PointEncoding::Int16
        } else {
            PointEncoding::Float
        }
    }

    /// Flag bits announcing this encoding.
    #[must_use]
    pub fn flag_bits(self) -> u16 {
        match self {
            PointEncoding::Float => 0,
            PointEncoding::Int16 => FLAG_COMPRESSED,
            PointEncoding::Relative => FLAG_RELATIVE,
        }
    }

    /// The smallest lossless fixed-width encoding for `points`.
    ///
    /// Returns [`PointEncoding::Int16`] when every coordinate is an integer that fits in an `i16`,
    /// otherwise [`PointEncoding::Float`]. Relative encoding is never picked implicitly.
    #[must_use]
    pub fn narrowest(points: &[PointF]) -> Self {
        let range = f32::from(i16::MIN)..=f32::from(i16::MAX);
        let fits = |v: f32| v.fract() == 0.0 && range.contains(&v);
        if !points.is_empty() && points.iter().all(|p| fits(p.x) && fits(p.y)) {
            PointEncoding::Int16
        } else {
            PointEncoding::Float
        }
    }
}

/// Encode points in the given form.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if a coordinate does not fit in an `i16` for
/// [`PointEncoding::Int16`].
pub fn encode_points(points: &[PointF], encoding: PointEncoding) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match encoding {
        PointEncoding::Float => {
            out.reserve(points.len() * PointF::SIZE);
            for point in points {
                point.write(&mut out);
            }
        }
        PointEncoding::Int16 => {
            let points = points_to_i16(points)?;
            out.reserve(points.len() * Point16::SIZE);
            for point in &points {
                point.write(&mut out);
            }
        }
        PointEncoding::Relative => out = pointr::encode_relative_points(points),
    }
    Ok(out)
}

/// Decode `count` points in the given form.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the points do not fit in the remaining data.
pub fn decode_points(
    parser: &mut Parser<'_>,
    count: usize,
    encoding: PointEncoding,
) -> Result<Vec<PointF>> {
    match encoding {
        PointEncoding::Float => parser.read_array(count),
        PointEncoding::Int16 => Ok(parser
            .read_array::<Point16>(count)?
            .into_iter()
            .map(|p| PointF::new(f32::from(p.x), f32::from(p.y)))
            .collect()),
        PointEncoding::Relative => pointr::decode_relative_points(parser, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_precedence() {
        assert_eq!(PointEncoding::from_flags(0), PointEncoding::Float);
        assert_eq!(PointEncoding::from_flags(FLAG_COMPRESSED), PointEncoding::Int16);
        assert_eq!(
            PointEncoding::from_flags(FLAG_COMPRESSED | FLAG_RELATIVE),
            PointEncoding::Relative
        );
        assert_eq!(PointEncoding::Int16.flag_bits(), 0x4000);
    }

    #[test]
    fn test_narrowest() {
        assert_eq!(
            PointEncoding::narrowest(&[PointF::new(1.0, -2.0)]),
            PointEncoding::Int16
        );
        assert_eq!(
            PointEncoding::narrowest(&[PointF::new(1.5, 0.0)]),
            PointEncoding::Float
        );
        assert_eq!(
            PointEncoding::narrowest(&[PointF::new(40000.0, 0.0)]),
            PointEncoding::Float
        );
    }

    #[test]
    fn test_each_encoding() {
        let points = vec![PointF::new(10.0, 0.0), PointF::new(10.0, 10.0)];
        for (encoding, len) in [
            (PointEncoding::Float, 16),
            (PointEncoding::Int16, 8),
            (PointEncoding::Relative, 4),
        ] {
            let bytes = encode_points(&points, encoding).unwrap();
            assert_eq!(bytes.len(), len);
            let decoded = decode_points(&mut Parser::new(&bytes), 2, encoding).unwrap();
            assert_eq!(decoded, points);
        }
    }

    #[test]
    fn test_int16_out_of_range() {
        assert!(encode_points(&[PointF::new(1e6, 0.0)], PointEncoding::Int16).is_err());
    }
}
