//! Path objects and bare point type arrays.
//!
//! A path object is a graphics version, a point count, a flags word, the points in one of the
//! three coordinate forms, the point types (one byte each or run length encoded) and zero padding
//! up to a multiple of 4 bytes.

use crate::{
    objects::{count_u32, read_count, EmfObject, GraphicsVersion},
    path::{
        decode_points, encode_points,
        points::FLAG_RLE,
        pointtype::{decode_rle, encode_rle},
        PathBuilder, PointEncoding,
    },
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::PointF,
    Error, Result,
};

/// A path object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathObject {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Points and point types
    pub path: PathBuilder,
    /// Coordinate form of the points
    pub encoding: PointEncoding,
    /// Point types are run length encoded
    pub rle: bool,
}

impl PathObject {
    /// A path object with float points and one type byte per point.
    #[must_use]
    pub fn new(version: GraphicsVersion, path: PathBuilder) -> Self {
        PathObject {
            version,
            path,
            encoding: PointEncoding::Float,
            rle: false,
        }
    }

    /// A path object with run length encoded point types.
    #[must_use]
    pub fn with_rle(version: GraphicsVersion, path: PathBuilder) -> Self {
        PathObject {
            rle: true,
            ..PathObject::new(version, path)
        }
    }

    /// A path object from raw points and type bytes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the arrays differ in length.
    pub fn from_raw(
        version: GraphicsVersion,
        points: Vec<PointF>,
        types: Vec<u8>,
        encoding: PointEncoding,
    ) -> Result<Self> {
        Ok(PathObject {
            version,
            path: PathBuilder::from_parts(points, types)?,
            encoding,
            rle: false,
        })
    }

    /// The flags word written for this object.
    #[must_use]
    pub fn flags(&self) -> u16 {
        let mut flags = self.encoding.flag_bits();
        if self.rle {
            flags |= FLAG_RLE;
        }
        flags
    }
}

impl EmfObject for PathObject {
    const OID: Oid = Oid::Path;

    fn encode(&self) -> Result<PseudoObject> {
        let count = count_u32("path points", self.path.len())?;
        let points = encode_points(self.path.points(), self.encoding)?;
        let types: Vec<u8> = if self.rle {
            encode_rle(self.path.types())
                .into_iter()
                .flat_map(u16::to_le_bytes)
                .collect()
        } else {
            self.path.types().to_vec()
        };

        let unpadded = 12 + points.len() + types.len();
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::U32(count),
                Field::U16(self.flags()),
                Field::Zero(2),
                Field::Bytes(&points),
                Field::Bytes(&types),
                Field::Zero(unpadded.next_multiple_of(4) - unpadded),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let start = parser.pos();
        let version = parser.read()?;
        let count = read_count(parser)?;
        let flags: u16 = parser.read_le()?;
        parser.advance_by(2)?;

        let encoding = PointEncoding::from_flags(flags);
        let rle = flags & FLAG_RLE != 0;
        let points = decode_points(parser, count, encoding)?;
        let types = if rle {
            decode_rle(parser, count)?
        } else {
            parser.read_bytes(count)?.to_vec()
        };

        // Padding is optional at the very end of a buffer.
        let used = parser.pos() - start;
        let pad = (used.next_multiple_of(4) - used).min(parser.remaining());
        parser.advance_by(pad)?;

        Ok(PathObject {
            version,
            path: PathBuilder::from_parts(points, types)?,
            encoding,
            rle,
        })
    }
}

/// Serialize a bare array of point type bytes.
///
/// # Errors
/// Returns [`Error::Schema`] for an empty array.
pub fn encode_point_types(types: &[u8]) -> Result<PseudoObject> {
    if types.is_empty() {
        return Err(Error::Schema("empty point type array".to_string()));
    }
    Ok(serialize(Oid::PathPointType, &[Field::Bytes(types)])?.into_array())
}

/// Serialize one `start` type followed by `count` copies of `others`.
///
/// # Errors
/// Returns [`Error::Schema`] if `count` is zero.
pub fn encode_point_types_run(start: u8, others: u8, count: usize) -> Result<PseudoObject> {
    Ok(serialize(
        Oid::PathPointType,
        &[Field::U8(start), Field::Fill { unit: &[others], reps: count }],
    )?
    .into_array())
}

/// Serialize point types as RLE words.
///
/// # Errors
/// Returns [`Error::Schema`] for an empty array.
pub fn encode_point_types_rle(types: &[u8]) -> Result<PseudoObject> {
    if types.is_empty() {
        return Err(Error::Schema("empty point type array".to_string()));
    }
    let words = encode_rle(types);
    Ok(serialize(Oid::PathPointTypeRle, &[Field::Item(&words)])?.into_array())
}
