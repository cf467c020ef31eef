//! Outline and image drawing records.
//!
//! Outline records reference a pen through the object table index in the low byte of their flags.
//! Coordinates are stored as `f32` unless the compressed bit asks for 16-bit integers, and the
//! point list records may also use relative deltas.

use crate::{
    path::points::{decode_points, encode_points, PointEncoding},
    records::{
        compressed_bit, decode_point_list, decode_rect, decode_rect_list, encode_point_list,
        encode_rect, encode_rect_list,
        flags::{check_object_id, object_id, object_id_bits, FLAG_CLOSED, FLAG_EFFECT},
        is_compressed,
        payload_of, EmfRecord, RecordHeader,
    },
    serial::{Field, Parser},
    types::{Argb, PointF, RectF, RecordType, UnitType},
    Result,
};

/// Fill the whole drawing surface with one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearRecord {
    /// Fill color
    pub color: Argb,
}

impl EmfRecord for ClearRecord {
    const TYPE: RecordType = RecordType::Clear;

    fn flags(&self) -> Result<u16> {
        Ok(0)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::Item(&self.color)])
    }

    fn decode(_header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(ClearRecord {
            color: parser.read()?,
        })
    }
}

/// Outline rectangles.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRectsRecord {
    /// Pen object index
    pub pen_id: u8,
    /// Rectangles to outline
    pub rects: Vec<RectF>,
    /// Store the rectangles as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for DrawRectsRecord {
    const TYPE: RecordType = RecordType::DrawRects;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.pen_id)? | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        encode_rect_list(&self.rects, self.compressed)
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        Ok(DrawRectsRecord {
            pen_id: object_id(header.flags)?,
            rects: decode_rect_list(parser, compressed)?,
            compressed,
        })
    }
}

/// A polyline, optionally closed into a polygon outline.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawLinesRecord {
    /// Pen object index
    pub pen_id: u8,
    /// Vertices
    pub points: Vec<PointF>,
    /// Wire form of the vertices
    pub encoding: PointEncoding,
    /// Connect the last point back to the first
    pub closed: bool,
}

impl EmfRecord for DrawLinesRecord {
    const TYPE: RecordType = RecordType::DrawLines;

    fn flags(&self) -> Result<u16> {
        let closed = if self.closed { FLAG_CLOSED } else { 0 };
        Ok(object_id_bits(self.pen_id)? | self.encoding.flag_bits() | closed)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        encode_point_list(&self.points, self.encoding)
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let encoding = PointEncoding::from_flags(header.flags);
        Ok(DrawLinesRecord {
            pen_id: object_id(header.flags)?,
            points: decode_point_list(parser, encoding)?,
            encoding,
            closed: header.flags & FLAG_CLOSED != 0,
        })
    }
}

/// A run of cubic Bezier segments: a start point and three points per segment.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBeziersRecord {
    /// Pen object index
    pub pen_id: u8,
    /// Start point followed by control, control, end triples
    pub points: Vec<PointF>,
    /// Wire form of the points
    pub encoding: PointEncoding,
}

impl EmfRecord for DrawBeziersRecord {
    const TYPE: RecordType = RecordType::DrawBeziers;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.pen_id)? | self.encoding.flag_bits())
    }

    fn payload(&self) -> Result<Vec<u8>> {
        encode_point_list(&self.points, self.encoding)
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let encoding = PointEncoding::from_flags(header.flags);
        Ok(DrawBeziersRecord {
            pen_id: object_id(header.flags)?,
            points: decode_point_list(parser, encoding)?,
            encoding,
        })
    }
}

/// A closed cardinal spline through the points.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawClosedCurveRecord {
    /// Pen object index
    pub pen_id: u8,
    /// Spline tension, 0 gives straight lines
    pub tension: f32,
    /// Points the spline passes through
    pub points: Vec<PointF>,
    /// Wire form of the points
    pub encoding: PointEncoding,
}

impl EmfRecord for DrawClosedCurveRecord {
    const TYPE: RecordType = RecordType::DrawClosedCurve;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.pen_id)? | self.encoding.flag_bits())
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let points = encode_point_list(&self.points, self.encoding)?;
        payload_of(&[Field::F32(self.tension), Field::Bytes(&points)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let encoding = PointEncoding::from_flags(header.flags);
        Ok(DrawClosedCurveRecord {
            pen_id: object_id(header.flags)?,
            tension: parser.read_le()?,
            points: decode_point_list(parser, encoding)?,
            encoding,
        })
    }
}

/// An open cardinal spline through a window of the points.
///
/// Only `segments` segments starting at point `offset` are drawn. The remaining points still shape
/// the ends of the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCurveRecord {
    /// Pen object index
    pub pen_id: u8,
    /// Spline tension, 0 gives straight lines
    pub tension: f32,
    /// Index of the first point drawn
    pub offset: u32,
    /// Number of segments drawn
    pub segments: u32,
    /// Points the spline passes through
    pub points: Vec<PointF>,
    /// Store the points as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for DrawCurveRecord {
    const TYPE: RecordType = RecordType::DrawCurve;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.pen_id)? | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let points = encode_point_list(&self.points, self.point_encoding())?;
        payload_of(&[
            Field::F32(self.tension),
            Field::U32(self.offset),
            Field::U32(self.segments),
            Field::Bytes(&points),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        let tension = parser.read_le()?;
        let offset = parser.read_le()?;
        let segments = parser.read_le()?;
        let encoding = if compressed {
            PointEncoding::Int16
        } else {
            PointEncoding::Float
        };
        Ok(DrawCurveRecord {
            pen_id: object_id(header.flags)?,
            tension,
            offset,
            segments,
            points: decode_point_list(parser, encoding)?,
            compressed,
        })
    }
}

impl DrawCurveRecord {
    fn point_encoding(&self) -> PointEncoding {
        if self.compressed {
            PointEncoding::Int16
        } else {
            PointEncoding::Float
        }
    }
}

/// Outline an ellipse inscribed in a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawEllipseRecord {
    /// Pen object index
    pub pen_id: u8,
    /// Bounding rectangle
    pub rect: RectF,
    /// Store the rectangle as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for DrawEllipseRecord {
    const TYPE: RecordType = RecordType::DrawEllipse;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.pen_id)? | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        encode_rect(&self.rect, self.compressed)
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        Ok(DrawEllipseRecord {
            pen_id: object_id(header.flags)?,
            rect: decode_rect(parser, compressed)?,
            compressed,
        })
    }
}

macro_rules! arc_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            /// Pen object index
            pub pen_id: u8,
            /// Start angle in degrees, clockwise from the x axis
            pub start_angle: f32,
            /// Sweep in degrees, clockwise from the start angle
            pub sweep_angle: f32,
            /// Bounding rectangle of the full ellipse
            pub rect: RectF,
            /// Store the rectangle as 16-bit integers
            pub compressed: bool,
        }

        impl EmfRecord for $name {
            const TYPE: RecordType = RecordType::$kind;

            fn flags(&self) -> Result<u16> {
                Ok(object_id_bits(self.pen_id)? | compressed_bit(self.compressed))
            }

            fn payload(&self) -> Result<Vec<u8>> {
                let rect = encode_rect(&self.rect, self.compressed)?;
                payload_of(&[
                    Field::F32(self.start_angle),
                    Field::F32(self.sweep_angle),
                    Field::Bytes(&rect),
                ])
            }

            fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
                let compressed = is_compressed(header);
                Ok($name {
                    pen_id: object_id(header.flags)?,
                    start_angle: parser.read_le()?,
                    sweep_angle: parser.read_le()?,
                    rect: decode_rect(parser, compressed)?,
                    compressed,
                })
            }
        }
    };
}

arc_record!(
    /// Outline an elliptical arc.
    DrawArcRecord => DrawArc
);

arc_record!(
    /// Outline a pie wedge: an arc and the two radii to its ends.
    DrawPieRecord => DrawPie
);

/// Outline a path object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPathRecord {
    /// Path object index, stored in the flags
    pub path_id: u8,
    /// Pen object index, stored in the payload
    pub pen_id: u32,
}

impl EmfRecord for DrawPathRecord {
    const TYPE: RecordType = RecordType::DrawPath;

    fn flags(&self) -> Result<u16> {
        object_id_bits(self.path_id)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let pen = check_object_id(self.pen_id)?;
        payload_of(&[Field::U32(u32::from(pen))])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let pen: u32 = parser.read_le()?;
        Ok(DrawPathRecord {
            path_id: object_id(header.flags)?,
            pen_id: u32::from(check_object_id(pen)?),
        })
    }
}

/// Draw part of an image scaled into a destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawImageRecord {
    /// Image object index
    pub image_id: u8,
    /// Image attributes object index, or any value when none applies
    pub image_attributes_id: u32,
    /// Unit of the source rectangle
    pub src_unit: UnitType,
    /// Part of the image to draw
    pub src_rect: RectF,
    /// Where to draw it
    pub dst_rect: RectF,
    /// Store the destination as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for DrawImageRecord {
    const TYPE: RecordType = RecordType::DrawImage;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.image_id)? | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let dst = encode_rect(&self.dst_rect, self.compressed)?;
        payload_of(&[
            Field::U32(self.image_attributes_id),
            Field::U32(self.src_unit.value()),
            Field::Item(&self.src_rect),
            Field::Bytes(&dst),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        let image_attributes_id = parser.read_le()?;
        let src_unit = UnitType::try_from(parser.read_le::<u32>()?)?;
        Ok(DrawImageRecord {
            image_id: object_id(header.flags)?,
            image_attributes_id,
            src_unit,
            src_rect: parser.read()?,
            dst_rect: decode_rect(parser, compressed)?,
            compressed,
        })
    }
}

/// Draw part of an image into a parallelogram.
///
/// The three points are the upper-left, upper-right and lower-left corners of the destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawImagePointsRecord {
    /// Image object index
    pub image_id: u8,
    /// An image effect record precedes this one
    pub effect: bool,
    /// Image attributes object index, or any value when none applies
    pub image_attributes_id: u32,
    /// Unit of the source rectangle
    pub src_unit: UnitType,
    /// Part of the image to draw
    pub src_rect: RectF,
    /// Destination corners
    pub points: [PointF; 3],
    /// Wire form of the corners
    pub encoding: PointEncoding,
}

impl EmfRecord for DrawImagePointsRecord {
    const TYPE: RecordType = RecordType::DrawImagePoints;

    fn flags(&self) -> Result<u16> {
        let effect = if self.effect { FLAG_EFFECT } else { 0 };
        Ok(object_id_bits(self.image_id)? | self.encoding.flag_bits() | effect)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let points = encode_points(&self.points, self.encoding)?;
        payload_of(&[
            Field::U32(self.image_attributes_id),
            Field::U32(self.src_unit.value()),
            Field::Item(&self.src_rect),
            Field::U32(3),
            Field::Bytes(&points),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let encoding = PointEncoding::from_flags(header.flags);
        let image_attributes_id = parser.read_le()?;
        let src_unit = UnitType::try_from(parser.read_le::<u32>()?)?;
        let src_rect = parser.read()?;
        let count: u32 = parser.read_le()?;
        if count != 3 {
            return Err(malformed_error!(
                "DrawImagePoints needs 3 destination points, found {}",
                count
            ));
        }
        let points = decode_points(parser, 3, encoding)?;
        Ok(DrawImagePointsRecord {
            image_id: object_id(header.flags)?,
            effect: header.flags & FLAG_EFFECT != 0,
            image_attributes_id,
            src_unit,
            src_rect,
            points: [points[0], points[1], points[2]],
            encoding,
        })
    }
}
