//! Area filling records.
//!
//! Every fill record starts its payload with a [`BrushRef`]: a color when
//! [`FLAG_BRUSH_COLOR`](crate::records::flags::FLAG_BRUSH_COLOR) is
//! set, a brush object index otherwise.

use crate::{
    path::points::PointEncoding,
    records::{
        compressed_bit, decode_point_list, decode_rect, decode_rect_list, encode_point_list,
        encode_rect, encode_rect_list,
        flags::{object_id, object_id_bits, BrushRef, FLAG_WINDING},
        is_compressed, payload_of, EmfRecord, RecordHeader,
    },
    serial::{Field, Parser},
    types::{PointF, RectF, RecordType},
    Result,
};

/// Fill rectangles.
#[derive(Debug, Clone, PartialEq)]
pub struct FillRectsRecord {
    /// Fill brush or color
    pub brush: BrushRef,
    /// Rectangles to fill
    pub rects: Vec<RectF>,
    /// Store the rectangles as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for FillRectsRecord {
    const TYPE: RecordType = RecordType::FillRects;

    fn flags(&self) -> Result<u16> {
        Ok(self.brush.flag_bits() | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let rects = encode_rect_list(&self.rects, self.compressed)?;
        payload_of(&[Field::U32(self.brush.to_u32()?), Field::Bytes(&rects)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        Ok(FillRectsRecord {
            brush: BrushRef::read(header.flags, parser)?,
            rects: decode_rect_list(parser, compressed)?,
            compressed,
        })
    }
}

/// Fill a polygon with the alternate rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPolygonRecord {
    /// Fill brush or color
    pub brush: BrushRef,
    /// Vertices
    pub points: Vec<PointF>,
    /// Wire form of the vertices
    pub encoding: PointEncoding,
}

impl EmfRecord for FillPolygonRecord {
    const TYPE: RecordType = RecordType::FillPolygon;

    fn flags(&self) -> Result<u16> {
        Ok(self.brush.flag_bits() | self.encoding.flag_bits())
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let points = encode_point_list(&self.points, self.encoding)?;
        payload_of(&[Field::U32(self.brush.to_u32()?), Field::Bytes(&points)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let encoding = PointEncoding::from_flags(header.flags);
        Ok(FillPolygonRecord {
            brush: BrushRef::read(header.flags, parser)?,
            points: decode_point_list(parser, encoding)?,
            encoding,
        })
    }
}

/// Fill an ellipse inscribed in a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillEllipseRecord {
    /// Fill brush or color
    pub brush: BrushRef,
    /// Bounding rectangle
    pub rect: RectF,
    /// Store the rectangle as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for FillEllipseRecord {
    const TYPE: RecordType = RecordType::FillEllipse;

    fn flags(&self) -> Result<u16> {
        Ok(self.brush.flag_bits() | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let rect = encode_rect(&self.rect, self.compressed)?;
        payload_of(&[Field::U32(self.brush.to_u32()?), Field::Bytes(&rect)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        Ok(FillEllipseRecord {
            brush: BrushRef::read(header.flags, parser)?,
            rect: decode_rect(parser, compressed)?,
            compressed,
        })
    }
}

/// Fill a pie wedge of an ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillPieRecord {
    /// Fill brush or color
    pub brush: BrushRef,
    /// Start angle in degrees, clockwise from the x axis
    pub start_angle: f32,
    /// Sweep in degrees, clockwise from the start angle
    pub sweep_angle: f32,
    /// Bounding rectangle of the full ellipse
    pub rect: RectF,
    /// Store the rectangle as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for FillPieRecord {
    const TYPE: RecordType = RecordType::FillPie;

    fn flags(&self) -> Result<u16> {
        Ok(self.brush.flag_bits() | compressed_bit(self.compressed))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let rect = encode_rect(&self.rect, self.compressed)?;
        payload_of(&[
            Field::U32(self.brush.to_u32()?),
            Field::F32(self.start_angle),
            Field::F32(self.sweep_angle),
            Field::Bytes(&rect),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = is_compressed(header);
        Ok(FillPieRecord {
            brush: BrushRef::read(header.flags, parser)?,
            start_angle: parser.read_le()?,
            sweep_angle: parser.read_le()?,
            rect: decode_rect(parser, compressed)?,
            compressed,
        })
    }
}

macro_rules! object_fill_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident, $id:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            /// Object table index of the filled shape
            pub $id: u8,
            /// Fill brush or color
            pub brush: BrushRef,
        }

        impl EmfRecord for $name {
            const TYPE: RecordType = RecordType::$kind;

            fn flags(&self) -> Result<u16> {
                Ok(object_id_bits(self.$id)? | self.brush.flag_bits())
            }

            fn payload(&self) -> Result<Vec<u8>> {
                payload_of(&[Field::U32(self.brush.to_u32()?)])
            }

            fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
                Ok($name {
                    $id: object_id(header.flags)?,
                    brush: BrushRef::read(header.flags, parser)?,
                })
            }
        }
    };
}

object_fill_record!(
    /// Fill a region object.
    FillRegionRecord => FillRegion, region_id
);

object_fill_record!(
    /// Fill the interior of a path object.
    FillPathRecord => FillPath, path_id
);

/// Fill a closed cardinal spline.
#[derive(Debug, Clone, PartialEq)]
pub struct FillClosedCurveRecord {
    /// Fill brush or color
    pub brush: BrushRef,
    /// Spline tension, 0 gives straight lines
    pub tension: f32,
    /// Fill with the winding rule instead of the alternate rule
    pub winding: bool,
    /// Points the spline passes through
    pub points: Vec<PointF>,
    /// Wire form of the points
    pub encoding: PointEncoding,
}

impl EmfRecord for FillClosedCurveRecord {
    const TYPE: RecordType = RecordType::FillClosedCurve;

    fn flags(&self) -> Result<u16> {
        let winding = if self.winding { FLAG_WINDING } else { 0 };
        Ok(self.brush.flag_bits() | self.encoding.flag_bits() | winding)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let points = encode_point_list(&self.points, self.encoding)?;
        payload_of(&[
            Field::U32(self.brush.to_u32()?),
            Field::F32(self.tension),
            Field::Bytes(&points),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let encoding = PointEncoding::from_flags(header.flags);
        Ok(FillClosedCurveRecord {
            brush: BrushRef::read(header.flags, parser)?,
            tension: parser.read_le()?,
            winding: header.flags & FLAG_WINDING != 0,
            points: decode_point_list(parser, encoding)?,
            encoding,
        })
    }
}

/// Close, outline and fill a path object with the current pen and brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeFillPathRecord {
    /// Path object index
    pub path_id: u8,
}

impl EmfRecord for StrokeFillPathRecord {
    const TYPE: RecordType = RecordType::StrokeFillPath;

    fn flags(&self) -> Result<u16> {
        object_id_bits(self.path_id)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn decode(header: &RecordHeader, _parser: &mut Parser<'_>) -> Result<Self> {
        Ok(StrokeFillPathRecord {
            path_id: object_id(header.flags)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::Argb, Error};

    #[test]
    fn test_fill_rects_color() {
        let record = FillRectsRecord {
            brush: BrushRef::Color(Argb::new(0xFF, 0x20, 0x40, 0x60)),
            rects: vec![RectF::new(0.0, 0.0, 10.0, 10.0)],
            compressed: true,
        };
        let po = record.encode().unwrap();
        assert_eq!(&po.data()[2..4], &[0x00, 0xC0]);
        assert_eq!(po.len(), 12 + 4 + 4 + 8);
        assert_eq!(FillRectsRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_fill_polygon_relative() {
        let record = FillPolygonRecord {
            brush: BrushRef::Object(2),
            points: vec![
                PointF::new(0.0, 0.0),
                PointF::new(100.0, 0.0),
                PointF::new(50.0, 80.0),
            ],
            encoding: PointEncoding::Relative,
        };
        let po = record.encode().unwrap();
        assert_eq!(&po.data()[2..4], &[0x00, 0x08]);
        assert_eq!(FillPolygonRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_fill_pie_and_ellipse() {
        let pie = FillPieRecord {
            brush: BrushRef::Object(0),
            start_angle: 0.0,
            sweep_angle: 270.0,
            rect: RectF::new(0.0, 0.0, 20.0, 20.0),
            compressed: true,
        };
        let po = pie.encode().unwrap();
        assert_eq!(po.len(), 12 + 12 + 8);
        assert_eq!(FillPieRecord::parse(po.data()).unwrap(), pie);

        let ellipse = FillEllipseRecord {
            brush: BrushRef::Object(1),
            rect: RectF::new(0.5, 0.5, 20.0, 20.0),
            compressed: false,
        };
        assert_eq!(
            FillEllipseRecord::parse(ellipse.encode().unwrap().data()).unwrap(),
            ellipse
        );
    }

    #[test]
    fn test_fill_path_and_region() {
        let record = FillPathRecord {
            path_id: 6,
            brush: BrushRef::Color(Argb::new(0xFF, 0, 0, 0xFF)),
        };
        let po = record.encode().unwrap();
        assert_eq!(
            po.data(),
            &[0x14, 0x40, 0x06, 0x80, 16, 0, 0, 0, 4, 0, 0, 0, 0xFF, 0, 0, 0xFF]
        );
        assert_eq!(FillPathRecord::parse(po.data()).unwrap(), record);

        let region = FillRegionRecord {
            region_id: 64,
            brush: BrushRef::Object(0),
        };
        assert!(matches!(region.encode(), Err(Error::InvalidObjectId(64))));
    }

    #[test]
    fn test_fill_closed_curve_winding() {
        let record = FillClosedCurveRecord {
            brush: BrushRef::Object(3),
            tension: 0.5,
            winding: true,
            points: vec![
                PointF::new(0.0, 0.0),
                PointF::new(10.0, 0.0),
                PointF::new(5.0, 5.0),
            ],
            encoding: PointEncoding::Int16,
        };
        let po = record.encode().unwrap();
        assert_eq!(&po.data()[2..4], &[0x00, 0x60]);
        assert_eq!(FillClosedCurveRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_stroke_fill_path() {
        let po = StrokeFillPathRecord { path_id: 9 }.encode().unwrap();
        assert_eq!(po.data(), &[0x37, 0x40, 9, 0, 12, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            StrokeFillPathRecord::parse(po.data()).unwrap(),
            StrokeFillPathRecord { path_id: 9 }
        );
    }
}
