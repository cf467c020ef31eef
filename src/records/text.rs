//! Text drawing records.

use widestring::U16String;

use crate::{
    objects::{count_u32, read_count},
    records::{
        flags::{object_id, object_id_bits, BrushRef},
        payload_of, EmfRecord, RecordHeader,
    },
    serial::{Field, Parser},
    types::{DriverStringOptions, PointF, RectF, RecordType, TransformMatrix},
    Error, Result,
};

/// Lay out and draw a string in a rectangle with a font and a string format.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStringRecord {
    /// Font object index
    pub font_id: u8,
    /// Brush or color of the glyphs
    pub brush: BrushRef,
    /// String format object index
    pub format_id: u32,
    /// Layout rectangle, an empty one means no clipping or wrapping
    pub layout: RectF,
    /// UTF-16 text, not terminated
    pub text: U16String,
}

impl EmfRecord for DrawStringRecord {
    const TYPE: RecordType = RecordType::DrawString;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.font_id)? | self.brush.flag_bits())
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let units = self.text.as_slice().to_vec();
        payload_of(&[
            Field::U32(self.brush.to_u32()?),
            Field::U32(self.format_id),
            Field::U32(count_u32("string length", units.len())?),
            Field::Item(&self.layout),
            Field::Item(&units),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let brush = BrushRef::read(header.flags, parser)?;
        let format_id = parser.read_le()?;
        let length = read_count(parser)?;
        let layout = parser.read()?;
        Ok(DrawStringRecord {
            font_id: object_id(header.flags)?,
            brush,
            format_id,
            layout,
            text: parser.read_utf16(length)?,
        })
    }
}

/// Draw glyphs at explicit positions, bypassing text layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawDriverStringRecord {
    /// Font object index
    pub font_id: u8,
    /// Brush or color of the glyphs
    pub brush: BrushRef,
    /// How glyphs and positions are interpreted
    pub options: DriverStringOptions,
    /// Glyph indices, or character codes with [`DriverStringOptions::CMAP_LOOKUP`]
    pub glyphs: Vec<u16>,
    /// One position per glyph
    pub positions: Vec<PointF>,
    /// Transform applied to the glyphs
    pub matrix: Option<TransformMatrix>,
}

impl EmfRecord for DrawDriverStringRecord {
    const TYPE: RecordType = RecordType::DrawDriverString;

    fn flags(&self) -> Result<u16> {
        Ok(object_id_bits(self.font_id)? | self.brush.flag_bits())
    }

    fn payload(&self) -> Result<Vec<u8>> {
        if self.glyphs.len() != self.positions.len() {
            return Err(Error::Schema(format!(
                "{} glyphs but {} positions",
                self.glyphs.len(),
                self.positions.len()
            )));
        }

        let mut fields = vec![
            Field::U32(self.brush.to_u32()?),
            Field::U32(self.options.bits()),
            Field::U32(u32::from(self.matrix.is_some())),
            Field::U32(count_u32("glyph count", self.glyphs.len())?),
            Field::Item(&self.glyphs),
            Field::Item(&self.positions),
        ];
        if let Some(matrix) = &self.matrix {
            fields.push(Field::Item(matrix));
        }
        payload_of(&fields)
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let brush = BrushRef::read(header.flags, parser)?;
        let options = DriverStringOptions::from_bits_retain(parser.read_le()?);
        let has_matrix: u32 = parser.read_le()?;
        let count = read_count(parser)?;
        let glyphs = parser.read_array(count)?;
        let positions = parser.read_array(count)?;
        let matrix = if has_matrix != 0 {
            Some(parser.read()?)
        } else {
            None
        };
        Ok(DrawDriverStringRecord {
            font_id: object_id(header.flags)?,
            brush,
            options,
            glyphs,
            positions,
            matrix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Argb;

    #[test]
    fn test_draw_string_odd_length() {
        let record = DrawStringRecord {
            font_id: 2,
            brush: BrushRef::Color(Argb::new(0xFF, 0, 0, 0)),
            format_id: 3,
            layout: RectF::new(10.0, 20.0, 0.0, 0.0),
            text: U16String::from_str("abc"),
        };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 48);
        assert_eq!(&po.data()[2..4], &[0x02, 0x80]);
        assert_eq!(&po.data()[8..12], &[34, 0, 0, 0]);
        assert_eq!(&po.data()[40..46], &[b'a', 0, b'b', 0, b'c', 0]);
        assert_eq!(&po.data()[46..], &[0, 0]);

        let decoded = DrawStringRecord::parse(po.data()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.text.to_string_lossy(), "abc");
    }

    #[test]
    fn test_draw_string_truncated_text() {
        let record = DrawStringRecord {
            font_id: 0,
            brush: BrushRef::Object(1),
            format_id: 0,
            layout: RectF::default(),
            text: U16String::from_str("hello"),
        };
        let mut bytes = record.encode().unwrap().into_data();
        // Claim a longer string than the payload holds
        bytes[20] = 40;
        assert!(DrawStringRecord::parse(&bytes).is_err());
    }

    #[test]
    fn test_driver_string() {
        let record = DrawDriverStringRecord {
            font_id: 1,
            brush: BrushRef::Object(4),
            options: DriverStringOptions::CMAP_LOOKUP,
            glyphs: vec![0x41, 0x42, 0x43],
            positions: vec![
                PointF::new(0.0, 10.0),
                PointF::new(8.0, 10.0),
                PointF::new(16.0, 10.0),
            ],
            matrix: Some(TransformMatrix::IDENTITY),
        };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 12 + 16 + 6 + 24 + 24 + 2);
        assert_eq!(DrawDriverStringRecord::parse(po.data()).unwrap(), record);

        let plain = DrawDriverStringRecord {
            matrix: None,
            ..record.clone()
        };
        let decoded = DrawDriverStringRecord::parse(plain.encode().unwrap().data()).unwrap();
        assert_eq!(decoded.matrix, None);

        let broken = DrawDriverStringRecord {
            positions: Vec::new(),
            ..record
        };
        assert!(matches!(broken.encode(), Err(Error::Schema(_))));
    }
}
