//! Pen objects.
//!
//! A pen is a fixed head (flags, unit, width) followed by up to 13 optional fields in a fixed
//! order and then the brush that fills the stroke. Each optional field is an `Option` in
//! [`PenOptionalData`]; the flags word is computed from which of them are set.

use crate::{
    objects::{
        decode_sized, encode_sized, Brush, CompoundLineData, CustomLineCap, DashedLineData,
        EmfObject, GraphicsVersion,
    },
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{
        Argb, DashedLineCapType, LineCapType, LineJoinType, LineStyle, PenAlignment, PenDataFlags,
        TransformMatrix, UnitType,
    },
    Result,
};

/// The optional fields of a pen, in wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PenOptionalData {
    /// World to pen transform
    pub transform: Option<TransformMatrix>,
    /// Cap at line starts
    pub start_cap: Option<LineCapType>,
    /// Cap at line ends
    pub end_cap: Option<LineCapType>,
    /// Join between segments
    pub join: Option<LineJoinType>,
    /// Miter limit
    pub miter_limit: Option<f32>,
    /// Dash style
    pub line_style: Option<LineStyle>,
    /// Cap at the ends of dashes
    pub dashed_line_cap: Option<DashedLineCapType>,
    /// Distance into the dash pattern at which the line starts
    pub dash_offset: Option<f32>,
    /// Custom dash pattern
    pub dashed_line: Option<DashedLineData>,
    /// Stroke alignment relative to the path
    pub alignment: Option<PenAlignment>,
    /// Compound line widths
    pub compound_line: Option<CompoundLineData>,
    /// Custom start cap
    pub custom_start_cap: Option<CustomLineCap>,
    /// Custom end cap
    pub custom_end_cap: Option<CustomLineCap>,
}

impl PenOptionalData {
    /// The flags word announcing the fields that are set.
    #[must_use]
    pub fn flags(&self) -> PenDataFlags {
        let mut flags = PenDataFlags::empty();
        flags.set(PenDataFlags::TRANSFORM, self.transform.is_some());
        flags.set(PenDataFlags::START_CAP, self.start_cap.is_some());
        flags.set(PenDataFlags::END_CAP, self.end_cap.is_some());
        flags.set(PenDataFlags::JOIN, self.join.is_some());
        flags.set(PenDataFlags::MITER_LIMIT, self.miter_limit.is_some());
        flags.set(PenDataFlags::LINE_STYLE, self.line_style.is_some());
        flags.set(PenDataFlags::DL_CAP, self.dashed_line_cap.is_some());
        flags.set(PenDataFlags::DL_OFFSET, self.dash_offset.is_some());
        flags.set(PenDataFlags::DL_DATA, self.dashed_line.is_some());
        flags.set(PenDataFlags::NON_CENTER, self.alignment.is_some());
        flags.set(PenDataFlags::CL_DATA, self.compound_line.is_some());
        flags.set(PenDataFlags::CUSTOM_START_CAP, self.custom_start_cap.is_some());
        flags.set(PenDataFlags::CUSTOM_END_CAP, self.custom_end_cap.is_some());
        flags
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        if let Some(transform) = &self.transform {
            out.extend_from_slice(transform.encode_object()?.data());
        }
        if let Some(cap) = self.start_cap {
            out.extend_from_slice(&cap.value().to_le_bytes());
        }
        if let Some(cap) = self.end_cap {
            out.extend_from_slice(&cap.value().to_le_bytes());
        }
        if let Some(join) = self.join {
            out.extend_from_slice(&join.value().to_le_bytes());
        }
        if let Some(limit) = self.miter_limit {
            out.extend_from_slice(&limit.to_le_bytes());
        }
        if let Some(style) = self.line_style {
            out.extend_from_slice(&style.value().to_le_bytes());
        }
        if let Some(cap) = self.dashed_line_cap {
            out.extend_from_slice(&cap.value().to_le_bytes());
        }
        if let Some(offset) = self.dash_offset {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        if let Some(dash) = &self.dashed_line {
            out.extend_from_slice(dash.encode()?.data());
        }
        if let Some(alignment) = self.alignment {
            out.extend_from_slice(&alignment.value().to_le_bytes());
        }
        if let Some(compound) = &self.compound_line {
            out.extend_from_slice(compound.encode()?.data());
        }
        if let Some(cap) = &self.custom_start_cap {
            out.extend(encode_sized(cap)?);
        }
        if let Some(cap) = &self.custom_end_cap {
            out.extend(encode_sized(cap)?);
        }
        Ok(())
    }

    fn decode(parser: &mut Parser<'_>, flags: PenDataFlags) -> Result<Self> {
        let mut data = PenOptionalData::default();
        if flags.contains(PenDataFlags::TRANSFORM) {
            data.transform = Some(parser.read()?);
        }
        if flags.contains(PenDataFlags::START_CAP) {
            data.start_cap = Some(LineCapType::try_from(parser.read_le::<u32>()?)?);
        }
        if flags.contains(PenDataFlags::END_CAP) {
            data.end_cap = Some(LineCapType::try_from(parser.read_le::<u32>()?)?);
        }
        if flags.contains(PenDataFlags::JOIN) {
            data.join = Some(LineJoinType::try_from(parser.read_le::<u32>()?)?);
        }
        if flags.contains(PenDataFlags::MITER_LIMIT) {
            data.miter_limit = Some(parser.read_le()?);
        }
        if flags.contains(PenDataFlags::LINE_STYLE) {
            data.line_style = Some(LineStyle::try_from(parser.read_le::<u32>()?)?);
        }
        if flags.contains(PenDataFlags::DL_CAP) {
            data.dashed_line_cap = Some(DashedLineCapType::try_from(parser.read_le::<u32>()?)?);
        }
        if flags.contains(PenDataFlags::DL_OFFSET) {
            data.dash_offset = Some(parser.read_le()?);
        }
        if flags.contains(PenDataFlags::DL_DATA) {
            data.dashed_line = Some(DashedLineData::decode(parser)?);
        }
        if flags.contains(PenDataFlags::NON_CENTER) {
            data.alignment = Some(PenAlignment::try_from(parser.read_le::<u32>()?)?);
        }
        if flags.contains(PenDataFlags::CL_DATA) {
            data.compound_line = Some(CompoundLineData::decode(parser)?);
        }
        if flags.contains(PenDataFlags::CUSTOM_START_CAP) {
            data.custom_start_cap = Some(decode_sized(parser)?);
        }
        if flags.contains(PenDataFlags::CUSTOM_END_CAP) {
            data.custom_end_cap = Some(decode_sized(parser)?);
        }
        Ok(data)
    }
}

/// Pen geometry: unit, width and the optional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PenData {
    /// Unit of `width`
    pub unit: UnitType,
    /// Stroke width
    pub width: f32,
    /// Optional fields
    pub optional: PenOptionalData,
}

impl PenData {
    /// A pen of `width` world units with no optional fields.
    #[must_use]
    pub fn new(width: f32) -> Self {
        PenData {
            unit: UnitType::World,
            width,
            optional: PenOptionalData::default(),
        }
    }
}

impl EmfObject for PenData {
    const OID: Oid = Oid::PenData;

    fn encode(&self) -> Result<PseudoObject> {
        let mut optional = Vec::new();
        self.optional.encode_into(&mut optional)?;
        serialize(
            Self::OID,
            &[
                Field::U32(self.optional.flags().bits()),
                Field::U32(self.unit.value()),
                Field::F32(self.width),
                Field::Bytes(&optional),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let raw: u32 = parser.read_le()?;
        let flags = PenDataFlags::from_bits(raw)
            .ok_or_else(|| malformed_error!("Pen data flags 0x{:08X} carry unknown bits", raw))?;
        let unit = UnitType::try_from(parser.read_le::<u32>()?)?;
        let width = parser.read_le()?;
        let optional = PenOptionalData::decode(parser, flags)?;
        Ok(PenData {
            unit,
            width,
            optional,
        })
    }
}

/// A pen object.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Geometry
    pub pen_data: PenData,
    /// Brush filling the stroke
    pub brush: Brush,
}

impl Pen {
    /// A plain solid pen.
    #[must_use]
    pub fn solid(color: Argb, width: f32) -> Self {
        Pen {
            version: GraphicsVersion::default(),
            pen_data: PenData::new(width),
            brush: Brush::solid(color),
        }
    }
}

impl EmfObject for Pen {
    const OID: Oid = Oid::Pen;

    fn encode(&self) -> Result<PseudoObject> {
        let pen_data = self.pen_data.encode()?;
        let brush = self.brush.encode()?;
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::Zero(4),
                Field::Bytes(pen_data.data()),
                Field::Bytes(brush.data()),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        let pen_type: u32 = parser.read_le()?;
        if pen_type != 0 {
            return Err(malformed_error!("Pen type {} is not 0", pen_type));
        }
        let pen_data = PenData::decode(parser)?;
        let brush = Brush::decode(parser)?;
        Ok(Pen {
            version,
            pen_data,
            brush,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::StandardDash;

    #[test]
    fn test_solid_pen() {
        let pen = Pen::solid(Argb::from_u32(0xFF00_FF00), 2.5);
        let po = pen.encode().unwrap();
        // version, type, flags, unit, width, brush
        assert_eq!(po.len(), 4 + 4 + 12 + 12);
        assert_eq!(&po.data()[8..12], &[0, 0, 0, 0]);
        assert_eq!(Pen::parse(po.data()).unwrap(), pen);
    }

    #[test]
    fn test_flags_follow_fields() {
        let optional = PenOptionalData {
            start_cap: Some(LineCapType::Round),
            line_style: Some(LineStyle::Custom),
            dashed_line: Some(DashedLineData::standard(6.0, StandardDash::DashDot)),
            ..PenOptionalData::default()
        };
        assert_eq!(
            optional.flags(),
            PenDataFlags::START_CAP | PenDataFlags::LINE_STYLE | PenDataFlags::DL_DATA
        );
        assert_eq!(PenOptionalData::default().flags(), PenDataFlags::empty());
    }

    #[test]
    fn test_every_optional_field() {
        let optional = PenOptionalData {
            transform: Some(TransformMatrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0)),
            start_cap: Some(LineCapType::Round),
            end_cap: Some(LineCapType::Custom),
            join: Some(LineJoinType::Bevel),
            miter_limit: Some(4.0),
            line_style: Some(LineStyle::Custom),
            dashed_line_cap: Some(DashedLineCapType::Triangle),
            dash_offset: Some(0.5),
            dashed_line: Some(DashedLineData::standard(8.0, StandardDash::Dash)),
            alignment: Some(PenAlignment::Inset),
            compound_line: Some(CompoundLineData {
                widths: vec![0.0, 0.3, 0.7, 1.0],
            }),
            custom_start_cap: None,
            custom_end_cap: Some(CustomLineCap::arrow(2.0, 2.0, true)),
        };
        assert_eq!(optional.flags().bits(), 0x17FF);

        let pen = Pen {
            version: GraphicsVersion::default(),
            pen_data: PenData {
                unit: UnitType::Pixel,
                width: 1.0,
                optional,
            },
            brush: Brush::solid(Argb::from_u32(0xFF00_0000)),
        };
        let po = pen.encode().unwrap();
        assert_eq!(Pen::parse(po.data()).unwrap(), pen);
    }

    #[test]
    fn test_rejects_bad_pens() {
        let mut bytes = Pen::solid(Argb::default(), 1.0).encode().unwrap().into_data();
        bytes[4] = 1;
        assert!(Pen::parse(&bytes).is_err());

        let mut bytes = Pen::solid(Argb::default(), 1.0).encode().unwrap().into_data();
        bytes[9] = 0x20;
        assert!(Pen::parse(&bytes).is_err());

        let bytes = Pen::solid(Argb::default(), 1.0).encode().unwrap().into_data();
        assert!(Pen::parse(&bytes[..bytes.len() - 1]).is_err());
    }
}
