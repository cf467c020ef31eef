//! Custom line caps.

use crate::{
    objects::{decode_sized, encode_sized, EmfObject, GraphicsVersion, PathObject},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{CustomLineCapDataFlags, CustomLineCapDataType, LineCapType, LineJoinType, PointF},
    Result,
};

/// Stroke settings shared by both kinds of custom cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapStroke {
    /// Cap at the start of the cap outline
    pub start_cap: LineCapType,
    /// Cap at the end of the cap outline
    pub end_cap: LineCapType,
    /// Join of the cap outline
    pub join: LineJoinType,
    /// Miter limit
    pub miter_limit: f32,
    /// Scale applied relative to the pen width
    pub width_scale: f32,
}

impl Default for CapStroke {
    fn default() -> Self {
        CapStroke {
            start_cap: LineCapType::Flat,
            end_cap: LineCapType::Flat,
            join: LineJoinType::Miter,
            miter_limit: 10.0,
            width_scale: 1.0,
        }
    }
}

impl CapStroke {
    fn fields(&self) -> [Field<'static>; 5] {
        [
            Field::U32(self.start_cap.value()),
            Field::U32(self.end_cap.value()),
            Field::U32(self.join.value()),
            Field::F32(self.miter_limit),
            Field::F32(self.width_scale),
        ]
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(CapStroke {
            start_cap: LineCapType::try_from(parser.read_le::<u32>()?)?,
            end_cap: LineCapType::try_from(parser.read_le::<u32>()?)?,
            join: LineJoinType::try_from(parser.read_le::<u32>()?)?,
            miter_limit: parser.read_le()?,
            width_scale: parser.read_le()?,
        })
    }
}

/// Adjustable arrow cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomLineCapArrowData {
    /// Arrow width, multiplied by the pen width
    pub width: f32,
    /// Arrow length, multiplied by the pen width
    pub height: f32,
    /// Inset of the base of the arrow
    pub middle_inset: f32,
    /// Fill the arrow rather than outlining it
    pub fill_state: bool,
    /// Outline stroke
    pub stroke: CapStroke,
}

impl EmfObject for CustomLineCapArrowData {
    const OID: Oid = Oid::CustomLineCapArrowData;

    fn encode(&self) -> Result<PseudoObject> {
        let stroke = self.stroke.fields();
        let mut fields = vec![
            Field::F32(self.width),
            Field::F32(self.height),
            Field::F32(self.middle_inset),
            Field::U32(u32::from(self.fill_state)),
        ];
        fields.extend(stroke);
        // Both hot spots are always 0,0.
        fields.push(Field::Zero(16));
        serialize(Self::OID, &fields)
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let width = parser.read_le()?;
        let height = parser.read_le()?;
        let middle_inset = parser.read_le()?;
        let fill_state = parser.read_le::<u32>()? != 0;
        let stroke = CapStroke::decode(parser)?;
        parser.advance_by(16)?;
        Ok(CustomLineCapArrowData {
            width,
            height,
            middle_inset,
            fill_state,
            stroke,
        })
    }
}

/// Path based cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomLineCapData {
    /// Cap the custom cap is based on
    pub base_cap: LineCapType,
    /// Distance between the cap and the end of the line
    pub base_inset: f32,
    /// Outline stroke
    pub stroke: CapStroke,
    /// Filled outline
    pub fill_path: Option<PathObject>,
    /// Stroked outline
    pub line_path: Option<PathObject>,
}

impl CustomLineCapData {
    /// The flags word written for this cap.
    #[must_use]
    pub fn data_flags(&self) -> CustomLineCapDataFlags {
        let mut flags = CustomLineCapDataFlags::empty();
        flags.set(CustomLineCapDataFlags::FILL_PATH, self.fill_path.is_some());
        flags.set(CustomLineCapDataFlags::LINE_PATH, self.line_path.is_some());
        flags
    }
}

impl EmfObject for CustomLineCapData {
    const OID: Oid = Oid::CustomLineCapData;

    fn encode(&self) -> Result<PseudoObject> {
        let mut optional = Vec::new();
        if let Some(path) = &self.fill_path {
            optional.extend(encode_sized(path)?);
        }
        if let Some(path) = &self.line_path {
            optional.extend(encode_sized(path)?);
        }

        let mut fields = vec![
            Field::U32(self.data_flags().bits()),
            Field::U32(self.base_cap.value()),
            Field::F32(self.base_inset),
        ];
        fields.extend(self.stroke.fields());
        fields.push(Field::Zero(16));
        fields.push(Field::Bytes(&optional));
        serialize(Self::OID, &fields)
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let flags = CustomLineCapDataFlags::from_bits_retain(parser.read_le()?);
        let base_cap = LineCapType::try_from(parser.read_le::<u32>()?)?;
        let base_inset = parser.read_le()?;
        let stroke = CapStroke::decode(parser)?;
        parser.advance_by(16)?;

        let fill_path = flags
            .contains(CustomLineCapDataFlags::FILL_PATH)
            .then(|| decode_sized(parser))
            .transpose()?;
        let line_path = flags
            .contains(CustomLineCapDataFlags::LINE_PATH)
            .then(|| decode_sized(parser))
            .transpose()?;

        Ok(CustomLineCapData {
            base_cap,
            base_inset,
            stroke,
            fill_path,
            line_path,
        })
    }
}

/// Contents of a custom line cap.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomLineCapKind {
    /// Path based cap
    Default(CustomLineCapData),
    /// Adjustable arrow cap
    AdjustableArrow(CustomLineCapArrowData),
}

impl CustomLineCapKind {
    /// Cap kind.
    #[must_use]
    pub fn data_type(&self) -> CustomLineCapDataType {
        match self {
            CustomLineCapKind::Default(_) => CustomLineCapDataType::Default,
            CustomLineCapKind::AdjustableArrow(_) => CustomLineCapDataType::AdjustableArrow,
        }
    }
}

/// A custom line cap object.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomLineCap {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Contents
    pub data: CustomLineCapKind,
}

impl CustomLineCap {
    /// An adjustable arrow cap with default stroke settings.
    #[must_use]
    pub fn arrow(width: f32, height: f32, fill: bool) -> Self {
        CustomLineCap {
            version: GraphicsVersion::default(),
            data: CustomLineCapKind::AdjustableArrow(CustomLineCapArrowData {
                width,
                height,
                middle_inset: 0.0,
                fill_state: fill,
                stroke: CapStroke::default(),
            }),
        }
    }

    /// Hot spot of a cap. Always (0, 0) on the wire.
    #[must_use]
    pub fn hot_spot() -> PointF {
        PointF::default()
    }
}

impl EmfObject for CustomLineCap {
    const OID: Oid = Oid::CustomLineCap;

    fn encode(&self) -> Result<PseudoObject> {
        let data = match &self.data {
            CustomLineCapKind::Default(data) => data.encode()?,
            CustomLineCapKind::AdjustableArrow(data) => data.encode()?,
        };
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::U32(self.data.data_type().value()),
                Field::Bytes(data.data()),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        let data = match CustomLineCapDataType::try_from(parser.read_le::<u32>()?)? {
            CustomLineCapDataType::Default => {
                CustomLineCapKind::Default(CustomLineCapData::decode(parser)?)
            }
            CustomLineCapDataType::AdjustableArrow => {
                CustomLineCapKind::AdjustableArrow(CustomLineCapArrowData::decode(parser)?)
            }
        };
        Ok(CustomLineCap { version, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path::PathBuilder, types::PathPointFlags};

    #[test]
    fn test_arrow_cap() {
        let cap = CustomLineCap::arrow(3.0, 4.0, true);
        let po = cap.encode().unwrap();
        assert_eq!(po.len(), 8 + 52);
        assert_eq!(CustomLineCap::parse(po.data()).unwrap(), cap);
    }

    #[test]
    fn test_path_cap() {
        let mut outline = PathBuilder::new();
        outline
            .polygon(
                &[PointF::new(-1.0, 0.0), PointF::new(0.0, 1.0), PointF::new(1.0, 0.0)],
                PathPointFlags::empty(),
            )
            .unwrap();
        let data = CustomLineCapData {
            base_cap: LineCapType::Round,
            base_inset: 0.5,
            stroke: CapStroke::default(),
            fill_path: None,
            line_path: Some(PathObject::new(GraphicsVersion::default(), outline)),
        };
        assert_eq!(data.data_flags(), CustomLineCapDataFlags::LINE_PATH);

        let cap = CustomLineCap {
            version: GraphicsVersion::default(),
            data: CustomLineCapKind::Default(data),
        };
        let po = cap.encode().unwrap();
        // header 8, fixed 52, size 4, path 40
        assert_eq!(po.len(), 8 + 52 + 4 + 40);
        assert_eq!(CustomLineCap::parse(po.data()).unwrap(), cap);
        assert!(CustomLineCap::parse(&po.data()[..po.len() - 4]).is_err());
    }
}
