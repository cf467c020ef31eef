//! Brush objects and the solid, hatch and texture payloads.

use crate::{
    objects::{
        gradient::read_transform, EmfObject, GraphicsVersion, Image, LinearGradientBrushData,
        PathGradientBrushData,
    },
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{Argb, BrushDataFlags, BrushType, HatchStyle, TransformMatrix, WrapMode},
    Result,
};

/// Hatch brush payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HatchBrushData {
    /// Pattern
    pub style: HatchStyle,
    /// Line color
    pub fore_color: Argb,
    /// Background color
    pub back_color: Argb,
}

impl EmfObject for HatchBrushData {
    const OID: Oid = Oid::HatchBrushData;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(
            Self::OID,
            &[
                Field::U32(self.style.value()),
                Field::Item(&self.fore_color),
                Field::Item(&self.back_color),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(HatchBrushData {
            style: HatchStyle::try_from(parser.read_le::<u32>()?)?,
            fore_color: parser.read()?,
            back_color: parser.read()?,
        })
    }
}

/// Texture brush payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBrushData {
    /// Gamma correction and transform exemption bits
    pub flags: BrushDataFlags,
    /// Tiling behaviour
    pub wrap_mode: WrapMode,
    /// Brush transform
    pub transform: Option<TransformMatrix>,
    /// Texture image, absent when the producer left it out
    pub image: Option<Image>,
}

impl TextureBrushData {
    /// The flags word written for this payload.
    #[must_use]
    pub fn data_flags(&self) -> BrushDataFlags {
        let mut flags = self.flags
            & (BrushDataFlags::IS_GAMMA_CORRECTED | BrushDataFlags::DO_NOT_TRANSFORM);
        flags.set(BrushDataFlags::TRANSFORM, self.transform.is_some());
        flags
    }
}

impl EmfObject for TextureBrushData {
    const OID: Oid = Oid::TextureBrushData;

    fn encode(&self) -> Result<PseudoObject> {
        let transform = self.transform.map(|t| vec![t]).unwrap_or_default();
        let image = match &self.image {
            Some(image) => image.encode()?.into_data(),
            None => Vec::new(),
        };
        serialize(
            Self::OID,
            &[
                Field::U32(self.data_flags().bits()),
                Field::U32(self.wrap_mode.value()),
                Field::Item(&transform),
                Field::Bytes(&image),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let flags = BrushDataFlags::from_bits_retain(parser.read_le()?);
        let wrap_mode = WrapMode::try_from(parser.read_le::<u32>()?)?;
        let transform = read_transform(parser, flags)?;
        let image = if parser.has_more_data() {
            Some(Image::decode(parser)?)
        } else {
            None
        };
        Ok(TextureBrushData {
            flags: flags & (BrushDataFlags::IS_GAMMA_CORRECTED | BrushDataFlags::DO_NOT_TRANSFORM),
            wrap_mode,
            transform,
            image,
        })
    }
}

/// Payload of a brush object.
#[derive(Debug, Clone, PartialEq)]
pub enum BrushData {
    /// One color
    Solid(Argb),
    /// Hatch pattern
    Hatch(HatchBrushData),
    /// Image texture
    Texture(TextureBrushData),
    /// Gradient from a center point to a boundary
    PathGradient(PathGradientBrushData),
    /// Gradient along a line
    LinearGradient(LinearGradientBrushData),
}

impl BrushData {
    /// Brush kind.
    #[must_use]
    pub fn brush_type(&self) -> BrushType {
        match self {
            BrushData::Solid(_) => BrushType::SolidColor,
            BrushData::Hatch(_) => BrushType::HatchFill,
            BrushData::Texture(_) => BrushType::TextureFill,
            BrushData::PathGradient(_) => BrushType::PathGradient,
            BrushData::LinearGradient(_) => BrushType::LinearGradient,
        }
    }
}

/// A brush object.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Payload
    pub data: BrushData,
}

impl Brush {
    /// A solid color brush.
    #[must_use]
    pub fn solid(color: Argb) -> Self {
        Brush {
            version: GraphicsVersion::default(),
            data: BrushData::Solid(color),
        }
    }
}

impl EmfObject for Brush {
    const OID: Oid = Oid::Brush;

    fn encode(&self) -> Result<PseudoObject> {
        let payload = match &self.data {
            BrushData::Solid(color) => serialize(Oid::SolidBrushData, &[Field::Item(color)])?,
            BrushData::Hatch(data) => data.encode()?,
            BrushData::Texture(data) => data.encode()?,
            BrushData::PathGradient(data) => data.encode()?,
            BrushData::LinearGradient(data) => data.encode()?,
        };
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::U32(self.data.brush_type().value()),
                Field::Bytes(payload.data()),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        let data = match BrushType::try_from(parser.read_le::<u32>()?)? {
            BrushType::SolidColor => BrushData::Solid(parser.read()?),
            BrushType::HatchFill => BrushData::Hatch(HatchBrushData::decode(parser)?),
            BrushType::TextureFill => BrushData::Texture(TextureBrushData::decode(parser)?),
            BrushType::PathGradient => {
                BrushData::PathGradient(PathGradientBrushData::decode(parser)?)
            }
            BrushType::LinearGradient => {
                BrushData::LinearGradient(LinearGradientBrushData::decode(parser)?)
            }
        };
        Ok(Brush { version, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        objects::{Bitmap, ImageData},
        types::RectF,
    };

    #[test]
    fn test_solid_brush() {
        let brush = Brush::solid(Argb::new(0xFF, 0x10, 0x20, 0x30));
        let po = brush.encode().unwrap();
        assert_eq!(po.len(), 12);
        assert_eq!(&po.data()[4..12], &[0, 0, 0, 0, 0x30, 0x20, 0x10, 0xFF]);
        assert_eq!(Brush::parse(po.data()).unwrap(), brush);
    }

    #[test]
    fn test_hatch_brush() {
        let brush = Brush {
            version: GraphicsVersion::default(),
            data: BrushData::Hatch(HatchBrushData {
                style: HatchStyle::DiagonalCross,
                fore_color: Argb::from_u32(0xFF00_0000),
                back_color: Argb::from_u32(0xFFFF_FFFF),
            }),
        };
        let po = brush.encode().unwrap();
        assert_eq!(po.len(), 20);
        assert_eq!(Brush::parse(po.data()).unwrap(), brush);
    }

    #[test]
    fn test_texture_brush() {
        let texture = TextureBrushData {
            flags: BrushDataFlags::IS_GAMMA_CORRECTED,
            wrap_mode: WrapMode::TileFlipXY,
            transform: Some(TransformMatrix::new(1.0, 0.0, 0.0, 1.0, 3.0, 4.0)),
            image: Some(Image {
                version: GraphicsVersion::default(),
                data: ImageData::Bitmap(Bitmap::compressed(1, 1, vec![0xFF, 0xD8])),
            }),
        };
        assert_eq!(texture.data_flags().bits(), 0x82);
        let brush = Brush {
            version: GraphicsVersion::default(),
            data: BrushData::Texture(texture),
        };
        assert_eq!(Brush::parse(brush.encode().unwrap().data()).unwrap(), brush);

        let bare = TextureBrushData {
            flags: BrushDataFlags::empty(),
            wrap_mode: WrapMode::Tile,
            transform: None,
            image: None,
        };
        assert_eq!(bare.encode().unwrap().len(), 8);
        assert_eq!(TextureBrushData::parse(&bare.encode().unwrap().into_data()).unwrap(), bare);
    }

    #[test]
    fn test_linear_gradient_brush() {
        let brush = Brush {
            version: GraphicsVersion::default(),
            data: BrushData::LinearGradient(LinearGradientBrushData::new(
                RectF::new(0.0, 0.0, 10.0, 10.0),
                Argb::from_u32(0xFFFF_0000),
                Argb::from_u32(0xFF00_00FF),
                WrapMode::Tile,
            )),
        };
        assert_eq!(Brush::parse(brush.encode().unwrap().data()).unwrap(), brush);
    }

    #[test]
    fn test_unknown_brush_type() {
        let mut bytes = GraphicsVersion::default().encode().unwrap().into_data();
        bytes.extend_from_slice(&9_u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        assert!(Brush::parse(&bytes).is_err());
        assert!(Brush::parse(&[]).is_err());
    }
}
