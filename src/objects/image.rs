//! Image objects: bitmaps, metafiles and image attributes.
//!
//! Bitmap pixel data carries no length of its own, it runs to the end of the enclosing object.
//! Image decoders therefore consume everything that is left in their parser.

use crate::{
    objects::{count_u32, EmfObject, GraphicsVersion, Palette},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{
        Argb, BitmapDataType, ImageDataType, MetafileDataType, ObjectClamp, PixelFormat, WrapMode,
    },
    Error, Result,
};

/// Pixel storage of a bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitmapPayload {
    /// Raw pixel rows, preceded by a palette for indexed formats
    Pixel {
        /// Palette, present exactly when the pixel format is indexed
        palette: Option<Palette>,
        /// Pixel rows, `stride` bytes each
        pixels: Vec<u8>,
    },
    /// A complete PNG, JPEG, GIF, TIFF or BMP stream
    Compressed(Vec<u8>),
}

/// A bitmap image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Bytes per row, a multiple of 4
    pub stride: i32,
    /// Pixel format
    pub pixel_format: PixelFormat,
    /// Pixel storage
    pub payload: BitmapPayload,
}

impl Bitmap {
    /// An uncompressed bitmap.
    ///
    /// # Errors
    /// Returns [`Error::Schema`] if a palette is given for a non-indexed format or missing for an
    /// indexed one.
    pub fn pixels(
        width: i32,
        height: i32,
        stride: i32,
        pixel_format: PixelFormat,
        palette: Option<Palette>,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        if palette.is_some() != pixel_format.is_indexed() {
            return Err(Error::Schema(format!(
                "pixel format {:?} and palette presence disagree",
                pixel_format
            )));
        }
        Ok(Bitmap {
            width,
            height,
            stride,
            pixel_format,
            payload: BitmapPayload::Pixel { palette, pixels },
        })
    }

    /// A bitmap holding a compressed image stream.
    #[must_use]
    pub fn compressed(width: i32, height: i32, data: Vec<u8>) -> Self {
        Bitmap {
            width,
            height,
            stride: 0,
            pixel_format: PixelFormat::Undefined,
            payload: BitmapPayload::Compressed(data),
        }
    }

    /// Storage kind.
    #[must_use]
    pub fn data_type(&self) -> BitmapDataType {
        match self.payload {
            BitmapPayload::Pixel { .. } => BitmapDataType::Pixel,
            BitmapPayload::Compressed(_) => BitmapDataType::Compressed,
        }
    }
}

impl EmfObject for Bitmap {
    const OID: Oid = Oid::Bitmap;

    fn encode(&self) -> Result<PseudoObject> {
        let mut data = Vec::new();
        match &self.payload {
            BitmapPayload::Pixel { palette, pixels } => {
                if palette.is_some() != self.pixel_format.is_indexed() {
                    return Err(Error::Schema(format!(
                        "pixel format {:?} and palette presence disagree",
                        self.pixel_format
                    )));
                }
                if let Some(palette) = palette {
                    data.extend_from_slice(palette.encode()?.data());
                }
                data.extend_from_slice(pixels);
            }
            BitmapPayload::Compressed(bytes) => data.extend_from_slice(bytes),
        }

        serialize(
            Self::OID,
            &[
                Field::I32(self.width),
                Field::I32(self.height),
                Field::I32(self.stride),
                Field::U32(self.pixel_format.value()),
                Field::U32(self.data_type().value()),
                Field::Bytes(&data),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let width = parser.read_le()?;
        let height = parser.read_le()?;
        let stride = parser.read_le()?;
        let pixel_format = PixelFormat::try_from(parser.read_le::<u32>()?)?;
        let payload = match BitmapDataType::try_from(parser.read_le::<u32>()?)? {
            BitmapDataType::Pixel => {
                let palette = if pixel_format.is_indexed() {
                    Some(Palette::decode(parser)?)
                } else {
                    None
                };
                BitmapPayload::Pixel {
                    palette,
                    pixels: parser.read_rest().to_vec(),
                }
            }
            BitmapDataType::Compressed => BitmapPayload::Compressed(parser.read_rest().to_vec()),
        };

        Ok(Bitmap {
            width,
            height,
            stride,
            pixel_format,
            payload,
        })
    }
}

/// An embedded metafile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metafile {
    /// Kind of metafile
    pub kind: MetafileDataType,
    /// The metafile bytes
    pub data: Vec<u8>,
}

impl EmfObject for Metafile {
    const OID: Oid = Oid::Metafile;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(
            Self::OID,
            &[
                Field::U32(self.kind.value()),
                Field::U32(count_u32("metafile size", self.data.len())?),
                Field::Bytes(&self.data),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let kind = MetafileDataType::try_from(parser.read_le::<u32>()?)?;
        let size: u32 = parser.read_le()?;
        let size = usize::try_from(size).map_err(|_| out_of_bounds_error!())?;
        Ok(Metafile {
            kind,
            data: parser.read_bytes(size)?.to_vec(),
        })
    }
}

/// Contents of an image object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
    /// A bitmap
    Bitmap(Bitmap),
    /// A metafile
    Metafile(Metafile),
}

impl ImageData {
    /// Image kind.
    #[must_use]
    pub fn data_type(&self) -> ImageDataType {
        match self {
            ImageData::Bitmap(_) => ImageDataType::Bitmap,
            ImageData::Metafile(_) => ImageDataType::Metafile,
        }
    }
}

/// An image object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Contents
    pub data: ImageData,
}

impl EmfObject for Image {
    const OID: Oid = Oid::Image;

    fn encode(&self) -> Result<PseudoObject> {
        let data = match &self.data {
            ImageData::Bitmap(bitmap) => bitmap.encode()?,
            ImageData::Metafile(metafile) => metafile.encode()?,
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
        let data = match ImageDataType::try_from(parser.read_le::<u32>()?)? {
            ImageDataType::Bitmap => ImageData::Bitmap(Bitmap::decode(parser)?),
            ImageDataType::Metafile => ImageData::Metafile(Metafile::decode(parser)?),
            ImageDataType::Unknown => {
                return Err(malformed_error!("Image object of unknown type"));
            }
        };
        Ok(Image { version, data })
    }
}

/// Image attributes object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageAttributes {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Tiling behaviour
    pub wrap_mode: WrapMode,
    /// Color outside the image when clamping
    pub clamp_color: Argb,
    /// Clamp against the rectangle or the bitmap
    pub object_clamp: ObjectClamp,
}

impl EmfObject for ImageAttributes {
    const OID: Oid = Oid::ImageAttributes;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::Zero(4),
                Field::U32(self.wrap_mode.value()),
                Field::Item(&self.clamp_color),
                Field::U32(self.object_clamp.value()),
                Field::Zero(4),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        parser.advance_by(4)?;
        let wrap_mode = WrapMode::try_from(parser.read_le::<u32>()?)?;
        let clamp_color = parser.read()?;
        let object_clamp = ObjectClamp::try_from(parser.read_le::<u32>()?)?;
        parser.advance_by(4)?;
        Ok(ImageAttributes {
            version,
            wrap_mode,
            clamp_color,
            object_clamp,
        })
    }
}

/// Serialize a compressed image stream on its own.
///
/// # Errors
/// Returns [`Error::Schema`] for an empty stream.
pub fn encode_compressed_image(data: &[u8]) -> Result<PseudoObject> {
    if data.is_empty() {
        return Err(Error::Schema("empty compressed image".to_string()));
    }
    serialize(Oid::CompressedImage, &[Field::Bytes(data)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaletteStyle;

    #[test]
    fn test_indexed_bitmap() {
        let palette = Palette {
            style: PaletteStyle::empty(),
            entries: vec![Argb::from_u32(0xFF00_0000), Argb::from_u32(0xFFFF_FFFF)],
        };
        let bitmap = Bitmap::pixels(
            2,
            2,
            4,
            PixelFormat::Indexed1bpp,
            Some(palette),
            vec![0x80, 0, 0, 0, 0x40, 0, 0, 0],
        )
        .unwrap();
        let image = Image {
            version: GraphicsVersion::default(),
            data: ImageData::Bitmap(bitmap),
        };

        let po = image.encode().unwrap();
        assert_eq!(po.len(), 8 + 20 + 16 + 8);
        assert_eq!(Image::parse(po.data()).unwrap(), image);
    }

    #[test]
    fn test_palette_mismatch() {
        let palette = Some(Palette::default());
        assert!(Bitmap::pixels(1, 1, 4, PixelFormat::Argb32bpp, palette, vec![0; 4]).is_err());
        assert!(Bitmap::pixels(1, 1, 4, PixelFormat::Indexed8bpp, None, vec![0; 4]).is_err());
    }

    #[test]
    fn test_compressed_and_metafile() {
        let png = Image {
            version: GraphicsVersion::default(),
            data: ImageData::Bitmap(Bitmap::compressed(16, 16, b"\x89PNG\r\n\x1a\n".to_vec())),
        };
        assert_eq!(Image::parse(png.encode().unwrap().data()).unwrap(), png);

        let emf = Image {
            version: GraphicsVersion::default(),
            data: ImageData::Metafile(Metafile {
                kind: MetafileDataType::Emf,
                data: vec![1, 2, 3],
            }),
        };
        let po = emf.encode().unwrap();
        assert_eq!(po.len(), 8 + 8 + 3);
        assert_eq!(Image::parse(po.data()).unwrap(), emf);
        assert!(Image::parse(&po.data()[..po.len() - 1]).is_err());
    }

    #[test]
    fn test_image_attributes() {
        let attrs = ImageAttributes {
            version: GraphicsVersion::default(),
            wrap_mode: WrapMode::Clamp,
            clamp_color: Argb::from_u32(0x8000_00FF),
            object_clamp: ObjectClamp::Bitmap,
        };
        let po = attrs.encode().unwrap();
        assert_eq!(po.len(), 24);
        assert_eq!(ImageAttributes::parse(po.data()).unwrap(), attrs);
    }

    #[test]
    fn test_unknown_image_type() {
        let mut bytes = GraphicsVersion::default().encode().unwrap().into_data();
        bytes.extend_from_slice(&0_u32.to_le_bytes());
        assert!(Image::parse(&bytes).is_err());
        assert!(encode_compressed_image(&[]).is_err());
    }
}
