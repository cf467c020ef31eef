//! Rendering state records.
//!
//! Apart from the rendering origin these records have no payload. The new value lives in the
//! flags word.

use crate::{
    records::{flags::FLAG_ANTI_ALIAS, payload_of, EmfRecord, RecordHeader},
    serial::{Field, Parser},
    types::{
        narrow_u8, CompositingMode, CompositingQuality, InterpolationMode, PixelOffsetMode,
        RecordType, SmoothingMode, TextRenderingHint,
    },
    Error, Result,
};

/// Largest text contrast, the value occupies 12 bits.
pub const MAX_TEXT_CONTRAST: u16 = 0x0FFF;

/// Origin of hatch brushes and dither patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetRenderingOriginRecord {
    /// Horizontal origin in device units
    pub x: i32,
    /// Vertical origin in device units
    pub y: i32,
}

impl EmfRecord for SetRenderingOriginRecord {
    const TYPE: RecordType = RecordType::SetRenderingOrigin;

    fn flags(&self) -> Result<u16> {
        Ok(0)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::I32(self.x), Field::I32(self.y)])
    }

    fn decode(_header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(SetRenderingOriginRecord {
            x: parser.read_le()?,
            y: parser.read_le()?,
        })
    }
}

/// Smoothing of lines and curves.
///
/// The mode sits in bits 1-7 and the anti-alias switch in bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetAntiAliasModeRecord {
    /// Smoothing mode
    pub mode: SmoothingMode,
    /// Anti-aliasing is on
    pub anti_alias: bool,
}

impl EmfRecord for SetAntiAliasModeRecord {
    const TYPE: RecordType = RecordType::SetAntiAliasMode;

    fn flags(&self) -> Result<u16> {
        let mode = u16::from(narrow_u8("smoothing mode", self.mode.value())?);
        if mode > 0x7F {
            return Err(Error::OutOfRange {
                what: "smoothing mode",
                value: i64::from(mode),
            });
        }
        let anti_alias = if self.anti_alias { FLAG_ANTI_ALIAS } else { 0 };
        Ok((mode << 1) | anti_alias)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn decode(header: &RecordHeader, _parser: &mut Parser<'_>) -> Result<Self> {
        Ok(SetAntiAliasModeRecord {
            mode: SmoothingMode::try_from(u32::from((header.flags >> 1) & 0x7F))?,
            anti_alias: header.flags & FLAG_ANTI_ALIAS != 0,
        })
    }
}

/// Gamma correction applied to anti-aliased text, in thousandths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetTextContrastRecord {
    /// Contrast, 0 to 4095 on the wire
    pub contrast: u16,
}

impl EmfRecord for SetTextContrastRecord {
    const TYPE: RecordType = RecordType::SetTextContrast;

    fn flags(&self) -> Result<u16> {
        if self.contrast > MAX_TEXT_CONTRAST {
            return Err(Error::OutOfRange {
                what: "text contrast",
                value: i64::from(self.contrast),
            });
        }
        Ok(self.contrast)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn decode(header: &RecordHeader, _parser: &mut Parser<'_>) -> Result<Self> {
        Ok(SetTextContrastRecord {
            contrast: header.flags & MAX_TEXT_CONTRAST,
        })
    }
}

macro_rules! mode_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident, $mode:ty, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            /// The new mode, stored in the low byte of the flags
            pub mode: $mode,
        }

        impl EmfRecord for $name {
            const TYPE: RecordType = RecordType::$kind;

            fn flags(&self) -> Result<u16> {
                narrow_u8($what, self.mode.value()).map(u16::from)
            }

            fn payload(&self) -> Result<Vec<u8>> {
                Ok(Vec::new())
            }

            fn decode(header: &RecordHeader, _parser: &mut Parser<'_>) -> Result<Self> {
                Ok($name {
                    mode: <$mode>::try_from(u32::from(header.flags & 0x00FF))?,
                })
            }
        }

        impl From<$mode> for $name {
            fn from(mode: $mode) -> Self {
                $name { mode }
            }
        }
    };
}

mode_record!(
    /// Quality of text rendering.
    SetTextRenderingHintRecord => SetTextRenderingHint, TextRenderingHint, "text rendering hint"
);

mode_record!(
    /// Interpolation used when images are scaled or rotated.
    SetInterpolationModeRecord => SetInterpolationMode, InterpolationMode, "interpolation mode"
);

mode_record!(
    /// Pixel offset used while rendering.
    SetPixelOffsetModeRecord => SetPixelOffsetMode, PixelOffsetMode, "pixel offset mode"
);

mode_record!(
    /// Whether drawing blends with or overwrites the background.
    SetCompositingModeRecord => SetCompositingMode, CompositingMode, "compositing mode"
);

mode_record!(
    /// Quality of alpha blending.
    SetCompositingQualityRecord => SetCompositingQuality, CompositingQuality, "compositing quality"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_origin() {
        let record = SetRenderingOriginRecord { x: -5, y: 7 };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 20);
        assert_eq!(&po.data()[12..16], &(-5_i32).to_le_bytes());
        assert_eq!(SetRenderingOriginRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_anti_alias_bits() {
        let record = SetAntiAliasModeRecord {
            mode: SmoothingMode::AntiAlias8x8,
            anti_alias: true,
        };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 12);
        let flags = u16::from_le_bytes([po.data()[2], po.data()[3]]);
        assert_eq!(flags, ((SmoothingMode::AntiAlias8x8.value() as u16) << 1) | 1);
        assert_eq!(SetAntiAliasModeRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_text_contrast_range() {
        let record = SetTextContrastRecord { contrast: 1200 };
        let po = record.encode().unwrap();
        assert_eq!(&po.data()[2..4], &1200_u16.to_le_bytes());
        assert_eq!(SetTextContrastRecord::parse(po.data()).unwrap(), record);
        assert!(SetTextContrastRecord { contrast: 0x1000 }.encode().is_err());
    }

    #[test]
    fn test_mode_records() {
        let record = SetCompositingQualityRecord::from(CompositingQuality::HighQuality);
        let po = record.encode().unwrap();
        assert_eq!(po.data()[2], CompositingQuality::HighQuality.value() as u8);
        assert_eq!(SetCompositingQualityRecord::parse(po.data()).unwrap(), record);

        let mut bytes = SetInterpolationModeRecord::from(InterpolationMode::Bilinear)
            .encode()
            .unwrap()
            .into_data();
        bytes[2] = 0xEE;
        assert!(matches!(
            SetInterpolationModeRecord::parse(&bytes),
            Err(Error::UnknownIdentifier(0xEE))
        ));
    }
}
