//! Terminal server records.
//!
//! Remote desktop sessions use these two records to resynchronize the whole graphics state and
//! the clip in one step.

use crate::{
    objects::{EmfObject, Palette},
    records::{
        decode_rects, encode_rects,
        flags::{FLAG_PALETTE, FLAG_TS_COMPRESSED, FLAG_VGA, TS_CLIP_COUNT_MASK},
        payload_of, EmfRecord, RecordHeader,
    },
    serial::{Field, Parser},
    types::{
        narrow_u8, CompositingMode, CompositingQuality, FilterType, PixelOffsetMode, RectF,
        RecordType, SmoothingMode, TextRenderingHint, TransformMatrix,
    },
    Error, Result,
};

/// Complete graphics state of a terminal server session.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTsGraphicsRecord {
    /// The palette is the standard VGA palette
    pub vga: bool,
    /// Smoothing of lines and curves
    pub anti_alias_mode: SmoothingMode,
    /// Quality of text rendering
    pub text_rendering_hint: TextRenderingHint,
    /// Blend or overwrite
    pub compositing_mode: CompositingMode,
    /// Quality of alpha blending
    pub compositing_quality: CompositingQuality,
    /// Horizontal rendering origin
    pub origin_x: i16,
    /// Vertical rendering origin
    pub origin_y: i16,
    /// Gamma correction of text
    pub text_contrast: u16,
    /// Filter used when images are scaled
    pub filter: FilterType,
    /// Pixel offset mode
    pub pixel_offset: PixelOffsetMode,
    /// World to device transform
    pub world_to_device: TransformMatrix,
    /// Palette, present when the `T` flag is set
    pub palette: Option<Palette>,
}

impl EmfRecord for SetTsGraphicsRecord {
    const TYPE: RecordType = RecordType::SetTsGraphics;

    fn flags(&self) -> Result<u16> {
        let mut flags = 0;
        if self.vga {
            flags |= FLAG_VGA;
        }
        if self.palette.is_some() {
            flags |= FLAG_PALETTE;
        }
        Ok(flags)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let palette = match &self.palette {
            Some(palette) => palette.encode()?.into_data(),
            None => Vec::new(),
        };
        payload_of(&[
            Field::U8(narrow_u8("smoothing mode", self.anti_alias_mode.value())?),
            Field::U8(narrow_u8("text rendering hint", self.text_rendering_hint.value())?),
            Field::U8(narrow_u8("compositing mode", self.compositing_mode.value())?),
            Field::U8(narrow_u8("compositing quality", self.compositing_quality.value())?),
            Field::I16(self.origin_x),
            Field::I16(self.origin_y),
            Field::U16(self.text_contrast),
            Field::U8(narrow_u8("filter type", self.filter.value())?),
            Field::U8(narrow_u8("pixel offset mode", self.pixel_offset.value())?),
            Field::Item(&self.world_to_device),
            Field::Bytes(&palette),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let anti_alias_mode = SmoothingMode::try_from(u32::from(parser.read_le::<u8>()?))?;
        let text_rendering_hint = TextRenderingHint::try_from(u32::from(parser.read_le::<u8>()?))?;
        let compositing_mode = CompositingMode::try_from(u32::from(parser.read_le::<u8>()?))?;
        let compositing_quality = CompositingQuality::try_from(u32::from(parser.read_le::<u8>()?))?;
        let origin_x = parser.read_le()?;
        let origin_y = parser.read_le()?;
        let text_contrast = parser.read_le()?;
        let filter = FilterType::try_from(u32::from(parser.read_le::<u8>()?))?;
        let pixel_offset = PixelOffsetMode::try_from(u32::from(parser.read_le::<u8>()?))?;
        let world_to_device = parser.read()?;
        let palette = if header.flags & FLAG_PALETTE != 0 {
            Some(Palette::decode(parser)?)
        } else {
            None
        };

        Ok(SetTsGraphicsRecord {
            vga: header.flags & FLAG_VGA != 0,
            anti_alias_mode,
            text_rendering_hint,
            compositing_mode,
            compositing_quality,
            origin_x,
            origin_y,
            text_contrast,
            filter,
            pixel_offset,
            world_to_device,
            palette,
        })
    }
}

/// Clip of a terminal server session as a list of rectangles.
///
/// The rectangle count lives in bits 0-14 of the flags word, so at most 32767 rectangles fit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetTsClipRecord {
    /// Clipping rectangles
    pub rects: Vec<RectF>,
    /// Store the rectangles as 16-bit integers
    pub compressed: bool,
}

impl EmfRecord for SetTsClipRecord {
    const TYPE: RecordType = RecordType::SetTsClip;

    fn flags(&self) -> Result<u16> {
        let count = u16::try_from(self.rects.len())
            .ok()
            .filter(|count| *count <= TS_CLIP_COUNT_MASK)
            .ok_or_else(|| Error::OutOfRange {
                what: "terminal server clip rectangle count",
                value: i64::try_from(self.rects.len()).unwrap_or(i64::MAX),
            })?;
        let compressed = if self.compressed { FLAG_TS_COMPRESSED } else { 0 };
        Ok(count | compressed)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        encode_rects(&self.rects, self.compressed)
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let compressed = header.flags & FLAG_TS_COMPRESSED != 0;
        let count = usize::from(header.flags & TS_CLIP_COUNT_MASK);
        Ok(SetTsClipRecord {
            rects: decode_rects(parser, count, compressed)?,
            compressed,
        })
    }
}
