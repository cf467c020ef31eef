//! Clipping region records.
//!
//! The combining records keep a [`CombineMode`] in bits 8-11 of the flags word that says how the
//! new shape is merged with the current clip.

use crate::{
    records::{
        flags::{combine_mode, combine_mode_bits, object_id, object_id_bits},
        payload_of, EmfRecord, RecordHeader,
    },
    serial::{Field, Parser},
    types::{CombineMode, RectF, RecordType},
    Result,
};

empty_record!(
    /// Reset the clip to the infinite region.
    ResetClipRecord => ResetClip
);

/// Combine the clip with a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetClipRectRecord {
    /// How the rectangle is combined
    pub mode: CombineMode,
    /// Clipping rectangle
    pub rect: RectF,
}

impl EmfRecord for SetClipRectRecord {
    const TYPE: RecordType = RecordType::SetClipRect;

    fn flags(&self) -> Result<u16> {
        Ok(combine_mode_bits(self.mode))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::Item(&self.rect)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(SetClipRectRecord {
            mode: combine_mode(header.flags)?,
            rect: parser.read()?,
        })
    }
}

macro_rules! object_clip_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident, $id:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            /// Object table index of the clipping shape
            pub $id: u8,
            /// How the shape is combined
            pub mode: CombineMode,
        }

        impl EmfRecord for $name {
            const TYPE: RecordType = RecordType::$kind;

            fn flags(&self) -> Result<u16> {
                Ok(combine_mode_bits(self.mode) | object_id_bits(self.$id)?)
            }

            fn payload(&self) -> Result<Vec<u8>> {
                Ok(Vec::new())
            }

            fn decode(header: &RecordHeader, _parser: &mut Parser<'_>) -> Result<Self> {
                Ok($name {
                    $id: object_id(header.flags)?,
                    mode: combine_mode(header.flags)?,
                })
            }
        }
    };
}

object_clip_record!(
    /// Combine the clip with a path object.
    SetClipPathRecord => SetClipPath, path_id
);

object_clip_record!(
    /// Combine the clip with a region object.
    SetClipRegionRecord => SetClipRegion, region_id
);

/// Translate the clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetClipRecord {
    /// Horizontal offset
    pub dx: f32,
    /// Vertical offset
    pub dy: f32,
}

impl EmfRecord for OffsetClipRecord {
    const TYPE: RecordType = RecordType::OffsetClip;

    fn flags(&self) -> Result<u16> {
        Ok(0)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::F32(self.dx), Field::F32(self.dy)])
    }

    fn decode(_header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(OffsetClipRecord {
            dx: parser.read_le()?,
            dy: parser.read_le()?,
        })
    }
}
