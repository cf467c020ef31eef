//! Bit fields of the record flags word.
//!
//! The flags word is read as a little-endian `u16` and its bits are numbered from the least
//! significant end. Several bits are reused with a different meaning by different records, which
//! is why the constants below are named after what they mean and not after their position.
//!
//! | bits   | meaning                                                               |
//! |--------|-----------------------------------------------------------------------|
//! | 15     | brush is a color, object is continued, clip rectangles are 16-bit     |
//! | 14     | coordinates are 16-bit integers                                        |
//! | 13     | post-multiply, winding fill, image effect pending                      |
//! | 12     | path point types are run length encoded                                |
//! | 11     | coordinates are relative                                               |
//! | 10     | line is closed                                                         |
//! | 8..=14 | object type of an object record                                        |
//! | 8..=11 | combine mode of a clip record                                          |
//! | 0..=7  | object table index, or an enumeration value of a state record          |

use crate::{
    serial::Parser,
    types::{Argb, CombineMode, ObjectType},
    Error, Result,
};

pub use crate::path::points::{FLAG_COMPRESSED, FLAG_RELATIVE, FLAG_RLE};

/// The brush reference is an ARGB color, not an object index (`S`).
pub const FLAG_BRUSH_COLOR: u16 = 0x8000;
/// More fragments of this object follow (`C` of the object record).
pub const FLAG_CONTINUED: u16 = 0x8000;
/// SetTSClip rectangles are 16-bit (`C` of the terminal server clip record).
pub const FLAG_TS_COMPRESSED: u16 = 0x8000;
/// Transform is applied after the current one (`A`).
pub const FLAG_POST_MULTIPLY: u16 = 0x2000;
/// Closed curve is filled with the winding rule (`W`).
pub const FLAG_WINDING: u16 = 0x2000;
/// An image effect record precedes this draw (`E`).
pub const FLAG_EFFECT: u16 = 0x2000;
/// Lines are closed into a polygon (`L`).
pub const FLAG_CLOSED: u16 = 0x0400;
/// Terminal server graphics use a VGA palette (`V`).
pub const FLAG_VGA: u16 = 0x0002;
/// Terminal server graphics carry a palette (`T`).
pub const FLAG_PALETTE: u16 = 0x0001;
/// The metafile holds both EMF and EMF+ drawing (`D` of the header record).
pub const FLAG_DUAL: u16 = 0x0001;
/// Anti-aliasing is on (`A` of the anti-alias record).
pub const FLAG_ANTI_ALIAS: u16 = 0x0001;

/// Mask of the object table index.
pub const OBJECT_ID_MASK: u16 = 0x00FF;
/// Largest object table index.
pub const MAX_OBJECT_ID: u32 = 63;
/// Mask of the combine mode of clip records.
pub const COMBINE_MODE_MASK: u16 = 0x0F00;
/// Mask of the object type of object records.
pub const OBJECT_TYPE_MASK: u16 = 0x7F00;
/// Mask of the rectangle count of the terminal server clip record.
pub const TS_CLIP_COUNT_MASK: u16 = 0x7FFF;

/// Check an object table index.
///
/// # Errors
/// Returns [`Error::InvalidObjectId`] for an index above 63.
pub fn check_object_id(id: u32) -> Result<u8> {
    if id > MAX_OBJECT_ID {
        return Err(Error::InvalidObjectId(id));
    }
    u8::try_from(id).map_err(|_| Error::InvalidObjectId(id))
}

/// Object table index stored in the low byte of `flags`.
///
/// # Errors
/// Returns [`Error::InvalidObjectId`] for an index above 63.
pub fn object_id(flags: u16) -> Result<u8> {
    check_object_id(u32::from(flags & OBJECT_ID_MASK))
}

/// Flag bits carrying the object table index `id`.
///
/// # Errors
/// Returns [`Error::InvalidObjectId`] for an index above 63.
pub fn object_id_bits(id: u8) -> Result<u16> {
    check_object_id(u32::from(id)).map(u16::from)
}

/// Combine mode stored in bits 8-11.
///
/// # Errors
/// Returns [`Error::UnknownIdentifier`] for a value outside of [`CombineMode`].
pub fn combine_mode(flags: u16) -> Result<CombineMode> {
    CombineMode::try_from(u32::from((flags & COMBINE_MODE_MASK) >> 8))
}

/// Flag bits carrying `mode`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn combine_mode_bits(mode: CombineMode) -> u16 {
    ((mode.value() as u16) << 8) & COMBINE_MODE_MASK
}

/// Object type stored in bits 8-14.
///
/// # Errors
/// Returns [`Error::UnknownIdentifier`] for a value outside of [`ObjectType`].
pub fn object_type(flags: u16) -> Result<ObjectType> {
    ObjectType::try_from(u32::from((flags & OBJECT_TYPE_MASK) >> 8))
}

/// Flag bits carrying `kind`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn object_type_bits(kind: ObjectType) -> u16 {
    ((kind.value() as u16) << 8) & OBJECT_TYPE_MASK
}

/// The brush a fill record uses: an inline color or a brush from the object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrushRef {
    /// Fill with a solid color
    Color(Argb),
    /// Fill with the brush at this object table index
    Object(u32),
}

impl BrushRef {
    /// Flag bits announcing this reference.
    #[must_use]
    pub fn flag_bits(&self) -> u16 {
        match self {
            BrushRef::Color(_) => FLAG_BRUSH_COLOR,
            BrushRef::Object(_) => 0,
        }
    }

    /// The 32-bit value stored in the record.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] for an object index above 63.
    pub fn to_u32(&self) -> Result<u32> {
        match self {
            BrushRef::Color(color) => Ok(color.to_u32()),
            BrushRef::Object(id) => check_object_id(*id).map(u32::from),
        }
    }

    /// Interpret a stored value according to the record flags.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] for an object index above 63.
    pub fn from_u32(flags: u16, value: u32) -> Result<Self> {
        if flags & FLAG_BRUSH_COLOR != 0 {
            Ok(BrushRef::Color(Argb::from_u32(value)))
        } else {
            check_object_id(value).map(|id| BrushRef::Object(u32::from(id)))
        }
    }

    /// Read the stored value at the cursor.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the value is truncated and the errors of
    /// [`BrushRef::from_u32`].
    pub fn read(flags: u16, parser: &mut Parser<'_>) -> Result<Self> {
        Self::from_u32(flags, parser.read_le()?)
    }
}

impl From<Argb> for BrushRef {
    fn from(color: Argb) -> Self {
        BrushRef::Color(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_bound() {
        assert_eq!(check_object_id(63).unwrap(), 63);
        assert!(matches!(check_object_id(64), Err(Error::InvalidObjectId(64))));
        assert_eq!(object_id(0x8005).unwrap(), 5);
        assert!(object_id(0x00FF).is_err());
    }

    #[test]
    fn test_packed_fields() {
        let flags = combine_mode_bits(CombineMode::Exclude) | 7;
        assert_eq!(flags, 0x0407);
        assert_eq!(combine_mode(flags).unwrap(), CombineMode::Exclude);
        assert!(combine_mode(0x0F00).is_err());

        let flags = FLAG_CONTINUED | object_type_bits(ObjectType::Image) | 3;
        assert_eq!(flags, 0x8503);
        assert_eq!(object_type(flags).unwrap(), ObjectType::Image);
        assert_eq!(object_id(flags).unwrap(), 3);
    }

    #[test]
    fn test_brush_ref() {
        let red = BrushRef::from(Argb::new(0xFF, 0xFF, 0, 0));
        assert_eq!(red.flag_bits(), FLAG_BRUSH_COLOR);
        let stored = red.to_u32().unwrap();
        assert_eq!(BrushRef::from_u32(FLAG_BRUSH_COLOR, stored).unwrap(), red);

        let table = BrushRef::Object(12);
        assert_eq!(table.flag_bits(), 0);
        assert_eq!(BrushRef::from_u32(0, table.to_u32().unwrap()).unwrap(), table);

        assert!(BrushRef::Object(64).to_u32().is_err());
        assert!(BrushRef::from_u32(0, 0xFF00_0000).is_err());
    }
}
