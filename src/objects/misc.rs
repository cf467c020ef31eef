//! Small objects shared by several payloads.

use crate::{
    objects::{count_u32, read_count, EmfObject},
    path::pointr,
    pseudo::{Oid, PseudoObject},
    serial::{io::push_le, serialize, Field, Parser, Wire},
    types::{Argb, GraphicsVersionNumber, PaletteStyle, Rect16, RectF},
    Result,
};

const SIGNATURE: u32 = 0xDBC01;
const SIGNATURE_SHIFT: u32 = 12;
const VERSION_MASK: u32 = 0x0FFF;

/// Graphics version word: a 20-bit signature above a 12-bit version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphicsVersion(pub u32);

impl GraphicsVersion {
    /// Version word for the given GDI+ version.
    #[must_use]
    pub fn new(version: GraphicsVersionNumber) -> Self {
        GraphicsVersion((SIGNATURE << SIGNATURE_SHIFT) | version.value())
    }

    /// The 20-bit signature.
    #[must_use]
    pub fn signature(self) -> u32 {
        self.0 >> SIGNATURE_SHIFT
    }

    /// The version number, if it is a known one.
    #[must_use]
    pub fn version_number(self) -> Option<GraphicsVersionNumber> {
        GraphicsVersionNumber::try_from(self.0 & VERSION_MASK).ok()
    }

    /// Returns `true` if the signature is 0xDBC01 and the version number is known.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.signature() == SIGNATURE && self.version_number().is_some()
    }
}

impl Default for GraphicsVersion {
    fn default() -> Self {
        GraphicsVersion::new(GraphicsVersionNumber::V1_1)
    }
}

impl Wire for GraphicsVersion {
    const SIZE: usize = 4;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        // Producers are sloppy with the signature, keep whatever is there.
        Ok(GraphicsVersion(parser.read_le()?))
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.0);
    }
}

impl_encode!(GraphicsVersion);

impl EmfObject for GraphicsVersion {
    const OID: Oid = Oid::GraphicsVersion;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(Self::OID, &[Field::Item(self)])
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        parser.read()
    }
}

const SUBLANG_SHIFT: u16 = 10;
const SUBLANG_MASK: u16 = 0x3F;
const PRIMARY_MASK: u16 = 0x03FF;

/// Language identifier: a primary language (10 bits) and a sublanguage (6 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LanguageIdentifier {
    /// Sublanguage id
    pub sub_language: u8,
    /// Primary language id
    pub primary_language: u16,
}

impl LanguageIdentifier {
    /// Language neutral.
    pub const NEUTRAL: LanguageIdentifier = LanguageIdentifier {
        sub_language: 0,
        primary_language: 0,
    };

    /// Build an identifier, masking each part to its width.
    #[must_use]
    pub fn new(sub_language: u8, primary_language: u16) -> Self {
        LanguageIdentifier {
            sub_language: sub_language & 0x3F,
            primary_language: primary_language & PRIMARY_MASK,
        }
    }

    /// The packed 16-bit value.
    #[must_use]
    pub fn to_u16(self) -> u16 {
        ((u16::from(self.sub_language) & SUBLANG_MASK) << SUBLANG_SHIFT)
            | (self.primary_language & PRIMARY_MASK)
    }

    /// Unpack a 16-bit value.
    #[must_use]
    pub fn from_u16(value: u16) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let sub_language = ((value >> SUBLANG_SHIFT) & SUBLANG_MASK) as u8;
        LanguageIdentifier {
            sub_language,
            primary_language: value & PRIMARY_MASK,
        }
    }
}

impl Wire for LanguageIdentifier {
    const SIZE: usize = 4;

    // Stored in a 32-bit slot, the upper half is unused.
    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        let value: u32 = parser.read_le()?;
        #[allow(clippy::cast_possible_truncation)]
        let value = value as u16;
        Ok(LanguageIdentifier::from_u16(value))
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, u32::from(self.to_u16()));
    }
}

impl_encode!(LanguageIdentifier);

impl EmfObject for LanguageIdentifier {
    const OID: Oid = Oid::LanguageIdentifier;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(Self::OID, &[Field::Item(self)])
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        parser.read()
    }
}

/// A color palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    /// Palette style
    pub style: PaletteStyle,
    /// Entries
    pub entries: Vec<Argb>,
}

impl EmfObject for Palette {
    const OID: Oid = Oid::Palette;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(
            Self::OID,
            &[
                Field::U32(self.style.bits()),
                Field::U32(count_u32("palette entries", self.entries.len())?),
                Field::Item(&self.entries),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let style = PaletteStyle::from_bits_retain(parser.read_le()?);
        let count = read_count(parser)?;
        Ok(Palette {
            style,
            entries: parser.read_array(count)?,
        })
    }
}

/// Serialize a bare array of colors.
///
/// # Errors
/// Returns [`crate::Error::Allocation`] if the buffer cannot be reserved.
pub fn encode_argbs(colors: &[Argb]) -> Result<PseudoObject> {
    let colors = colors.to_vec();
    Ok(serialize(Oid::Argb, &[Field::Item(&colors)])?.into_array())
}

/// Serialize a count followed by 16-bit rectangles.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] for more than `u32::MAX` rectangles.
pub fn encode_rects(rects: &[Rect16]) -> Result<PseudoObject> {
    let rects = rects.to_vec();
    let count = count_u32("rectangles", rects.len())?;
    Ok(serialize(Oid::Rect, &[Field::U32(count), Field::Item(&rects)])?.into_array())
}

/// Serialize a count followed by float rectangles.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] for more than `u32::MAX` rectangles.
pub fn encode_rectfs(rects: &[RectF]) -> Result<PseudoObject> {
    let rects = rects.to_vec();
    let count = count_u32("rectangles", rects.len())?;
    Ok(serialize(Oid::RectF, &[Field::U32(count), Field::Item(&rects)])?.into_array())
}

/// Serialize one Integer7.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] outside -64..=63.
pub fn encode_integer7(value: i32) -> Result<PseudoObject> {
    serialize(Oid::Integer7, &[Field::U8(pointr::encode_integer7(value)?)])
}

/// Serialize one Integer15.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] outside -16384..=16383.
pub fn encode_integer15(value: i32) -> Result<PseudoObject> {
    serialize(Oid::Integer15, &[Field::Bytes(&pointr::encode_integer15(value)?)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_version() {
        let version = GraphicsVersion::new(GraphicsVersionNumber::V1_1);
        assert_eq!(version.0, 0xDBC0_1002);
        assert!(version.is_valid());
        assert_eq!(version.signature(), 0xDBC01);

        let po = version.encode().unwrap();
        assert_eq!(po.data(), &[0x02, 0x10, 0xC0, 0xDB]);
        assert_eq!(GraphicsVersion::parse(po.data()).unwrap(), version);

        assert!(!GraphicsVersion(0x1234_5001).is_valid());
        assert!(!GraphicsVersion(0xDBC0_1009).is_valid());
    }

    #[test]
    fn test_language_identifier_packing() {
        // en-US
        let lang = LanguageIdentifier::new(0x01, 0x09);
        assert_eq!(lang.to_u16(), 0x0409);
        assert_eq!(LanguageIdentifier::from_u16(0x0409), lang);
        assert_eq!(lang.encode().unwrap().data(), &[0x09, 0x04, 0x00, 0x00]);
    }

    #[test]
    fn test_palette() {
        let palette = Palette {
            style: PaletteStyle::HAS_ALPHA,
            entries: vec![Argb::new(0xFF, 1, 2, 3), Argb::new(0, 0, 0, 0)],
        };
        let po = palette.encode().unwrap();
        assert_eq!(po.len(), 16);
        assert_eq!(Palette::parse(po.data()).unwrap(), palette);

        // declared count exceeds the data
        let mut bytes = po.into_data();
        bytes[4] = 3;
        assert!(Palette::parse(&bytes).is_err());
    }

    #[test]
    fn test_rect_arrays() {
        let po = encode_rects(&[Rect16::default(), Rect16::default()]).unwrap();
        assert_eq!(po.len(), 4 + 16);
        assert!(po.is_array());
        let po = encode_rectfs(&[RectF::default()]).unwrap();
        assert_eq!(po.len(), 4 + 16);
    }

    #[test]
    fn test_integer_objects() {
        assert_eq!(encode_integer7(-1).unwrap().data(), &[0x7F]);
        assert_eq!(encode_integer15(64).unwrap().data(), &[0x80, 0x40]);
        assert!(encode_integer7(64).is_err());
        let po = encode_argbs(&[Argb::from_u32(0x1122_3344)]).unwrap();
        assert_eq!(po.data(), &[0x44, 0x33, 0x22, 0x11]);
    }
}
