//! Font objects.

use widestring::U16String;

use crate::{
    objects::{count_u32, read_count, EmfObject, GraphicsVersion},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{FontStyle, UnitType},
    Result,
};

/// A font object.
///
/// The family name is stored as UTF-16LE code units without a terminator. It is not padded, the
/// enclosing record takes care of alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Em height in `size_unit`
    pub em_size: f32,
    /// Unit of `em_size`
    pub size_unit: UnitType,
    /// Style bits
    pub style: FontStyle,
    /// Family name
    pub family: U16String,
}

impl Font {
    /// A font of the given family and size in world units.
    #[must_use]
    pub fn new(family: &str, em_size: f32, style: FontStyle) -> Self {
        Font {
            version: GraphicsVersion::default(),
            em_size,
            size_unit: UnitType::World,
            style,
            family: U16String::from_str(family),
        }
    }
}

impl EmfObject for Font {
    const OID: Oid = Oid::Font;

    fn encode(&self) -> Result<PseudoObject> {
        let name = self.family.as_slice().to_vec();
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::F32(self.em_size),
                Field::U32(self.size_unit.value()),
                Field::U32(self.style.bits()),
                Field::Zero(4),
                Field::U32(count_u32("font family length", name.len())?),
                Field::Item(&name),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        let em_size = parser.read_le()?;
        let size_unit = UnitType::try_from(parser.read_le::<u32>()?)?;
        let style = FontStyle::from_bits_retain(parser.read_le()?);
        parser.advance_by(4)?;
        let length = read_count(parser)?;
        let family = parser.read_utf16(length)?;
        Ok(Font {
            version,
            em_size,
            size_unit,
            style,
            family,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font() {
        let font = Font::new("Arial", 12.0, FontStyle::BOLD | FontStyle::ITALIC);
        let po = font.encode().unwrap();
        assert_eq!(po.len(), 24 + 10);
        assert_eq!(&po.data()[24..26], &[b'A', 0]);
        let decoded = Font::parse(po.data()).unwrap();
        assert_eq!(decoded, font);
        assert_eq!(decoded.family.to_string_lossy(), "Arial");
    }

    #[test]
    fn test_truncated_name() {
        let po = Font::new("Times", 10.0, FontStyle::empty()).encode().unwrap();
        assert!(Font::parse(&po.data()[..po.len() - 1]).is_err());
        assert!(Font::parse(&[]).is_err());
    }

    #[test]
    fn test_unpaired_surrogate_survives() {
        let font = Font {
            family: U16String::from_vec(vec![0xD800_u16, 0x0041]),
            ..Font::new("", 8.0, FontStyle::empty())
        };
        assert_eq!(Font::parse(font.encode().unwrap().data()).unwrap(), font);
    }
}
