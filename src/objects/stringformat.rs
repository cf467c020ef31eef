//! String format objects.

use crate::{
    objects::{count_u32, read_count, EmfObject, GraphicsVersion, LanguageIdentifier},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{
        CharacterRange, HotkeyPrefix, StringAlignment, StringDigitSubstitution,
        StringFormatFlags, StringTrimming,
    },
    Result,
};

/// A string format object.
///
/// Tab stops and character ranges follow the fixed part, their counts are taken from the vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct StringFormat {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Layout flags
    pub flags: StringFormatFlags,
    /// Language of the text
    pub language: LanguageIdentifier,
    /// Horizontal alignment
    pub alignment: StringAlignment,
    /// Vertical alignment
    pub line_alignment: StringAlignment,
    /// Digit shapes
    pub digit_substitution: StringDigitSubstitution,
    /// Language of the digit shapes
    pub digit_language: LanguageIdentifier,
    /// Offset of the first tab stop
    pub first_tab_offset: f32,
    /// Handling of `&` hotkey prefixes
    pub hotkey_prefix: HotkeyPrefix,
    /// Space before the text, in em
    pub leading_margin: f32,
    /// Space after the text, in em
    pub trailing_margin: f32,
    /// Extra space between characters
    pub tracking: f32,
    /// What happens to text that does not fit
    pub trimming: StringTrimming,
    /// Tab stop distances
    pub tab_stops: Vec<f32>,
    /// Ranges measured by the renderer
    pub char_ranges: Vec<CharacterRange>,
}

impl Default for StringFormat {
    fn default() -> Self {
        StringFormat {
            version: GraphicsVersion::default(),
            flags: StringFormatFlags::empty(),
            language: LanguageIdentifier::NEUTRAL,
            alignment: StringAlignment::Near,
            line_alignment: StringAlignment::Near,
            digit_substitution: StringDigitSubstitution::None,
            digit_language: LanguageIdentifier::NEUTRAL,
            first_tab_offset: 0.0,
            hotkey_prefix: HotkeyPrefix::None,
            leading_margin: 0.0,
            trailing_margin: 0.0,
            tracking: 1.0,
            trimming: StringTrimming::None,
            tab_stops: Vec::new(),
            char_ranges: Vec::new(),
        }
    }
}

impl EmfObject for StringFormat {
    const OID: Oid = Oid::StringFormat;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::U32(self.flags.bits()),
                Field::Item(&self.language),
                Field::U32(self.alignment.value()),
                Field::U32(self.line_alignment.value()),
                Field::U32(self.digit_substitution.value()),
                Field::Item(&self.digit_language),
                Field::F32(self.first_tab_offset),
                Field::U32(self.hotkey_prefix.value()),
                Field::F32(self.leading_margin),
                Field::F32(self.trailing_margin),
                Field::F32(self.tracking),
                Field::U32(self.trimming.value()),
                Field::U32(count_u32("tab stop count", self.tab_stops.len())?),
                Field::U32(count_u32("character range count", self.char_ranges.len())?),
                Field::Item(&self.tab_stops),
                Field::Item(&self.char_ranges),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        let flags = StringFormatFlags::from_bits_retain(parser.read_le()?);
        let language = parser.read()?;
        let alignment = StringAlignment::try_from(parser.read_le::<u32>()?)?;
        let line_alignment = StringAlignment::try_from(parser.read_le::<u32>()?)?;
        let digit_substitution = StringDigitSubstitution::try_from(parser.read_le::<u32>()?)?;
        let digit_language = parser.read()?;
        let first_tab_offset = parser.read_le()?;
        let hotkey_prefix = HotkeyPrefix::try_from(parser.read_le::<u32>()?)?;
        let leading_margin = parser.read_le()?;
        let trailing_margin = parser.read_le()?;
        let tracking = parser.read_le()?;
        let trimming = StringTrimming::try_from(parser.read_le::<u32>()?)?;
        let tab_count = read_count(parser)?;
        let range_count = read_count(parser)?;
        let tab_stops = parser.read_array(tab_count)?;
        let char_ranges = parser.read_array(range_count)?;

        Ok(StringFormat {
            version,
            flags,
            language,
            alignment,
            line_alignment,
            digit_substitution,
            digit_language,
            first_tab_offset,
            hotkey_prefix,
            leading_margin,
            trailing_margin,
            tracking,
            trimming,
            tab_stops,
            char_ranges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let format = StringFormat::default();
        let po = format.encode().unwrap();
        assert_eq!(po.len(), 60);
        assert_eq!(StringFormat::parse(po.data()).unwrap(), format);
    }

    #[test]
    fn test_tabs_and_ranges() {
        let format = StringFormat {
            flags: StringFormatFlags::NO_WRAP | StringFormatFlags::NO_CLIP,
            language: LanguageIdentifier::new(0x01, 0x09),
            alignment: StringAlignment::Center,
            trimming: StringTrimming::EllipsisWord,
            tab_stops: vec![10.0, 20.0, 40.0],
            char_ranges: vec![CharacterRange { first: 0, length: 4 }],
            ..StringFormat::default()
        };
        let po = format.encode().unwrap();
        assert_eq!(po.len(), 60 + 12 + 8);
        assert_eq!(StringFormat::parse(po.data()).unwrap(), format);
        assert!(StringFormat::parse(&po.data()[..po.len() - 4]).is_err());
    }

    #[test]
    fn test_bad_alignment() {
        let mut bytes = StringFormat::default().encode().unwrap().into_data();
        bytes[12] = 7;
        assert!(StringFormat::parse(&bytes).is_err());
    }
}
