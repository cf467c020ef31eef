//! EMF+ objects: the payloads stored in the object table and the data blocks nested inside them.
//!
//! Every object implements [`EmfObject`], which pairs an encoder producing a
//! [`crate::PseudoObject`] with a decoder reading from a [`crate::Parser`]. Optional and
//! variable-length parts are modelled as `Option`s and enums, so flag words that only announce the
//! presence of data are derived from the value on encode instead of being stored next to it.
//!
//! # Key Components
//!
//! - [`brush`] - brush objects and the solid, hatch and texture payloads
//! - [`gradient`] - linear and path gradient payloads with their blend data
//! - [`pen`] - pens with the 13 optional pen fields
//! - [`linecap`] - custom line caps
//! - [`dash`] - dashed and compound line data, standard dash patterns
//! - [`path`] - path objects and point type arrays
//! - [`region`] - region node trees
//! - [`image`] - bitmaps, metafiles and image attributes
//! - [`font`] / [`stringformat`] - text objects
//! - [`effects`] - image effect parameter blocks
//! - [`misc`] - graphics version, language identifier, palette and small helpers
//!
//! The nine object table types are gathered in [`Object`].

pub mod brush;
pub mod dash;
pub mod effects;
pub mod font;
pub mod gradient;
pub mod image;
pub mod linecap;
pub mod misc;
pub mod path;
pub mod pen;
pub mod region;
pub mod stringformat;

pub use brush::{Brush, BrushData, HatchBrushData, TextureBrushData};
pub use dash::{CompoundLineData, DashedLineData, StandardDash};
pub use effects::ImageEffectParams;
pub use font::Font;
pub use gradient::{
    BlendColors, BlendFactors, Boundary, FocusScaleData, LinearGradientBrushData,
    PathGradientBrushData,
};
pub use image::{Bitmap, BitmapPayload, Image, ImageAttributes, ImageData, Metafile};
pub use linecap::{CustomLineCap, CustomLineCapArrowData, CustomLineCapData, CustomLineCapKind};
pub use misc::{GraphicsVersion, LanguageIdentifier, Palette};
pub use path::PathObject;
pub use pen::{Pen, PenData, PenOptionalData};
pub use region::{Region, RegionNode};
pub use stringformat::StringFormat;

use crate::{
    pseudo::{Oid, PseudoObject},
    serial::Parser,
    types::ObjectType,
    Error, Result,
};

/// An object with a wire representation.
///
/// ## Implementation Requirements
///
/// - `decode` consumes exactly the bytes `encode` produces, so objects nest inside each other
/// - `decode` never returns a partially populated value
/// - `encode` either returns a complete object tagged with [`EmfObject::OID`] or an error
pub trait EmfObject: Sized {
    /// Identifier the encoder tags its output with.
    const OID: Oid;

    /// Serialize the object.
    ///
    /// # Errors
    /// Returns [`Error::Schema`] or [`Error::OutOfRange`] if the value cannot be represented, and
    /// [`Error::Allocation`] if the output buffer cannot be reserved.
    fn encode(&self) -> Result<PseudoObject>;

    /// Deserialize the object at the cursor.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] for truncated input and [`Error::Malformed`] or
    /// [`Error::UnknownIdentifier`] for content that does not describe a valid object.
    fn decode(parser: &mut Parser<'_>) -> Result<Self>;

    /// Deserialize the object from the start of `data`.
    ///
    /// # Errors
    /// Same as [`EmfObject::decode`].
    fn parse(data: &[u8]) -> Result<Self> {
        Self::decode(&mut Parser::new(data))
    }
}

/// One entry of the object table.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A brush
    Brush(Brush),
    /// A pen
    Pen(Pen),
    /// A path
    Path(PathObject),
    /// A region
    Region(Region),
    /// An image
    Image(Image),
    /// A font
    Font(Font),
    /// A string format
    StringFormat(StringFormat),
    /// Image attributes
    ImageAttributes(ImageAttributes),
    /// A custom line cap
    CustomLineCap(CustomLineCap),
}

impl Object {
    /// Object table type of this entry.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Brush(_) => ObjectType::Brush,
            Object::Pen(_) => ObjectType::Pen,
            Object::Path(_) => ObjectType::Path,
            Object::Region(_) => ObjectType::Region,
            Object::Image(_) => ObjectType::Image,
            Object::Font(_) => ObjectType::Font,
            Object::StringFormat(_) => ObjectType::StringFormat,
            Object::ImageAttributes(_) => ObjectType::ImageAttributes,
            Object::CustomLineCap(_) => ObjectType::CustomLineCap,
        }
    }

    /// Serialize the entry.
    ///
    /// # Errors
    /// Same as [`EmfObject::encode`].
    pub fn encode(&self) -> Result<PseudoObject> {
        match self {
            Object::Brush(o) => o.encode(),
            Object::Pen(o) => o.encode(),
            Object::Path(o) => o.encode(),
            Object::Region(o) => o.encode(),
            Object::Image(o) => o.encode(),
            Object::Font(o) => o.encode(),
            Object::StringFormat(o) => o.encode(),
            Object::ImageAttributes(o) => o.encode(),
            Object::CustomLineCap(o) => o.encode(),
        }
    }

    /// Deserialize a complete (reassembled) object payload of the given table type.
    ///
    /// # Errors
    /// Returns [`Error::UnknownIdentifier`] for [`ObjectType::Invalid`] and the errors of the
    /// individual decoders otherwise.
    pub fn parse(object_type: ObjectType, data: &[u8]) -> Result<Self> {
        Ok(match object_type {
            ObjectType::Brush => Object::Brush(Brush::parse(data)?),
            ObjectType::Pen => Object::Pen(Pen::parse(data)?),
            ObjectType::Path => Object::Path(PathObject::parse(data)?),
            ObjectType::Region => Object::Region(Region::parse(data)?),
            ObjectType::Image => Object::Image(Image::parse(data)?),
            ObjectType::Font => Object::Font(Font::parse(data)?),
            ObjectType::StringFormat => Object::StringFormat(StringFormat::parse(data)?),
            ObjectType::ImageAttributes => {
                Object::ImageAttributes(ImageAttributes::parse(data)?)
            }
            ObjectType::CustomLineCap => Object::CustomLineCap(CustomLineCap::parse(data)?),
            ObjectType::Invalid => {
                return Err(Error::UnknownIdentifier(ObjectType::Invalid.value()))
            }
        })
    }
}

/// Read an `i32` byte count followed by that many bytes holding one object.
///
/// The nested decoder runs on a fenced sub-parser and must consume the whole block.
pub(crate) fn decode_sized<T: EmfObject>(parser: &mut Parser<'_>) -> Result<T> {
    let size: i32 = parser.read_le()?;
    let size = usize::try_from(size)
        .map_err(|_| malformed_error!("Negative embedded object size {}", size))?;
    let mut inner = parser.sub_parser(size)?;
    let value = T::decode(&mut inner)?;
    if inner.has_more_data() {
        return Err(malformed_error!(
            "Embedded object of {} bytes left {} bytes unread",
            size,
            inner.remaining()
        ));
    }
    Ok(value)
}

/// Encode an object and prefix it with its `i32` byte count.
pub(crate) fn encode_sized<T: EmfObject>(value: &T) -> Result<Vec<u8>> {
    let po = value.encode()?;
    let size = i32::try_from(po.len()).map_err(|_| Error::OutOfRange {
        what: "embedded object size",
        value: i64::try_from(po.len()).unwrap_or(i64::MAX),
    })?;
    let mut out = Vec::with_capacity(4 + po.len());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(po.data());
    Ok(out)
}

/// Convert an element count to the `u32` the wire stores.
pub(crate) fn count_u32(what: &'static str, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::OutOfRange {
        what,
        value: i64::try_from(count).unwrap_or(i64::MAX),
    })
}

/// Read a `u32` element count.
pub(crate) fn read_count(parser: &mut Parser<'_>) -> Result<usize> {
    let count: u32 = parser.read_le()?;
    usize::try_from(count).map_err(|_| out_of_bounds_error!())
}
