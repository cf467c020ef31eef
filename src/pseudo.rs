//! Typed byte buffers and the identifier space of the codec.
//!
//! Every encoder in this crate produces a [`PseudoObject`]: the wire bytes of one EMF+ object or
//! record, tagged with the [`Oid`] that says what those bytes are. Nested builders check the tag of
//! the objects they are handed (a pen wants pen data and a brush, a region node wants a rectangle,
//! a path or child nodes), which keeps a validly tagged buffer with mismatched contents from ever
//! being assembled.
//!
//! The module also holds the fixed mappings from identifiers to the small enumerations used inside
//! objects ([`to_object_type`], [`to_brush_type`], ...) and the image effect GUID table
//! ([`oid_to_guid`], [`guid_to_effect`]). Lookups that find nothing return an explicit sentinel.

use strum::{EnumCount, EnumIter, IntoStaticStr};
use uguid::{guid, Guid};

use crate::{
    types::{
        BrushType, CustomLineCapDataType, ImageDataType, ImageEffect, ObjectType, RecordType,
        RegionNodeDataType,
    },
    Error, Result,
};

/// Bit set in a tag when the buffer holds an array of the base type.
pub const ARRAY_FLAG: u32 = 0x8000_0000;
/// Mask selecting the base type of a tag.
pub const OID_MASK: u32 = 0x7FFF_FFFF;

macro_rules! oid_table {
    ($($(#[$vmeta:meta])* $variant:ident = $value:literal),* $(,)?) => {
        /// Identifier of an object, record or parameter block.
        ///
        /// The wire values encode the section of the EMF+ manual that defines the item. Objects
        /// live under `0x0202_xxxx`, records under `0x0201_xxxx` and `0x0203_xxxx`, and a few
        /// values above `0x4000_0000` name internal building blocks.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, IntoStaticStr)]
        #[repr(u32)]
        pub enum Oid {
            $($(#[$vmeta])* $variant = $value,)*
        }

        impl TryFrom<u32> for Oid {
            type Error = Error;

            /// Converts a tag, ignoring the array bit.
            fn try_from(value: u32) -> Result<Self> {
                match value & OID_MASK {
                    $($value => Ok(Oid::$variant),)*
                    other => Err(Error::UnknownIdentifier(other)),
                }
            }
        }
    };
}

oid_table! {
    /// Brush object
    Brush = 0x0202_0101,
    /// Custom line cap object
    CustomLineCap = 0x0202_0102,
    /// Font object
    Font = 0x0202_0103,
    /// Image object
    Image = 0x0202_0104,
    /// Image attributes object
    ImageAttributes = 0x0202_0105,
    /// Path object
    Path = 0x0202_0106,
    /// Pen object
    Pen = 0x0202_0107,
    /// Region object
    Region = 0x0202_0108,
    /// String format object
    StringFormat = 0x0202_0109,
    /// Color
    Argb = 0x0202_0201,
    /// Bitmap
    Bitmap = 0x0202_0202,
    /// Bitmap pixel data with optional palette
    BitmapData = 0x0202_0203,
    /// Gradient blend colors
    BlendColors = 0x0202_0204,
    /// Gradient blend factors
    BlendFactors = 0x0202_0205,
    /// Path boundary of a path gradient
    BoundaryPathData = 0x0202_0206,
    /// Point boundary of a path gradient
    BoundaryPointData = 0x0202_0207,
    /// Character range
    CharacterRange = 0x0202_0208,
    /// Compound line widths
    CompoundLineData = 0x0202_0209,
    /// Compressed image
    CompressedImage = 0x0202_0210,
    /// Custom end cap
    CustomEndCapData = 0x0202_0211,
    /// Adjustable arrow line cap
    CustomLineCapArrowData = 0x0202_0212,
    /// Default custom line cap
    CustomLineCapData = 0x0202_0213,
    /// Optional paths of a custom line cap
    CustomLineCapOptionalData = 0x0202_0214,
    /// Custom start cap
    CustomStartCapData = 0x0202_0215,
    /// Dash lengths
    DashedLineData = 0x0202_0216,
    /// Fill path of a custom line cap
    FillPathObj = 0x0202_0217,
    /// Focus scales of a path gradient
    FocusScaleData = 0x0202_0218,
    /// Graphics version word
    GraphicsVersion = 0x0202_0219,
    /// Hatch brush data
    HatchBrushData = 0x0202_0220,
    /// 7-bit signed integer
    Integer7 = 0x0202_0221,
    /// 15-bit signed integer
    Integer15 = 0x0202_0222,
    /// Language identifier
    LanguageIdentifier = 0x0202_0223,
    /// Linear gradient brush data
    LinearGradientBrushData = 0x0202_0224,
    /// Optional data of a linear gradient brush
    LinearGradientBrushOptionalData = 0x0202_0225,
    /// Line path of a custom line cap
    LinePath = 0x0202_0226,
    /// Metafile
    Metafile = 0x0202_0227,
    /// Palette
    Palette = 0x0202_0228,
    /// Path gradient brush data
    PathGradientBrushData = 0x0202_0229,
    /// Optional data of a path gradient brush
    PathGradientBrushOptionalData = 0x0202_0230,
    /// Literal path point types
    PathPointType = 0x0202_0231,
    /// Run length encoded path point types
    PathPointTypeRle = 0x0202_0232,
    /// Pen data
    PenData = 0x0202_0233,
    /// Optional pen data
    PenOptionalData = 0x0202_0234,
    /// 16-bit point
    Point = 0x0202_0235,
    /// Float point
    PointF = 0x0202_0236,
    /// Relative point
    PointR = 0x0202_0237,
    /// 16-bit rectangle
    Rect = 0x0202_0238,
    /// Float rectangle
    RectF = 0x0202_0239,
    /// Region node
    RegionNode = 0x0202_0240,
    /// Pair of region child nodes
    RegionNodeChildNodes = 0x0202_0241,
    /// Path region node
    RegionNodePath = 0x0202_0242,
    /// Solid brush data
    SolidBrushData = 0x0202_0243,
    /// Tab stops and character ranges of a string format
    StringFormatData = 0x0202_0244,
    /// Texture brush data
    TextureBrushData = 0x0202_0245,
    /// Optional data of a texture brush
    TextureBrushOptionalData = 0x0202_0246,
    /// Transform matrix
    TransformMatrix = 0x0202_0247,
    /// Blur parameters
    IeBlur = 0x0202_0301,
    /// Brightness and contrast parameters
    IeBrightnessContrast = 0x0202_0302,
    /// Color balance parameters
    IeColorBalance = 0x0202_0303,
    /// Color curve parameters
    IeColorCurve = 0x0202_0304,
    /// Color lookup tables
    IeColorLookupTable = 0x0202_0305,
    /// Color matrix
    IeColorMatrix = 0x0202_0306,
    /// Hue, saturation and lightness parameters
    IeHueSaturationLightness = 0x0202_0307,
    /// Levels parameters
    IeLevels = 0x0202_0308,
    /// Red eye correction rectangles
    IeRedEyeCorrection = 0x0202_0309,
    /// Sharpen parameters
    IeSharpen = 0x0202_0310,
    /// Tint parameters
    IeTint = 0x0202_0311,
    /// Stroke and fill path record
    StrokeFillPathRecord = 0x0201_0101,
    /// Offset clip record
    OffsetClipRecord = 0x0203_0101,
    /// Reset clip record
    ResetClipRecord = 0x0203_0102,
    /// Set clip path record
    SetClipPathRecord = 0x0203_0103,
    /// Set clip rect record
    SetClipRectRecord = 0x0203_0104,
    /// Set clip region record
    SetClipRegionRecord = 0x0203_0105,
    /// Comment record
    CommentRecord = 0x0203_0201,
    /// End of file record
    EndOfFileRecord = 0x0203_0301,
    /// Get DC record
    GetDcRecord = 0x0203_0302,
    /// Header record
    HeaderRecord = 0x0203_0303,
    /// Clear record
    ClearRecord = 0x0203_0401,
    /// Draw arc record
    DrawArcRecord = 0x0203_0402,
    /// Draw beziers record
    DrawBeziersRecord = 0x0203_0403,
    /// Draw closed curve record
    DrawClosedCurveRecord = 0x0203_0404,
    /// Draw curve record
    DrawCurveRecord = 0x0203_0405,
    /// Draw driver string record
    DrawDriverStringRecord = 0x0203_0406,
    /// Draw ellipse record
    DrawEllipseRecord = 0x0203_0407,
    /// Draw image record
    DrawImageRecord = 0x0203_0408,
    /// Draw image points record
    DrawImagePointsRecord = 0x0203_0409,
    /// Draw lines record
    DrawLinesRecord = 0x0203_0410,
    /// Draw path record
    DrawPathRecord = 0x0203_0411,
    /// Draw pie record
    DrawPieRecord = 0x0203_0412,
    /// Draw rects record
    DrawRectsRecord = 0x0203_0413,
    /// Draw string record
    DrawStringRecord = 0x0203_0414,
    /// Fill closed curve record
    FillClosedCurveRecord = 0x0203_0415,
    /// Fill ellipse record
    FillEllipseRecord = 0x0203_0416,
    /// Fill path record
    FillPathRecord = 0x0203_0417,
    /// Fill pie record
    FillPieRecord = 0x0203_0418,
    /// Fill polygon record
    FillPolygonRecord = 0x0203_0419,
    /// Fill rects record
    FillRectsRecord = 0x0203_0420,
    /// Fill region record
    FillRegionRecord = 0x0203_0421,
    /// Object record
    ObjectRecord = 0x0203_0501,
    /// Serializable object record
    SerializableObjectRecord = 0x0203_0502,
    /// Set anti-alias mode record
    SetAntiAliasModeRecord = 0x0203_0601,
    /// Set compositing mode record
    SetCompositingModeRecord = 0x0203_0602,
    /// Set compositing quality record
    SetCompositingQualityRecord = 0x0203_0603,
    /// Set interpolation mode record
    SetInterpolationModeRecord = 0x0203_0604,
    /// Set pixel offset mode record
    SetPixelOffsetModeRecord = 0x0203_0605,
    /// Set rendering origin record
    SetRenderingOriginRecord = 0x0203_0606,
    /// Set text contrast record
    SetTextContrastRecord = 0x0203_0607,
    /// Set text rendering hint record
    SetTextRenderingHintRecord = 0x0203_0608,
    /// Begin container record
    BeginContainerRecord = 0x0203_0701,
    /// Begin container without parameters record
    BeginContainerNoParamsRecord = 0x0203_0702,
    /// End container record
    EndContainerRecord = 0x0203_0703,
    /// Restore record
    RestoreRecord = 0x0203_0704,
    /// Save record
    SaveRecord = 0x0203_0705,
    /// Set terminal server clip record
    SetTsClipRecord = 0x0203_0801,
    /// Set terminal server graphics record
    SetTsGraphicsRecord = 0x0203_0802,
    /// Multiply world transform record
    MultiplyWorldTransformRecord = 0x0203_0901,
    /// Reset world transform record
    ResetWorldTransformRecord = 0x0203_0902,
    /// Rotate world transform record
    RotateWorldTransformRecord = 0x0203_0903,
    /// Scale world transform record
    ScaleWorldTransformRecord = 0x0203_0904,
    /// Set page transform record
    SetPageTransformRecord = 0x0203_0905,
    /// Set world transform record
    SetWorldTransformRecord = 0x0203_0906,
    /// Translate world transform record
    TranslateWorldTransformRecord = 0x0203_0907,
    /// Common record header
    CmnHdr = 0x4000_0000,
    /// Brush reference, a color or an object index
    FourNum = 0x4000_0001,
    /// Untyped bytes
    Raw = 0x4000_0002,
}

impl Oid {
    /// Returns the wire value of this identifier, without the array bit.
    #[must_use]
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Returns the identifier name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// An owned, typed byte buffer holding the wire form of one object or record.
///
/// The buffer is released when the value is dropped. Appending grows it; a failed reservation is
/// reported as [`Error::Allocation`] and leaves the existing contents untouched.
///
/// # Examples
///
/// ```rust
/// use emfplus::{Oid, PseudoObject};
///
/// let mut po = PseudoObject::new(Oid::Raw);
/// po.append(&[1, 2, 3])?;
/// assert_eq!(po.len(), 3);
/// assert_eq!(po.oid(), Oid::Raw);
/// # Ok::<(), emfplus::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoObject {
    oid: Oid,
    array: bool,
    data: Vec<u8>,
}

impl PseudoObject {
    /// Create an empty buffer tagged with `oid`.
    #[must_use]
    pub fn new(oid: Oid) -> Self {
        PseudoObject {
            oid,
            array: false,
            data: Vec::new(),
        }
    }

    /// Wrap existing bytes.
    #[must_use]
    pub fn from_parts(oid: Oid, data: Vec<u8>) -> Self {
        PseudoObject {
            oid,
            array: false,
            data,
        }
    }

    /// Mark the buffer as an array of its base type.
    #[must_use]
    pub fn into_array(mut self) -> Self {
        self.array = true;
        self
    }

    /// The base identifier.
    #[must_use]
    pub fn oid(&self) -> Oid {
        self.oid
    }

    /// Whether the buffer holds an array of the base type.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array
    }

    /// The full 32-bit tag, including the array bit.
    #[must_use]
    pub fn tag(&self) -> u32 {
        if self.array {
            self.oid.value() | ARRAY_FLAG
        } else {
            self.oid.value()
        }
    }

    /// The encoded bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the encoded bytes.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of encoded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been encoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append raw bytes.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the buffer cannot grow.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.data
            .try_reserve(bytes.len())
            .map_err(|_| Error::Allocation {
                requested: self.data.len().saturating_add(bytes.len()),
            })?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append the contents of another buffer.
    ///
    /// With `strip_count` set the leading 32-bit element count of `other` is dropped, which is how
    /// arrays are spliced into objects that carry their own count elsewhere.
    ///
    /// # Errors
    /// Returns [`Error::Schema`] if `strip_count` is set and `other` is shorter than four bytes,
    /// and [`Error::Allocation`] if the buffer cannot grow.
    pub fn append_object(&mut self, other: &PseudoObject, strip_count: bool) -> Result<()> {
        let bytes = if strip_count {
            other.data.get(4..).ok_or_else(|| {
                Error::Schema(format!("{} has no element count to strip", other.oid.name()))
            })?
        } else {
            &other.data[..]
        };
        self.append(bytes)
    }

    /// Drop all encoded bytes, keeping the tag.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Check that this buffer carries `expected`.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] otherwise.
    pub fn expect_oid(&self, expected: Oid) -> Result<()> {
        if self.oid != expected {
            return Err(Error::TypeMismatch {
                expected: expected.name(),
                found: self.oid.name(),
            });
        }
        Ok(())
    }
}

impl AsRef<[u8]> for PseudoObject {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Object table type of an object identifier, [`ObjectType::Invalid`] if it names none.
#[must_use]
pub fn to_object_type(oid: Oid) -> ObjectType {
    match oid {
        Oid::Brush => ObjectType::Brush,
        Oid::CustomLineCap => ObjectType::CustomLineCap,
        Oid::Font => ObjectType::Font,
        Oid::Image => ObjectType::Image,
        Oid::ImageAttributes => ObjectType::ImageAttributes,
        Oid::Path => ObjectType::Path,
        Oid::Pen => ObjectType::Pen,
        Oid::Region => ObjectType::Region,
        Oid::StringFormat => ObjectType::StringFormat,
        _ => ObjectType::Invalid,
    }
}

/// Identifier that encoded records of `kind` are tagged with.
///
/// The multi-format records have no identifier of their own and map to [`Oid::Raw`].
#[must_use]
pub fn record_oid(kind: RecordType) -> Oid {
    match kind {
        RecordType::Header => Oid::HeaderRecord,
        RecordType::EndOfFile => Oid::EndOfFileRecord,
        RecordType::Comment => Oid::CommentRecord,
        RecordType::GetDc => Oid::GetDcRecord,
        RecordType::MultiFormatStart
        | RecordType::MultiFormatSection
        | RecordType::MultiFormatEnd => Oid::Raw,
        RecordType::Object => Oid::ObjectRecord,
        RecordType::Clear => Oid::ClearRecord,
        RecordType::FillRects => Oid::FillRectsRecord,
        RecordType::DrawRects => Oid::DrawRectsRecord,
        RecordType::FillPolygon => Oid::FillPolygonRecord,
        RecordType::DrawLines => Oid::DrawLinesRecord,
        RecordType::FillEllipse => Oid::FillEllipseRecord,
        RecordType::DrawEllipse => Oid::DrawEllipseRecord,
        RecordType::FillPie => Oid::FillPieRecord,
        RecordType::DrawPie => Oid::DrawPieRecord,
        RecordType::DrawArc => Oid::DrawArcRecord,
        RecordType::FillRegion => Oid::FillRegionRecord,
        RecordType::FillPath => Oid::FillPathRecord,
        RecordType::DrawPath => Oid::DrawPathRecord,
        RecordType::FillClosedCurve => Oid::FillClosedCurveRecord,
        RecordType::DrawClosedCurve => Oid::DrawClosedCurveRecord,
        RecordType::DrawCurve => Oid::DrawCurveRecord,
        RecordType::DrawBeziers => Oid::DrawBeziersRecord,
        RecordType::DrawImage => Oid::DrawImageRecord,
        RecordType::DrawImagePoints => Oid::DrawImagePointsRecord,
        RecordType::DrawString => Oid::DrawStringRecord,
        RecordType::SetRenderingOrigin => Oid::SetRenderingOriginRecord,
        RecordType::SetAntiAliasMode => Oid::SetAntiAliasModeRecord,
        RecordType::SetTextRenderingHint => Oid::SetTextRenderingHintRecord,
        RecordType::SetTextContrast => Oid::SetTextContrastRecord,
        RecordType::SetInterpolationMode => Oid::SetInterpolationModeRecord,
        RecordType::SetPixelOffsetMode => Oid::SetPixelOffsetModeRecord,
        RecordType::SetCompositingMode => Oid::SetCompositingModeRecord,
        RecordType::SetCompositingQuality => Oid::SetCompositingQualityRecord,
        RecordType::Save => Oid::SaveRecord,
        RecordType::Restore => Oid::RestoreRecord,
        RecordType::BeginContainer => Oid::BeginContainerRecord,
        RecordType::BeginContainerNoParams => Oid::BeginContainerNoParamsRecord,
        RecordType::EndContainer => Oid::EndContainerRecord,
        RecordType::SetWorldTransform => Oid::SetWorldTransformRecord,
        RecordType::ResetWorldTransform => Oid::ResetWorldTransformRecord,
        RecordType::MultiplyWorldTransform => Oid::MultiplyWorldTransformRecord,
        RecordType::TranslateWorldTransform => Oid::TranslateWorldTransformRecord,
        RecordType::ScaleWorldTransform => Oid::ScaleWorldTransformRecord,
        RecordType::RotateWorldTransform => Oid::RotateWorldTransformRecord,
        RecordType::SetPageTransform => Oid::SetPageTransformRecord,
        RecordType::ResetClip => Oid::ResetClipRecord,
        RecordType::SetClipRect => Oid::SetClipRectRecord,
        RecordType::SetClipPath => Oid::SetClipPathRecord,
        RecordType::SetClipRegion => Oid::SetClipRegionRecord,
        RecordType::OffsetClip => Oid::OffsetClipRecord,
        RecordType::DrawDriverString => Oid::DrawDriverStringRecord,
        RecordType::StrokeFillPath => Oid::StrokeFillPathRecord,
        RecordType::SerializableObject => Oid::SerializableObjectRecord,
        RecordType::SetTsGraphics => Oid::SetTsGraphicsRecord,
        RecordType::SetTsClip => Oid::SetTsClipRecord,
    }
}

/// Brush type of a brush data identifier.
#[must_use]
pub fn to_brush_type(oid: Oid) -> Option<BrushType> {
    match oid {
        Oid::SolidBrushData => Some(BrushType::SolidColor),
        Oid::HatchBrushData => Some(BrushType::HatchFill),
        Oid::TextureBrushData => Some(BrushType::TextureFill),
        Oid::PathGradientBrushData => Some(BrushType::PathGradient),
        Oid::LinearGradientBrushData => Some(BrushType::LinearGradient),
        _ => None,
    }
}

/// Custom line cap data type of a line cap data identifier.
#[must_use]
pub fn to_custom_line_cap_data_type(oid: Oid) -> Option<CustomLineCapDataType> {
    match oid {
        Oid::CustomLineCapData => Some(CustomLineCapDataType::Default),
        Oid::CustomLineCapArrowData => Some(CustomLineCapDataType::AdjustableArrow),
        _ => None,
    }
}

/// Image data type of an image payload identifier.
#[must_use]
pub fn to_image_data_type(oid: Oid) -> Option<ImageDataType> {
    match oid {
        Oid::Bitmap => Some(ImageDataType::Bitmap),
        Oid::Metafile => Some(ImageDataType::Metafile),
        _ => None,
    }
}

/// Region node data type of a region node payload identifier.
#[must_use]
pub fn to_region_node_data_type(oid: Oid) -> Option<RegionNodeDataType> {
    match oid {
        Oid::RegionNodeChildNodes => Some(RegionNodeDataType::Kids),
        Oid::RectF => Some(RegionNodeDataType::Rect),
        Oid::RegionNodePath => Some(RegionNodeDataType::Path),
        _ => None,
    }
}

const EFFECT_GUIDS: [(ImageEffect, Oid, Guid); 11] = [
    (ImageEffect::Blur, Oid::IeBlur, guid!("633c80a4-1843-482b-9ef2-be2834c5fdd4")),
    (
        ImageEffect::BrightnessContrast,
        Oid::IeBrightnessContrast,
        guid!("d3a1dbe1-8ec4-4c17-9f4c-ea97ad1c343d"),
    ),
    (
        ImageEffect::ColorBalance,
        Oid::IeColorBalance,
        guid!("537e597d-251e-48da-9664-29ca496b70f8"),
    ),
    (
        ImageEffect::ColorCurve,
        Oid::IeColorCurve,
        guid!("dd6a0022-58e4-4a67-9d9b-d48eb881a53d"),
    ),
    (
        ImageEffect::ColorLookupTable,
        Oid::IeColorLookupTable,
        guid!("a7ce72a9-0f7f-40d7-b3cc-d0c02d5c3212"),
    ),
    (
        ImageEffect::ColorMatrix,
        Oid::IeColorMatrix,
        guid!("718f2615-7933-40e3-a511-5f68fe14dd74"),
    ),
    (
        ImageEffect::HueSaturationLightness,
        Oid::IeHueSaturationLightness,
        guid!("8b2dd6c3-eb07-4d87-a5f0-7108e26a9c5f"),
    ),
    (ImageEffect::Levels, Oid::IeLevels, guid!("99c354ec-2a31-4f3a-8c34-17a803b33a25")),
    (
        ImageEffect::RedEyeCorrection,
        Oid::IeRedEyeCorrection,
        guid!("74d29d05-69a4-4266-9549-3cc52836b632"),
    ),
    (ImageEffect::Sharpen, Oid::IeSharpen, guid!("63cbf3ee-c526-402c-8f71-62c540bf5142")),
    (ImageEffect::Tint, Oid::IeTint, guid!("1077af00-2848-4441-9489-44ad4c2d7a2c")),
];

/// GUID of an image effect parameter block identifier.
#[must_use]
pub fn oid_to_guid(oid: Oid) -> Option<Guid> {
    EFFECT_GUIDS
        .iter()
        .find(|(_, entry, _)| *entry == oid)
        .map(|(_, _, guid)| *guid)
}

/// Image effect named by `guid`.
///
/// # Errors
/// Returns [`Error::UnknownGuid`] if the GUID names no image effect.
pub fn guid_to_effect(guid: &Guid) -> Result<ImageEffect> {
    EFFECT_GUIDS
        .iter()
        .find(|(_, _, entry)| entry == guid)
        .map(|(effect, _, _)| *effect)
        .ok_or_else(|| Error::UnknownGuid(guid.to_string()))
}

/// Parameter block identifier of an image effect.
#[must_use]
pub fn effect_to_oid(effect: ImageEffect) -> Oid {
    EFFECT_GUIDS
        .iter()
        .find(|(entry, _, _)| *entry == effect)
        .map_or(Oid::Raw, |(_, oid, _)| *oid)
}

/// GUID of an image effect.
#[must_use]
pub fn effect_to_guid(effect: ImageEffect) -> Guid {
    EFFECT_GUIDS
        .iter()
        .find(|(entry, _, _)| *entry == effect)
        .map_or(Guid::ZERO, |(_, _, guid)| *guid)
}

/// Curly brace text form of a GUID, as used in documentation of the effects.
#[must_use]
pub fn curly_guid(guid: &Guid) -> String {
    format!("{{{}}}", guid.to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_oid_round_trip() {
        for oid in Oid::iter() {
            assert_eq!(Oid::try_from(oid.value()).unwrap(), oid);
            assert_eq!(Oid::try_from(oid.value() | ARRAY_FLAG).unwrap(), oid);
        }
        assert!(matches!(
            Oid::try_from(0x0202_0248),
            Err(Error::UnknownIdentifier(0x0202_0248))
        ));
    }

    #[test]
    fn test_record_oids_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for kind in RecordType::iter() {
            let oid = record_oid(kind);
            if oid == Oid::Raw {
                continue;
            }
            assert!(seen.insert(oid), "{:?} shares {:?}", kind, oid);
        }
        assert_eq!(seen.len(), RecordType::COUNT - 3);
    }

    #[test]
    fn test_array_tag() {
        let po = PseudoObject::new(Oid::PointF).into_array();
        assert!(po.is_array());
        assert_eq!(po.tag(), 0x8202_0236);
        assert_eq!(PseudoObject::new(Oid::PointF).tag(), 0x0202_0236);
    }

    #[test]
    fn test_append_object() {
        let mut target = PseudoObject::new(Oid::Raw);
        let counted = PseudoObject::from_parts(Oid::PointF, vec![2, 0, 0, 0, 9, 9]);
        target.append_object(&counted, true).unwrap();
        assert_eq!(target.data(), &[9, 9]);
        target.append_object(&counted, false).unwrap();
        assert_eq!(target.len(), 8);

        let short = PseudoObject::from_parts(Oid::Raw, vec![1]);
        assert!(matches!(
            target.append_object(&short, true),
            Err(Error::Schema(_))
        ));
        target.clear();
        assert!(target.is_empty());
    }

    #[test]
    fn test_expect_oid() {
        let po = PseudoObject::new(Oid::Pen);
        assert!(po.expect_oid(Oid::Pen).is_ok());
        match po.expect_oid(Oid::Brush) {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "Brush");
                assert_eq!(found, "Pen");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(to_object_type(Oid::Pen), ObjectType::Pen);
        assert_eq!(to_object_type(Oid::PenData), ObjectType::Invalid);
        assert_eq!(to_brush_type(Oid::HatchBrushData), Some(BrushType::HatchFill));
        assert_eq!(to_brush_type(Oid::Brush), None);
        assert_eq!(
            to_custom_line_cap_data_type(Oid::CustomLineCapArrowData),
            Some(CustomLineCapDataType::AdjustableArrow)
        );
        assert_eq!(to_image_data_type(Oid::Metafile), Some(ImageDataType::Metafile));
        assert_eq!(to_image_data_type(Oid::CompressedImage), None);
        assert_eq!(
            to_region_node_data_type(Oid::RectF),
            Some(RegionNodeDataType::Rect)
        );
        assert_eq!(to_region_node_data_type(Oid::Rect), None);
    }

    #[test]
    fn test_guid_table() {
        let blur = oid_to_guid(Oid::IeBlur).unwrap();
        assert_eq!(curly_guid(&blur), "{633C80A4-1843-482B-9EF2-BE2834C5FDD4}");
        assert_eq!(blur.to_bytes()[0], 0xA4);
        assert_eq!(guid_to_effect(&blur).unwrap(), ImageEffect::Blur);
        assert!(oid_to_guid(Oid::Pen).is_none());
        assert!(matches!(guid_to_effect(&Guid::ZERO), Err(Error::UnknownGuid(_))));

        for effect in ImageEffect::iter() {
            let oid = effect_to_oid(effect);
            assert_eq!(oid_to_guid(oid), Some(effect_to_guid(effect)));
        }
    }
}
