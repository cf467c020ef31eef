//! Closed enumerations of the EMF+ format.
//!
//! Every enumeration is a plain Rust enum carrying its wire value as discriminant. Conversion from
//! the wire goes through `TryFrom<u32>`, which rejects values that are not part of the format with
//! [`crate::Error::UnknownIdentifier`], and back through `value()`. Fields that are narrower than
//! 32 bits on the wire are widened before conversion.

use strum::{EnumCount, EnumIter, IntoStaticStr};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, IntoStaticStr, Eq, Hash)]
        #[repr(u32)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )*
        }

        impl $name {
            /// Returns the wire value of this variant.
            #[must_use]
            pub fn value(self) -> u32 {
                self as u32
            }
        }

        impl TryFrom<u32> for $name {
            type Error = crate::Error;

            fn try_from(value: u32) -> crate::Result<Self> {
                $(
                    if value == $value {
                        return Ok($name::$variant);
                    }
                )*
                Err(crate::Error::UnknownIdentifier(value))
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                value.value()
            }
        }
    };
}

wire_enum! {
    /// How bitmap pixels are stored inside an image object.
    pub enum BitmapDataType {
        /// Uncompressed pixel data
        Pixel = 0x00,
        /// Compressed image stream (PNG, JPEG, ...)
        Compressed = 0x01,
    }
}

wire_enum! {
    /// Brush object kind.
    pub enum BrushType {
        /// Solid color brush
        SolidColor = 0x00,
        /// Hatch fill brush
        HatchFill = 0x01,
        /// Texture fill brush
        TextureFill = 0x02,
        /// Path gradient brush
        PathGradient = 0x03,
        /// Linear gradient brush
        LinearGradient = 0x04,
    }
}

wire_enum! {
    /// How a new clip region combines with the current one.
    pub enum CombineMode {
        /// Replace the current region
        Replace = 0x00,
        /// Intersection of both regions
        Intersect = 0x01,
        /// Union of both regions
        Union = 0x02,
        /// Symmetric difference
        Xor = 0x03,
        /// Current region minus the new one
        Exclude = 0x04,
        /// New region minus the current one
        Complement = 0x05,
    }
}

wire_enum! {
    /// Compositing of source over destination.
    pub enum CompositingMode {
        /// Blend with the destination
        Over = 0x00,
        /// Overwrite the destination
        Copy = 0x01,
    }
}

wire_enum! {
    /// Quality of compositing.
    pub enum CompositingQuality {
        /// Default quality
        Default = 0x01,
        /// Favor speed
        HighSpeed = 0x02,
        /// Favor quality
        HighQuality = 0x03,
        /// Gamma corrected
        GammaCorrected = 0x04,
        /// Assume linear values
        AssumeLinear = 0x05,
    }
}

wire_enum! {
    /// Color curve adjustment of the color curve image effect.
    pub enum CurveAdjustments {
        /// Exposure
        Exposure = 0x00,
        /// Density
        Density = 0x01,
        /// Contrast
        Contrast = 0x02,
        /// Highlight
        Highlight = 0x03,
        /// Shadow
        Shadow = 0x04,
        /// Midtone
        Midtone = 0x05,
        /// White saturation
        WhiteSaturation = 0x06,
        /// Black saturation
        BlackSaturation = 0x07,
    }
}

wire_enum! {
    /// Channel a color curve adjustment applies to.
    pub enum CurveChannel {
        /// All channels
        All = 0x00,
        /// Red only
        Red = 0x01,
        /// Green only
        Green = 0x02,
        /// Blue only
        Blue = 0x03,
    }
}

wire_enum! {
    /// Kind of custom line cap data.
    pub enum CustomLineCapDataType {
        /// Path based cap
        Default = 0x00,
        /// Adjustable arrow cap
        AdjustableArrow = 0x01,
    }
}

wire_enum! {
    /// Cap at both ends of every dash.
    pub enum DashedLineCapType {
        /// Flat
        Flat = 0x00,
        /// Round
        Round = 0x02,
        /// Triangle
        Triangle = 0x03,
    }
}

wire_enum! {
    /// Filter used when scaling text and images.
    pub enum FilterType {
        /// No filter
        None = 0x00,
        /// Point
        Point = 0x01,
        /// Linear
        Linear = 0x02,
        /// Triangle
        Triangle = 0x03,
        /// Box
        Box = 0x04,
        /// Pyramidal quadrature
        PyramidalQuad = 0x06,
        /// Gaussian quadrature
        GaussianQuad = 0x07,
    }
}

wire_enum! {
    /// Graphics version number carried in the low 12 bits of a version word.
    pub enum GraphicsVersionNumber {
        /// GDI+ 1.0
        V1 = 0x01,
        /// GDI+ 1.1
        V1_1 = 0x02,
    }
}

wire_enum! {
    /// Hatch brush patterns.
    pub enum HatchStyle {
        /// Horizontal
        Horizontal = 0x00,
        /// Vertical
        Vertical = 0x01,
        /// Forward diagonal
        ForwardDiagonal = 0x02,
        /// Backward diagonal
        BackwardDiagonal = 0x03,
        /// Large grid
        LargeGrid = 0x04,
        /// Diagonal cross
        DiagonalCross = 0x05,
        /// 5 percent
        Percent05 = 0x06,
        /// 10 percent
        Percent10 = 0x07,
        /// 20 percent
        Percent20 = 0x08,
        /// 25 percent
        Percent25 = 0x09,
        /// 30 percent
        Percent30 = 0x0A,
        /// 40 percent
        Percent40 = 0x0B,
        /// 50 percent
        Percent50 = 0x0C,
        /// 60 percent
        Percent60 = 0x0D,
        /// 70 percent
        Percent70 = 0x0E,
        /// 75 percent
        Percent75 = 0x0F,
        /// 80 percent
        Percent80 = 0x10,
        /// 90 percent
        Percent90 = 0x11,
        /// Light downward diagonal
        LightDownwardDiagonal = 0x12,
        /// Light upward diagonal
        LightUpwardDiagonal = 0x13,
        /// Dark downward diagonal
        DarkDownwardDiagonal = 0x14,
        /// Dark upward diagonal
        DarkUpwardDiagonal = 0x15,
        /// Wide downward diagonal
        WideDownwardDiagonal = 0x16,
        /// Wide upward diagonal
        WideUpwardDiagonal = 0x17,
        /// Light vertical
        LightVertical = 0x18,
        /// Light horizontal
        LightHorizontal = 0x19,
        /// Narrow vertical
        NarrowVertical = 0x1A,
        /// Narrow horizontal
        NarrowHorizontal = 0x1B,
        /// Dark vertical
        DarkVertical = 0x1C,
        /// Dark horizontal
        DarkHorizontal = 0x1D,
        /// Dashed downward diagonal
        DashedDownwardDiagonal = 0x1E,
        /// Dashed upward diagonal
        DashedUpwardDiagonal = 0x1F,
        /// Dashed horizontal
        DashedHorizontal = 0x20,
        /// Dashed vertical
        DashedVertical = 0x21,
        /// Small confetti
        SmallConfetti = 0x22,
        /// Large confetti
        LargeConfetti = 0x23,
        /// Zig zag
        ZigZag = 0x24,
        /// Wave
        Wave = 0x25,
        /// Diagonal brick
        DiagonalBrick = 0x26,
        /// Horizontal brick
        HorizontalBrick = 0x27,
        /// Weave
        Weave = 0x28,
        /// Plaid
        Plaid = 0x29,
        /// Divot
        Divot = 0x2A,
        /// Dotted grid
        DottedGrid = 0x2B,
        /// Dotted diamond
        DottedDiamond = 0x2C,
        /// Shingle
        Shingle = 0x2D,
        /// Trellis
        Trellis = 0x2E,
        /// Sphere
        Sphere = 0x2F,
        /// Small grid
        SmallGrid = 0x30,
        /// Small checker board
        SmallCheckerBoard = 0x31,
        /// Large checker board
        LargeCheckerBoard = 0x32,
        /// Outlined diamond
        OutlinedDiamond = 0x33,
        /// Solid diamond
        SolidDiamond = 0x34,
    }
}

wire_enum! {
    /// Hotkey prefix handling of string formats.
    pub enum HotkeyPrefix {
        /// No hotkey processing
        None = 0x00,
        /// Underline the hotkey
        Show = 0x01,
        /// Hide the prefix
        Hide = 0x02,
    }
}

wire_enum! {
    /// Kind of data in an image object.
    pub enum ImageDataType {
        /// Unknown image type
        Unknown = 0x00,
        /// Bitmap
        Bitmap = 0x01,
        /// Metafile
        Metafile = 0x02,
    }
}

wire_enum! {
    /// Interpolation used when scaling images.
    pub enum InterpolationMode {
        /// Default
        Default = 0x00,
        /// Low quality
        LowQuality = 0x01,
        /// High quality
        HighQuality = 0x02,
        /// Bilinear
        Bilinear = 0x03,
        /// Bicubic
        Bicubic = 0x04,
        /// Nearest neighbor
        NearestNeighbor = 0x05,
        /// High quality bilinear
        HighQualityBilinear = 0x06,
        /// High quality bicubic
        HighQualityBicubic = 0x07,
    }
}

wire_enum! {
    /// Line cap styles.
    pub enum LineCapType {
        /// Flat
        Flat = 0x00,
        /// Square
        Square = 0x01,
        /// Round
        Round = 0x02,
        /// Triangle
        Triangle = 0x03,
        /// No anchor
        NoAnchor = 0x10,
        /// Square anchor
        SquareAnchor = 0x11,
        /// Round anchor
        RoundAnchor = 0x12,
        /// Diamond anchor
        DiamondAnchor = 0x13,
        /// Arrow anchor
        ArrowAnchor = 0x14,
        /// Custom cap
        Custom = 0xFF,
    }
}

wire_enum! {
    /// Line join styles.
    pub enum LineJoinType {
        /// Miter
        Miter = 0x00,
        /// Bevel
        Bevel = 0x01,
        /// Round
        Round = 0x02,
        /// Clipped miter
        MiterClipped = 0x03,
    }
}

wire_enum! {
    /// Predefined line styles of a pen.
    pub enum LineStyle {
        /// Solid
        Solid = 0x00,
        /// Dash
        Dash = 0x01,
        /// Dot
        Dot = 0x02,
        /// Dash dot
        DashDot = 0x03,
        /// Dash dot dot
        DashDotDot = 0x04,
        /// Custom dash data
        Custom = 0x05,
    }
}

wire_enum! {
    /// Kind of metafile embedded in an image object.
    pub enum MetafileDataType {
        /// WMF
        Wmf = 0x01,
        /// Placeable WMF
        WmfPlaceable = 0x02,
        /// EMF
        Emf = 0x03,
        /// EMF+ only
        EmfPlusOnly = 0x04,
        /// EMF+ dual mode
        EmfPlusDual = 0x05,
    }
}

wire_enum! {
    /// How the area outside an image is treated by image attributes.
    pub enum ObjectClamp {
        /// Clamp to the rectangle
        Rect = 0x00,
        /// Clamp to the bitmap
        Bitmap = 0x01,
    }
}

wire_enum! {
    /// Object kinds stored in the object table.
    pub enum ObjectType {
        /// Not an object, also the sentinel for failed lookups
        Invalid = 0x00,
        /// Brush
        Brush = 0x01,
        /// Pen
        Pen = 0x02,
        /// Path
        Path = 0x03,
        /// Region
        Region = 0x04,
        /// Image
        Image = 0x05,
        /// Font
        Font = 0x06,
        /// String format
        StringFormat = 0x07,
        /// Image attributes
        ImageAttributes = 0x08,
        /// Custom line cap
        CustomLineCap = 0x09,
    }
}

wire_enum! {
    /// Pen alignment relative to the stroked line.
    pub enum PenAlignment {
        /// Centered
        Center = 0x00,
        /// Inset
        Inset = 0x01,
        /// Left
        Left = 0x02,
        /// Outset
        Outset = 0x03,
        /// Right
        Right = 0x04,
    }
}

wire_enum! {
    /// Bitmap pixel formats.
    pub enum PixelFormat {
        /// Undefined
        Undefined = 0x0000_0000,
        /// 1 bpp palette indexed
        Indexed1bpp = 0x0003_0101,
        /// 4 bpp palette indexed
        Indexed4bpp = 0x0003_0402,
        /// 8 bpp palette indexed
        Indexed8bpp = 0x0003_0803,
        /// 16 bpp gray scale
        GrayScale16bpp = 0x0010_1004,
        /// 16 bpp RGB 555
        Rgb555_16bpp = 0x0002_1005,
        /// 16 bpp RGB 565
        Rgb565_16bpp = 0x0002_1006,
        /// 16 bpp ARGB 1555
        Argb1555_16bpp = 0x0006_1007,
        /// 24 bpp RGB
        Rgb24bpp = 0x0002_1808,
        /// 32 bpp RGB
        Rgb32bpp = 0x0002_2009,
        /// 32 bpp ARGB
        Argb32bpp = 0x0026_200A,
        /// 32 bpp premultiplied ARGB
        Pargb32bpp = 0x000E_200B,
        /// 48 bpp RGB
        Rgb48bpp = 0x0010_300C,
        /// 64 bpp ARGB
        Argb64bpp = 0x0034_400D,
        /// 64 bpp premultiplied ARGB
        Pargb64bpp = 0x001A_400E,
    }
}

impl PixelFormat {
    /// Returns `true` if pixels index into a palette.
    #[must_use]
    pub fn is_indexed(self) -> bool {
        self.value() & 0x0001_0000 != 0
    }

    /// Bits per pixel, taken from bits 8-15 of the format value.
    #[must_use]
    pub fn bits_per_pixel(self) -> u32 {
        (self.value() >> 8) & 0xFF
    }
}

wire_enum! {
    /// Pixel offset handling.
    pub enum PixelOffsetMode {
        /// Default
        Default = 0x00,
        /// High speed
        HighSpeed = 0x01,
        /// High quality
        HighQuality = 0x02,
        /// No offset
        None = 0x03,
        /// Half pixel offset
        Half = 0x04,
    }
}

wire_enum! {
    /// Kinds of region nodes.
    pub enum RegionNodeDataType {
        /// Child nodes, generic
        Kids = 0x0000_0000,
        /// Intersection of two children
        And = 0x0000_0001,
        /// Union of two children
        Or = 0x0000_0002,
        /// Symmetric difference of two children
        Xor = 0x0000_0003,
        /// First child minus second
        Exclude = 0x0000_0004,
        /// Second child minus first
        Complement = 0x0000_0005,
        /// A rectangle
        Rect = 0x1000_0000,
        /// A path
        Path = 0x1000_0001,
        /// Empty region
        Empty = 0x1000_0002,
        /// Infinite region
        Infinite = 0x1000_0003,
    }
}

wire_enum! {
    /// Anti-aliasing quality.
    pub enum SmoothingMode {
        /// Default
        Default = 0x00,
        /// High speed
        HighSpeed = 0x01,
        /// High quality
        HighQuality = 0x02,
        /// None
        None = 0x03,
        /// 8x4 box filter
        AntiAlias8x4 = 0x04,
        /// 8x8 box filter
        AntiAlias8x8 = 0x05,
    }
}

wire_enum! {
    /// Text alignment inside the layout rectangle.
    pub enum StringAlignment {
        /// Near edge
        Near = 0x00,
        /// Centered
        Center = 0x01,
        /// Far edge
        Far = 0x02,
    }
}

wire_enum! {
    /// Digit substitution.
    pub enum StringDigitSubstitution {
        /// User defined
        User = 0x00,
        /// None
        None = 0x01,
        /// National digits
        National = 0x02,
        /// Traditional digits
        Traditional = 0x03,
    }
}

wire_enum! {
    /// Trimming of text that does not fit.
    pub enum StringTrimming {
        /// No trimming
        None = 0x00,
        /// At a character
        Character = 0x01,
        /// At a word
        Word = 0x02,
        /// Ellipsis after a character
        EllipsisCharacter = 0x03,
        /// Ellipsis after a word
        EllipsisWord = 0x04,
        /// Ellipsis in the middle of a path
        EllipsisPath = 0x05,
    }
}

wire_enum! {
    /// Text rendering quality.
    pub enum TextRenderingHint {
        /// System default
        SystemDefault = 0x00,
        /// 1 bpp grid fit
        SingleBitPerPixelGridFit = 0x01,
        /// 1 bpp
        SingleBitPerPixel = 0x02,
        /// Antialiased grid fit
        AntialiasGridFit = 0x03,
        /// Antialiased
        Antialias = 0x04,
        /// ClearType grid fit
        ClearTypeGridFit = 0x05,
    }
}

wire_enum! {
    /// Units of measure.
    pub enum UnitType {
        /// World coordinates
        World = 0x00,
        /// Display units
        Display = 0x01,
        /// Pixels
        Pixel = 0x02,
        /// Points (1/72 inch)
        Point = 0x03,
        /// Inches
        Inch = 0x04,
        /// Document units (1/300 inch)
        Document = 0x05,
        /// Millimeters
        Millimeter = 0x06,
    }
}

wire_enum! {
    /// Tiling of textures and gradients.
    pub enum WrapMode {
        /// Tile
        Tile = 0x00,
        /// Tile, flipping every other column
        TileFlipX = 0x01,
        /// Tile, flipping every other row
        TileFlipY = 0x02,
        /// Tile, flipping columns and rows
        TileFlipXY = 0x03,
        /// No tiling
        Clamp = 0x04,
    }
}

wire_enum! {
    /// Base type of one path point.
    pub enum PathPointKind {
        /// Start of a figure
        Start = 0x00,
        /// Line end point
        Line = 0x01,
        /// Bezier control or end point
        Bezier = 0x03,
    }
}

wire_enum! {
    /// Image effects selectable through a serializable object record.
    pub enum ImageEffect {
        /// Blur
        Blur = 1,
        /// Brightness and contrast
        BrightnessContrast = 2,
        /// Color balance
        ColorBalance = 3,
        /// Color curve
        ColorCurve = 4,
        /// Color lookup table
        ColorLookupTable = 5,
        /// Color matrix
        ColorMatrix = 6,
        /// Hue, saturation and lightness
        HueSaturationLightness = 7,
        /// Levels
        Levels = 8,
        /// Red eye correction
        RedEyeCorrection = 9,
        /// Sharpen
        Sharpen = 10,
        /// Tint
        Tint = 11,
    }
}

wire_enum! {
    /// EMF+ record type, without the 0x4000 marker bit.
    pub enum RecordType {
        /// First record of every EMF+ stream
        Header = 0x01,
        /// Last record of every EMF+ stream
        EndOfFile = 0x02,
        /// Private data
        Comment = 0x03,
        /// Hand the device context back to EMF drawing
        GetDc = 0x04,
        /// Start of a multi-format block
        MultiFormatStart = 0x05,
        /// Section of a multi-format block
        MultiFormatSection = 0x06,
        /// End of a multi-format block
        MultiFormatEnd = 0x07,
        /// Object table entry definition
        Object = 0x08,
        /// Erase to a color
        Clear = 0x09,
        /// Fill rectangles
        FillRects = 0x0A,
        /// Outline rectangles
        DrawRects = 0x0B,
        /// Fill a polygon
        FillPolygon = 0x0C,
        /// Draw connected lines
        DrawLines = 0x0D,
        /// Fill an ellipse
        FillEllipse = 0x0E,
        /// Outline an ellipse
        DrawEllipse = 0x0F,
        /// Fill a pie
        FillPie = 0x10,
        /// Outline a pie
        DrawPie = 0x11,
        /// Draw an elliptical arc
        DrawArc = 0x12,
        /// Fill a region object
        FillRegion = 0x13,
        /// Fill a path object
        FillPath = 0x14,
        /// Outline a path object
        DrawPath = 0x15,
        /// Fill a closed cardinal spline
        FillClosedCurve = 0x16,
        /// Outline a closed cardinal spline
        DrawClosedCurve = 0x17,
        /// Draw an open cardinal spline
        DrawCurve = 0x18,
        /// Draw Bezier curves
        DrawBeziers = 0x19,
        /// Draw an image into a rectangle
        DrawImage = 0x1A,
        /// Draw an image into a parallelogram
        DrawImagePoints = 0x1B,
        /// Draw text in a layout rectangle
        DrawString = 0x1C,
        /// Set the dither origin
        SetRenderingOrigin = 0x1D,
        /// Set smoothing
        SetAntiAliasMode = 0x1E,
        /// Set text rendering quality
        SetTextRenderingHint = 0x1F,
        /// Set text gamma
        SetTextContrast = 0x20,
        /// Set image scaling quality
        SetInterpolationMode = 0x21,
        /// Set pixel centre offset
        SetPixelOffsetMode = 0x22,
        /// Set source blending
        SetCompositingMode = 0x23,
        /// Set blending quality
        SetCompositingQuality = 0x24,
        /// Push the graphics state
        Save = 0x25,
        /// Pop the graphics state
        Restore = 0x26,
        /// Open a graphics container with a transform
        BeginContainer = 0x27,
        /// Open a graphics container
        BeginContainerNoParams = 0x28,
        /// Close a graphics container
        EndContainer = 0x29,
        /// Replace the world transform
        SetWorldTransform = 0x2A,
        /// Reset the world transform
        ResetWorldTransform = 0x2B,
        /// Multiply the world transform
        MultiplyWorldTransform = 0x2C,
        /// Translate the world transform
        TranslateWorldTransform = 0x2D,
        /// Scale the world transform
        ScaleWorldTransform = 0x2E,
        /// Rotate the world transform
        RotateWorldTransform = 0x2F,
        /// Set page unit and scale
        SetPageTransform = 0x30,
        /// Reset the clip to infinite
        ResetClip = 0x31,
        /// Combine a rectangle into the clip
        SetClipRect = 0x32,
        /// Combine a path object into the clip
        SetClipPath = 0x33,
        /// Combine a region object into the clip
        SetClipRegion = 0x34,
        /// Translate the clip
        OffsetClip = 0x35,
        /// Draw positioned glyphs
        DrawDriverString = 0x36,
        /// Fill and outline a path object
        StrokeFillPath = 0x37,
        /// Image effect parameters for the next draw
        SerializableObject = 0x38,
        /// Terminal server graphics state
        SetTsGraphics = 0x39,
        /// Terminal server clip
        SetTsClip = 0x3A,
    }
}

/// Record names as the EMF+ manual spells them, indexed by record type. Entry 0 is the sentinel.
static RECORD_NAMES: [&str; 59] = [
    "EmfPlusInvalid",
    "EmfPlusHeader",
    "EmfPlusEndOfFile",
    "EmfPlusComment",
    "EmfPlusGetDC",
    "EmfPlusMultiFormatStart",
    "EmfPlusMultiFormatSection",
    "EmfPlusMultiFormatEnd",
    "EmfPlusObject",
    "EmfPlusClear",
    "EmfPlusFillRects",
    "EmfPlusDrawRects",
    "EmfPlusFillPolygon",
    "EmfPlusDrawLines",
    "EmfPlusFillEllipse",
    "EmfPlusDrawEllipse",
    "EmfPlusFillPie",
    "EmfPlusDrawPie",
    "EmfPlusDrawArc",
    "EmfPlusFillRegion",
    "EmfPlusFillPath",
    "EmfPlusDrawPath",
    "EmfPlusFillClosedCurve",
    "EmfPlusDrawClosedCurve",
    "EmfPlusDrawCurve",
    "EmfPlusDrawBeziers",
    "EmfPlusDrawImage",
    "EmfPlusDrawImagePoints",
    "EmfPlusDrawString",
    "EmfPlusSetRenderingOrigin",
    "EmfPlusSetAntiAliasMode",
    "EmfPlusSetTextRenderingHint",
    "EmfPlusSetTextContrast",
    "EmfPlusSetInterpolationMode",
    "EmfPlusSetPixelOffsetMode",
    "EmfPlusSetCompositingMode",
    "EmfPlusSetCompositingQuality",
    "EmfPlusSave",
    "EmfPlusRestore",
    "EmfPlusBeginContainer",
    "EmfPlusBeginContainerNoParams",
    "EmfPlusEndContainer",
    "EmfPlusSetWorldTransform",
    "EmfPlusResetWorldTransform",
    "EmfPlusMultiplyWorldTransform",
    "EmfPlusTranslateWorldTransform",
    "EmfPlusScaleWorldTransform",
    "EmfPlusRotateWorldTransform",
    "EmfPlusSetPageTransform",
    "EmfPlusResetClip",
    "EmfPlusSetClipRect",
    "EmfPlusSetClipPath",
    "EmfPlusSetClipRegion",
    "EmfPlusOffsetClip",
    "EmfPlusDrawDriverString",
    "EmfPlusStrokeFillPath",
    "EmfPlusSerializableObject",
    "EmfPlusSetTSGraphics",
    "EmfPlusSetTSClip",
];

impl RecordType {
    /// Smallest record type.
    pub const MIN: u16 = 0x01;
    /// Largest record type.
    pub const MAX: u16 = 0x3A;

    /// Name of the record as the EMF+ manual spells it, e.g. `EmfPlusDrawPath`.
    #[must_use]
    pub fn name(self) -> &'static str {
        record_name(self as u16)
    }
}

/// Name of a record type, with or without the 0x4000 marker bit.
///
/// Types outside of the format yield `EmfPlusInvalid`.
#[must_use]
pub fn record_name(record_type: u16) -> &'static str {
    let index = usize::from(record_type & 0x3FFF);
    if index > usize::from(RecordType::MAX) {
        return RECORD_NAMES[0];
    }
    RECORD_NAMES[index]
}

/// Narrow a 32-bit enumeration value to a 16-bit wire field.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if the value does not fit.
pub fn narrow_u16(what: &'static str, value: u32) -> crate::Result<u16> {
    u16::try_from(value).map_err(|_| crate::Error::OutOfRange {
        what,
        value: i64::from(value),
    })
}

/// Narrow a 32-bit enumeration value to an 8-bit wire field.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if the value does not fit.
pub fn narrow_u8(what: &'static str, value: u32) -> crate::Result<u8> {
    u8::try_from(value).map_err(|_| crate::Error::OutOfRange {
        what,
        value: i64::from(value),
    })
}
