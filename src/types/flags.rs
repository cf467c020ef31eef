//! Bit flag words stored inside EMF+ objects.
//!
//! These are the 32-bit (and a few 8-bit) flag fields of object payloads. The per-record flag
//! word of the common header is handled separately in [`crate::records::flags`], because its bits
//! mean different things for every record type.

use bitflags::bitflags;

bitflags! {
    /// Optional data present in gradient and texture brush data.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BrushDataFlags: u32 {
        /// Boundary is a path rather than a point list
        const PATH = 0x0001;
        /// A transform matrix follows
        const TRANSFORM = 0x0002;
        /// Preset blend colors follow
        const PRESET_COLORS = 0x0004;
        /// Horizontal blend factors follow
        const BLEND_FACTORS_H = 0x0008;
        /// Vertical blend factors follow
        const BLEND_FACTORS_V = 0x0010;
        /// Focus scales follow
        const FOCUS_SCALES = 0x0040;
        /// Gamma correction applies
        const IS_GAMMA_CORRECTED = 0x0080;
        /// World transform does not apply to the brush
        const DO_NOT_TRANSFORM = 0x0100;
    }
}

bitflags! {
    /// Optional paths of a default custom line cap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CustomLineCapDataFlags: u32 {
        /// A fill path follows
        const FILL_PATH = 0x01;
        /// A line path follows
        const LINE_PATH = 0x02;
    }
}

bitflags! {
    /// Options of a driver string record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DriverStringOptions: u32 {
        /// Glyph values are character codes to be mapped through the font
        const CMAP_LOOKUP = 0x01;
        /// Text is drawn vertically
        const VERTICAL = 0x02;
        /// Only the first glyph position is given, the rest are realized
        const REALIZED_ADVANCE = 0x04;
        /// Limit sub-pixel positioning
        const LIMIT_SUBPIXEL = 0x08;
    }
}

bitflags! {
    /// Font style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u32 {
        /// Bold
        const BOLD = 0x01;
        /// Italic
        const ITALIC = 0x02;
        /// Underline
        const UNDERLINE = 0x04;
        /// Strike out
        const STRIKEOUT = 0x08;
    }
}

bitflags! {
    /// Palette style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PaletteStyle: u32 {
        /// Entries carry alpha
        const HAS_ALPHA = 0x01;
        /// Gray scale palette
        const GRAY_SCALE = 0x02;
        /// Halftone palette
        const HALFTONE = 0x04;
    }
}

bitflags! {
    /// Flags in the high nibble of a path point type byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PathPointFlags: u8 {
        /// Dash mode, undocumented
        const DASH_MODE = 0x10;
        /// Marker
        const PATH_MARKER = 0x20;
        /// Point closes the current sub path
        const CLOSE_SUBPATH = 0x80;
    }
}

bitflags! {
    /// Optional fields present in pen data, in wire order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PenDataFlags: u32 {
        /// Transform matrix
        const TRANSFORM = 0x0001;
        /// Start cap
        const START_CAP = 0x0002;
        /// End cap
        const END_CAP = 0x0004;
        /// Line join
        const JOIN = 0x0008;
        /// Miter limit
        const MITER_LIMIT = 0x0010;
        /// Line style
        const LINE_STYLE = 0x0020;
        /// Dashed line cap
        const DL_CAP = 0x0040;
        /// Dashed line offset
        const DL_OFFSET = 0x0080;
        /// Dashed line data
        const DL_DATA = 0x0100;
        /// Pen alignment
        const NON_CENTER = 0x0200;
        /// Compound line data
        const CL_DATA = 0x0400;
        /// Custom start cap
        const CUSTOM_START_CAP = 0x0800;
        /// Custom end cap
        const CUSTOM_END_CAP = 0x1000;
    }
}

bitflags! {
    /// String format flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StringFormatFlags: u32 {
        /// Right to left
        const DIRECTION_RIGHT_TO_LEFT = 0x0000_0001;
        /// Vertical
        const DIRECTION_VERTICAL = 0x0000_0002;
        /// Glyphs may extend past the layout box
        const NO_FIT_BLACK_BOX = 0x0000_0004;
        /// Show control characters
        const DISPLAY_FORMAT_CONTROL = 0x0000_0020;
        /// Do not fall back to other fonts
        const NO_FONT_FALLBACK = 0x0000_0400;
        /// Include trailing spaces in measurement
        const MEASURE_TRAILING_SPACES = 0x0000_0800;
        /// Do not wrap
        const NO_WRAP = 0x0000_1000;
        /// Whole lines only
        const LINE_LIMIT = 0x0000_2000;
        /// Do not clip
        const NO_CLIP = 0x0000_4000;
        /// Bypass GDI
        const BYPASS_GDI = 0x8000_0000;
    }
}

bitflags! {
    /// Flags of the EMF+ header record payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EmfPlusFlags: u32 {
        /// The reference device was a video display
        const VIDEO_DISPLAY = 0x0000_0001;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_flags_order() {
        let all = PenDataFlags::all();
        assert_eq!(all.bits(), 0x1FFF);
        assert!(PenDataFlags::from_bits(0x2000).is_none());
        assert_eq!(
            PenDataFlags::from_bits_truncate(0x2003),
            PenDataFlags::TRANSFORM | PenDataFlags::START_CAP
        );
    }

    #[test]
    fn test_brush_data_flags() {
        let flags = BrushDataFlags::from_bits_truncate(0x0006);
        assert!(flags.contains(BrushDataFlags::TRANSFORM));
        assert!(flags.contains(BrushDataFlags::PRESET_COLORS));
        assert!(!flags.contains(BrushDataFlags::PATH));
    }
}
