//! Fixed-layout geometry and color values.
//!
//! All of these are plain `Copy` structs implementing [`crate::serial::Wire`], so they can be read
//! and written individually or as arrays through [`crate::serial::Parser::read_array`] and
//! [`crate::serial::Field::Item`].
//!
//! The module also carries the small amount of affine math the writer helpers need: applying an
//! EMF style transform to points and rectangles, and building the matrix that maps a unit linear
//! gradient onto a rectangle.

use crate::{
    serial::{io::push_le, Parser, Wire},
    Result,
};

/// A 32-bit color. On the wire the channels are stored blue, green, red, alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb {
    /// Blue channel
    pub blue: u8,
    /// Green channel
    pub green: u8,
    /// Red channel
    pub red: u8,
    /// Alpha channel, 0xFF is opaque
    pub alpha: u8,
}

impl Argb {
    /// Build a color from its channels.
    #[must_use]
    pub fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Argb {
            blue,
            green,
            red,
            alpha,
        }
    }

    /// Pack into the 32-bit value `0xAARRGGBB`, which is also the little-endian wire word.
    #[must_use]
    pub fn to_u32(self) -> u32 {
        u32::from_le_bytes([self.blue, self.green, self.red, self.alpha])
    }

    /// Unpack from the 32-bit value `0xAARRGGBB`.
    #[must_use]
    pub fn from_u32(value: u32) -> Self {
        let [blue, green, red, alpha] = value.to_le_bytes();
        Argb {
            blue,
            green,
            red,
            alpha,
        }
    }
}

impl Wire for Argb {
    const SIZE: usize = 4;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(Argb::from_u32(parser.read_le::<u32>()?))
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.blue, self.green, self.red, self.alpha]);
    }
}

/// A point with 16-bit integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point16 {
    /// X coordinate
    pub x: i16,
    /// Y coordinate
    pub y: i16,
}

impl Wire for Point16 {
    const SIZE: usize = 4;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(Point16 {
            x: parser.read_le()?,
            y: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.x);
        push_le(out, self.y);
    }
}

/// A point with single precision coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl PointF {
    /// Build a point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        PointF { x, y }
    }
}

impl Wire for PointF {
    const SIZE: usize = 8;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(PointF {
            x: parser.read_le()?,
            y: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.x);
        push_le(out, self.y);
    }
}

/// A rectangle with 16-bit integer position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect16 {
    /// Left edge
    pub x: i16,
    /// Top edge
    pub y: i16,
    /// Width
    pub width: i16,
    /// Height
    pub height: i16,
}

impl Wire for Rect16 {
    const SIZE: usize = 8;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(Rect16 {
            x: parser.read_le()?,
            y: parser.read_le()?,
            width: parser.read_le()?,
            height: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.x);
        push_le(out, self.y);
        push_le(out, self.width);
        push_le(out, self.height);
    }
}

/// A rectangle with single precision position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl RectF {
    /// Build a rectangle.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        RectF {
            x,
            y,
            width,
            height,
        }
    }
}

impl Wire for RectF {
    const SIZE: usize = 16;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(RectF {
            x: parser.read_le()?,
            y: parser.read_le()?,
            width: parser.read_le()?,
            height: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.x);
        push_le(out, self.y);
        push_le(out, self.width);
        push_le(out, self.height);
    }
}

/// A rectangle given by 32-bit edges, used by red eye correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RectL {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge
    pub right: i32,
    /// Bottom edge
    pub bottom: i32,
}

impl Wire for RectL {
    const SIZE: usize = 16;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(RectL {
            left: parser.read_le()?,
            top: parser.read_le()?,
            right: parser.read_le()?,
            bottom: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.left);
        push_le(out, self.top);
        push_le(out, self.right);
        push_le(out, self.bottom);
    }
}

/// A range of characters in a string format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharacterRange {
    /// Index of the first character
    pub first: i32,
    /// Number of characters
    pub length: i32,
}

impl Wire for CharacterRange {
    const SIZE: usize = 8;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(CharacterRange {
            first: parser.read_le()?,
            length: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_le(out, self.first);
        push_le(out, self.length);
    }
}

/// An affine transform. A point maps as `x' = m11*x + m21*y + dx`, `y' = m12*x + m22*y + dy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    /// Row 1 column 1
    pub m11: f32,
    /// Row 1 column 2
    pub m12: f32,
    /// Row 2 column 1
    pub m21: f32,
    /// Row 2 column 2
    pub m22: f32,
    /// Horizontal translation
    pub dx: f32,
    /// Vertical translation
    pub dy: f32,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformMatrix {
    /// The identity transform.
    pub const IDENTITY: TransformMatrix = TransformMatrix {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// Build a matrix from its six elements.
    #[must_use]
    pub fn new(m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> Self {
        TransformMatrix {
            m11,
            m12,
            m21,
            m22,
            dx,
            dy,
        }
    }

    /// Apply the transform to one point.
    #[must_use]
    pub fn apply(&self, point: PointF) -> PointF {
        PointF {
            x: self.m11 * point.x + self.m21 * point.y + self.dx,
            y: self.m12 * point.x + self.m22 * point.y + self.dy,
        }
    }
}

impl Wire for TransformMatrix {
    const SIZE: usize = 24;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        Ok(TransformMatrix {
            m11: parser.read_le()?,
            m12: parser.read_le()?,
            m21: parser.read_le()?,
            m22: parser.read_le()?,
            dx: parser.read_le()?,
            dy: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        for value in [self.m11, self.m12, self.m21, self.m22, self.dx, self.dy] {
            push_le(out, value);
        }
    }
}

impl_encode!(Argb, Point16, PointF, Rect16, RectF, RectL, CharacterRange, TransformMatrix);

/// Apply `xform` to every point.
#[must_use]
pub fn pointfs_transform(points: &[PointF], xform: &TransformMatrix) -> Vec<PointF> {
    points.iter().map(|point| xform.apply(*point)).collect()
}

/// Apply `xform` to every rectangle.
///
/// The top left and bottom right corners are transformed and the result spans between them. This
/// is exact for translations and scales, which is what rectangle records can express.
#[must_use]
pub fn rectfs_transform(rects: &[RectF], xform: &TransformMatrix) -> Vec<RectF> {
    rects
        .iter()
        .map(|rect| {
            let top_left = xform.apply(PointF::new(rect.x, rect.y));
            let bottom_right = xform.apply(PointF::new(rect.x + rect.width, rect.y + rect.height));
            RectF {
                x: top_left.x,
                y: top_left.y,
                width: bottom_right.x - top_left.x,
                height: bottom_right.y - top_left.y,
            }
        })
        .collect()
}

/// Matrix placing a linear gradient of unit period onto a rectangle.
///
/// The gradient runs along `angle` degrees (clockwise from the x axis) and repeats `periods` times
/// across the extent of the `w` x `h` rectangle projected onto that direction. The origin of the
/// gradient is moved to (`x`, `y`).
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if `periods` is not a positive finite number.
#[allow(clippy::cast_possible_truncation)]
pub fn tm_for_gradrect(
    angle: f32,
    w: f32,
    h: f32,
    x: f32,
    y: f32,
    periods: f32,
) -> Result<TransformMatrix> {
    if !(periods.is_finite() && periods > 0.0) {
        return Err(crate::Error::OutOfRange {
            what: "gradient periods",
            value: periods as i64,
        });
    }

    let radians = f64::from(angle).to_radians();
    let (sin, cos) = radians.sin_cos();
    let extent = (f64::from(w) * cos).abs() + (f64::from(h) * sin).abs();
    let scale = extent / f64::from(periods);

    Ok(TransformMatrix {
        m11: (scale * cos) as f32,
        m12: (scale * sin) as f32,
        m21: (-scale * sin) as f32,
        m22: (scale * cos) as f32,
        dx: x,
        dy: y,
    })
}

/// Round float points to 16-bit integer points.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if a coordinate does not fit in an `i16` after rounding.
pub fn points_to_i16(points: &[PointF]) -> Result<Vec<Point16>> {
    points
        .iter()
        .map(|point| {
            Ok(Point16 {
                x: f32_to_i16(point.x)?,
                y: f32_to_i16(point.y)?,
            })
        })
        .collect()
}

/// Round float rectangles to 16-bit integer rectangles.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if a value does not fit in an `i16` after rounding.
pub fn rects_to_i16(rects: &[RectF]) -> Result<Vec<Rect16>> {
    rects
        .iter()
        .map(|rect| {
            Ok(Rect16 {
                x: f32_to_i16(rect.x)?,
                y: f32_to_i16(rect.y)?,
                width: f32_to_i16(rect.width)?,
                height: f32_to_i16(rect.height)?,
            })
        })
        .collect()
}

/// Round one coordinate to `i16`.
///
/// # Errors
/// Returns [`crate::Error::OutOfRange`] if the rounded value does not fit.
#[allow(clippy::cast_possible_truncation)]
pub fn f32_to_i16(value: f32) -> Result<i16> {
    let rounded = value.round();
    if !(f32::from(i16::MIN)..=f32::from(i16::MAX)).contains(&rounded) {
        return Err(crate::Error::OutOfRange {
            what: "16-bit coordinate",
            value: rounded as i64,
        });
    }
    Ok(rounded as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::{serialize, Field};
    use crate::Oid;

    #[test]
    fn test_argb_wire_order() {
        let color = Argb::new(0xFF, 0x11, 0x22, 0x33);
        let po = serialize(Oid::Argb, &[Field::Item(&color)]).unwrap();
        assert_eq!(po.data(), &[0x33, 0x22, 0x11, 0xFF]);
        assert_eq!(color.to_u32(), 0xFF11_2233);

        let mut parser = Parser::new(po.data());
        assert_eq!(parser.read::<Argb>().unwrap(), color);
    }

    #[test]
    fn test_rectf_round_trip() {
        let rect = RectF::new(-1.5, 2.25, 100.0, f32::MIN_POSITIVE);
        let mut out = Vec::new();
        rect.write(&mut out);
        assert_eq!(out.len(), RectF::SIZE);
        let decoded: RectF = Parser::new(&out).read().unwrap();
        assert_eq!(decoded.x.to_bits(), rect.x.to_bits());
        assert_eq!(decoded.height.to_bits(), rect.height.to_bits());
    }

    #[test]
    fn test_matrix_round_trip_and_apply() {
        let matrix = TransformMatrix::new(2.0, 0.0, 0.0, 3.0, 10.0, -5.0);
        let mut out = Vec::new();
        matrix.write(&mut out);
        let decoded: TransformMatrix = Parser::new(&out).read().unwrap();
        assert_eq!(decoded, matrix);

        let moved = matrix.apply(PointF::new(1.0, 1.0));
        assert_eq!(moved, PointF::new(12.0, -2.0));
    }

    #[test]
    fn test_truncated_values_fail() {
        assert!(Parser::new(&[0u8; 23]).read::<TransformMatrix>().is_err());
        assert!(Parser::new(&[0u8; 7]).read::<PointF>().is_err());
        assert!(Parser::new(&[]).read::<Argb>().is_err());
    }

    #[test]
    fn test_rectfs_transform() {
        let matrix = TransformMatrix::new(2.0, 0.0, 0.0, 2.0, 1.0, 1.0);
        let rects = rectfs_transform(&[RectF::new(0.0, 0.0, 5.0, 10.0)], &matrix);
        assert_eq!(rects, vec![RectF::new(1.0, 1.0, 10.0, 20.0)]);

        let points = pointfs_transform(&[PointF::new(1.0, 2.0)], &matrix);
        assert_eq!(points, vec![PointF::new(3.0, 5.0)]);
    }

    #[test]
    fn test_tm_for_gradrect() {
        let tm = tm_for_gradrect(0.0, 100.0, 50.0, 10.0, 20.0, 4.0).unwrap();
        assert!((tm.m11 - 25.0).abs() < 1e-4);
        assert!(tm.m12.abs() < 1e-4);
        assert_eq!((tm.dx, tm.dy), (10.0, 20.0));

        let tm = tm_for_gradrect(90.0, 100.0, 50.0, 0.0, 0.0, 1.0).unwrap();
        assert!((tm.m12 - 50.0).abs() < 1e-3);

        assert!(tm_for_gradrect(0.0, 1.0, 1.0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_points_to_i16() {
        let points = points_to_i16(&[PointF::new(1.4, -2.6)]).unwrap();
        assert_eq!(points, vec![Point16 { x: 1, y: -3 }]);
        assert!(points_to_i16(&[PointF::new(40000.0, 0.0)]).is_err());
    }
}
