//! Gradient brush payloads and their blend data.
//!
//! The optional parts of a gradient follow the fixed part in a flag-driven order: a transform
//! matrix, then either preset colors or blend factors, then (path gradients only) focus scales.
//! The presence bits of [`BrushDataFlags`] are derived from the optional fields on encode, only
//! the gamma and transform-exemption bits are stored.

use crate::{
    objects::{count_u32, decode_sized, encode_sized, read_count, EmfObject, PathObject},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{Argb, BrushDataFlags, PointF, RectF, TransformMatrix, WrapMode},
    Error, Result,
};

/// Flag bits kept as stored state rather than derived from optional data.
const STORED_FLAGS: BrushDataFlags =
    BrushDataFlags::IS_GAMMA_CORRECTED.union(BrushDataFlags::DO_NOT_TRANSFORM);

/// Colors at positions along a gradient.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlendColors {
    /// Positions in 0.0..=1.0
    pub positions: Vec<f32>,
    /// One color per position
    pub colors: Vec<Argb>,
}

impl BlendColors {
    /// `elements` evenly spaced colors interpolated from `start` to `end`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] for fewer than 2 elements.
    pub fn linear(elements: usize, start: Argb, end: Argb) -> Result<Self> {
        let positions = linear_positions(elements)?;
        let colors = positions
            .iter()
            .map(|&t| {
                Argb::new(
                    lerp_u8(start.alpha, end.alpha, t),
                    lerp_u8(start.red, end.red, t),
                    lerp_u8(start.green, end.green, t),
                    lerp_u8(start.blue, end.blue, t),
                )
            })
            .collect();
        Ok(BlendColors { positions, colors })
    }
}

impl EmfObject for BlendColors {
    const OID: Oid = Oid::BlendColors;

    fn encode(&self) -> Result<PseudoObject> {
        check_pairs("blend colors", self.positions.len(), self.colors.len())?;
        serialize(
            Self::OID,
            &[
                Field::U32(count_u32("blend colors", self.positions.len())?),
                Field::Item(&self.positions),
                Field::Item(&self.colors),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let count = read_count(parser)?;
        parser.ensure_elements(count, 8)?;
        Ok(BlendColors {
            positions: parser.read_array(count)?,
            colors: parser.read_array(count)?,
        })
    }
}

/// Blend factors at positions along a gradient.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlendFactors {
    /// Positions in 0.0..=1.0
    pub positions: Vec<f32>,
    /// One factor per position
    pub factors: Vec<f32>,
}

impl BlendFactors {
    /// `elements` evenly spaced factors interpolated from `start` to `end`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] for fewer than 2 elements.
    pub fn linear(elements: usize, start: f32, end: f32) -> Result<Self> {
        let positions = linear_positions(elements)?;
        let factors = positions.iter().map(|&t| start + (end - start) * t).collect();
        Ok(BlendFactors { positions, factors })
    }
}

impl EmfObject for BlendFactors {
    const OID: Oid = Oid::BlendFactors;

    fn encode(&self) -> Result<PseudoObject> {
        check_pairs("blend factors", self.positions.len(), self.factors.len())?;
        serialize(
            Self::OID,
            &[
                Field::U32(count_u32("blend factors", self.positions.len())?),
                Field::Item(&self.positions),
                Field::Item(&self.factors),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let count = read_count(parser)?;
        parser.ensure_elements(count, 8)?;
        Ok(BlendFactors {
            positions: parser.read_array(count)?,
            factors: parser.read_array(count)?,
        })
    }
}

/// Focus scales of a path gradient.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FocusScaleData {
    /// Horizontal scale in 0.0..=1.0
    pub scale_x: f32,
    /// Vertical scale in 0.0..=1.0
    pub scale_y: f32,
}

impl EmfObject for FocusScaleData {
    const OID: Oid = Oid::FocusScaleData;

    fn encode(&self) -> Result<PseudoObject> {
        serialize(
            Self::OID,
            &[Field::U32(2), Field::F32(self.scale_x), Field::F32(self.scale_y)],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let count: u32 = parser.read_le()?;
        if count != 2 {
            return Err(malformed_error!("Focus scale count {} instead of 2", count));
        }
        Ok(FocusScaleData {
            scale_x: parser.read_le()?,
            scale_y: parser.read_le()?,
        })
    }
}

/// Blend data of a linear gradient.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LinearBlend {
    /// Plain two-color gradient
    #[default]
    None,
    /// Preset colors
    Colors(BlendColors),
    /// Horizontal and/or vertical blend factors
    Factors {
        /// Horizontal factors
        horizontal: Option<BlendFactors>,
        /// Vertical factors
        vertical: Option<BlendFactors>,
    },
}

/// Linear gradient brush payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientBrushData {
    /// Gamma correction and transform exemption bits
    pub flags: BrushDataFlags,
    /// Tiling behaviour outside the rectangle
    pub wrap_mode: WrapMode,
    /// Upper left is the start, lower right the end of the gradient
    pub rect: RectF,
    /// Start color
    pub start_color: Argb,
    /// End color
    pub end_color: Argb,
    /// Brush transform
    pub transform: Option<TransformMatrix>,
    /// Blend data
    pub blend: LinearBlend,
}

impl LinearGradientBrushData {
    /// A two-color gradient across `rect`.
    #[must_use]
    pub fn new(rect: RectF, start_color: Argb, end_color: Argb, wrap_mode: WrapMode) -> Self {
        LinearGradientBrushData {
            flags: BrushDataFlags::empty(),
            wrap_mode,
            rect,
            start_color,
            end_color,
            transform: None,
            blend: LinearBlend::None,
        }
    }

    /// The flags word written for this payload.
    #[must_use]
    pub fn data_flags(&self) -> BrushDataFlags {
        let mut flags = self.flags & STORED_FLAGS;
        flags.set(BrushDataFlags::TRANSFORM, self.transform.is_some());
        match &self.blend {
            LinearBlend::None => {}
            LinearBlend::Colors(_) => flags |= BrushDataFlags::PRESET_COLORS,
            LinearBlend::Factors {
                horizontal,
                vertical,
            } => {
                flags.set(BrushDataFlags::BLEND_FACTORS_H, horizontal.is_some());
                flags.set(BrushDataFlags::BLEND_FACTORS_V, vertical.is_some());
            }
        }
        flags
    }
}

impl EmfObject for LinearGradientBrushData {
    const OID: Oid = Oid::LinearGradientBrushData;

    fn encode(&self) -> Result<PseudoObject> {
        let mut optional = Vec::new();
        if let Some(transform) = &self.transform {
            optional.extend_from_slice(transform.encode_object()?.data());
        }
        match &self.blend {
            LinearBlend::None => {}
            LinearBlend::Colors(colors) => optional.extend_from_slice(colors.encode()?.data()),
            LinearBlend::Factors {
                horizontal,
                vertical,
            } => {
                for factors in [horizontal, vertical].into_iter().flatten() {
                    optional.extend_from_slice(factors.encode()?.data());
                }
            }
        }

        // The reserved words repeat the colors, some readers refuse the gradient otherwise.
        serialize(
            Self::OID,
            &[
                Field::U32(self.data_flags().bits()),
                Field::U32(self.wrap_mode.value()),
                Field::Item(&self.rect),
                Field::Item(&self.start_color),
                Field::Item(&self.end_color),
                Field::Item(&self.start_color),
                Field::Item(&self.end_color),
                Field::Bytes(&optional),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let flags = BrushDataFlags::from_bits_retain(parser.read_le()?);
        let wrap_mode = WrapMode::try_from(parser.read_le::<u32>()?)?;
        let rect = parser.read()?;
        let start_color = parser.read()?;
        let end_color = parser.read()?;
        parser.advance_by(8)?;

        let transform = read_transform(parser, flags)?;
        let blend = if flags.contains(BrushDataFlags::PRESET_COLORS) {
            LinearBlend::Colors(BlendColors::decode(parser)?)
        } else if flags
            .intersects(BrushDataFlags::BLEND_FACTORS_H | BrushDataFlags::BLEND_FACTORS_V)
        {
            let horizontal = flags
                .contains(BrushDataFlags::BLEND_FACTORS_H)
                .then(|| BlendFactors::decode(parser))
                .transpose()?;
            let vertical = flags
                .contains(BrushDataFlags::BLEND_FACTORS_V)
                .then(|| BlendFactors::decode(parser))
                .transpose()?;
            LinearBlend::Factors {
                horizontal,
                vertical,
            }
        } else {
            LinearBlend::None
        };

        Ok(LinearGradientBrushData {
            flags: flags & STORED_FLAGS,
            wrap_mode,
            rect,
            start_color,
            end_color,
            transform,
            blend,
        })
    }
}

/// Outline of a path gradient.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// A path object
    Path(PathObject),
    /// A closed polygon
    Points(Vec<PointF>),
}

/// Blend data of a path gradient.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PathBlend {
    /// Plain center to boundary gradient
    #[default]
    None,
    /// Preset colors
    Colors(BlendColors),
    /// Blend factors
    Factors(BlendFactors),
}

/// Path gradient brush payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGradientBrushData {
    /// Gamma correction and transform exemption bits
    pub flags: BrushDataFlags,
    /// Tiling behaviour outside the boundary
    pub wrap_mode: WrapMode,
    /// Color at the center point
    pub center_color: Argb,
    /// Center point
    pub center: PointF,
    /// Colors along the boundary
    pub surrounding_colors: Vec<Argb>,
    /// Outline
    pub boundary: Boundary,
    /// Brush transform
    pub transform: Option<TransformMatrix>,
    /// Blend data
    pub blend: PathBlend,
    /// Focus scales
    pub focus_scale: Option<FocusScaleData>,
}

impl PathGradientBrushData {
    /// The flags word written for this payload.
    #[must_use]
    pub fn data_flags(&self) -> BrushDataFlags {
        let mut flags = self.flags & STORED_FLAGS;
        flags.set(BrushDataFlags::PATH, matches!(self.boundary, Boundary::Path(_)));
        flags.set(BrushDataFlags::TRANSFORM, self.transform.is_some());
        flags.set(
            BrushDataFlags::PRESET_COLORS,
            matches!(self.blend, PathBlend::Colors(_)),
        );
        flags.set(
            BrushDataFlags::BLEND_FACTORS_H,
            matches!(self.blend, PathBlend::Factors(_)),
        );
        flags.set(BrushDataFlags::FOCUS_SCALES, self.focus_scale.is_some());
        flags
    }
}

impl EmfObject for PathGradientBrushData {
    const OID: Oid = Oid::PathGradientBrushData;

    fn encode(&self) -> Result<PseudoObject> {
        let boundary = match &self.boundary {
            Boundary::Path(path) => encode_sized(path)?,
            Boundary::Points(points) => {
                let count = count_u32("boundary points", points.len())?;
                serialize(
                    Oid::BoundaryPointData,
                    &[Field::U32(count), Field::Item(points)],
                )?
                .into_data()
            }
        };

        let mut optional = Vec::new();
        if let Some(transform) = &self.transform {
            optional.extend_from_slice(transform.encode_object()?.data());
        }
        match &self.blend {
            PathBlend::None => {}
            PathBlend::Colors(colors) => optional.extend_from_slice(colors.encode()?.data()),
            PathBlend::Factors(factors) => optional.extend_from_slice(factors.encode()?.data()),
        }
        if let Some(focus) = &self.focus_scale {
            optional.extend_from_slice(focus.encode()?.data());
        }

        serialize(
            Self::OID,
            &[
                Field::U32(self.data_flags().bits()),
                Field::U32(self.wrap_mode.value()),
                Field::Item(&self.center_color),
                Field::Item(&self.center),
                Field::U32(count_u32("surrounding colors", self.surrounding_colors.len())?),
                Field::Item(&self.surrounding_colors),
                Field::Bytes(&boundary),
                Field::Bytes(&optional),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let flags = BrushDataFlags::from_bits_retain(parser.read_le()?);
        let wrap_mode = WrapMode::try_from(parser.read_le::<u32>()?)?;
        let center_color = parser.read()?;
        let center = parser.read()?;
        let count = read_count(parser)?;
        let surrounding_colors = parser.read_array(count)?;

        let boundary = if flags.contains(BrushDataFlags::PATH) {
            Boundary::Path(decode_sized(parser)?)
        } else {
            let count = read_count(parser)?;
            Boundary::Points(parser.read_array(count)?)
        };

        let transform = read_transform(parser, flags)?;
        let blend = if flags.contains(BrushDataFlags::PRESET_COLORS) {
            PathBlend::Colors(BlendColors::decode(parser)?)
        } else if flags.contains(BrushDataFlags::BLEND_FACTORS_H) {
            PathBlend::Factors(BlendFactors::decode(parser)?)
        } else {
            PathBlend::None
        };
        let focus_scale = flags
            .contains(BrushDataFlags::FOCUS_SCALES)
            .then(|| FocusScaleData::decode(parser))
            .transpose()?;

        Ok(PathGradientBrushData {
            flags: flags & STORED_FLAGS,
            wrap_mode,
            center_color,
            center,
            surrounding_colors,
            boundary,
            transform,
            blend,
            focus_scale,
        })
    }
}

impl TransformMatrix {
    /// Serialize the matrix as a standalone object.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the buffer cannot be reserved.
    pub fn encode_object(&self) -> Result<PseudoObject> {
        serialize(Oid::TransformMatrix, &[Field::Item(self)])
    }
}

pub(crate) fn read_transform(
    parser: &mut Parser<'_>,
    flags: BrushDataFlags,
) -> Result<Option<TransformMatrix>> {
    flags
        .contains(BrushDataFlags::TRANSFORM)
        .then(|| parser.read())
        .transpose()
}

#[allow(clippy::cast_precision_loss)]
fn linear_positions(elements: usize) -> Result<Vec<f32>> {
    if elements < 2 {
        return Err(Error::OutOfRange {
            what: "linear blend elements",
            value: i64::try_from(elements).unwrap_or(i64::MAX),
        });
    }
    let last = (elements - 1) as f32;
    Ok((0..elements).map(|i| i as f32 / last).collect())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_u8(start: u8, end: u8, t: f32) -> u8 {
    let value = f32::from(start) + (f32::from(end) - f32::from(start)) * t;
    value.round().clamp(0.0, 255.0) as u8
}

fn check_pairs(what: &str, positions: usize, values: usize) -> Result<()> {
    if positions != values {
        return Err(Error::Schema(format!(
            "{} has {} positions but {} values",
            what, positions, values
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        objects::GraphicsVersion,
        path::PathBuilder,
        types::PathPointFlags,
    };

    const RED: Argb = Argb {
        blue: 0,
        green: 0,
        red: 0xFF,
        alpha: 0xFF,
    };
    const BLUE: Argb = Argb {
        blue: 0xFF,
        green: 0,
        red: 0,
        alpha: 0xFF,
    };

    #[test]
    fn test_linear_blend_colors() {
        let blend = BlendColors::linear(3, RED, BLUE).unwrap();
        assert_eq!(blend.positions, vec![0.0, 0.5, 1.0]);
        assert_eq!(blend.colors[1], Argb::new(0xFF, 0x80, 0, 0x80));
        assert!(BlendColors::linear(1, RED, BLUE).is_err());

        let po = blend.encode().unwrap();
        assert_eq!(po.len(), 4 + 3 * 8);
        assert_eq!(BlendColors::parse(po.data()).unwrap(), blend);
    }

    #[test]
    fn test_linear_blend_factors() {
        let blend = BlendFactors::linear(5, 0.0, 1.0).unwrap();
        assert_eq!(blend.factors, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        let mismatched = BlendFactors {
            positions: vec![0.0],
            factors: vec![],
        };
        assert!(mismatched.encode().is_err());
    }

    #[test]
    fn test_linear_gradient_optional_order() {
        let mut data = LinearGradientBrushData::new(
            RectF::new(0.0, 0.0, 100.0, 50.0),
            RED,
            BLUE,
            WrapMode::Tile,
        );
        data.flags = BrushDataFlags::IS_GAMMA_CORRECTED;
        data.transform = Some(TransformMatrix::new(2.0, 0.0, 0.0, 2.0, 5.0, 5.0));
        data.blend = LinearBlend::Factors {
            horizontal: None,
            vertical: Some(BlendFactors::linear(2, 0.0, 1.0).unwrap()),
        };

        assert_eq!(
            data.data_flags(),
            BrushDataFlags::IS_GAMMA_CORRECTED
                | BrushDataFlags::TRANSFORM
                | BrushDataFlags::BLEND_FACTORS_V
        );

        let po = data.encode().unwrap();
        assert_eq!(po.len(), 40 + 24 + 20);
        // reserved words mirror the colors
        assert_eq!(&po.data()[32..40], &po.data()[24..32]);
        assert_eq!(LinearGradientBrushData::parse(po.data()).unwrap(), data);
    }

    #[test]
    fn test_path_gradient_with_points() {
        let data = PathGradientBrushData {
            flags: BrushDataFlags::empty(),
            wrap_mode: WrapMode::Clamp,
            center_color: RED,
            center: PointF::new(5.0, 5.0),
            surrounding_colors: vec![BLUE],
            boundary: Boundary::Points(vec![
                PointF::new(0.0, 0.0),
                PointF::new(10.0, 0.0),
                PointF::new(5.0, 10.0),
            ]),
            transform: None,
            blend: PathBlend::Colors(BlendColors::linear(2, RED, BLUE).unwrap()),
            focus_scale: Some(FocusScaleData {
                scale_x: 0.5,
                scale_y: 0.25,
            }),
        };
        let po = data.encode().unwrap();
        assert_eq!(PathGradientBrushData::parse(po.data()).unwrap(), data);
        assert!(PathGradientBrushData::parse(&po.data()[..po.len() - 1]).is_err());
    }

    #[test]
    fn test_path_gradient_with_path() {
        let mut path = PathBuilder::new();
        path.polygon(
            &[PointF::new(0.0, 0.0), PointF::new(4.0, 0.0), PointF::new(2.0, 4.0)],
            PathPointFlags::empty(),
        )
        .unwrap();
        let data = PathGradientBrushData {
            flags: BrushDataFlags::DO_NOT_TRANSFORM,
            wrap_mode: WrapMode::Tile,
            center_color: RED,
            center: PointF::new(2.0, 2.0),
            surrounding_colors: vec![BLUE, RED, BLUE],
            boundary: Boundary::Path(PathObject::new(GraphicsVersion::default(), path)),
            transform: Some(TransformMatrix::IDENTITY),
            blend: PathBlend::Factors(BlendFactors::linear(2, 1.0, 0.0).unwrap()),
            focus_scale: None,
        };
        assert!(data.data_flags().contains(BrushDataFlags::PATH));
        let po = data.encode().unwrap();
        assert_eq!(PathGradientBrushData::parse(po.data()).unwrap(), data);
    }

    #[test]
    fn test_focus_scale_count() {
        let mut bytes = FocusScaleData::default().encode().unwrap().into_data();
        bytes[0] = 3;
        assert!(FocusScaleData::parse(&bytes).is_err());
    }
}
