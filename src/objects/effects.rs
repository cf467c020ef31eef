//! Image effect parameter blocks.
//!
//! Each effect has a small fixed layout. On the wire the block is preceded by the effect GUID
//! inside a serializable object record; [`ImageEffectParams::parse_for`] resolves the GUID first
//! and refuses GUIDs it does not know.
//!
//! Encoding checks every parameter against its documented range and fails with
//! [`Error::OutOfRange`]. Decoding keeps whatever the producer wrote.

use uguid::Guid;

use crate::{
    objects::count_u32,
    pseudo::{effect_to_guid, effect_to_oid, guid_to_effect, Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{CurveAdjustments, CurveChannel, ImageEffect, RectL},
    Error, Result,
};

/// Entries per channel of a color lookup table.
pub const LUT_SIZE: usize = 256;

fn check_range(what: &'static str, value: i32, min: i32, max: i32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            what,
            value: i64::from(value),
        })
    }
}

fn check_range_f32(what: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let value = value as i64;
        Err(Error::OutOfRange { what, value })
    }
}

/// Parameters of one image effect.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEffectParams {
    /// Gaussian blur
    Blur {
        /// Radius in pixels, 0 to 255
        radius: f32,
        /// Grow the bitmap to hold the blurred edge
        expand_edge: bool,
    },
    /// Brightness and contrast
    BrightnessContrast {
        /// -255 to 255
        brightness: i32,
        /// -100 to 100
        contrast: i32,
    },
    /// Color balance, each axis -100 to 100
    ColorBalance {
        /// Toward red (positive) or cyan
        cyan_red: i32,
        /// Toward green (positive) or magenta
        magenta_green: i32,
        /// Toward blue (positive) or yellow
        yellow_blue: i32,
    },
    /// One color curve adjustment
    ColorCurve {
        /// Adjustment kind
        adjustment: CurveAdjustments,
        /// Affected channel
        channel: CurveChannel,
        /// Strength, range depends on the adjustment
        intensity: i32,
    },
    /// Per channel lookup tables, blue, green, red, alpha
    ColorLookupTable(Box<[[u8; LUT_SIZE]; 4]>),
    /// 5x5 color matrix, row major
    ColorMatrix([[f32; 5]; 5]),
    /// Hue, saturation and lightness
    HueSaturationLightness {
        /// -180 to 180
        hue: i32,
        /// -100 to 100
        saturation: i32,
        /// -100 to 100
        lightness: i32,
    },
    /// Levels
    Levels {
        /// 0 to 100
        highlight: i32,
        /// -100 to 100
        midtone: i32,
        /// 0 to 100
        shadow: i32,
    },
    /// Red eye correction over a set of areas
    RedEyeCorrection(Vec<RectL>),
    /// Sharpen
    Sharpen {
        /// Radius in pixels, 0 to 255
        radius: f32,
        /// 0 to 100
        amount: f32,
    },
    /// Tint
    Tint {
        /// -180 to 180
        hue: i32,
        /// -100 to 100
        amount: i32,
    },
}

impl ImageEffectParams {
    /// The identity color matrix.
    #[must_use]
    pub fn identity_matrix() -> Self {
        let mut matrix = [[0.0; 5]; 5];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        ImageEffectParams::ColorMatrix(matrix)
    }

    /// Lookup tables that map every value to itself.
    #[must_use]
    pub fn identity_lookup_table() -> Self {
        let mut channel = [0_u8; LUT_SIZE];
        for (value, entry) in (0..=u8::MAX).zip(channel.iter_mut()) {
            *entry = value;
        }
        ImageEffectParams::ColorLookupTable(Box::new([channel; 4]))
    }

    /// Effect selected by these parameters.
    #[must_use]
    pub fn effect(&self) -> ImageEffect {
        match self {
            ImageEffectParams::Blur { .. } => ImageEffect::Blur,
            ImageEffectParams::BrightnessContrast { .. } => ImageEffect::BrightnessContrast,
            ImageEffectParams::ColorBalance { .. } => ImageEffect::ColorBalance,
            ImageEffectParams::ColorCurve { .. } => ImageEffect::ColorCurve,
            ImageEffectParams::ColorLookupTable(_) => ImageEffect::ColorLookupTable,
            ImageEffectParams::ColorMatrix(_) => ImageEffect::ColorMatrix,
            ImageEffectParams::HueSaturationLightness { .. } => {
                ImageEffect::HueSaturationLightness
            }
            ImageEffectParams::Levels { .. } => ImageEffect::Levels,
            ImageEffectParams::RedEyeCorrection(_) => ImageEffect::RedEyeCorrection,
            ImageEffectParams::Sharpen { .. } => ImageEffect::Sharpen,
            ImageEffectParams::Tint { .. } => ImageEffect::Tint,
        }
    }

    /// GUID identifying the effect.
    #[must_use]
    pub fn guid(&self) -> Guid {
        effect_to_guid(self.effect())
    }

    /// Identifier the encoded block is tagged with.
    #[must_use]
    pub fn oid(&self) -> Oid {
        effect_to_oid(self.effect())
    }

    /// Check every parameter against its range.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] naming the first parameter outside its range.
    pub fn validate(&self) -> Result<()> {
        match self {
            ImageEffectParams::Blur { radius, .. } => {
                check_range_f32("blur radius", *radius, 0.0, 255.0)
            }
            ImageEffectParams::BrightnessContrast {
                brightness,
                contrast,
            } => {
                check_range("brightness", *brightness, -255, 255)?;
                check_range("contrast", *contrast, -100, 100)
            }
            ImageEffectParams::ColorBalance {
                cyan_red,
                magenta_green,
                yellow_blue,
            } => {
                check_range("cyan red balance", *cyan_red, -100, 100)?;
                check_range("magenta green balance", *magenta_green, -100, 100)?;
                check_range("yellow blue balance", *yellow_blue, -100, 100)
            }
            ImageEffectParams::ColorCurve {
                adjustment,
                intensity,
                ..
            } => {
                let (min, max) = match adjustment {
                    CurveAdjustments::Exposure
                    | CurveAdjustments::Density
                    | CurveAdjustments::Contrast
                    | CurveAdjustments::Highlight
                    | CurveAdjustments::Shadow
                    | CurveAdjustments::Midtone => (-100, 100),
                    CurveAdjustments::WhiteSaturation | CurveAdjustments::BlackSaturation => {
                        (0, 255)
                    }
                };
                check_range("curve intensity", *intensity, min, max)
            }
            ImageEffectParams::HueSaturationLightness {
                hue,
                saturation,
                lightness,
            } => {
                check_range("hue", *hue, -180, 180)?;
                check_range("saturation", *saturation, -100, 100)?;
                check_range("lightness", *lightness, -100, 100)
            }
            ImageEffectParams::Levels {
                highlight,
                midtone,
                shadow,
            } => {
                check_range("highlight", *highlight, 0, 100)?;
                check_range("midtone", *midtone, -100, 100)?;
                check_range("shadow", *shadow, 0, 100)
            }
            ImageEffectParams::Sharpen { radius, amount } => {
                check_range_f32("sharpen radius", *radius, 0.0, 255.0)?;
                check_range_f32("sharpen amount", *amount, 0.0, 100.0)
            }
            ImageEffectParams::Tint { hue, amount } => {
                check_range("tint hue", *hue, -180, 180)?;
                check_range("tint amount", *amount, -100, 100)
            }
            ImageEffectParams::ColorLookupTable(_)
            | ImageEffectParams::ColorMatrix(_)
            | ImageEffectParams::RedEyeCorrection(_) => Ok(()),
        }
    }

    /// Serialize the parameter block.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if a parameter is outside its range.
    pub fn encode(&self) -> Result<PseudoObject> {
        self.validate()?;
        let oid = self.oid();
        match self {
            ImageEffectParams::Blur {
                radius,
                expand_edge,
            } => serialize(
                oid,
                &[Field::F32(*radius), Field::U32(u32::from(*expand_edge))],
            ),
            ImageEffectParams::BrightnessContrast {
                brightness,
                contrast,
            } => serialize(oid, &[Field::I32(*brightness), Field::I32(*contrast)]),
            ImageEffectParams::ColorBalance {
                cyan_red,
                magenta_green,
                yellow_blue,
            } => serialize(
                oid,
                &[
                    Field::I32(*cyan_red),
                    Field::I32(*magenta_green),
                    Field::I32(*yellow_blue),
                ],
            ),
            ImageEffectParams::ColorCurve {
                adjustment,
                channel,
                intensity,
            } => serialize(
                oid,
                &[
                    Field::U32(adjustment.value()),
                    Field::U32(channel.value()),
                    Field::I32(*intensity),
                ],
            ),
            ImageEffectParams::ColorLookupTable(tables) => serialize(
                oid,
                &[
                    Field::Bytes(&tables[0]),
                    Field::Bytes(&tables[1]),
                    Field::Bytes(&tables[2]),
                    Field::Bytes(&tables[3]),
                ],
            ),
            ImageEffectParams::ColorMatrix(matrix) => {
                let values: Vec<f32> = matrix.iter().flatten().copied().collect();
                serialize(oid, &[Field::Item(&values)])
            }
            ImageEffectParams::HueSaturationLightness {
                hue,
                saturation,
                lightness,
            } => serialize(
                oid,
                &[
                    Field::I32(*hue),
                    Field::I32(*saturation),
                    Field::I32(*lightness),
                ],
            ),
            ImageEffectParams::Levels {
                highlight,
                midtone,
                shadow,
            } => serialize(
                oid,
                &[
                    Field::I32(*highlight),
                    Field::I32(*midtone),
                    Field::I32(*shadow),
                ],
            ),
            ImageEffectParams::RedEyeCorrection(areas) => {
                let count = count_u32("red eye area count", areas.len())?;
                let count = i32::try_from(count).map_err(|_| Error::OutOfRange {
                    what: "red eye area count",
                    value: i64::from(count),
                })?;
                serialize(oid, &[Field::I32(count), Field::Item(areas)])
            }
            ImageEffectParams::Sharpen { radius, amount } => {
                serialize(oid, &[Field::F32(*radius), Field::F32(*amount)])
            }
            ImageEffectParams::Tint { hue, amount } => {
                serialize(oid, &[Field::I32(*hue), Field::I32(*amount)])
            }
        }
    }

    /// Decode the parameter block of `effect` at the cursor.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] for a truncated block and [`Error::UnknownIdentifier`] for
    /// an unknown curve adjustment or channel.
    pub fn decode(effect: ImageEffect, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(match effect {
            ImageEffect::Blur => ImageEffectParams::Blur {
                radius: parser.read_le()?,
                expand_edge: parser.read_le::<u32>()? != 0,
            },
            ImageEffect::BrightnessContrast => ImageEffectParams::BrightnessContrast {
                brightness: parser.read_le()?,
                contrast: parser.read_le()?,
            },
            ImageEffect::ColorBalance => ImageEffectParams::ColorBalance {
                cyan_red: parser.read_le()?,
                magenta_green: parser.read_le()?,
                yellow_blue: parser.read_le()?,
            },
            ImageEffect::ColorCurve => ImageEffectParams::ColorCurve {
                adjustment: CurveAdjustments::try_from(parser.read_le::<u32>()?)?,
                channel: CurveChannel::try_from(parser.read_le::<u32>()?)?,
                intensity: parser.read_le()?,
            },
            ImageEffect::ColorLookupTable => {
                parser.ensure(4 * LUT_SIZE)?;
                let mut tables = Box::new([[0_u8; LUT_SIZE]; 4]);
                for table in tables.iter_mut() {
                    table.copy_from_slice(parser.read_bytes(LUT_SIZE)?);
                }
                ImageEffectParams::ColorLookupTable(tables)
            }
            ImageEffect::ColorMatrix => {
                let values: Vec<f32> = parser.read_array(25)?;
                let mut matrix = [[0.0; 5]; 5];
                for (row, chunk) in matrix.iter_mut().zip(values.chunks_exact(5)) {
                    row.copy_from_slice(chunk);
                }
                ImageEffectParams::ColorMatrix(matrix)
            }
            ImageEffect::HueSaturationLightness => ImageEffectParams::HueSaturationLightness {
                hue: parser.read_le()?,
                saturation: parser.read_le()?,
                lightness: parser.read_le()?,
            },
            ImageEffect::Levels => ImageEffectParams::Levels {
                highlight: parser.read_le()?,
                midtone: parser.read_le()?,
                shadow: parser.read_le()?,
            },
            ImageEffect::RedEyeCorrection => {
                let count: i32 = parser.read_le()?;
                let count = usize::try_from(count)
                    .map_err(|_| malformed_error!("Negative red eye area count {}", count))?;
                ImageEffectParams::RedEyeCorrection(parser.read_array(count)?)
            }
            ImageEffect::Sharpen => ImageEffectParams::Sharpen {
                radius: parser.read_le()?,
                amount: parser.read_le()?,
            },
            ImageEffect::Tint => ImageEffectParams::Tint {
                hue: parser.read_le()?,
                amount: parser.read_le()?,
            },
        })
    }

    /// Decode the parameter block announced by `guid`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownGuid`] for a GUID that names no effect, otherwise the errors of
    /// [`ImageEffectParams::decode`].
    pub fn parse_for(guid: &Guid, data: &[u8]) -> Result<Self> {
        let effect = guid_to_effect(guid)?;
        Self::decode(effect, &mut Parser::new(data))
    }
}
