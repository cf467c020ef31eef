//! World and page transform records.
//!
//! The combining records take an `A` bit: set, the new transform is applied after the current one
//! (post-multiplied), clear, before it.

use crate::{
    records::{flags::FLAG_POST_MULTIPLY, payload_of, EmfRecord, RecordHeader},
    serial::{Field, Parser},
    types::{narrow_u8, RecordType, TransformMatrix, UnitType},
    Result,
};

fn order_bit(post_multiply: bool) -> u16 {
    if post_multiply {
        FLAG_POST_MULTIPLY
    } else {
        0
    }
}

fn is_post_multiply(header: &RecordHeader) -> bool {
    header.flags & FLAG_POST_MULTIPLY != 0
}

/// Replace the world transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetWorldTransformRecord {
    /// New world transform
    pub matrix: TransformMatrix,
}

impl EmfRecord for SetWorldTransformRecord {
    const TYPE: RecordType = RecordType::SetWorldTransform;

    fn flags(&self) -> Result<u16> {
        Ok(0)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::Item(&self.matrix)])
    }

    fn decode(_header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(SetWorldTransformRecord {
            matrix: parser.read()?,
        })
    }
}

empty_record!(
    /// Reset the world transform to the identity.
    ResetWorldTransformRecord => ResetWorldTransform
);

/// Combine the world transform with a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MultiplyWorldTransformRecord {
    /// Matrix to combine with
    pub matrix: TransformMatrix,
    /// Apply after the current transform
    pub post_multiply: bool,
}

impl EmfRecord for MultiplyWorldTransformRecord {
    const TYPE: RecordType = RecordType::MultiplyWorldTransform;

    fn flags(&self) -> Result<u16> {
        Ok(order_bit(self.post_multiply))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::Item(&self.matrix)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(MultiplyWorldTransformRecord {
            matrix: parser.read()?,
            post_multiply: is_post_multiply(header),
        })
    }
}

macro_rules! pair_transform_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident, $a:ident, $b:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            /// Horizontal component
            pub $a: f32,
            /// Vertical component
            pub $b: f32,
            /// Apply after the current transform
            pub post_multiply: bool,
        }

        impl EmfRecord for $name {
            const TYPE: RecordType = RecordType::$kind;

            fn flags(&self) -> Result<u16> {
                Ok(order_bit(self.post_multiply))
            }

            fn payload(&self) -> Result<Vec<u8>> {
                payload_of(&[Field::F32(self.$a), Field::F32(self.$b)])
            }

            fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
                Ok($name {
                    $a: parser.read_le()?,
                    $b: parser.read_le()?,
                    post_multiply: is_post_multiply(header),
                })
            }
        }
    };
}

pair_transform_record!(
    /// Combine the world transform with a translation.
    TranslateWorldTransformRecord => TranslateWorldTransform, dx, dy
);

pair_transform_record!(
    /// Combine the world transform with a scaling.
    ScaleWorldTransformRecord => ScaleWorldTransform, sx, sy
);

/// Combine the world transform with a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotateWorldTransformRecord {
    /// Clockwise angle in degrees
    pub angle: f32,
    /// Apply after the current transform
    pub post_multiply: bool,
}

impl EmfRecord for RotateWorldTransformRecord {
    const TYPE: RecordType = RecordType::RotateWorldTransform;

    fn flags(&self) -> Result<u16> {
        Ok(order_bit(self.post_multiply))
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::F32(self.angle)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(RotateWorldTransformRecord {
            angle: parser.read_le()?,
            post_multiply: is_post_multiply(header),
        })
    }
}

/// Set the page unit and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPageTransformRecord {
    /// Page unit, stored in the low byte of the flags
    pub unit: UnitType,
    /// Scale from page units to device units
    pub scale: f32,
}

impl EmfRecord for SetPageTransformRecord {
    const TYPE: RecordType = RecordType::SetPageTransform;

    fn flags(&self) -> Result<u16> {
        narrow_u8("page unit", self.unit.value()).map(u16::from)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[Field::F32(self.scale)])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(SetPageTransformRecord {
            unit: UnitType::try_from(u32::from(header.flags & 0x00FF))?,
            scale: parser.read_le()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_world_transform() {
        let record = SetWorldTransformRecord {
            matrix: TransformMatrix::new(2.0, 0.0, 0.0, 2.0, 5.0, -5.0),
        };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 36);
        assert_eq!(SetWorldTransformRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_post_multiply_bit() {
        let record = TranslateWorldTransformRecord {
            dx: 10.0,
            dy: -3.5,
            post_multiply: true,
        };
        let po = record.encode().unwrap();
        assert_eq!(&po.data()[2..4], &[0x00, 0x20]);
        assert_eq!(TranslateWorldTransformRecord::parse(po.data()).unwrap(), record);

        let rotate = RotateWorldTransformRecord {
            angle: 45.0,
            post_multiply: false,
        };
        let po = rotate.encode().unwrap();
        assert_eq!(&po.data()[2..4], &[0, 0]);
        assert_eq!(RotateWorldTransformRecord::parse(po.data()).unwrap(), rotate);
    }

    #[test]
    fn test_page_transform() {
        let record = SetPageTransformRecord {
            unit: UnitType::Inch,
            scale: 1.5,
        };
        let po = record.encode().unwrap();
        assert_eq!(&po.data()[2..4], &[0x04, 0x00]);
        assert_eq!(SetPageTransformRecord::parse(po.data()).unwrap(), record);
    }

    #[test]
    fn test_reset_world_transform() {
        let po = ResetWorldTransformRecord.encode().unwrap();
        assert_eq!(po.len(), 12);
        assert!(ResetWorldTransformRecord::parse(po.data()).is_ok());
    }
}
