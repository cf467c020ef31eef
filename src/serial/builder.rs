//! Declarative field lists and the two-pass serializer behind every encoder.
//!
//! Each object and record encoder describes its wire layout as a slice of [`Field`] values and
//! hands it to [`serialize`]. The serializer first measures the whole list (rejecting schema
//! violations before a single byte is written), reserves the output buffer exactly once, and then
//! writes every field in order. Callers either get a complete [`crate::pseudo::PseudoObject`] or an
//! error, never a half-filled buffer.
//!
//! # Examples
//!
//! ```rust
//! use emfplus::{serial::{serialize, Field}, Oid};
//!
//! let po = serialize(
//!     Oid::RectF,
//!     &[Field::F32(1.0), Field::F32(2.0), Field::F32(3.0), Field::F32(4.0)],
//! )?;
//! assert_eq!(po.len(), 16);
//! # Ok::<(), emfplus::Error>(())
//! ```

use crate::{
    pseudo::{Oid, PseudoObject},
    serial::{io, Encode},
    Error, Result,
};

/// One entry of a serial field list.
///
/// Scalar variants are written little-endian unless their name says otherwise. [`Field::Item`]
/// refers to any [`Encode`] value (a single color, a point array, a matrix). [`Field::Zero`] is a
/// run of zero bytes, used for reserved words and alignment padding. [`Field::Fill`] replicates a
/// template unit and is the only variant that can be malformed: an empty template or a zero repeat
/// count is a schema violation.
pub enum Field<'a> {
    /// A single byte
    U8(u8),
    /// A little-endian `u16`
    U16(u16),
    /// A big-endian `u16`
    U16Be(u16),
    /// A little-endian `i16`
    I16(i16),
    /// A little-endian `u32`
    U32(u32),
    /// A little-endian `i32`
    I32(i32),
    /// A little-endian IEEE single
    F32(f32),
    /// Raw bytes copied as they are
    Bytes(&'a [u8]),
    /// Any fixed-layout value or array of values
    Item(&'a dyn Encode),
    /// `unit` copied `reps` times
    Fill {
        /// Template unit
        unit: &'a [u8],
        /// Number of copies
        reps: usize,
    },
    /// `n` zero bytes
    Zero(usize),
}

impl Field<'_> {
    /// Number of bytes this field contributes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Schema`] for a replicated field with an empty template, a zero
    /// repeat count, or a length that overflows.
    pub fn byte_len(&self) -> Result<usize> {
        Ok(match self {
            Field::U8(_) => 1,
            Field::U16(_) | Field::U16Be(_) | Field::I16(_) => 2,
            Field::U32(_) | Field::I32(_) | Field::F32(_) => 4,
            Field::Bytes(bytes) => bytes.len(),
            Field::Item(item) => item.encoded_len(),
            Field::Fill { unit, reps } => {
                if unit.is_empty() || *reps == 0 {
                    return Err(Error::Schema(format!(
                        "replicated field with unit {} and repeat count {}",
                        unit.len(),
                        reps
                    )));
                }
                unit.len()
                    .checked_mul(*reps)
                    .ok_or_else(|| Error::Schema("replicated field overflows".to_string()))?
            }
            Field::Zero(n) => *n,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Field::U8(v) => out.push(*v),
            Field::U16(v) => io::push_le(out, *v),
            Field::U16Be(v) => io::push_be(out, *v),
            Field::I16(v) => io::push_le(out, *v),
            Field::U32(v) => io::push_le(out, *v),
            Field::I32(v) => io::push_le(out, *v),
            Field::F32(v) => io::push_le(out, *v),
            Field::Bytes(bytes) => out.extend_from_slice(bytes),
            Field::Item(item) => item.encode_into(out),
            Field::Fill { unit, reps } => {
                for _ in 0..*reps {
                    out.extend_from_slice(unit);
                }
            }
            Field::Zero(n) => out.resize(out.len() + n, 0),
        }
    }
}

/// Measure a field list without writing it.
///
/// # Errors
/// Returns [`crate::Error::Schema`] if any field is malformed or the total overflows.
pub fn serialized_len(fields: &[Field<'_>]) -> Result<usize> {
    fields.iter().try_fold(0_usize, |total, field| {
        total
            .checked_add(field.byte_len()?)
            .ok_or_else(|| Error::Schema("field list length overflows".to_string()))
    })
}

/// Flatten a field list into a new [`PseudoObject`] tagged with `oid`.
///
/// # Errors
/// Returns [`crate::Error::Schema`] for malformed fields and [`crate::Error::Allocation`] if the
/// output buffer cannot be reserved. Nothing is returned in either case.
pub fn serialize(oid: Oid, fields: &[Field<'_>]) -> Result<PseudoObject> {
    let total = serialized_len(fields)?;

    let mut data = Vec::new();
    data.try_reserve_exact(total)
        .map_err(|_| Error::Allocation { requested: total })?;

    for field in fields {
        field.write(&mut data);
    }

    if data.len() != total {
        return Err(Error::Schema(format!(
            "field list wrote {} bytes but measured {}",
            data.len(),
            total
        )));
    }

    Ok(PseudoObject::from_parts(oid, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_mixed_byte_orders() {
        let points: Vec<i16> = vec![1, -1];
        let po = serialize(
            Oid::Raw,
            &[
                Field::U16(0x0102),
                Field::U16Be(0x0102),
                Field::Item(&points),
                Field::Zero(2),
            ],
        )
        .unwrap();
        assert_eq!(
            po.data(),
            &[0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00]
        );
        assert_eq!(po.oid(), Oid::Raw);
    }

    #[test]
    fn test_fill_replicates_unit() {
        let po = serialize(Oid::PathPointType, &[Field::Fill { unit: &[0x01], reps: 3 }]).unwrap();
        assert_eq!(po.data(), &[0x01, 0x01, 0x01]);
    }

    #[test]
    fn test_fill_schema_violation() {
        let result = serialize(Oid::Raw, &[Field::U8(1), Field::Fill { unit: &[], reps: 3 }]);
        assert!(matches!(result, Err(Error::Schema(_))));

        let result = serialize(Oid::Raw, &[Field::Fill { unit: &[1], reps: 0 }]);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_serialized_len() {
        let color = [0u8; 4];
        let len = serialized_len(&[Field::U32(0), Field::Bytes(&color), Field::Zero(3)]).unwrap();
        assert_eq!(len, 11);
        assert_eq!(serialized_len(&[]).unwrap(), 0);
    }
}
