//! Dashed and compound line data, and the dash pattern generators.
//!
//! A dash pattern is a list of alternating drawn and undrawn lengths. [`DashedLineData::standard`]
//! expands one of the 27 named patterns: the unit length is split into one equal slot per symbol,
//! and each symbol draws a fraction of its slot (dot 1/8, dash 1/2, long 3/4) and leaves the rest
//! blank. [`DashedLineData::from_bit_pattern`] expands a 32-bit mask where each bit covers 1/32 of
//! the unit.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::{
    objects::{count_u32, read_count, EmfObject},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    Error, Result,
};

#[derive(Clone, Copy)]
enum Symbol {
    Dot,
    Dash,
    Long,
}

impl Symbol {
    fn fraction(self) -> f32 {
        match self {
            Symbol::Dot => 0.125,
            Symbol::Dash => 0.5,
            Symbol::Long => 0.75,
        }
    }
}

/// The named dash patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[allow(missing_docs)]
pub enum StandardDash {
    Solid,
    Dash,
    DashDash,
    DashDashDash,
    DashDashDashDash,
    Dot,
    DotDot,
    DotDotDot,
    DotDotDotDot,
    DashDot,
    DashDashDot,
    DashDashDotDot,
    DashDashDashDot,
    DashDotDot,
    DashDotDotDot,
    DashDotDashDot,
    Long,
    LongLong,
    LongLongLong,
    LongLongLongLong,
    LongDot,
    LongLongDot,
    LongLongDotDot,
    LongLongLongDot,
    LongDotDot,
    LongDotDotDot,
    LongDotLongDot,
}

impl StandardDash {
    fn symbols(self) -> &'static [Symbol] {
        use Symbol::{Dash as S, Dot as D, Long as L};
        match self {
            StandardDash::Solid => &[],
            StandardDash::Dash => &[S],
            StandardDash::DashDash => &[S, S],
            StandardDash::DashDashDash => &[S, S, S],
            StandardDash::DashDashDashDash => &[S, S, S, S],
            StandardDash::Dot => &[D],
            StandardDash::DotDot => &[D, D],
            StandardDash::DotDotDot => &[D, D, D],
            StandardDash::DotDotDotDot => &[D, D, D, D],
            StandardDash::DashDot => &[S, D],
            StandardDash::DashDashDot => &[S, S, D],
            StandardDash::DashDashDotDot => &[S, S, D, D],
            StandardDash::DashDashDashDot => &[S, S, S, D],
            StandardDash::DashDotDot => &[S, D, D],
            StandardDash::DashDotDotDot => &[S, D, D, D],
            StandardDash::DashDotDashDot => &[S, D, S, D],
            StandardDash::Long => &[L],
            StandardDash::LongLong => &[L, L],
            StandardDash::LongLongLong => &[L, L, L],
            StandardDash::LongLongLongLong => &[L, L, L, L],
            StandardDash::LongDot => &[L, D],
            StandardDash::LongLongDot => &[L, L, D],
            StandardDash::LongLongDotDot => &[L, L, D, D],
            StandardDash::LongLongLongDot => &[L, L, L, D],
            StandardDash::LongDotDot => &[L, D, D],
            StandardDash::LongDotDotDot => &[L, D, D, D],
            StandardDash::LongDotLongDot => &[L, D, L, D],
        }
    }
}

/// Alternating drawn and undrawn lengths of a custom dashed line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashedLineData {
    /// Lengths, starting with a drawn one
    pub lengths: Vec<f32>,
}

impl DashedLineData {
    /// Expand a named pattern over `unit`.
    #[must_use]
    pub fn standard(unit: f32, pattern: StandardDash) -> Self {
        let symbols = pattern.symbols();
        if symbols.is_empty() {
            return DashedLineData {
                lengths: vec![unit, 0.0],
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let slot = unit / symbols.len() as f32;
        let mut lengths = Vec::with_capacity(symbols.len() * 2);
        for symbol in symbols {
            let drawn = slot * symbol.fraction();
            lengths.push(drawn);
            lengths.push(slot - drawn);
        }
        DashedLineData { lengths }
    }

    /// Expand a 32-bit pattern over `unit`, bit 0 first.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] unless bit 0 is set and bit 31 is clear, so that the pattern
    /// starts drawn and ends blank.
    pub fn from_bit_pattern(unit: f32, bits: u32) -> Result<Self> {
        if bits & 1 == 0 || bits & 0x8000_0000 != 0 {
            return Err(Error::OutOfRange {
                what: "dash bit pattern",
                value: i64::from(bits),
            });
        }

        let step = unit / 32.0;
        let mut lengths = Vec::new();
        let mut drawn = true;
        let mut run = 0_u8;
        for bit in 0..32 {
            if (bits >> bit) & 1 == u32::from(drawn) {
                run += 1;
            } else {
                lengths.push(step * f32::from(run));
                drawn = !drawn;
                run = 1;
            }
        }
        lengths.push(step * f32::from(run));
        Ok(DashedLineData { lengths })
    }
}

impl EmfObject for DashedLineData {
    const OID: Oid = Oid::DashedLineData;

    fn encode(&self) -> Result<PseudoObject> {
        encode_f32_list(Self::OID, "dash lengths", &self.lengths)
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let count = read_count(parser)?;
        Ok(DashedLineData {
            lengths: parser.read_array(count)?,
        })
    }
}

/// Widths of the parallel lines of a compound pen, as fractions of the pen width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundLineData {
    /// Alternating line and gap boundaries in 0.0..=1.0
    pub widths: Vec<f32>,
}

impl EmfObject for CompoundLineData {
    const OID: Oid = Oid::CompoundLineData;

    fn encode(&self) -> Result<PseudoObject> {
        encode_f32_list(Self::OID, "compound widths", &self.widths)
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let count = read_count(parser)?;
        Ok(CompoundLineData {
            widths: parser.read_array(count)?,
        })
    }
}

#[allow(clippy::ptr_arg)]
fn encode_f32_list(oid: Oid, what: &'static str, values: &Vec<f32>) -> Result<PseudoObject> {
    if values.is_empty() {
        return Err(Error::Schema(format!("empty {}", what)));
    }
    serialize(
        oid,
        &[Field::U32(count_u32(what, values.len())?), Field::Item(values)],
    )
}
