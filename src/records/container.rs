//! Graphics state stack and container records.

use crate::{
    records::{payload_of, EmfRecord, RecordHeader},
    serial::{Field, Parser},
    types::{narrow_u8, RectF, RecordType, UnitType},
    Result,
};

macro_rules! stack_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            /// Identifier pairing the push with its pop
            pub stack_index: u32,
        }

        impl EmfRecord for $name {
            const TYPE: RecordType = RecordType::$kind;

            fn flags(&self) -> Result<u16> {
                Ok(0)
            }

            fn payload(&self) -> Result<Vec<u8>> {
                payload_of(&[Field::U32(self.stack_index)])
            }

            fn decode(_header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
                Ok($name {
                    stack_index: parser.read_le()?,
                })
            }
        }
    };
}

stack_record!(
    /// Push the graphics state.
    SaveRecord => Save
);

stack_record!(
    /// Pop the graphics state pushed with the same index.
    RestoreRecord => Restore
);

stack_record!(
    /// Open a container that inherits the current state unchanged.
    BeginContainerNoParamsRecord => BeginContainerNoParams
);

stack_record!(
    /// Close the container opened with the same index.
    EndContainerRecord => EndContainer
);

/// Open a container that maps a source rectangle onto a destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeginContainerRecord {
    /// Unit of both rectangles, stored in bits 8-15 of the flags
    pub unit: UnitType,
    /// Destination in the current world space
    pub dst: RectF,
    /// Source in the container space
    pub src: RectF,
    /// Identifier pairing this record with its end
    pub stack_index: u32,
}

impl EmfRecord for BeginContainerRecord {
    const TYPE: RecordType = RecordType::BeginContainer;

    fn flags(&self) -> Result<u16> {
        Ok(u16::from(narrow_u8("container unit", self.unit.value())?) << 8)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[
            Field::Item(&self.dst),
            Field::Item(&self.src),
            Field::U32(self.stack_index),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(BeginContainerRecord {
            unit: UnitType::try_from(u32::from(header.flags >> 8))?,
            dst: parser.read()?,
            src: parser.read()?,
            stack_index: parser.read_le()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_restore() {
        let po = SaveRecord { stack_index: 7 }.encode().unwrap();
        assert_eq!(po.data(), &[0x25, 0x40, 0, 0, 16, 0, 0, 0, 4, 0, 0, 0, 7, 0, 0, 0]);
        assert!(RestoreRecord::parse(po.data()).is_err());
        assert_eq!(SaveRecord::parse(po.data()).unwrap().stack_index, 7);
    }

    #[test]
    fn test_begin_container() {
        let record = BeginContainerRecord {
            unit: UnitType::Millimeter,
            dst: RectF::new(0.0, 0.0, 100.0, 100.0),
            src: RectF::new(0.0, 0.0, 10.0, 10.0),
            stack_index: 2,
        };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 12 + 36);
        assert_eq!(&po.data()[2..4], &[0x00, 0x06]);
        assert_eq!(BeginContainerRecord::parse(po.data()).unwrap(), record);
    }
}
