//! The 12-byte header in front of every EMF+ record.
//!
//! ```text
//! +0   u16  Type      record type | 0x4000
//! +2   u16  Flags     record specific bit fields, little-endian LSB-0
//! +4   u32  Size      whole record including header and padding, multiple of 4
//! +8   u32  DataSize  payload bytes that follow, without padding
//! ```
//!
//! The manual draws the flags word as a big-endian bit field. Every producer writes it as a plain
//! little-endian word and that is how it is read and written here.

use crate::{
    pseudo::{record_oid, PseudoObject},
    serial::{io::read_le_at, serialize, Field, Parser, Wire},
    types::RecordType,
    Error, Result,
};

/// Marker bit that every EMF+ record type carries.
pub const RECORD_FLAG: u16 = 0x4000;

/// Size of the common record header.
pub const HEADER_SIZE: usize = 12;

const HEADER_LEN: u32 = 12;

/// The common header of an EMF+ record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RecordHeader {
    /// Record type as stored, including [`RECORD_FLAG`]
    pub record_type: u16,
    /// Record specific flags
    pub flags: u16,
    /// Total record size, header and padding included
    pub size: u32,
    /// Payload size without padding
    pub data_size: u32,
}

impl RecordHeader {
    /// Header for a record of `kind` carrying `data_size` payload bytes.
    ///
    /// The marker bit is added to the type and the size is rounded up to a multiple of 4.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if the record would not fit in a 32-bit size field.
    pub fn new(kind: RecordType, flags: u16, data_size: usize) -> Result<Self> {
        let out_of_range = || Error::OutOfRange {
            what: "record size",
            value: i64::try_from(data_size).unwrap_or(i64::MAX),
        };
        let data = u32::try_from(data_size).map_err(|_| out_of_range())?;
        let size = data
            .checked_add(HEADER_LEN + 3)
            .ok_or_else(out_of_range)?
            & !3;

        Ok(RecordHeader {
            record_type: kind as u16 | RECORD_FLAG,
            flags,
            size,
            data_size: data,
        })
    }

    /// Read a header from the start of `data`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if fewer than 12 bytes are supplied.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::read(&mut Parser::new(data))
    }

    /// Record type without the marker bit.
    ///
    /// # Errors
    /// Returns [`Error::UnknownIdentifier`] for a type outside of the format.
    pub fn kind(&self) -> Result<RecordType> {
        RecordType::try_from(u32::from(self.record_type & !RECORD_FLAG))
    }

    /// Whether the type carries the EMF+ marker bit.
    #[must_use]
    pub fn has_record_flag(&self) -> bool {
        self.record_type & RECORD_FLAG != 0
    }

    /// Bytes of padding after the payload.
    #[must_use]
    pub fn padding(&self) -> u32 {
        self.size
            .saturating_sub(HEADER_LEN)
            .saturating_sub(self.data_size)
    }

    /// Check the size fields against each other and against the `available` bytes.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the record is smaller than its header or its payload does
    /// not fit inside it, and [`Error::OutOfBounds`] if the record runs past `available`.
    pub fn validate(&self, available: usize) -> Result<()> {
        let size = self.size as usize;
        if size < HEADER_SIZE {
            return Err(malformed_error!(
                "Record size {} is smaller than its header",
                self.size
            ));
        }
        if self.data_size as usize > size - HEADER_SIZE {
            return Err(malformed_error!(
                "Record payload of {} bytes does not fit in a record of {} bytes",
                self.data_size,
                self.size
            ));
        }
        if size > available {
            return Err(out_of_bounds_error!());
        }
        if size % 4 != 0 {
            log::warn!(
                "record type 0x{:04X} has unaligned size {}",
                self.record_type,
                self.size
            );
        }
        Ok(())
    }
}

impl Wire for RecordHeader {
    const SIZE: usize = HEADER_SIZE;

    fn read(parser: &mut Parser<'_>) -> Result<Self> {
        parser.ensure(HEADER_SIZE)?;
        Ok(RecordHeader {
            record_type: parser.read_le()?,
            flags: parser.read_le()?,
            size: parser.read_le()?,
            data_size: parser.read_le()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        crate::serial::io::push_le(out, self.record_type);
        crate::serial::io::push_le(out, self.flags);
        crate::serial::io::push_le(out, self.size);
        crate::serial::io::push_le(out, self.data_size);
    }
}

impl_encode!(RecordHeader);

/// Read only the flags word of the record at the start of `data`.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the header is truncated.
pub fn header_flags(data: &[u8]) -> Result<u16> {
    let mut offset = 2;
    read_le_at(data, &mut offset)
}

/// Read only the declared size of the record at the start of `data`.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the header is truncated.
pub fn record_size(data: &[u8]) -> Result<u32> {
    let mut offset = 4;
    read_le_at(data, &mut offset)
}

/// Wrap a payload into a complete record: header, payload and zero padding.
///
/// The result is tagged with the record identifier of `kind`.
///
/// # Errors
/// Returns [`Error::OutOfRange`] if the record is too large and [`Error::Allocation`] if the
/// buffer cannot be reserved.
pub fn encode_record(kind: RecordType, flags: u16, payload: &[u8]) -> Result<PseudoObject> {
    let header = RecordHeader::new(kind, flags, payload.len())?;
    serialize(
        record_oid(kind),
        &[
            Field::Item(&header),
            Field::Bytes(payload),
            Field::Zero(header.padding() as usize),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        let header = RecordHeader::new(RecordType::DrawString, 0x0102, 37).unwrap();
        assert_eq!(header.record_type, 0x401C);
        assert_eq!(header.size, 52);
        assert_eq!(header.data_size, 37);
        assert_eq!(header.padding(), 3);
        assert_eq!(header.kind().unwrap(), RecordType::DrawString);

        let empty = RecordHeader::new(RecordType::EndOfFile, 0, 0).unwrap();
        assert_eq!((empty.size, empty.data_size), (12, 0));
    }

    #[test]
    fn test_encode_record_layout() {
        let po = encode_record(RecordType::Save, 0, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(po.len(), 20);
        assert_eq!(
            &po.data()[..12],
            &[0x25, 0x40, 0, 0, 20, 0, 0, 0, 5, 0, 0, 0]
        );
        assert_eq!(&po.data()[17..], &[0, 0, 0]);
        assert_eq!(po.oid(), crate::Oid::SaveRecord);

        assert_eq!(header_flags(po.data()).unwrap(), 0);
        assert_eq!(record_size(po.data()).unwrap(), 20);
        assert_eq!(RecordHeader::parse(po.data()).unwrap().data_size, 5);
    }

    #[test]
    fn test_validate() {
        let header = RecordHeader::new(RecordType::Clear, 0, 4).unwrap();
        assert!(header.validate(16).is_ok());
        assert!(matches!(header.validate(15), Err(Error::OutOfBounds { .. })));

        let tiny = RecordHeader {
            size: 8,
            ..header
        };
        assert!(matches!(tiny.validate(16), Err(Error::Malformed { .. })));

        let overfull = RecordHeader {
            data_size: 8,
            ..header
        };
        assert!(matches!(overfull.validate(16), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_truncated_and_unknown() {
        assert!(RecordHeader::parse(&[]).is_err());
        assert!(RecordHeader::parse(&[0x01, 0x40, 0, 0, 12, 0, 0, 0, 0, 0, 0]).is_err());
        assert!(header_flags(&[0x01, 0x40, 0x00]).is_err());

        let header = RecordHeader {
            record_type: 0x407F,
            ..RecordHeader::default()
        };
        assert!(matches!(header.kind(), Err(Error::UnknownIdentifier(0x7F))));
        assert!(header.has_record_flag());
    }
}
