//! Records that frame the stream: header, end of file, comments, GetDC and multi-format blocks.

use crate::{
    objects::GraphicsVersion,
    records::{flags::FLAG_DUAL, payload_of, EmfRecord, RecordHeader},
    serial::{Field, Parser},
    types::{EmfPlusFlags, RecordType},
    Result,
};

/// First record of an EMF+ stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRecord {
    /// Graphics version of the producer
    pub version: GraphicsVersion,
    /// The metafile also carries EMF drawing records
    pub dual: bool,
    /// Reference device flags
    pub emf_plus_flags: EmfPlusFlags,
    /// Horizontal resolution of the reference device
    pub dpi_x: u32,
    /// Vertical resolution of the reference device
    pub dpi_y: u32,
}

impl HeaderRecord {
    /// A header for a dual mode metafile at `dpi` in both directions.
    #[must_use]
    pub fn new(dpi: u32) -> Self {
        HeaderRecord {
            version: GraphicsVersion::default(),
            dual: true,
            emf_plus_flags: EmfPlusFlags::empty(),
            dpi_x: dpi,
            dpi_y: dpi,
        }
    }

    /// Whether the reference device was a video display rather than a printer.
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.emf_plus_flags.contains(EmfPlusFlags::VIDEO_DISPLAY)
    }
}

impl EmfRecord for HeaderRecord {
    const TYPE: RecordType = RecordType::Header;

    fn flags(&self) -> Result<u16> {
        Ok(if self.dual { FLAG_DUAL } else { 0 })
    }

    fn payload(&self) -> Result<Vec<u8>> {
        payload_of(&[
            Field::Item(&self.version),
            Field::U32(self.emf_plus_flags.bits()),
            Field::U32(self.dpi_x),
            Field::U32(self.dpi_y),
        ])
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        Ok(HeaderRecord {
            version: parser.read()?,
            dual: header.flags & FLAG_DUAL != 0,
            emf_plus_flags: EmfPlusFlags::from_bits_retain(parser.read_le()?),
            dpi_x: parser.read_le()?,
            dpi_y: parser.read_le()?,
        })
    }
}

empty_record!(
    /// Last record of an EMF+ stream.
    EndOfFileRecord => EndOfFile
);

empty_record!(
    /// Hand drawing back to EMF records until the next EMF+ record.
    GetDcRecord => GetDc
);

opaque_record!(
    /// Private data of the producer.
    CommentRecord => Comment
);

opaque_record!(
    /// Start of a block of alternative renderings. Reserved by the format.
    MultiFormatStartRecord => MultiFormatStart
);

opaque_record!(
    /// One alternative of a multi-format block. Reserved by the format.
    MultiFormatSectionRecord => MultiFormatSection
);

opaque_record!(
    /// End of a multi-format block. Reserved by the format.
    MultiFormatEndRecord => MultiFormatEnd
);

impl CommentRecord {
    /// A comment holding `data`.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        CommentRecord { flags: 0, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_record() {
        let header = HeaderRecord {
            emf_plus_flags: EmfPlusFlags::VIDEO_DISPLAY,
            ..HeaderRecord::new(96)
        };
        let po = header.encode().unwrap();
        assert_eq!(po.len(), 28);
        assert_eq!(&po.data()[..4], &[0x01, 0x40, 0x01, 0x00]);
        assert_eq!(&po.data()[12..16], &[0x02, 0x10, 0xC0, 0xDB]);

        let decoded = HeaderRecord::parse(po.data()).unwrap();
        assert_eq!(decoded, header);
        assert!(decoded.is_video());
    }

    #[test]
    fn test_end_of_file() {
        let po = EndOfFileRecord.encode().unwrap();
        assert_eq!(po.data(), &[0x02, 0x40, 0, 0, 12, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(EndOfFileRecord::parse(po.data()).unwrap(), EndOfFileRecord);
        assert!(EndOfFileRecord::parse(&po.data()[..11]).is_err());
    }

    #[test]
    fn test_comment_keeps_odd_payload() {
        let comment = CommentRecord::new(b"hello".to_vec());
        let po = comment.encode().unwrap();
        assert_eq!(po.len(), 20);
        assert_eq!(CommentRecord::parse(po.data()).unwrap(), comment);
    }

    #[test]
    fn test_wrong_record_type() {
        let po = GetDcRecord.encode().unwrap();
        assert!(EndOfFileRecord::parse(po.data()).is_err());
    }
}
