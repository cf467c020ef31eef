//! Object definition records and image effect records.
//!
//! An object record stores one entry of the object table. Objects larger than
//! [`OBJECT_RECORD_LIMIT`] bytes are split over several records with the same index and type.
//! Every fragment but the last carries [`FLAG_CONTINUED`] and starts with the total object size;
//! the last fragment clears the flag. Putting the pieces back together is the job of
//! [`crate::accum::ObjectReassembler`].

use uguid::Guid;

use crate::{
    objects::{EmfObject, ImageEffectParams, Object},
    pseudo::PseudoObject,
    records::{
        flags::{check_object_id, object_id, object_type, object_type_bits, FLAG_CONTINUED},
        payload_of, EmfRecord, RecordHeader,
    },
    serial::{Field, Parser},
    types::{ObjectType, RecordType},
    Error, Result,
};

/// Largest object payload a single object record carries.
pub const OBJECT_RECORD_LIMIT: usize = 65020;

/// One object record, either a whole object or a fragment of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Object table index
    pub id: u8,
    /// Type of the object
    pub object_type: ObjectType,
    /// Total size of the object, present on continued fragments
    pub total_size: Option<u32>,
    /// Object bytes carried by this record
    pub data: Vec<u8>,
}

impl ObjectRecord {
    /// A record holding the whole of `object`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] for an index above 63 and [`Error::OutOfRange`] if the
    /// object needs more than one record, see [`ObjectRecord::encode_fragments`].
    pub fn new(id: u32, object: &Object) -> Result<Self> {
        let data = object.encode()?.into_data();
        if data.len() > OBJECT_RECORD_LIMIT {
            return Err(Error::OutOfRange {
                what: "single object record payload",
                value: i64::try_from(data.len()).unwrap_or(i64::MAX),
            });
        }
        Ok(ObjectRecord {
            id: check_object_id(id)?,
            object_type: object.object_type(),
            total_size: None,
            data,
        })
    }

    /// Whether more fragments of this object follow.
    #[must_use]
    pub fn is_continued(&self) -> bool {
        self.total_size.is_some()
    }

    /// Split serialized object bytes into as many records as needed.
    ///
    /// A payload of `L` bytes yields `ceil(L / 65020)` records. Only the last one has the
    /// continuation flag clear.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] for an index above 63, [`Error::UnknownIdentifier`] for
    /// [`ObjectType::Invalid`] and [`Error::OutOfRange`] if the total does not fit in 32 bits.
    pub fn fragments(id: u32, object_type: ObjectType, data: &[u8]) -> Result<Vec<ObjectRecord>> {
        let id = check_object_id(id)?;
        if object_type == ObjectType::Invalid {
            return Err(Error::UnknownIdentifier(object_type.value()));
        }

        if data.len() <= OBJECT_RECORD_LIMIT {
            return Ok(vec![ObjectRecord {
                id,
                object_type,
                total_size: None,
                data: data.to_vec(),
            }]);
        }

        let total = u32::try_from(data.len()).map_err(|_| Error::OutOfRange {
            what: "continued object size",
            value: i64::try_from(data.len()).unwrap_or(i64::MAX),
        })?;
        let count = data.len().div_ceil(OBJECT_RECORD_LIMIT);
        log::debug!(
            "splitting {:?} object {} of {} bytes into {} records",
            object_type,
            id,
            total,
            count
        );

        Ok(data
            .chunks(OBJECT_RECORD_LIMIT)
            .enumerate()
            .map(|(index, chunk)| ObjectRecord {
                id,
                object_type,
                total_size: (index + 1 < count).then_some(total),
                data: chunk.to_vec(),
            })
            .collect())
    }

    /// Serialize `object` into one or more complete object records.
    ///
    /// # Errors
    /// Same as [`ObjectRecord::fragments`] and [`EmfRecord::encode`].
    pub fn encode_fragments(id: u32, object: &Object) -> Result<Vec<PseudoObject>> {
        let data = object.encode()?;
        Self::fragments(id, object.object_type(), data.data())?
            .iter()
            .map(EmfRecord::encode)
            .collect()
    }

    /// Decode the object carried by a record that is not a fragment.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for a continued fragment and the errors of [`Object::parse`].
    pub fn object(&self) -> Result<Object> {
        if self.is_continued() {
            return Err(malformed_error!(
                "Object {} is continued, reassemble it first",
                self.id
            ));
        }
        Object::parse(self.object_type, &self.data)
    }
}

impl EmfRecord for ObjectRecord {
    const TYPE: RecordType = RecordType::Object;

    fn flags(&self) -> Result<u16> {
        let id = check_object_id(u32::from(self.id))?;
        let mut flags = object_type_bits(self.object_type) | u16::from(id);
        if self.is_continued() {
            flags |= FLAG_CONTINUED;
        }
        Ok(flags)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        match self.total_size {
            Some(total) => payload_of(&[Field::U32(total), Field::Bytes(&self.data)]),
            None => Ok(self.data.clone()),
        }
    }

    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let id = object_id(header.flags)?;
        let object_type = object_type(header.flags)?;
        let total_size = if header.flags & FLAG_CONTINUED != 0 {
            Some(parser.read_le()?)
        } else {
            None
        };
        Ok(ObjectRecord {
            id,
            object_type,
            total_size,
            data: parser.read_rest().to_vec(),
        })
    }
}

/// Image effect parameters that apply to the next image drawing record.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializableObjectRecord {
    /// The effect and its parameters
    pub params: ImageEffectParams,
}

impl EmfRecord for SerializableObjectRecord {
    const TYPE: RecordType = RecordType::SerializableObject;

    fn flags(&self) -> Result<u16> {
        Ok(0)
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let block = self.params.encode()?;
        let size = u32::try_from(block.len()).map_err(|_| Error::OutOfRange {
            what: "image effect block size",
            value: i64::try_from(block.len()).unwrap_or(i64::MAX),
        })?;
        payload_of(&[
            Field::Bytes(&self.params.guid().to_bytes()),
            Field::U32(size),
            Field::Bytes(block.data()),
        ])
    }

    fn decode(_header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self> {
        let guid = <[u8; 16]>::try_from(parser.read_bytes(16)?)
            .map(Guid::from_bytes)
            .map_err(|_| out_of_bounds_error!())?;
        let size: u32 = parser.read_le()?;
        let size = usize::try_from(size).map_err(|_| out_of_bounds_error!())?;
        let block = parser.read_bytes(size)?;
        Ok(SerializableObjectRecord {
            params: ImageEffectParams::parse_for(&guid, block)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{objects::Brush, records::header::record_size, types::Argb};

    #[test]
    fn test_small_object_single_record() {
        let brush = Object::Brush(Brush::solid(Argb::new(0xFF, 0x10, 0x20, 0x30)));
        let records = ObjectRecord::encode_fragments(7, &brush).unwrap();
        assert_eq!(records.len(), 1);

        let po = &records[0];
        assert_eq!(&po.data()[..4], &[0x08, 0x40, 0x07, 0x01]);
        let decoded = ObjectRecord::parse(po.data()).unwrap();
        assert!(!decoded.is_continued());
        assert_eq!(decoded.object().unwrap(), brush);
        assert_eq!(ObjectRecord::new(7, &brush).unwrap(), decoded);
    }

    #[test]
    fn test_fragment_count_and_flags() {
        let data: Vec<u8> = (0..150_000_u32).map(|i| (i % 251) as u8).collect();
        let records = ObjectRecord::fragments(3, ObjectType::Image, &data).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_continued());
        assert!(records[1].is_continued());
        assert!(!records[2].is_continued());
        assert_eq!(records[0].total_size, Some(150_000));

        let joined: Vec<u8> = records.iter().flat_map(|r| r.data.iter().copied()).collect();
        assert_eq!(joined, data);

        let first = records[0].encode().unwrap();
        assert_eq!(record_size(first.data()).unwrap() as usize, 12 + 4 + OBJECT_RECORD_LIMIT);
        assert_eq!(first.data()[3], 0x85);
        let last = records[2].encode().unwrap();
        assert_eq!(last.data()[3], 0x05);
        assert_eq!(ObjectRecord::parse(last.data()).unwrap(), records[2]);
    }

    #[test]
    fn test_exact_limit_is_one_record() {
        let data = vec![0_u8; OBJECT_RECORD_LIMIT];
        assert_eq!(ObjectRecord::fragments(0, ObjectType::Path, &data).unwrap().len(), 1);
        let data = vec![0_u8; OBJECT_RECORD_LIMIT + 1];
        assert_eq!(ObjectRecord::fragments(0, ObjectType::Path, &data).unwrap().len(), 2);
    }

    #[test]
    fn test_bad_ids() {
        assert!(matches!(
            ObjectRecord::fragments(64, ObjectType::Pen, &[0; 4]),
            Err(Error::InvalidObjectId(64))
        ));
        assert!(ObjectRecord::fragments(1, ObjectType::Invalid, &[0; 4]).is_err());
    }

    #[test]
    fn test_serializable_object() {
        let record = SerializableObjectRecord {
            params: ImageEffectParams::Sharpen {
                radius: 2.5,
                amount: 40.0,
            },
        };
        let po = record.encode().unwrap();
        assert_eq!(po.len(), 12 + 16 + 4 + 8);
        assert_eq!(SerializableObjectRecord::parse(po.data()).unwrap(), record);

        let mut bytes = po.into_data();
        bytes[12] ^= 0xFF;
        assert!(matches!(
            SerializableObjectRecord::parse(&bytes),
            Err(Error::UnknownGuid(_))
        ));
    }
}
