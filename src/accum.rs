//! Reassembly of objects that are split over several object records.
//!
//! An object larger than [`crate::records::OBJECT_RECORD_LIMIT`] bytes arrives as a run of object
//! records sharing one object type and table index. [`ObjectAccumulator`] is the keyed byte store
//! behind the run, and [`ObjectReassembler`] drives it from decoded records:
//!
//! - a fragment with the continuation flag adds its bytes and completes the object once the
//!   announced total is reached,
//! - a fragment without the flag completes the object,
//! - a fragment of a different object, or any other record, interrupts the pending object,
//! - the end of file record releases whatever is still pending.
//!
//! What an interruption means is decided by [`ContinuationPolicy`].
//!
//! # Examples
//!
//! ```rust
//! use emfplus::{
//!     accum::ObjectReassembler,
//!     records::ObjectRecord,
//!     types::ObjectType,
//!     DecodeConfig,
//! };
//!
//! let data = vec![0xAB_u8; 100_000];
//! let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
//! let mut done = Vec::new();
//! for fragment in ObjectRecord::fragments(4, ObjectType::Image, &data)? {
//!     done.extend(reassembler.push(&fragment)?);
//! }
//! assert_eq!(done.len(), 1);
//! assert!(done[0].complete);
//! assert_eq!(done[0].data, data);
//! # Ok::<(), emfplus::Error>(())
//! ```

use crate::{
    config::{ContinuationPolicy, DecodeConfig},
    objects::Object,
    records::{ObjectRecord, Record},
    types::ObjectType,
    Error, Result,
};

/// Bytes of one object gathered across records, keyed by object type and table index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAccumulator {
    data: Vec<u8>,
    object_type: ObjectType,
    id: u8,
}

impl Default for ObjectAccumulator {
    fn default() -> Self {
        ObjectAccumulator::new()
    }
}

impl ObjectAccumulator {
    /// An empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        ObjectAccumulator {
            data: Vec::new(),
            object_type: ObjectType::Invalid,
            id: 0,
        }
    }

    /// Number of bytes gathered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Object type and index of the pending object, if any.
    #[must_use]
    pub fn key(&self) -> Option<(ObjectType, u8)> {
        (!self.is_empty()).then_some((self.object_type, self.id))
    }

    /// Bytes gathered so far.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Add bytes of the object `(object_type, id)`.
    ///
    /// The first append fixes the key. Appending an empty slice only checks the key.
    ///
    /// # Errors
    /// Returns [`Error::Schema`] if bytes of another object are pending, and
    /// [`Error::Allocation`] if the buffer cannot grow.
    pub fn append(&mut self, data: &[u8], object_type: ObjectType, id: u8) -> Result<()> {
        if self.is_empty() {
            self.object_type = object_type;
            self.id = id;
        } else if (self.object_type, self.id) != (object_type, id) {
            return Err(Error::Schema(format!(
                "{:?} object {} is pending, cannot append to {:?} object {}",
                self.object_type, self.id, object_type, id
            )));
        }

        self.data
            .try_reserve(data.len())
            .map_err(|_| Error::Allocation {
                requested: self.data.len().saturating_add(data.len()),
            })?;
        self.data.extend_from_slice(data);
        Ok(())
    }

    /// Drop the gathered bytes but keep the buffer for the next object.
    pub fn clear(&mut self) {
        self.data.clear();
        self.object_type = ObjectType::Invalid;
        self.id = 0;
    }

    /// Drop the gathered bytes and the buffer.
    pub fn release(&mut self) {
        self.clear();
        self.data = Vec::new();
    }

    /// Hand out the pending object and leave the accumulator empty.
    pub fn take(&mut self) -> Option<(ObjectType, u8, Vec<u8>)> {
        let (object_type, id) = self.key()?;
        let data = std::mem::take(&mut self.data);
        self.clear();
        Some((object_type, id, data))
    }
}

/// An object put back together from one or more object records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledObject {
    /// Object table index
    pub id: u8,
    /// Type of the object
    pub object_type: ObjectType,
    /// Serialized object bytes
    pub data: Vec<u8>,
    /// `false` when the run was interrupted before the announced total arrived
    pub complete: bool,
}

impl AssembledObject {
    /// Decode the object.
    ///
    /// # Errors
    /// Same as [`Object::parse`]. Incomplete objects usually fail with [`Error::OutOfBounds`].
    pub fn object(&self) -> Result<Object> {
        Object::parse(self.object_type, &self.data)
    }
}

/// Drives an [`ObjectAccumulator`] from the records of a stream.
#[derive(Debug, Clone)]
pub struct ObjectReassembler {
    config: DecodeConfig,
    accum: ObjectAccumulator,
    expected: usize,
}

impl ObjectReassembler {
    /// A reassembler with nothing pending.
    #[must_use]
    pub fn new(config: DecodeConfig) -> Self {
        ObjectReassembler {
            config,
            accum: ObjectAccumulator::new(),
            expected: 0,
        }
    }

    /// Whether a continued object is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.accum.is_empty()
    }

    /// Feed one object record.
    ///
    /// Returns the objects this record finished: none while a continued object is still growing,
    /// one in the common case, two when the record interrupts a pending object and is itself
    /// complete.
    ///
    /// # Errors
    /// Returns [`Error::ContinuationBroken`] for an interruption under
    /// [`ContinuationPolicy::Reject`], [`Error::OutOfRange`] if the object exceeds
    /// [`DecodeConfig::max_object_size`] and [`Error::Allocation`] if the buffer cannot grow.
    pub fn push(&mut self, record: &ObjectRecord) -> Result<Vec<AssembledObject>> {
        let mut finished = Vec::new();

        if let Some(key) = self.accum.key() {
            if key != (record.object_type, record.id) {
                finished.extend(self.interrupt()?);
            }
        }

        match record.total_size {
            Some(total) => {
                let total = usize::try_from(total).unwrap_or(usize::MAX);
                if self.accum.is_empty() {
                    self.check_size(total)?;
                    self.expected = total;
                }
                self.check_size(self.accum.len().saturating_add(record.data.len()))?;
                self.accum
                    .append(&record.data, record.object_type, record.id)?;

                if self.accum.is_empty() {
                    if self.expected == 0 {
                        log::warn!(
                            "{:?} object {} announces a continued object of zero bytes",
                            record.object_type,
                            record.id
                        );
                        finished.push(AssembledObject {
                            id: record.id,
                            object_type: record.object_type,
                            data: Vec::new(),
                            complete: true,
                        });
                    }
                } else if self.accum.len() >= self.expected {
                    log::debug!(
                        "{:?} object {} complete at {} of {} bytes",
                        record.object_type,
                        record.id,
                        self.accum.len(),
                        self.expected
                    );
                    finished.extend(self.release(true));
                }
            }
            None if self.accum.is_empty() => finished.push(AssembledObject {
                id: record.id,
                object_type: record.object_type,
                data: record.data.clone(),
                complete: true,
            }),
            None => {
                self.check_size(self.accum.len().saturating_add(record.data.len()))?;
                self.accum
                    .append(&record.data, record.object_type, record.id)?;
                if self.accum.len() != self.expected {
                    log::warn!(
                        "{:?} object {} ended with {} bytes, {} were announced",
                        record.object_type,
                        record.id,
                        self.accum.len(),
                        self.expected
                    );
                }
                finished.extend(self.release(true));
            }
        }

        Ok(finished)
    }

    /// Feed any record of the stream.
    ///
    /// Object records go to [`ObjectReassembler::push`]. The end of file record flushes the pending
    /// object through [`ObjectReassembler::finish`]. Every other record interrupts it.
    ///
    /// # Errors
    /// Same as [`ObjectReassembler::push`] and [`ObjectReassembler::interrupt`].
    pub fn feed(&mut self, record: &Record) -> Result<Vec<AssembledObject>> {
        match record {
            Record::Object(object) => self.push(object),
            Record::EndOfFile(_) => Ok(self.finish()?.into_iter().collect()),
            _ => Ok(self.interrupt()?.into_iter().collect()),
        }
    }

    /// End the pending object early.
    ///
    /// # Errors
    /// Returns [`Error::ContinuationBroken`] under [`ContinuationPolicy::Reject`]. The pending
    /// bytes are dropped either way.
    pub fn interrupt(&mut self) -> Result<Option<AssembledObject>> {
        let Some((object_type, id)) = self.accum.key() else {
            return Ok(None);
        };

        match self.config.continuation {
            ContinuationPolicy::TerminateOnChange => {
                log::warn!(
                    "{:?} object {} interrupted after {} of {} bytes",
                    object_type,
                    id,
                    self.accum.len(),
                    self.expected
                );
                Ok(self.release(false))
            }
            ContinuationPolicy::Reject => {
                let error = Error::ContinuationBroken {
                    object_type: u8::try_from(object_type.value()).unwrap_or(u8::MAX),
                    id,
                    received: self.accum.len(),
                    expected: self.expected,
                };
                self.accum.clear();
                self.expected = 0;
                Err(error)
            }
        }
    }

    /// Flush at the end of the stream and free the buffer.
    ///
    /// # Errors
    /// Same as [`ObjectReassembler::interrupt`].
    pub fn finish(&mut self) -> Result<Option<AssembledObject>> {
        let result = self.interrupt();
        self.accum.release();
        result
    }

    fn release(&mut self, complete: bool) -> Option<AssembledObject> {
        self.expected = 0;
        self.accum
            .take()
            .map(|(object_type, id, data)| AssembledObject {
                id,
                object_type,
                data,
                complete,
            })
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.config.max_object_size {
            return Err(Error::OutOfRange {
                what: "continued object size",
                value: i64::try_from(size).unwrap_or(i64::MAX),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ClearRecord, EndOfFileRecord};
    use crate::types::Argb;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 253) as u8).collect()
    }

    #[test]
    fn test_accumulator_keys() {
        let mut accum = ObjectAccumulator::new();
        assert_eq!(accum.key(), None);
        accum.append(&[1, 2], ObjectType::Path, 3).unwrap();
        accum.append(&[3], ObjectType::Path, 3).unwrap();
        assert_eq!(accum.data(), &[1, 2, 3]);
        assert!(matches!(
            accum.append(&[4], ObjectType::Path, 4),
            Err(Error::Schema(_))
        ));
        assert!(accum.append(&[], ObjectType::Pen, 3).is_err());

        let (kind, id, data) = accum.take().unwrap();
        assert_eq!((kind, id, data.len()), (ObjectType::Path, 3, 3));
        assert!(accum.is_empty());
        accum.append(&[9], ObjectType::Pen, 1).unwrap();
        accum.release();
        assert_eq!(accum.len(), 0);
    }

    #[test]
    fn test_single_record_object() {
        let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
        let record = ObjectRecord {
            id: 2,
            object_type: ObjectType::Brush,
            total_size: None,
            data: vec![1, 2, 3, 4],
        };
        let done = reassembler.push(&record).unwrap();
        assert_eq!(done.len(), 1);
        assert!(done[0].complete);
        assert!(!reassembler.is_pending());
    }

    #[test]
    fn test_reassemble_fragments() {
        let data = pattern(200_000);
        let fragments = ObjectRecord::fragments(5, ObjectType::Image, &data).unwrap();
        assert_eq!(fragments.len(), 4);

        let mut reassembler = ObjectReassembler::new(DecodeConfig::strict());
        for fragment in &fragments[..3] {
            assert!(reassembler.push(fragment).unwrap().is_empty());
        }
        assert!(reassembler.is_pending());
        let done = reassembler.push(&fragments[3]).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].data, data);
        assert_eq!((done[0].id, done[0].complete), (5, true));
    }

    #[test]
    fn test_total_reached_with_flag_still_set() {
        let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
        let first = ObjectRecord {
            id: 1,
            object_type: ObjectType::Path,
            total_size: Some(6),
            data: vec![0; 4],
        };
        let second = ObjectRecord {
            data: vec![0; 2],
            ..first.clone()
        };
        assert!(reassembler.push(&first).unwrap().is_empty());
        let done = reassembler.push(&second).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].data.len(), 6);
    }

    #[test]
    fn test_interrupted_by_other_record() {
        let fragments = ObjectRecord::fragments(0, ObjectType::Image, &pattern(70_000)).unwrap();
        let clear = Record::Clear(ClearRecord {
            color: Argb::new(0, 0, 0, 0),
        });

        let mut lenient = ObjectReassembler::new(DecodeConfig::lenient());
        lenient
            .feed(&Record::Object(fragments[0].clone()))
            .unwrap();
        let done = lenient.feed(&clear).unwrap();
        assert_eq!(done.len(), 1);
        assert!(!done[0].complete);
        assert_eq!(done[0].data.len(), 65020);

        let mut strict = ObjectReassembler::new(DecodeConfig::strict());
        strict.feed(&Record::Object(fragments[0].clone())).unwrap();
        assert!(matches!(
            strict.feed(&clear),
            Err(Error::ContinuationBroken {
                id: 0,
                received: 65020,
                expected: 70_000,
                ..
            })
        ));
        assert!(!strict.is_pending());
    }

    #[test]
    fn test_interrupted_by_other_object() {
        let fragments = ObjectRecord::fragments(1, ObjectType::Path, &pattern(70_000)).unwrap();
        let other = ObjectRecord {
            id: 2,
            object_type: ObjectType::Brush,
            total_size: None,
            data: vec![7; 8],
        };
        let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
        reassembler.push(&fragments[0]).unwrap();
        let done = reassembler.push(&other).unwrap();
        assert_eq!(done.len(), 2);
        assert!(!done[0].complete);
        assert_eq!(done[1].id, 2);
        assert!(done[1].complete);
    }

    #[test]
    fn test_zero_size_continued_object() {
        let empty = ObjectRecord {
            id: 1,
            object_type: ObjectType::Image,
            total_size: Some(0),
            data: Vec::new(),
        };
        let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
        let done = reassembler.push(&empty).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!((done[0].id, done[0].object_type), (1, ObjectType::Image));
        assert!(done[0].data.is_empty());
        assert!(done[0].complete);
        assert!(!reassembler.is_pending());
    }

    #[test]
    fn test_end_of_file_flushes() {
        let fragments = ObjectRecord::fragments(1, ObjectType::Font, &pattern(70_000)).unwrap();
        let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
        reassembler.push(&fragments[0]).unwrap();
        let done = reassembler
            .feed(&Record::EndOfFile(EndOfFileRecord))
            .unwrap();
        assert_eq!(done.len(), 1);
        assert!(!reassembler.is_pending());
        assert!(reassembler.finish().unwrap().is_none());
    }

    #[test]
    fn test_max_object_size() {
        let config = DecodeConfig {
            max_object_size: 100_000,
            ..DecodeConfig::default()
        };
        let fragments = ObjectRecord::fragments(1, ObjectType::Image, &pattern(150_000)).unwrap();
        let mut reassembler = ObjectReassembler::new(config);
        assert!(matches!(
            reassembler.push(&fragments[0]),
            Err(Error::OutOfRange { .. })
        ));
    }
}
