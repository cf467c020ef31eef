//! EMF+ records: the drawing, state and object definition commands of a stream.
//!
//! Every record starts with a [`RecordHeader`] followed by a payload whose layout depends on the
//! record type and, for many records, on bits of the header flags word. Each of the 58 record
//! types has a typed struct implementing [`EmfRecord`]; flag bits that only announce how the
//! payload is stored (16-bit coordinates, relative points, a color instead of a brush index) are
//! derived from the struct on encode and interpreted on decode.
//!
//! # Key Components
//!
//! - [`header`] - the common header and the record framing helpers
//! - [`flags`] - named accessors for the bit fields of the flags word
//! - [`control`] - header, end of file, comment, GetDC and multi-format records
//! - [`object`] - object definitions, fragmentation and image effect records
//! - [`draw`] / [`fill`] / [`text`] - drawing records
//! - [`state`] / [`container`] / [`transform`] / [`clip`] / [`terminal`] - graphics state
//! - [`Record`] - one enum over all record types
//! - [`RecordStream`] - iterator over the records of an EMF+ comment payload
//!
//! # Examples
//!
//! ```rust
//! use emfplus::records::{EmfRecord, EndOfFileRecord, HeaderRecord, Record, RecordStream};
//!
//! let mut stream = Vec::new();
//! stream.extend_from_slice(HeaderRecord::new(96).encode()?.data());
//! stream.extend_from_slice(EndOfFileRecord.encode()?.data());
//!
//! let records = RecordStream::new(&stream).collect::<Result<Vec<_>, _>>()?;
//! assert!(matches!(records[0], Record::Header(_)));
//! assert!(matches!(records[1], Record::EndOfFile(_)));
//! # Ok::<(), emfplus::Error>(())
//! ```

/// Records without flags or payload.
macro_rules! empty_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl $crate::records::EmfRecord for $name {
            const TYPE: $crate::types::RecordType = $crate::types::RecordType::$kind;

            fn flags(&self) -> $crate::Result<u16> {
                Ok(0)
            }

            fn payload(&self) -> $crate::Result<Vec<u8>> {
                Ok(Vec::new())
            }

            fn decode(
                _header: &$crate::records::RecordHeader,
                _parser: &mut $crate::serial::Parser<'_>,
            ) -> $crate::Result<Self> {
                Ok($name)
            }
        }
    };
}

/// Records whose payload is opaque to the codec and kept as it is.
macro_rules! opaque_record {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            /// Flags word as found
            pub flags: u16,
            /// Payload bytes
            pub data: Vec<u8>,
        }

        impl $crate::records::EmfRecord for $name {
            const TYPE: $crate::types::RecordType = $crate::types::RecordType::$kind;

            fn flags(&self) -> $crate::Result<u16> {
                Ok(self.flags)
            }

            fn payload(&self) -> $crate::Result<Vec<u8>> {
                Ok(self.data.clone())
            }

            fn decode(
                header: &$crate::records::RecordHeader,
                parser: &mut $crate::serial::Parser<'_>,
            ) -> $crate::Result<Self> {
                Ok($name {
                    flags: header.flags,
                    data: parser.read_rest().to_vec(),
                })
            }
        }
    };
}

pub mod clip;
pub mod container;
pub mod control;
pub mod draw;
pub mod fill;
pub mod flags;
pub mod header;
pub mod object;
pub mod state;
pub mod terminal;
pub mod text;
pub mod transform;

pub use clip::{
    OffsetClipRecord, ResetClipRecord, SetClipPathRecord, SetClipRectRecord, SetClipRegionRecord,
};
pub use container::{
    BeginContainerNoParamsRecord, BeginContainerRecord, EndContainerRecord, RestoreRecord,
    SaveRecord,
};
pub use control::{
    CommentRecord, EndOfFileRecord, GetDcRecord, HeaderRecord, MultiFormatEndRecord,
    MultiFormatSectionRecord, MultiFormatStartRecord,
};
pub use draw::{
    ClearRecord, DrawArcRecord, DrawBeziersRecord, DrawClosedCurveRecord, DrawCurveRecord,
    DrawEllipseRecord, DrawImagePointsRecord, DrawImageRecord, DrawLinesRecord, DrawPathRecord,
    DrawPieRecord, DrawRectsRecord,
};
pub use fill::{
    FillClosedCurveRecord, FillEllipseRecord, FillPathRecord, FillPieRecord, FillPolygonRecord,
    FillRectsRecord, FillRegionRecord, StrokeFillPathRecord,
};
pub use flags::BrushRef;
pub use header::{
    encode_record, header_flags, record_size, RecordHeader, HEADER_SIZE, RECORD_FLAG,
};
pub use object::{ObjectRecord, SerializableObjectRecord, OBJECT_RECORD_LIMIT};
pub use state::{
    SetAntiAliasModeRecord, SetCompositingModeRecord, SetCompositingQualityRecord,
    SetInterpolationModeRecord, SetPixelOffsetModeRecord, SetRenderingOriginRecord,
    SetTextContrastRecord, SetTextRenderingHintRecord,
};
pub use terminal::{SetTsClipRecord, SetTsGraphicsRecord};
pub use text::{DrawDriverStringRecord, DrawStringRecord};
pub use transform::{
    MultiplyWorldTransformRecord, ResetWorldTransformRecord, RotateWorldTransformRecord,
    ScaleWorldTransformRecord, SetPageTransformRecord, SetWorldTransformRecord,
    TranslateWorldTransformRecord,
};

use crate::{
    config::DecodeConfig,
    objects::{count_u32, read_count},
    path::points::{decode_points, encode_points, PointEncoding},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser, Wire},
    types::{rects_to_i16, PointF, Rect16, RectF, RecordType},
    Error, Result,
};

/// A record with a wire representation.
///
/// ## Implementation Requirements
///
/// - `flags` returns the complete flags word, including every bit derived from the payload form
/// - `payload` returns the unpadded payload; header and padding are added by [`EmfRecord::encode`]
/// - `decode` reads from a parser fenced to exactly `DataSize` bytes and never returns a
///   partially populated value
pub trait EmfRecord: Sized {
    /// Record type, without the marker bit.
    const TYPE: RecordType;

    /// Flags word of the header.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] or [`Error::OutOfRange`] for values that do not fit in
    /// their bit field.
    fn flags(&self) -> Result<u16>;

    /// Serialized payload without header and padding.
    ///
    /// # Errors
    /// Returns [`Error::Schema`], [`Error::OutOfRange`] or [`Error::InvalidObjectId`] if the
    /// value cannot be represented, and [`Error::Allocation`] on allocation failure.
    fn payload(&self) -> Result<Vec<u8>>;

    /// Decode the payload described by `header`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] for truncated payloads and [`Error::Malformed`],
    /// [`Error::UnknownIdentifier`] or [`Error::InvalidObjectId`] for invalid content.
    fn decode(header: &RecordHeader, parser: &mut Parser<'_>) -> Result<Self>;

    /// Serialize the complete record: header, payload and padding.
    ///
    /// # Errors
    /// Same as [`EmfRecord::flags`] and [`EmfRecord::payload`].
    fn encode(&self) -> Result<PseudoObject> {
        let flags = self.flags()?;
        let payload = self.payload()?;
        encode_record(Self::TYPE, flags, &payload)
    }

    /// Decode a complete record from the start of `data`.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if the record is of a different type, otherwise the errors
    /// of [`split_record`] and [`EmfRecord::decode`].
    fn parse(data: &[u8]) -> Result<Self> {
        let (header, payload) = split_record(data)?;
        let kind = header.kind()?;
        if kind != Self::TYPE {
            return Err(Error::TypeMismatch {
                expected: Self::TYPE.name(),
                found: kind.name(),
            });
        }
        Self::decode(&header, &mut Parser::new(payload))
    }
}

/// Split the record at the start of `data` into its header and unpadded payload.
///
/// # Errors
/// Returns [`Error::OutOfBounds`] if the header or the declared record runs past `data`, and
/// [`Error::Malformed`] if the header sizes are inconsistent.
pub fn split_record(data: &[u8]) -> Result<(RecordHeader, &[u8])> {
    let mut parser = Parser::new(data);
    let header: RecordHeader = parser.read()?;
    header.validate(data.len())?;
    let payload = parser.read_bytes(header.data_size as usize)?;
    Ok((header, payload))
}

/// Flatten a payload field list.
pub(crate) fn payload_of(fields: &[Field<'_>]) -> Result<Vec<u8>> {
    Ok(serialize(Oid::Raw, fields)?.into_data())
}

/// The compressed bit for a `compressed` switch.
pub(crate) fn compressed_bit(compressed: bool) -> u16 {
    if compressed {
        flags::FLAG_COMPRESSED
    } else {
        0
    }
}

/// Whether the header announces 16-bit coordinates.
pub(crate) fn is_compressed(header: &RecordHeader) -> bool {
    header.flags & flags::FLAG_COMPRESSED != 0
}

/// Encode one rectangle, as 16-bit integers when `compressed`.
pub(crate) fn encode_rect(rect: &RectF, compressed: bool) -> Result<Vec<u8>> {
    encode_rects(std::slice::from_ref(rect), compressed)
}

/// Encode rectangles without a count, as 16-bit integers when `compressed`.
pub(crate) fn encode_rects(rects: &[RectF], compressed: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if compressed {
        let rects = rects_to_i16(rects)?;
        out.reserve(rects.len() * Rect16::SIZE);
        for rect in &rects {
            rect.write(&mut out);
        }
    } else {
        out.reserve(rects.len() * RectF::SIZE);
        for rect in rects {
            rect.write(&mut out);
        }
    }
    Ok(out)
}

/// Decode one rectangle.
pub(crate) fn decode_rect(parser: &mut Parser<'_>, compressed: bool) -> Result<RectF> {
    if compressed {
        Ok(widen_rect(parser.read()?))
    } else {
        parser.read()
    }
}

/// Decode `count` rectangles, bounds checked against the element size of their form.
pub(crate) fn decode_rects(
    parser: &mut Parser<'_>,
    count: usize,
    compressed: bool,
) -> Result<Vec<RectF>> {
    if compressed {
        Ok(parser
            .read_array::<Rect16>(count)?
            .into_iter()
            .map(widen_rect)
            .collect())
    } else {
        parser.read_array(count)
    }
}

/// Encode a `u32` count followed by the points in the given form.
pub(crate) fn encode_point_list(points: &[PointF], encoding: PointEncoding) -> Result<Vec<u8>> {
    let count = count_u32("point count", points.len())?;
    let points = encode_points(points, encoding)?;
    payload_of(&[Field::U32(count), Field::Bytes(&points)])
}

/// Decode a `u32` count followed by the points in the given form.
pub(crate) fn decode_point_list(
    parser: &mut Parser<'_>,
    encoding: PointEncoding,
) -> Result<Vec<PointF>> {
    let count = read_count(parser)?;
    decode_points(parser, count, encoding)
}

/// Encode a `u32` count followed by the rectangles.
pub(crate) fn encode_rect_list(rects: &[RectF], compressed: bool) -> Result<Vec<u8>> {
    let count = count_u32("rectangle count", rects.len())?;
    let rects = encode_rects(rects, compressed)?;
    payload_of(&[Field::U32(count), Field::Bytes(&rects)])
}

/// Decode a `u32` count followed by the rectangles.
pub(crate) fn decode_rect_list(parser: &mut Parser<'_>, compressed: bool) -> Result<Vec<RectF>> {
    let count = read_count(parser)?;
    decode_rects(parser, count, compressed)
}

fn widen_rect(rect: Rect16) -> RectF {
    RectF::new(
        f32::from(rect.x),
        f32::from(rect.y),
        f32::from(rect.width),
        f32::from(rect.height),
    )
}

macro_rules! record_enum {
    ($($kind:ident($ty:ty)),* $(,)?) => {
        /// Any EMF+ record.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Record {
            $(
                #[doc = concat!("A [`", stringify!($ty), "`]")]
                $kind($ty),
            )*
        }

        impl Record {
            /// Type of this record.
            #[must_use]
            pub fn kind(&self) -> RecordType {
                match self {
                    $(Record::$kind(_) => RecordType::$kind,)*
                }
            }

            /// Serialize the complete record.
            ///
            /// # Errors
            /// Same as [`EmfRecord::encode`].
            pub fn encode(&self) -> Result<PseudoObject> {
                match self {
                    $(Record::$kind(record) => record.encode(),)*
                }
            }

            /// Decode a payload of the given type.
            ///
            /// # Errors
            /// Same as [`EmfRecord::decode`].
            pub fn decode(kind: RecordType, header: &RecordHeader, payload: &[u8]) -> Result<Self> {
                let mut parser = Parser::new(payload);
                Ok(match kind {
                    $(RecordType::$kind => Record::$kind(<$ty>::decode(header, &mut parser)?),)*
                })
            }
        }

        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Record::$kind(record)
                }
            }
        )*
    };
}

record_enum! {
    Header(HeaderRecord),
    EndOfFile(EndOfFileRecord),
    Comment(CommentRecord),
    GetDc(GetDcRecord),
    MultiFormatStart(MultiFormatStartRecord),
    MultiFormatSection(MultiFormatSectionRecord),
    MultiFormatEnd(MultiFormatEndRecord),
    Object(ObjectRecord),
    Clear(ClearRecord),
    FillRects(FillRectsRecord),
    DrawRects(DrawRectsRecord),
    FillPolygon(FillPolygonRecord),
    DrawLines(DrawLinesRecord),
    FillEllipse(FillEllipseRecord),
    DrawEllipse(DrawEllipseRecord),
    FillPie(FillPieRecord),
    DrawPie(DrawPieRecord),
    DrawArc(DrawArcRecord),
    FillRegion(FillRegionRecord),
    FillPath(FillPathRecord),
    DrawPath(DrawPathRecord),
    FillClosedCurve(FillClosedCurveRecord),
    DrawClosedCurve(DrawClosedCurveRecord),
    DrawCurve(DrawCurveRecord),
    DrawBeziers(DrawBeziersRecord),
    DrawImage(DrawImageRecord),
    DrawImagePoints(DrawImagePointsRecord),
    DrawString(DrawStringRecord),
    SetRenderingOrigin(SetRenderingOriginRecord),
    SetAntiAliasMode(SetAntiAliasModeRecord),
    SetTextRenderingHint(SetTextRenderingHintRecord),
    SetTextContrast(SetTextContrastRecord),
    SetInterpolationMode(SetInterpolationModeRecord),
    SetPixelOffsetMode(SetPixelOffsetModeRecord),
    SetCompositingMode(SetCompositingModeRecord),
    SetCompositingQuality(SetCompositingQualityRecord),
    Save(SaveRecord),
    Restore(RestoreRecord),
    BeginContainer(BeginContainerRecord),
    BeginContainerNoParams(BeginContainerNoParamsRecord),
    EndContainer(EndContainerRecord),
    SetWorldTransform(SetWorldTransformRecord),
    ResetWorldTransform(ResetWorldTransformRecord),
    MultiplyWorldTransform(MultiplyWorldTransformRecord),
    TranslateWorldTransform(TranslateWorldTransformRecord),
    ScaleWorldTransform(ScaleWorldTransformRecord),
    RotateWorldTransform(RotateWorldTransformRecord),
    SetPageTransform(SetPageTransformRecord),
    ResetClip(ResetClipRecord),
    SetClipRect(SetClipRectRecord),
    SetClipPath(SetClipPathRecord),
    SetClipRegion(SetClipRegionRecord),
    OffsetClip(OffsetClipRecord),
    DrawDriverString(DrawDriverStringRecord),
    StrokeFillPath(StrokeFillPathRecord),
    SerializableObject(SerializableObjectRecord),
    SetTsGraphics(SetTsGraphicsRecord),
    SetTsClip(SetTsClipRecord),
}

impl Record {
    /// Decode the complete record at the start of `data`.
    ///
    /// # Errors
    /// Same as [`split_record`], [`RecordHeader::kind`] and [`EmfRecord::decode`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (header, payload) = split_record(data)?;
        Self::decode(header.kind()?, &header, payload)
    }
}

/// Iterator over the records of an EMF+ comment payload.
///
/// Each header is checked against the bytes that remain before its record is decoded. A broken
/// header ends the iteration after its error is returned, because the position of the next record
/// is no longer known. A record whose payload fails to decode yields its error and the iteration
/// continues with the next record.
///
/// # Examples
///
/// ```rust
/// use emfplus::{records::{ClearRecord, EmfRecord, RecordStream}, types::Argb};
///
/// let bytes = ClearRecord { color: Argb::new(0xFF, 0, 0, 0) }.encode()?.into_data();
/// let mut stream = RecordStream::new(&bytes);
/// assert!(stream.next().unwrap().is_ok());
/// assert!(stream.next().is_none());
/// # Ok::<(), emfplus::Error>(())
/// ```
pub struct RecordStream<'a> {
    data: &'a [u8],
    offset: usize,
    config: DecodeConfig,
    done: bool,
}

impl<'a> RecordStream<'a> {
    /// Iterate over `data` with the default configuration.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecodeConfig::default())
    }

    /// Iterate over `data` with the given configuration.
    #[must_use]
    pub fn with_config(data: &'a [u8], config: DecodeConfig) -> Self {
        RecordStream {
            data,
            offset: 0,
            config,
            done: false,
        }
    }

    /// Offset of the next record.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    fn fail(&mut self, error: Error) -> Option<Result<Record>> {
        self.done = true;
        Some(Err(error))
    }
}

impl Iterator for RecordStream<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done || self.offset >= self.data.len() {
                return None;
            }

            let rest = &self.data[self.offset..];
            let (header, payload) = match split_record(rest) {
                Ok(parts) => parts,
                Err(error) => return self.fail(error),
            };
            if self.config.require_record_flag && !header.has_record_flag() {
                return self.fail(malformed_error!(
                    "Record type 0x{:04X} at offset {} lacks the EMF+ marker",
                    header.record_type,
                    self.offset
                ));
            }

            let start = self.offset;
            self.offset += header.size as usize;

            match header.kind() {
                Ok(kind) => {
                    log::trace!("{} at offset {}, {} bytes", kind.name(), start, header.size);
                    return Some(Record::decode(kind, &header, payload));
                }
                Err(error) => {
                    if !self.config.skip_unknown_records {
                        return self.fail(error);
                    }
                    log::warn!(
                        "skipping unknown record type 0x{:04X} at offset {}",
                        header.record_type,
                        start
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Argb;

    fn clear() -> Vec<u8> {
        ClearRecord {
            color: Argb::new(0xFF, 1, 2, 3),
        }
        .encode()
        .unwrap()
        .into_data()
    }

    #[test]
    fn test_split_record() {
        let bytes = clear();
        let (header, payload) = split_record(&bytes).unwrap();
        assert_eq!(header.kind().unwrap(), RecordType::Clear);
        assert_eq!(payload, &[3, 2, 1, 0xFF]);
        assert!(split_record(&bytes[..15]).is_err());
    }

    #[test]
    fn test_record_parse_dispatch() {
        let record = Record::parse(&clear()).unwrap();
        assert_eq!(record.kind(), RecordType::Clear);
        assert_eq!(Record::parse(&record.encode().unwrap().into_data()).unwrap(), record);
    }

    #[test]
    fn test_stream_skips_unknown_types() {
        let mut bytes = clear();
        bytes.extend_from_slice(&[0x7F, 0x40, 0, 0, 16, 0, 0, 0, 4, 0, 0, 0, 1, 2, 3, 4]);
        bytes.extend(clear());

        let records: Vec<_> = RecordStream::new(&bytes).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);

        let strict = DecodeConfig::strict();
        let results: Vec<_> = RecordStream::with_config(&bytes, strict).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::UnknownIdentifier(0x7F))));
    }

    #[test]
    fn test_stream_stops_on_broken_header() {
        let mut bytes = clear();
        bytes.extend_from_slice(&[0x09, 0x40, 0, 0, 64, 0, 0, 0]);
        let results: Vec<_> = RecordStream::new(&bytes).collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }

    #[test]
    fn test_stream_record_flag() {
        let mut bytes = clear();
        bytes[1] = 0;
        assert!(RecordStream::new(&bytes).next().unwrap().is_ok());
        let mut strict = RecordStream::with_config(&bytes, DecodeConfig::strict());
        assert!(strict.next().unwrap().is_err());
        assert!(strict.next().is_none());
    }

    #[test]
    fn test_decode_error_does_not_stop_stream() {
        // Clear record whose payload is one byte short
        let mut bytes = vec![0x09, 0x40, 0, 0, 16, 0, 0, 0, 3, 0, 0, 0, 1, 2, 3, 0];
        bytes.extend(clear());
        let results: Vec<_> = RecordStream::new(&bytes).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_empty_input() {
        assert!(RecordStream::new(&[]).next().is_none());
        assert!(Record::parse(&[]).is_err());
    }
}
