//! Batching of encoded records into EMF+ comment payloads.
//!
//! EMF+ records travel inside `EMR_COMMENT` records of the enclosing EMF file. Each comment payload
//! starts with the `EMF+` signature and holds one or more complete records. Building the EMF
//! comment and writing the file is left to a [`RecordSink`]; [`RecordWriter`] only decides where
//! one payload ends and the next begins.
//!
//! The `draw*` helpers compose the object and drawing records a simple vector producer needs for
//! a line, a filled path or a piece of text.
//!
//! # Examples
//!
//! ```rust
//! use emfplus::{
//!     records::{EndOfFileRecord, HeaderRecord},
//!     writer::RecordWriter,
//! };
//!
//! let mut writer = RecordWriter::new(Vec::new());
//! writer.write_record(&HeaderRecord::new(96))?;
//! writer.write_record(&EndOfFileRecord)?;
//! let comments: Vec<Vec<u8>> = writer.into_inner()?;
//! assert_eq!(comments.len(), 1);
//! assert_eq!(&comments[0][..4], b"EMF+");
//! # Ok::<(), emfplus::Error>(())
//! ```

use widestring::U16String;

use crate::{
    objects::{Font, GraphicsVersion, Object, PathObject, StringFormat},
    path::PathBuilder,
    pseudo::{Oid, PseudoObject},
    records::{
        flags::check_object_id, split_record, BrushRef, DrawPathRecord, DrawStringRecord,
        EmfRecord, FillPathRecord, ObjectRecord,
    },
    types::{FontStyle, PathPointFlags, PointF, RectF, StringAlignment},
    Error, Result,
};

/// Signature that opens every EMF+ comment payload.
pub const EMF_PLUS_SIGNATURE: [u8; 4] = *b"EMF+";

/// Default payload size at which a batch is handed to the sink.
///
/// Large enough for the biggest single object record, so object fragments are never batched with
/// anything else.
pub const DEFAULT_CAPACITY: usize = 65536;

/// Receiver of finished EMF+ comment payloads.
///
/// An implementation wraps each payload in an EMF comment record and appends it to the file being
/// written. The payload already starts with [`EMF_PLUS_SIGNATURE`].
pub trait RecordSink {
    /// Take ownership of one comment payload.
    ///
    /// # Errors
    /// Whatever the sink reports, it is passed through unchanged.
    fn append(&mut self, comment: Vec<u8>) -> Result<()>;
}

impl RecordSink for Vec<Vec<u8>> {
    fn append(&mut self, comment: Vec<u8>) -> Result<()> {
        self.push(comment);
        Ok(())
    }
}

/// Collects encoded records and flushes them to a [`RecordSink`] in comment sized batches.
///
/// Records are never split. A record larger than the capacity goes out alone.
#[derive(Debug)]
pub struct RecordWriter<S: RecordSink> {
    sink: S,
    buffer: Vec<u8>,
    records: usize,
    capacity: usize,
}

impl<S: RecordSink> RecordWriter<S> {
    /// A writer with [`DEFAULT_CAPACITY`].
    pub fn new(sink: S) -> Self {
        Self::with_capacity(sink, DEFAULT_CAPACITY)
    }

    /// A writer that flushes before a batch would grow past `capacity` bytes, signature included.
    pub fn with_capacity(sink: S, capacity: usize) -> Self {
        RecordWriter {
            sink,
            buffer: Vec::new(),
            records: 0,
            capacity,
        }
    }

    /// Number of records waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.records
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Queue one or more complete records.
    ///
    /// The bytes of `records` are checked to be a sequence of well framed records before any of
    /// them is queued.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for an empty buffer, the framing errors of
    /// [`crate::records::split_record`] and whatever the sink reports on a flush.
    pub fn write(&mut self, records: &PseudoObject) -> Result<()> {
        let data = records.data();
        if data.is_empty() {
            return Err(Error::Empty);
        }

        let mut count = 0;
        let mut offset = 0;
        while offset < data.len() {
            let (header, _) = split_record(&data[offset..])?;
            offset += header.size as usize;
            count += 1;
        }

        if self.records > 0
            && EMF_PLUS_SIGNATURE.len() + self.buffer.len() + data.len() > self.capacity
        {
            self.flush()?;
        }

        self.buffer
            .try_reserve(data.len())
            .map_err(|_| Error::Allocation {
                requested: self.buffer.len().saturating_add(data.len()),
            })?;
        self.buffer.extend_from_slice(data);
        self.records += count;

        if EMF_PLUS_SIGNATURE.len() + self.buffer.len() >= self.capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Encode and queue a record.
    ///
    /// # Errors
    /// Same as [`EmfRecord::encode`] and [`RecordWriter::write`].
    pub fn write_record<R: EmfRecord>(&mut self, record: &R) -> Result<()> {
        self.write(&record.encode()?)
    }

    /// Encode `object` into as many object records as it needs and queue them.
    ///
    /// # Errors
    /// Same as [`ObjectRecord::encode_fragments`] and [`RecordWriter::write`].
    pub fn write_object(&mut self, id: u32, object: &Object) -> Result<()> {
        for fragment in ObjectRecord::encode_fragments(id, object)? {
            self.write(&fragment)?;
        }
        Ok(())
    }

    /// Hand the queued records to the sink as one comment payload.
    ///
    /// Nothing happens if no record is queued.
    ///
    /// # Errors
    /// Whatever the sink reports. The queued records are dropped in that case.
    pub fn flush(&mut self) -> Result<()> {
        if self.records == 0 {
            return Ok(());
        }

        let mut comment = Vec::with_capacity(EMF_PLUS_SIGNATURE.len() + self.buffer.len());
        comment.extend_from_slice(&EMF_PLUS_SIGNATURE);
        comment.append(&mut self.buffer);
        log::debug!(
            "flushing {} records in a {} byte comment",
            self.records,
            comment.len()
        );
        self.records = 0;
        self.sink.append(comment)
    }

    /// Flush and give back the sink.
    ///
    /// # Errors
    /// Same as [`RecordWriter::flush`].
    pub fn into_inner(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Draw a straight line from `start` to `end`.
    ///
    /// A two point path object is stored at `path_id` and outlined with the pen at `pen_id`. With
    /// `dashed` set both points carry the dash mode bit.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] for an index above 63 and the errors of
    /// [`RecordWriter::write`].
    pub fn drawline(
        &mut self,
        pen_id: u32,
        path_id: u32,
        start: PointF,
        end: PointF,
        dashed: bool,
    ) -> Result<()> {
        let path_index = check_object_id(path_id)?;
        let point_flags = if dashed {
            PathPointFlags::DASH_MODE
        } else {
            PathPointFlags::empty()
        };

        let mut path = PathBuilder::new();
        path.moveto(start, point_flags)?;
        path.lineto(end, point_flags)?;

        let object = Object::Path(PathObject::new(GraphicsVersion::default(), path));
        let mut out = stage_object(path_id, &object)?;
        let draw = DrawPathRecord {
            path_id: path_index,
            pen_id,
        };
        out.append_object(&draw.encode()?, false)?;
        self.write(&out)
    }

    /// Fill and outline a path object, see [`drawfill`].
    ///
    /// # Errors
    /// Same as [`drawfill`] and [`RecordWriter::write`].
    pub fn drawfill(
        &mut self,
        path_id: u32,
        pen_id: Option<u32>,
        brush: Option<BrushRef>,
    ) -> Result<()> {
        self.write(&drawfill(path_id, pen_id, brush)?)
    }

    /// Draw a line of text with its baseline starting at `run.origin`.
    ///
    /// Stores the string format and the font objects, then emits the string record. The layout
    /// rectangle is exactly one line tall, so the line alignment of the format does not move the
    /// text. Horizontally the origin is the left edge, the center or the right edge of the text
    /// depending on the format's alignment.
    ///
    /// # Errors
    /// Returns [`Error::InvalidObjectId`] for an index above 63, [`Error::OutOfRange`] for a font
    /// with an em size of zero and the errors of [`RecordWriter::write`].
    pub fn drawstring(&mut self, run: &TextRun<'_>) -> Result<()> {
        let font_id = check_object_id(run.font_id)?;
        check_object_id(run.format_id)?;
        let text = U16String::from_str(run.text);
        let layout = run.layout(text.len())?;

        let mut out = stage_object(run.format_id, &Object::StringFormat(run.format.clone()))?;
        let font = Font::new(&run.font.name, run.height, run.style);
        out.append_object(&stage_object(run.font_id, &Object::Font(font))?, false)?;
        let draw = DrawStringRecord {
            font_id,
            brush: run.brush,
            format_id: run.format_id,
            layout,
            text,
        };
        out.append_object(&draw.encode()?, false)?;
        self.write(&out)
    }
}

/// Encode all object records of `object` back to back without queuing them.
fn stage_object(id: u32, object: &Object) -> Result<PseudoObject> {
    let mut out = PseudoObject::new(Oid::Raw);
    for fragment in ObjectRecord::encode_fragments(id, object)? {
        out.append_object(&fragment, false)?;
    }
    Ok(out)
}

/// Fill and/or outline the path object at `path_id`.
///
/// With a brush the path is filled first, with a pen it is outlined afterwards. The records are
/// returned back to back in one buffer for [`RecordWriter::write`].
///
/// # Errors
/// Returns [`Error::Schema`] if neither a pen nor a brush is given and [`Error::InvalidObjectId`]
/// for an index above 63.
pub fn drawfill(
    path_id: u32,
    pen_id: Option<u32>,
    brush: Option<BrushRef>,
) -> Result<PseudoObject> {
    let path_id = check_object_id(path_id)?;
    if pen_id.is_none() && brush.is_none() {
        return Err(Error::Schema(
            "a path needs a pen or a brush to be drawn".to_string(),
        ));
    }

    let mut out = PseudoObject::new(Oid::Raw);
    if let Some(brush) = brush {
        out.append_object(&FillPathRecord { path_id, brush }.encode()?, false)?;
    }
    if let Some(pen_id) = pen_id {
        check_object_id(pen_id)?;
        out.append_object(&DrawPathRecord { path_id, pen_id }.encode()?, false)?;
    }
    Ok(out)
}

/// Vertical metrics of a font, in font design units.
///
/// The values come from the font's `hhea` or `OS/2` table. Only their ratio to `em_size` matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    /// Family name
    pub name: String,
    /// Distance from the baseline to the top of the line
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line, negative below the baseline
    pub descent: i32,
    /// Extra space between lines
    pub line_gap: i32,
    /// Design units per em, usually 2048
    pub em_size: u32,
    /// Highest point of any glyph
    pub y_max: i32,
    /// Lowest point of any glyph
    pub y_min: i32,
}

impl FontInfo {
    fn ratio(&self, value: i32) -> Result<f32> {
        if self.em_size == 0 {
            return Err(Error::OutOfRange {
                what: "font em size",
                value: 0,
            });
        }
        Ok(value as f32 / self.em_size as f32)
    }

    /// Ascent as a fraction of the em height.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `em_size` is zero.
    pub fn ascent_ratio(&self) -> Result<f32> {
        self.ratio(self.ascent)
    }

    /// Height of one line without the gap as a fraction of the em height.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `em_size` is zero.
    pub fn line_ratio(&self) -> Result<f32> {
        self.ratio(self.ascent.saturating_sub(self.descent))
    }
}

/// Everything [`RecordWriter::drawstring`] needs for one line of text.
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    /// Text to draw
    pub text: &'a str,
    /// Object table index for the font
    pub font_id: u32,
    /// Object table index for the string format
    pub format_id: u32,
    /// Brush or color of the glyphs
    pub brush: BrushRef,
    /// Em height in world units
    pub height: f32,
    /// Font style bits
    pub style: FontStyle,
    /// Font family and metrics
    pub font: &'a FontInfo,
    /// String format stored alongside the font
    pub format: &'a StringFormat,
    /// Start of the baseline
    pub origin: PointF,
}

impl TextRun<'_> {
    /// Layout rectangle for `units` UTF-16 code units.
    ///
    /// The width is a generous guess, the renderer does the real measuring.
    fn layout(&self, units: usize) -> Result<RectF> {
        let width = 4.0 * self.height * units as f32;
        let height = self.height * self.font.line_ratio()?;
        let x = match self.format.alignment {
            StringAlignment::Near => self.origin.x,
            StringAlignment::Center => self.origin.x - width / 2.0,
            StringAlignment::Far => self.origin.x - width,
        };
        let y = self.origin.y - self.height * self.font.ascent_ratio()?;
        Ok(RectF::new(x, y, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        records::{EndOfFileRecord, HeaderRecord, Record, RecordStream},
        types::Argb,
    };

    fn records(comment: &[u8]) -> Vec<Record> {
        assert_eq!(&comment[..4], &EMF_PLUS_SIGNATURE);
        RecordStream::new(&comment[4..])
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    fn arial() -> FontInfo {
        FontInfo {
            name: "Arial".to_string(),
            ascent: 1854,
            descent: -434,
            line_gap: 67,
            em_size: 2048,
            y_max: 1854,
            y_min: -434,
        }
    }

    #[test]
    fn test_batching() {
        let mut writer = RecordWriter::new(Vec::new());
        writer.write_record(&HeaderRecord::new(96)).unwrap();
        writer.write_record(&EndOfFileRecord).unwrap();
        assert_eq!(writer.pending(), 2);
        assert!(writer.sink().is_empty());

        let comments = writer.into_inner().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].len(), 4 + 28 + 12);
        assert_eq!(records(&comments[0]).len(), 2);
    }

    #[test]
    fn test_capacity_flush() {
        let mut writer = RecordWriter::with_capacity(Vec::new(), 4 + 12 + 12);
        for _ in 0..5 {
            writer.write_record(&EndOfFileRecord).unwrap();
        }
        let comments = writer.into_inner().unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].len(), 28);
        assert_eq!(comments[2].len(), 16);
    }

    #[test]
    fn test_oversized_record_goes_alone() {
        let mut writer = RecordWriter::with_capacity(Vec::new(), 16);
        writer.write_record(&HeaderRecord::new(96)).unwrap();
        assert_eq!(writer.pending(), 0);
        assert_eq!(writer.sink().len(), 1);
    }

    #[test]
    fn test_write_rejects_bad_framing() {
        let mut writer = RecordWriter::new(Vec::new());
        let garbage = PseudoObject::from_parts(Oid::Raw, vec![0x0E, 0x40, 0, 0, 64, 0, 0, 0]);
        assert!(writer.write(&garbage).is_err());
        assert!(matches!(
            writer.write(&PseudoObject::new(Oid::Raw)),
            Err(Error::Empty)
        ));
        assert_eq!(writer.pending(), 0);
    }

    #[test]
    fn test_drawline() {
        let mut writer = RecordWriter::new(Vec::new());
        writer
            .drawline(1, 2, PointF::new(0.0, 0.0), PointF::new(10.0, 5.0), true)
            .unwrap();
        let comments = writer.into_inner().unwrap();
        assert_eq!(comments.len(), 1);

        let decoded = records(&comments[0]);
        assert_eq!(decoded.len(), 2);
        match &decoded[0] {
            Record::Object(record) => match record.object().unwrap() {
                Object::Path(path) => assert_eq!(path.path.types(), &[0x10, 0x11]),
                other => panic!("unexpected object {other:?}"),
            },
            other => panic!("unexpected record {other:?}"),
        }
        assert_eq!(
            decoded[1],
            Record::DrawPath(DrawPathRecord {
                path_id: 2,
                pen_id: 1
            })
        );
    }

    #[test]
    fn test_drawline_bad_pen_queues_nothing() {
        let mut writer = RecordWriter::new(Vec::new());
        let result = writer.drawline(99, 1, PointF::new(0.0, 0.0), PointF::new(1.0, 1.0), false);
        assert!(matches!(result, Err(Error::InvalidObjectId(99))));
        assert_eq!(writer.pending(), 0);
        assert!(writer.into_inner().unwrap().is_empty());
    }

    #[test]
    fn test_drawfill() {
        let brush = BrushRef::Color(Argb::new(0xFF, 0, 0x80, 0));
        let po = drawfill(3, Some(0), Some(brush)).unwrap();
        assert_eq!(po.len(), 16 + 16);
        assert_eq!(po.data()[0], 0x14);
        assert_eq!(po.data()[16], 0x15);

        assert_eq!(drawfill(3, None, Some(brush)).unwrap().len(), 16);
        assert!(matches!(drawfill(3, None, None), Err(Error::Schema(_))));
        assert!(matches!(
            drawfill(64, Some(0), None),
            Err(Error::InvalidObjectId(64))
        ));
    }

    #[test]
    fn test_drawstring_baseline() {
        let font = arial();
        let format = StringFormat::default();
        let run = TextRun {
            text: "Hi",
            font_id: 4,
            format_id: 5,
            brush: BrushRef::Object(6),
            height: 20.48,
            style: FontStyle::empty(),
            font: &font,
            format: &format,
            origin: PointF::new(100.0, 200.0),
        };

        let mut writer = RecordWriter::new(Vec::new());
        writer.drawstring(&run).unwrap();
        let comments = writer.into_inner().unwrap();
        let decoded = records(&comments[0]);
        assert_eq!(decoded.len(), 3);

        let Record::DrawString(record) = &decoded[2] else {
            panic!("unexpected record {:?}", decoded[2]);
        };
        assert_eq!(record.font_id, 4);
        assert_eq!(record.format_id, 5);
        assert_eq!(record.text.to_string_lossy(), "Hi");
        assert_eq!(record.layout.x, 100.0);
        assert!((record.layout.y - (200.0 - 18.54)).abs() < 1e-3);
        assert!((record.layout.height - 22.88).abs() < 1e-3);
    }

    #[test]
    fn test_drawstring_bad_brush_queues_nothing() {
        let font = arial();
        let format = StringFormat::default();
        let run = TextRun {
            text: "Hi",
            font_id: 4,
            format_id: 5,
            brush: BrushRef::Object(64),
            height: 20.48,
            style: FontStyle::empty(),
            font: &font,
            format: &format,
            origin: PointF::new(0.0, 0.0),
        };

        let mut writer = RecordWriter::new(Vec::new());
        assert!(matches!(
            writer.drawstring(&run),
            Err(Error::InvalidObjectId(64))
        ));
        assert_eq!(writer.pending(), 0);
        assert!(writer.into_inner().unwrap().is_empty());
    }

    #[test]
    fn test_drawstring_far_alignment() {
        let font = arial();
        let format = StringFormat {
            alignment: StringAlignment::Far,
            ..StringFormat::default()
        };
        let run = TextRun {
            text: "ab",
            font_id: 0,
            format_id: 1,
            brush: BrushRef::Color(Argb::new(0xFF, 0, 0, 0)),
            height: 10.0,
            style: FontStyle::empty(),
            font: &font,
            format: &format,
            origin: PointF::new(100.0, 0.0),
        };
        let layout = run.layout(2).unwrap();
        assert_eq!(layout.width, 80.0);
        assert_eq!(layout.x, 20.0);

        let broken = FontInfo {
            em_size: 0,
            ..arial()
        };
        let run = TextRun {
            font: &broken,
            ..run
        };
        assert!(matches!(run.layout(2), Err(Error::OutOfRange { .. })));
    }
}
