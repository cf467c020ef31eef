//! Integration tests for whole record streams.
//!
//! A producer writes a small drawing through [`RecordWriter`], a consumer splits the comment
//! payloads back into records and objects.

use emfplus::{
    objects::Bitmap,
    objects::ImageData,
    prelude::*,
    records::{ClearRecord, SaveRecord, SetAntiAliasModeRecord},
    types::SmoothingMode,
    writer::{FontInfo, TextRun, EMF_PLUS_SIGNATURE},
};
use strum::IntoEnumIterator;
use widestring::U16String;

fn font_info() -> FontInfo {
    FontInfo {
        name: "Liberation Sans".to_string(),
        ascent: 1854,
        descent: -434,
        line_gap: 67,
        em_size: 2048,
        y_max: 2007,
        y_min: -431,
    }
}

/// Decode every comment, feeding object records through a reassembler.
fn read_back(comments: &[Vec<u8>]) -> Result<(Vec<Record>, Vec<AssembledObject>)> {
    let mut reassembler = ObjectReassembler::new(DecodeConfig::strict());
    let mut records = Vec::new();
    let mut objects = Vec::new();

    for comment in comments {
        assert_eq!(&comment[..4], &EMF_PLUS_SIGNATURE);
        for record in RecordStream::with_config(&comment[4..], DecodeConfig::strict()) {
            let record = record?;
            objects.extend(reassembler.feed(&record)?);
            records.push(record);
        }
    }
    Ok((records, objects))
}

/// A drawing with a pen, a line, text and an image that needs several object records.
#[test]
fn test_write_and_read_drawing() -> Result<()> {
    let pixels = vec![0x5A; 150_000];
    let image = Object::Image(Image {
        version: GraphicsVersion::default(),
        data: ImageData::Bitmap(Bitmap::compressed(100, 100, pixels)),
    });
    let font = font_info();
    let format = StringFormat::default();

    let mut writer = RecordWriter::new(Vec::new());
    writer.write_record(&HeaderRecord::new(96))?;
    writer.write_object(0, &Object::Pen(Pen::solid(Argb::new(0xFF, 0, 0, 0), 1.0)))?;
    writer.drawline(0, 1, PointF::new(0.0, 0.0), PointF::new(100.0, 100.0), false)?;
    writer.drawstring(&TextRun {
        text: "odd",
        font_id: 2,
        format_id: 3,
        brush: BrushRef::Color(Argb::new(0xFF, 0x20, 0x40, 0x60)),
        height: 12.0,
        style: FontStyle::empty(),
        font: &font,
        format: &format,
        origin: PointF::new(10.0, 50.0),
    })?;
    writer.write_object(4, &image)?;
    writer.write_record(&EndOfFileRecord)?;
    let comments = writer.into_inner()?;

    // the small records, then one comment per image fragment
    assert_eq!(comments.len(), 4);

    let (records, objects) = read_back(&comments)?;
    assert_eq!(records.first().map(Record::kind), Some(RecordType::Header));
    assert_eq!(records.last().map(Record::kind), Some(RecordType::EndOfFile));

    let ids: Vec<u8> = objects.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![0, 1, 3, 2, 4]);
    assert!(objects.iter().all(|o| o.complete));
    assert_eq!(objects[4].object()?, image);
    assert!(matches!(objects[2].object()?, Object::StringFormat(_)));

    let text = records
        .iter()
        .find_map(|record| match record {
            Record::DrawString(text) => Some(text),
            _ => None,
        })
        .unwrap();
    assert_eq!(text.text, U16String::from_str("odd"));
    assert_eq!(text.font_id, 2);
    Ok(())
}

/// A string record with an odd number of UTF-16 units is padded to a 4 byte boundary.
#[test]
fn test_odd_length_string_padding() -> Result<()> {
    let record = DrawStringRecord {
        font_id: 1,
        brush: BrushRef::Object(2),
        format_id: 3,
        layout: RectF::new(0.0, 0.0, 200.0, 20.0),
        text: U16String::from_str("Hello"),
    };
    let po = record.encode()?;

    // header, brush, format, length, layout, 5 units, 2 pad bytes
    assert_eq!(po.len(), 12 + 12 + 16 + 10 + 2);
    assert_eq!(&po.data()[8..12], &[38, 0, 0, 0]);
    assert_eq!(&po.data()[po.len() - 2..], &[0, 0]);
    assert_eq!(DrawStringRecord::parse(po.data())?, record);
    Ok(())
}

/// No record type decodes from nothing, and a bare header is either valid or rejected cleanly.
#[test]
fn test_records_reject_empty_input() {
    assert!(Record::parse(&[]).is_err());
    assert_eq!(RecordStream::new(&[]).count(), 0);

    for kind in RecordType::iter() {
        let mut header = Vec::new();
        header.extend_from_slice(&(kind.value() as u16 | 0x4000).to_le_bytes());
        header.extend_from_slice(&[0, 0]);
        header.extend_from_slice(&12u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());

        // Payload-free record types are the only ones a bare header may produce.
        if let Ok(record) = Record::parse(&header) {
            assert_eq!(record.kind(), kind);
            assert_eq!(record.encode().map(|po| po.len()).ok(), Some(12), "{kind:?}");
        }
        assert!(Record::parse(&header[..11]).is_err());
    }
}

/// Cutting a stream anywhere never produces a record that was not fully present.
#[test]
fn test_stream_truncation() -> Result<()> {
    let mut stream = Vec::new();
    stream.extend_from_slice(HeaderRecord::new(120).encode()?.data());
    stream.extend_from_slice(
        SetAntiAliasModeRecord {
            mode: SmoothingMode::AntiAlias8x8,
            anti_alias: true,
        }
        .encode()?
        .data(),
    );
    stream.extend_from_slice(SaveRecord { stack_index: 1 }.encode()?.data());
    stream.extend_from_slice(
        ClearRecord {
            color: Argb::new(0xFF, 0xFF, 0xFF, 0xFF),
        }
        .encode()?
        .data(),
    );
    stream.extend_from_slice(EndOfFileRecord.encode()?.data());

    let boundaries = [0, 28, 40, 56, 72, 84];
    for len in 0..=stream.len() {
        let decoded: Vec<Record> = RecordStream::new(&stream[..len])
            .take_while(std::result::Result::is_ok)
            .collect::<Result<_>>()?;
        let complete = boundaries.iter().filter(|&&end| end != 0 && end <= len).count();
        assert_eq!(decoded.len(), complete, "prefix of {len} bytes");
    }
    Ok(())
}
