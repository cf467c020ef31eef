//! Integration tests for path construction and the point encodings.
//!
//! Paths are built through the public builder, stored as path objects and as drawing records,
//! and read back through the record stream.

use emfplus::{
    path::{PathBuilder, PointEncoding},
    prelude::*,
    records::DrawLinesRecord,
};

fn triangle() -> Result<PathBuilder> {
    let mut path = PathBuilder::new();
    path.moveto(PointF::new(0.0, 0.0), PathPointFlags::empty())?;
    path.lineto(PointF::new(10.0, 0.0), PathPointFlags::empty())?;
    path.lineto(PointF::new(10.0, 10.0), PathPointFlags::empty())?;
    path.closepath()?;
    Ok(path)
}

/// A closed triangle keeps three points and folds the close bit into the last type byte.
#[test]
fn test_closed_triangle_object() -> Result<()> {
    let path = triangle()?;
    assert_eq!(path.len(), 3);
    assert_eq!(path.types(), &[0x00, 0x01, 0x81]);

    let object = PathObject::new(GraphicsVersion::default(), path);
    let po = object.encode()?;

    // version, count, flags, 3 float points, 3 type bytes, 1 pad byte
    assert_eq!(po.len(), 40);
    assert_eq!(&po.data()[4..8], &[3, 0, 0, 0]);
    assert_eq!(&po.data()[36..40], &[0x00, 0x01, 0x81, 0x00]);
    assert_eq!(PathObject::parse(po.data())?, object);
    Ok(())
}

/// The run length encoded form of the point types decodes to the same path.
#[test]
fn test_rle_point_types() -> Result<()> {
    let mut path = PathBuilder::new();
    path.moveto(PointF::new(0.0, 0.0), PathPointFlags::empty())?;
    path.polylineto(
        &[
            PointF::new(1.0, 0.0),
            PointF::new(2.0, 0.0),
            PointF::new(3.0, 0.0),
            PointF::new(4.0, 0.0),
        ],
        PathPointFlags::empty(),
        false,
    )?;
    path.polybezierto(
        &[
            PointF::new(5.0, 1.0),
            PointF::new(6.0, 2.0),
            PointF::new(7.0, 0.0),
        ],
        PathPointFlags::empty(),
        false,
    )?;
    path.closepath()?;

    let literal = PathObject::new(GraphicsVersion::default(), path.clone());
    let rle = PathObject::with_rle(GraphicsVersion::default(), path);

    let literal_po = literal.encode()?;
    let rle_po = rle.encode()?;
    assert_ne!(literal_po.data(), rle_po.data());

    let decoded = PathObject::parse(rle_po.data())?;
    assert!(decoded.rle);
    assert_eq!(decoded, rle);
    assert_eq!(decoded.path, PathObject::parse(literal_po.data())?.path);
    Ok(())
}

/// Integer coordinates survive the 16-bit and relative forms exactly.
#[test]
fn test_compact_point_forms() -> Result<()> {
    let points = vec![
        PointF::new(0.0, 0.0),
        PointF::new(63.0, -64.0),
        PointF::new(1000.0, 2000.0),
        PointF::new(-300.0, 5.0),
    ];
    assert_eq!(PointEncoding::narrowest(&points), PointEncoding::Int16);

    for encoding in [PointEncoding::Float, PointEncoding::Int16, PointEncoding::Relative] {
        let object = PathObject {
            encoding,
            ..PathObject::new(
                GraphicsVersion::default(),
                PathBuilder::from_points(&points, 0x00, 0x01),
            )
        };
        let decoded = PathObject::parse(object.encode()?.data())?;
        assert_eq!(decoded.encoding, encoding);
        assert_eq!(decoded.path.points(), &points[..]);
    }
    Ok(())
}

/// A polyline record with relative points goes through the stream unchanged.
#[test]
fn test_relative_lines_record() -> Result<()> {
    let record = DrawLinesRecord {
        pen_id: 7,
        points: vec![
            PointF::new(10.0, 10.0),
            PointF::new(20.0, 10.0),
            PointF::new(20.0, 400.0),
        ],
        encoding: PointEncoding::Relative,
        closed: true,
    };
    let po = record.encode()?;

    let records = RecordStream::new(po.data()).collect::<Result<Vec<_>>>()?;
    assert_eq!(records, vec![Record::DrawLines(record)]);
    Ok(())
}

/// A relative run whose deltas add up past the coordinate range is rejected, not wrapped.
#[test]
fn test_relative_lines_overflow() -> Result<()> {
    let count: u32 = 140_000;
    let mut payload = count.to_le_bytes().to_vec();
    for _ in 0..count {
        payload.extend_from_slice(&[0xBF, 0xFF, 0x00]);
    }
    let size = u32::try_from(12 + payload.len()).unwrap();
    let data_size = u32::try_from(payload.len()).unwrap();

    let mut data = Vec::new();
    data.extend_from_slice(&0x400D_u16.to_le_bytes());
    data.extend_from_slice(&0x0800_u16.to_le_bytes());
    data.extend_from_slice(&size.to_le_bytes());
    data.extend_from_slice(&data_size.to_le_bytes());
    data.extend_from_slice(&payload);

    assert!(matches!(
        Record::parse(&data),
        Err(Error::Malformed { .. })
    ));
    Ok(())
}

/// Builder calls that break the subpath rules leave the path untouched.
#[test]
fn test_invalid_builder_calls() -> Result<()> {
    let mut path = PathBuilder::new();
    assert!(path.lineto(PointF::new(1.0, 1.0), PathPointFlags::empty()).is_err());
    assert!(path.closepath().is_err());
    assert!(path.is_empty());

    let mut path = triangle()?;
    let before = path.clone();
    assert!(path
        .polybezierto(&[PointF::new(1.0, 1.0)], PathPointFlags::empty(), false)
        .is_err());
    assert_eq!(path, before);
    Ok(())
}
