//! # emfplus Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the emfplus library. Import this module to get quick access to the essential
//! types for encoding and decoding EMF+ streams.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all emfplus operations
pub use crate::Error;

/// The result type used throughout emfplus
pub use crate::Result;

/// Decoding policy
pub use crate::config::{ContinuationPolicy, DecodeConfig};

// ================================================================================================
// Serialization
// ================================================================================================

/// Tagged byte buffers and their identifiers
pub use crate::pseudo::{Oid, PseudoObject};

/// Bounds-checked reading and field list writing
pub use crate::serial::{serialize, Field, Parser, Wire};

// ================================================================================================
// Value Types
// ================================================================================================

/// Colors, points, rectangles and matrices
pub use crate::types::{Argb, Point16, PointF, Rect16, RectF, RectL, TransformMatrix};

/// Frequently used enumerations
pub use crate::types::{BrushType, CombineMode, ObjectType, RecordType, StringAlignment, UnitType};

/// Frequently used flag sets
pub use crate::types::{FontStyle, PathPointFlags};

// ================================================================================================
// Paths and Objects
// ================================================================================================

/// Path construction
pub use crate::path::{PathBuilder, PointEncoding};

/// Object codecs
pub use crate::objects::{
    Brush, EmfObject, Font, GraphicsVersion, Image, ImageAttributes, Object, PathObject, Pen,
    Region, StringFormat,
};

// ================================================================================================
// Records
// ================================================================================================

/// Record framing and dispatch
pub use crate::records::{
    BrushRef, EmfRecord, ObjectRecord, Record, RecordHeader, RecordStream, HEADER_SIZE,
};

/// Control records
pub use crate::records::{EndOfFileRecord, HeaderRecord};

/// Common drawing records
pub use crate::records::{DrawPathRecord, DrawStringRecord, FillPathRecord, FillRectsRecord};

// ================================================================================================
// Reassembly and Writing
// ================================================================================================

/// Continued object reassembly
pub use crate::accum::{AssembledObject, ObjectAccumulator, ObjectReassembler};

/// Comment payload batching
pub use crate::writer::{RecordSink, RecordWriter};
