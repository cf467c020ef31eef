// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # emfplus
//!
//! A bounds-checked encoder and decoder for EMF+, the GDI+ drawing stream that Windows embeds in
//! the comment records of an Enhanced Metafile.
//!
//! The crate turns in-memory values (colors, pens, brushes, paths, regions, fonts, images and the
//! drawing records that use them) into the exact little-endian byte layout of the format, and
//! parses such bytes back into values. It never touches files: an EMF reader hands it the bytes of
//! a comment record, an EMF writer takes the comment payloads it produces.
//!
//! ## Features
//!
//! - **Bounds safety** - every read is checked against the end of the supplied buffer before it
//!   happens, a truncated or lying record fails with [`Error::OutOfBounds`] or [`Error::Malformed`]
//! - **Complete object model** - all object types of the format, including gradient and texture
//!   brushes, compound pens, custom line caps, region trees, bitmaps and metafiles
//! - **All records** - one typed struct per record type, unified by [`records::Record`]
//! - **Path building** - a subpath state machine with the compressed, relative and run length
//!   encoded point forms
//! - **Continued objects** - splitting of large objects on write and reassembly on read
//!
//! ## Quick Start
//!
//! ```rust
//! use emfplus::prelude::*;
//!
//! // Encode a solid red brush as object 0 and fill a rectangle with it
//! let brush = Object::Brush(Brush::solid(Argb::new(0xFF, 0xFF, 0, 0)));
//! let mut bytes = ObjectRecord::new(0, &brush)?.encode()?.into_data();
//! let fill = FillRectsRecord {
//!     brush: BrushRef::Object(0),
//!     rects: vec![RectF::new(0.0, 0.0, 100.0, 50.0)],
//!     compressed: false,
//! };
//! bytes.extend_from_slice(fill.encode()?.data());
//!
//! // Decode the stream again
//! let records = RecordStream::new(&bytes).collect::<Result<Vec<_>>>()?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].kind(), RecordType::FillRects);
//! # Ok::<(), emfplus::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`serial`] - the bounds-checked [`Parser`] and the field list serializer
//! - [`types`] - enumerations, flag sets and the fixed-size geometry values
//! - [`pseudo`] - tagged byte buffers and the identifier tables
//! - [`path`] - path construction and point encodings
//! - [`objects`] - the object codecs
//! - [`records`] - the record codecs and the record stream
//! - [`accum`] - continued object reassembly
//! - [`writer`] - batching records into comment payloads
//! - [`config`] - decoding policy
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use emfplus::{records::Record, Error};
//!
//! match Record::parse(&[0x0E, 0x40, 0x00, 0x00]) {
//!     Ok(record) => println!("Record: {:?}", record.kind()),
//!     Err(Error::OutOfBounds { .. }) => println!("Truncated record"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

#[macro_use]
pub(crate) mod error;

/// Bounds-checked reading and field list writing.
///
/// Every decoder in the crate reads through a [`serial::Parser`], every encoder assembles its
/// output with [`serial::serialize`].
#[macro_use]
pub mod serial;

/// Enumerations, flag sets and fixed-size geometry values of the format.
pub mod types;

/// Tagged byte buffers and the tables mapping identifiers between their namespaces.
pub mod pseudo;

/// Path construction and the point encodings used by paths and drawing records.
pub mod path;

/// Encoders and decoders for the objects stored in the object table.
pub mod objects;

/// Encoders and decoders for records, and the iterator over a record stream.
pub mod records;

/// Reassembly of objects split over several object records.
pub mod accum;

/// Decoding policy.
pub mod config;

/// Batching of records into comment payloads and composition helpers.
pub mod writer;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use emfplus::prelude::*;
///
/// let po = EndOfFileRecord.encode()?;
/// assert_eq!(po.len(), HEADER_SIZE);
/// # Ok::<(), emfplus::Error>(())
/// ```
pub mod prelude;

/// `emfplus` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `emfplus` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// The bounds-checked cursor every decoder reads through.
pub use serial::Parser;

/// Tagged byte buffers produced by every encoder.
pub use pseudo::{Oid, PseudoObject};

/// Decoding policy.
pub use config::{ContinuationPolicy, DecodeConfig};
