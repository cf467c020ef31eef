use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every fallible operation of the codec reports its failure by value through this enum. A failed
/// decode never hands back partially populated output, and a failed encode never hands back a
/// partially built buffer.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::OutOfBounds`] - A read would have run past the end of the supplied bytes
/// - [`Error::Malformed`] - The bytes are present but do not describe a valid structure
/// - [`Error::Empty`] - An empty buffer was supplied where content is required
/// - [`Error::UnknownIdentifier`] - A type tag, record type or enumeration value is not known
/// - [`Error::UnknownGuid`] - A serializable object carries a GUID that names no image effect
///
/// ## Construction Errors
/// - [`Error::Schema`] - A field list or nested object does not fit the requested layout
/// - [`Error::TypeMismatch`] - A nested object carries the wrong identifier
/// - [`Error::OutOfRange`] - A numeric parameter is outside its documented range
/// - [`Error::InvalidObjectId`] - An object table index above 63
/// - [`Error::InvalidPath`] - A path builder call that violates the path state machine
/// - [`Error::Allocation`] - The output buffer could not be reserved
///
/// ## Stream Errors
/// - [`Error::ContinuationBroken`] - A continued object was interrupted and the active policy
///   does not tolerate it
///
/// # Examples
///
/// ```rust
/// use emfplus::{Error, records::RecordHeader};
///
/// match RecordHeader::parse(&[]) {
///     Ok(header) => println!("record type {}", header.record_type),
///     Err(Error::OutOfBounds { file, line }) => eprintln!("truncated ({}:{})", file, line),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be decoded.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding.
    ///
    /// Raised before any byte past the readable limit is touched.
    #[error("Out of Bound read would have occurred! - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// The output buffer could not be allocated.
    #[error("Failed to allocate {requested} bytes")]
    Allocation {
        /// Number of bytes that were requested
        requested: usize,
    },

    /// A serial field list or a nested object violates the layout being built.
    ///
    /// Examples are a replicated field with an empty template or a zero repeat count, or an
    /// element count that does not fit the 32-bit wire field.
    #[error("Schema violation - {0}")]
    Schema(String),

    /// A nested object carries a different identifier than the builder expects.
    #[error("Expected {expected} but found {found}")]
    TypeMismatch {
        /// Name of the identifier that was required
        expected: &'static str,
        /// Name of the identifier that was supplied
        found: &'static str,
    },

    /// A numeric parameter lies outside of its documented legal range.
    #[error("{what} is out of range - {value}")]
    OutOfRange {
        /// Which parameter was rejected
        what: &'static str,
        /// The rejected value
        value: i64,
    },

    /// An object table index larger than 63.
    #[error("Object table index {0} exceeds 63")]
    InvalidObjectId(u32),

    /// A type tag, record type or enumeration value that is not part of the format.
    #[error("Unknown identifier - 0x{0:08X}")]
    UnknownIdentifier(u32),

    /// A serializable object GUID that does not name a known image effect.
    #[error("Unknown image effect GUID - {0}")]
    UnknownGuid(String),

    /// A path construction call that the path state machine does not allow.
    #[error("Invalid path operation - {0}")]
    InvalidPath(String),

    /// A continued object was interrupted before it was complete.
    #[error("Continued object {object_type}:{id} interrupted after {received} of {expected} bytes")]
    ContinuationBroken {
        /// Object type of the interrupted object
        object_type: u8,
        /// Object table index of the interrupted object
        id: u8,
        /// Bytes received so far
        received: usize,
        /// Total size announced by the first fragment
        expected: usize,
    },
}
