//! Configuration for record stream decoding.
//!
//! Decoding is strict about bounds and lenient about a few producer habits that are common in real
//! files. The habits that are a matter of policy rather than of correctness are collected in
//! [`DecodeConfig`] so callers can tighten or relax them.

/// Largest reassembled object accepted by default, 64 MiB.
pub const DEFAULT_MAX_OBJECT_SIZE: usize = 64 * 1024 * 1024;

/// What to do when a continued object is interrupted before it is complete.
///
/// GDI+ has been seen to start a continued object and then emit an unrelated record, or a
/// fragment of a different object, before the announced total size is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinuationPolicy {
    /// Hand out the bytes gathered so far as an incomplete object and carry on.
    #[default]
    TerminateOnChange,
    /// Fail with [`crate::Error::ContinuationBroken`].
    Reject,
}

/// Policy switches for [`crate::records::RecordStream`] and [`crate::accum::ObjectReassembler`].
///
/// # Examples
///
/// ```rust
/// use emfplus::{ContinuationPolicy, DecodeConfig};
///
/// let config = DecodeConfig {
///     max_object_size: 1 << 20,
///     ..DecodeConfig::strict()
/// };
/// assert_eq!(config.continuation, ContinuationPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Handling of interrupted continued objects (default: terminate on change).
    pub continuation: ContinuationPolicy,

    /// Upper bound for the total size of a reassembled object (default: 64 MiB).
    pub max_object_size: usize,

    /// Demand the 0x4000 marker bit on every record type (default: false).
    pub require_record_flag: bool,

    /// Step over records with an unknown type instead of failing (default: true).
    pub skip_unknown_records: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            continuation: ContinuationPolicy::TerminateOnChange,
            max_object_size: DEFAULT_MAX_OBJECT_SIZE,
            require_record_flag: false,
            skip_unknown_records: true,
        }
    }
}

impl DecodeConfig {
    /// Accept everything a real world producer is known to write.
    #[must_use]
    pub fn lenient() -> Self {
        DecodeConfig::default()
    }

    /// Reject anything that deviates from the format.
    #[must_use]
    pub fn strict() -> Self {
        DecodeConfig {
            continuation: ContinuationPolicy::Reject,
            max_object_size: DEFAULT_MAX_OBJECT_SIZE,
            require_record_flag: true,
            skip_unknown_records: false,
        }
    }
}
