//! Operation-failure error type (C7).
//!
//! `CacheError` covers the handful of paths that are a *caller-surfaced*
//! failure rather than a programmer error (mismatched time tags, division
//! by zero, and the like panic instead — see the crate-level documentation).
//! Routine per-call outcomes (`WriteResult`, `ReadResult`) are not folded
//! into this type: a host branches on those every sample, while a
//! `CacheError` is exceptional.

use thiserror::Error;

use crate::template::Name;
use crate::time::Time;

#[derive(Debug, Error)]
pub enum CacheError {
    /// A deserialized cache's id does not match the supplied template's id.
    #[error("deserialized cache id '{found}' does not match template id '{expected}'")]
    TemplateMismatch { expected: Name, found: Name },

    /// The serialized buffer ended before a complete `cache_def` or
    /// `block_descriptor_def` could be read, or named a block index the
    /// template does not have.
    #[error("serialized buffer is truncated or malformed")]
    Truncated,

    /// Reserved for a future raw-payload serializer; `serialize_data = true`
    /// is rejected today rather than silently ignored.
    #[error("sample-data serialization is not implemented, pass serialize_data = false")]
    DataSerializationUnsupported,

    /// Reserved: no path in this crate constructs this variant today (the
    /// write/read protocols surface codec failure via `WriteResult::Failed`
    /// and `ReadResult::INVALID`, not `CacheError`), but it is kept in the
    /// taxonomy for a host that wants to wrap a codec failure as a hard
    /// error at its own call boundary.
    #[error("codec for block '{block_id}' failed at t={time}")]
    CodecFailed { block_id: Name, time: Time },
}
