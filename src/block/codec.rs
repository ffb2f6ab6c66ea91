//! Host-supplied per-block codecs.
//!
//! The cache never interprets block bytes; it only drives these callbacks at
//! the right time with the right buffer. `user` is type-erased: a host's
//! `BlockCodec` implementation downcasts it to whatever concrete type it
//! expects, the same way the source engine hands codecs an opaque pointer.

use std::any::Any;

use crate::time::Time;

use super::dtype::DataType;

/// A read-only view of one block's storage, handed to [`BlockCodec::read`].
pub struct BlockData<'a> {
    pub dtype: DataType,
    pub element_size: u32,
    pub count: u32,
    pub data: &'a [u8],
}

/// A mutable view of one block's storage, handed to [`BlockCodec::write`].
///
/// The codec fills `data` in place; there is no way to replace it with a
/// different allocation, which is what makes "the codec must not reallocate
/// the buffer" a property of the type rather than an assertion checked at
/// runtime.
pub struct BlockDataMut<'a> {
    pub dtype: DataType,
    pub element_size: u32,
    pub count: u32,
    pub data: &'a mut [u8],
}

/// Inputs to the (currently unused) interpolation hook.
pub struct InterpData<'a> {
    pub t_target: Time,
    pub t_prev: Time,
    pub t_next: Time,
    pub prev: BlockData<'a>,
    pub next: BlockData<'a>,
}

/// The four per-block codec operations. `count`, `write`, and `read` are
/// required; `interp` is reserved for a future interpolation pass and is
/// never invoked by the current read/write protocol.
pub trait BlockCodec {
    /// Returns the element count this block should have for the sample
    /// currently being written. Must be non-negative; for `CONST_COUNT`
    /// blocks the host is expected (but not required) to return the same
    /// value every time.
    fn count(&self, user: &dyn Any) -> u32;

    /// Fills `data.data` from `user`. Returns `false` on unrecoverable failure.
    fn write(&self, data: BlockDataMut<'_>, user: &dyn Any) -> bool;

    /// Reads `data.data` into `user`. Returns `false` on failure.
    fn read(&self, data: BlockData<'_>, user: &mut dyn Any) -> bool;

    /// Reserved. The default implementation reports "not implemented"; no
    /// caller in this crate invokes it.
    fn interp(&self, _data: InterpData<'_>) -> bool {
        false
    }
}

/// The cache-level meta-generator callback, distinct from per-block codecs:
/// it produces a single `msize`-byte blob per sample rather than a
/// `(count, data)` pair.
pub trait MetaGen {
    fn generate(&self, user: &dyn Any, out: &mut [u8]) -> bool;
}
