//! Cache templates: the immutable blueprint a cache is created, reconfigured,
//! or deserialized against. A template owns no cache state — it is supplied
//! by reference at every call site that needs one.

mod selection;

use std::rc::Rc;

use arrayvec::ArrayString;

pub use selection::{ids, select_indices};

use crate::block::{BlockFlags, BlockCodec, DataType};
use crate::cache::CacheFlags;
use crate::time::Time;

/// Maximum byte length of an id string (cache id or block id), matching the
/// persisted layout's fixed-width, null-padded name fields.
pub const MAX_NAME: usize = 64;

pub type Name = ArrayString<MAX_NAME>;

/// Blueprint for one block a cache category may contain.
pub struct BlockTemplate {
    /// Must not contain `;` (the selection-string delimiter).
    pub id: Name,
    pub dtype: DataType,
    /// Ignored for non-generic data types, whose size comes from the
    /// `DataType`'s fixed-size table; required for `Generic`/`Meta`.
    pub element_size: u32,
    pub flags: BlockFlags,
    pub codec: Rc<dyn BlockCodec>,
}

impl BlockTemplate {
    /// Resolves the element size that will actually be used: the data
    /// type's fixed size when it has one, else the template-supplied size.
    pub fn resolved_element_size(&self) -> u32 {
        self.dtype.fixed_element_size().unwrap_or(self.element_size)
    }
}

/// Blueprint for a cache category: identity, default time domain, flags, and
/// the ordered block-descriptor array a registry is built from.
pub struct CacheTemplate {
    pub id: Name,
    pub time_is_float: bool,
    pub t_initial: Time,
    pub t_final: Time,
    pub t_step: Time,
    pub flags: CacheFlags,
    pub meta_size: u32,
    pub meta_gen: Option<Rc<dyn crate::block::MetaGen>>,
    /// Ordered; a block's position here is its `index` once built into a
    /// registry, used by deserialization to re-bind callbacks.
    pub blocks: Vec<BlockTemplate>,
}

impl CacheTemplate {
    pub(crate) fn find_block_by_index(&self, index: u32) -> Option<&BlockTemplate> {
        self.blocks.get(index as usize)
    }
}
