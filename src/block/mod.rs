//! Block descriptors (the immutable per-cache registry entries) and block
//! instances (the per-sample `(status, dcount, data)` triples).

mod codec;
mod dtype;
mod flags;
pub(crate) mod registry;

use std::rc::Rc;

pub use codec::{BlockCodec, BlockData, BlockDataMut, InterpData, MetaGen};
pub use dtype::DataType;
pub use flags::BlockFlags;

use crate::status::BlockStatus;
use crate::template::Name;

/// One entry in a cache's block registry: immutable for the cache's
/// lifetime, replaced wholesale on `blocks_add`/`blocks_remove`/`blocks_set`.
#[derive(Clone)]
pub struct BlockDescriptor {
    pub id: Name,
    /// Position in the *template* this descriptor was built from; stored so
    /// deserialization can re-bind callbacks by index rather than by
    /// registry position (the registry may be a strict subset of the
    /// template, in template order but not template positions).
    pub index: u32,
    pub dtype: DataType,
    pub element_size: u32,
    pub flags: BlockFlags,
    pub codec: Rc<dyn BlockCodec>,
}

impl BlockDescriptor {
    pub fn is_mandatory(&self) -> bool {
        self.flags.contains(BlockFlags::MANDATORY)
    }
}

/// Per-sample instance of one block: status, current element count, and the
/// owning data buffer (empty until the first successful write).
#[derive(Clone)]
pub(crate) struct BlockInstance {
    pub(crate) status: BlockStatus,
    pub(crate) dcount: u32,
    pub(crate) data: Vec<u8>,
}

impl BlockInstance {
    /// A freshly materialized instance: `initialized`, not `valid`, no data.
    pub(crate) fn new_initialized() -> BlockInstance {
        let mut status = BlockStatus::default();
        status.set_initialized();
        BlockInstance { status, dcount: 0, data: Vec::new() }
    }
}
