//! Building a cache's block registry from a template and a set of selected
//! template indices. Registry order always follows template order.

use super::BlockDescriptor;
use crate::template::CacheTemplate;

/// Builds the registry for the given set of template indices (deduplicated,
/// order-independent; the result is always in template order).
pub(crate) fn build(template: &CacheTemplate, indices: &[usize]) -> Vec<BlockDescriptor> {
    template
        .blocks
        .iter()
        .enumerate()
        .filter(|(i, _)| indices.contains(i))
        .map(|(i, bt)| BlockDescriptor {
            id: bt.id,
            index: i as u32,
            dtype: bt.dtype,
            element_size: bt.resolved_element_size(),
            flags: bt.flags,
            codec: bt.codec.clone(),
        })
        .collect()
}
