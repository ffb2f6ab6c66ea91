//! Write protocol (C5, entry point): `sample_write`.

use std::any::Any;

use super::{Cache, WriteResult};
use crate::block::{BlockDataMut, BlockInstance};
use crate::time::Time;

pub(crate) fn sample_write<U: Any>(cache: &mut Cache, t: Time, user: &U) -> WriteResult {
    let coord = match cache.coordinate(t) {
        Some(c) => c,
        None => return WriteResult::Invalid,
    };

    let num_blocks = cache.registry.len();
    let has_meta = cache.has_meta();
    let loc = cache.store.locate_create(coord, num_blocks, has_meta);

    for i in 0..num_blocks {
        let codec = cache.registry[i].codec.clone();
        let element_size = cache.registry[i].element_size;
        let dtype = cache.registry[i].dtype;

        let n = codec.count(user);

        {
            let sample = cache.store.sample_mut(loc);
            let block = &mut sample.blocks[i];
            if !block.data.is_empty() && block.dcount != n {
                block.data.clear();
            }
            block.dcount = n;
            if block.data.is_empty() && n > 0 {
                block.data = vec![0u8; element_size as usize * n as usize];
            }
        }

        let ok = {
            let sample = cache.store.sample_mut(loc);
            let block = &mut sample.blocks[i];
            codec.write(BlockDataMut { dtype, element_size, count: n, data: &mut block.data }, user)
        };

        let sample = cache.store.sample_mut(loc);
        if ok {
            sample.block_set_current(i);
        } else {
            sample.block_clear_valid(i);
            sample.mark_invalid();
            log::warn!("cache '{}': write failed for block '{}' at t={}", cache.id, cache.registry[i].id, t);
            return WriteResult::Failed;
        }
    }

    if has_meta {
        if let Some(meta_gen) = cache.meta_gen.clone() {
            let meta_size = cache.meta_size;
            let sample = cache.store.sample_mut(loc);
            if sample.meta.is_none() {
                sample.meta = Some(BlockInstance::new_initialized());
            }
            let ok = {
                let meta = sample.meta.as_mut().expect("meta instance just ensured");
                if meta.data.is_empty() {
                    meta.data = vec![0u8; meta_size as usize];
                }
                meta_gen.generate(user, &mut meta.data)
            };
            if ok {
                sample.meta_set_current();
            } else {
                sample.meta_clear_valid();
                sample.mark_invalid();
                log::warn!("cache '{}': meta_gen failed at t={}", cache.id, t);
                return WriteResult::Failed;
            }
        }
    }

    cache.store.sample_mut(loc).set_current();
    WriteResult::Success
}
