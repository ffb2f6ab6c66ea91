//! Read protocol (C5): `sample_read`.

use std::any::Any;

use super::{Cache, ReadResult};
use crate::block::BlockData;
use crate::time::Time;

pub(crate) fn sample_read<U: Any>(cache: &Cache, t: Time, user: &mut U) -> ReadResult {
    if !cache.is_valid() {
        return ReadResult::INVALID;
    }

    let mut result = ReadResult::empty();
    if !cache.is_current() {
        result |= ReadResult::OUTDATED;
    }

    let loc = match cache.coordinate(t).and_then(|c| cache.store.locate_read(c)) {
        Some(l) => l,
        None => return ReadResult::INVALID,
    };

    let sample = cache.store.sample(loc);
    if !sample.is_sample_valid() {
        return ReadResult::INVALID;
    }
    if !sample.is_sample_current() {
        result |= ReadResult::OUTDATED;
    }

    for (i, descriptor) in cache.registry.iter().enumerate() {
        let block = &sample.blocks[i];
        if !block.status.is_valid() {
            return ReadResult::INVALID;
        }
        let view = BlockData {
            dtype: descriptor.dtype,
            element_size: descriptor.element_size,
            count: block.dcount,
            data: &block.data,
        };
        if !descriptor.codec.read(view, user) {
            log::warn!("cache '{}': read failed for block '{}' at t={}", cache.id, descriptor.id, t);
            return ReadResult::INVALID;
        }
        if !block.status.is_current() {
            result |= ReadResult::OUTDATED;
        }
    }

    result
}
