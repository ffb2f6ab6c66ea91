//! Consolidation pass (C5): a bulk prune-and-normalize operation a host runs
//! periodically rather than per sample, hence the coarser `info`-level log.

use super::{Cache, ConsolidationFlags};

pub(crate) fn consolidate(cache: &mut Cache, flags: ConsolidationFlags) {
    let before = cache.store.num_samples_tot();

    if flags.contains(ConsolidationFlags::FREE_OUTDATED) {
        cache.store.retain(|s| s.is_sample_current());
    } else if flags.contains(ConsolidationFlags::FREE_INVALID) {
        cache.store.retain(|s| s.is_sample_valid());
    }
    let freed = before - cache.store.num_samples_tot();

    let mut reset = false;
    if flags.contains(ConsolidationFlags::CONSOLIDATE) {
        let was_valid = cache.is_valid();
        let was_current = cache.is_current();
        if !was_valid {
            cache.store.for_each_mut(|s| s.mark_invalid());
            reset = true;
        } else if !was_current {
            cache.store.for_each_mut(|s| s.mark_outdated());
            reset = true;
        }
        if reset {
            cache.status.set_current();
        }
    }

    log::info!(
        "cache '{}': consolidate freed {freed} sample(s){}",
        cache.id,
        if reset { ", cache reset to current" } else { "" }
    );
}
