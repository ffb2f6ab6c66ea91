//! Time-indexed sample storage: a contiguous root array plus per-root
//! singly-linked chains of sub-samples, addressed by slab index rather than
//! pointer so that growing the root array never invalidates a chain link.

use super::sample::{Coordinate, Location, Sample};
use super::slab::Slab;
use crate::time::Time;

fn min_array_size(required_len: u32) -> u32 {
    required_len.max(32).next_power_of_two()
}

pub(crate) enum FromAction {
    MarkOutdated,
    MarkInvalid,
    Clear,
}

#[derive(Clone)]
pub(crate) struct SampleStore {
    zero_offset: Time,
    roots: Vec<Sample>,
    num_samples_array: u32,
    subs: Slab<Sample>,
    num_samples_tot: u32,
}

impl SampleStore {
    pub(crate) fn new(time_is_float: bool) -> SampleStore {
        let zero_offset = if time_is_float { Time::Float(0.0) } else { Time::Int(0) };
        SampleStore { zero_offset, roots: Vec::new(), num_samples_array: 0, subs: Slab::new(), num_samples_tot: 0 }
    }

    pub(crate) fn num_samples_array(&self) -> u32 {
        self.num_samples_array
    }

    pub(crate) fn num_samples_alloc(&self) -> u32 {
        self.roots.len() as u32
    }

    pub(crate) fn num_samples_tot(&self) -> u32 {
        self.num_samples_tot
    }

    /// Discards all samples; the registry was just replaced wholesale.
    pub(crate) fn clear_all(&mut self) {
        self.roots.clear();
        self.num_samples_array = 0;
        self.subs.clear();
        self.num_samples_tot = 0;
    }

    fn grow_to(&mut self, required_len: u32) {
        if required_len <= self.roots.len() as u32 {
            return;
        }
        let new_len = min_array_size(required_len);
        let start = self.roots.len() as u32;
        self.roots.reserve((new_len - start) as usize);
        for i in start..new_len {
            self.roots.push(Sample::zeroed(i, self.zero_offset));
        }
    }

    fn materialize_up_to(&mut self, index: u32) {
        for i in self.num_samples_array..=index {
            self.roots[i as usize] = Sample::skip_placeholder(i, self.zero_offset);
        }
        self.num_samples_array = index + 1;
    }

    pub(crate) fn sample(&self, loc: Location) -> &Sample {
        match loc {
            Location::Root(i) => &self.roots[i as usize],
            Location::Sub { slab, .. } => self.subs.get(slab),
        }
    }

    pub(crate) fn sample_mut(&mut self, loc: Location) -> &mut Sample {
        match loc {
            Location::Root(i) => &mut self.roots[i as usize],
            Location::Sub { slab, .. } => self.subs.get_mut(slab),
        }
    }

    /// Resolves `coord`, creating the root slot (and, if `coord` addresses a
    /// sub-sample, the sub-sample itself) on first use.
    pub(crate) fn locate_create(&mut self, coord: Coordinate, num_blocks: usize, has_meta: bool) -> Location {
        self.grow_to(coord.index + 1);
        if coord.index >= self.num_samples_array {
            self.materialize_up_to(coord.index);
        }

        if coord.is_root() {
            let root = &mut self.roots[coord.index as usize];
            if root.status.is_skip() {
                root.materialize(num_blocks, has_meta);
                self.num_samples_tot += 1;
            }
            return Location::Root(coord.index);
        }

        let mut prev_slab: Option<usize> = None;
        let mut cur = self.roots[coord.index as usize].next;
        loop {
            match cur {
                Some(idx) => {
                    let node = self.subs.get(idx);
                    if node.toffset.eq_time(coord.offset) {
                        return Location::Sub { root: coord.index, slab: idx };
                    } else if node.toffset.lt(coord.offset) {
                        prev_slab = Some(idx);
                        cur = node.next;
                    } else {
                        break;
                    }
                }
                None => break,
            }
        }

        let mut new_sample = Sample::skip_placeholder(coord.index, coord.offset);
        new_sample.materialize(num_blocks, has_meta);
        new_sample.next = cur;
        let new_idx = self.subs.insert(new_sample);
        match prev_slab {
            Some(p) => self.subs.get_mut(p).next = Some(new_idx),
            None => self.roots[coord.index as usize].next = Some(new_idx),
        }
        self.num_samples_tot += 1;
        Location::Sub { root: coord.index, slab: new_idx }
    }

    /// Resolves `coord` without creating anything; `None` if nothing is
    /// materialized there yet.
    pub(crate) fn locate_read(&self, coord: Coordinate) -> Option<Location> {
        if coord.index >= self.num_samples_array {
            return None;
        }
        if coord.is_root() {
            return Some(Location::Root(coord.index));
        }
        let mut cur = self.roots[coord.index as usize].next;
        while let Some(idx) = cur {
            let node = self.subs.get(idx);
            if node.toffset.eq_time(coord.offset) {
                return Some(Location::Sub { root: coord.index, slab: idx });
            } else if node.toffset.ge(coord.offset) {
                break;
            }
            cur = node.next;
        }
        None
    }

    fn remove_sub(&mut self, root_index: u32, slab_idx: usize) {
        let mut prev_slab: Option<usize> = None;
        let mut cur = self.roots[root_index as usize].next;
        while let Some(idx) = cur {
            if idx == slab_idx {
                break;
            }
            prev_slab = Some(idx);
            cur = self.subs.get(idx).next;
        }
        let removed = self.subs.remove(slab_idx);
        match prev_slab {
            Some(p) => self.subs.get_mut(p).next = removed.next,
            None => self.roots[root_index as usize].next = removed.next,
        }
        if !removed.status.is_skip() {
            self.num_samples_tot -= 1;
        }
    }

    /// Clears a single resolved sample: a root reverts to a `skip`
    /// placeholder, a sub-sample is spliced out of its chain and freed.
    ///
    /// A root's sub-sample chain is independently addressed and must survive
    /// the root being cleared; `next` is carried over rather than dropped.
    pub(crate) fn clear_one(&mut self, loc: Location) {
        match loc {
            Location::Root(i) => {
                let next = self.roots[i as usize].next;
                if !self.roots[i as usize].status.is_skip() {
                    self.num_samples_tot -= 1;
                }
                self.roots[i as usize] = Sample::skip_placeholder(i, self.zero_offset);
                self.roots[i as usize].next = next;
            }
            Location::Sub { root, slab } => self.remove_sub(root, slab),
        }
    }

    fn apply_to_root(&mut self, index: u32, action: &FromAction) {
        match action {
            FromAction::MarkOutdated => self.roots[index as usize].mark_outdated(),
            FromAction::MarkInvalid => self.roots[index as usize].mark_invalid(),
            FromAction::Clear => self.clear_one(Location::Root(index)),
        }
    }

    /// Applies `action` to every node in root `root_index`'s chain with
    /// `toffset >= min_offset`. For `Clear`, the kept prefix of the chain is
    /// unlinked from the removed tail before the tail is freed.
    fn apply_chain_from(&mut self, root_index: u32, min_offset: Time, action: &FromAction) {
        let mut prev_slab: Option<usize> = None;
        let mut cur = self.roots[root_index as usize].next;
        while let Some(idx) = cur {
            let offset = self.subs.get(idx).toffset;
            if offset.ge(min_offset) {
                break;
            }
            prev_slab = Some(idx);
            cur = self.subs.get(idx).next;
        }

        match action {
            FromAction::Clear => {
                match prev_slab {
                    Some(p) => self.subs.get_mut(p).next = None,
                    None => self.roots[root_index as usize].next = None,
                }
                let mut node = cur;
                while let Some(idx) = node {
                    let removed = self.subs.remove(idx);
                    if !removed.status.is_skip() {
                        self.num_samples_tot -= 1;
                    }
                    node = removed.next;
                }
            }
            FromAction::MarkOutdated | FromAction::MarkInvalid => {
                let mut node = cur;
                while let Some(idx) = node {
                    match action {
                        FromAction::MarkOutdated => self.subs.get_mut(idx).mark_outdated(),
                        FromAction::MarkInvalid => self.subs.get_mut(idx).mark_invalid(),
                        FromAction::Clear => unreachable!(),
                    }
                    node = self.subs.get(idx).next;
                }
            }
        }
    }

    /// Resolves `coord`, falling through to the next existing sample if
    /// nothing sits exactly there, and applies `action` to it and every
    /// sample after it (root array order, then each chain in offset order).
    pub(crate) fn apply_from(&mut self, coord: Coordinate, action: FromAction) {
        if coord.index >= self.num_samples_array {
            return;
        }

        self.apply_chain_from(coord.index, coord.offset, &action);
        if coord.is_root() {
            self.apply_to_root(coord.index, &action);
        }

        let mut i = coord.index + 1;
        while i < self.num_samples_array {
            self.apply_chain_from(i, self.zero_offset, &action);
            self.apply_to_root(i, &action);
            i += 1;
        }
    }

    /// Walks every materialized sample (roots and chains) for a read-only
    /// pass, e.g. consolidation or property checks.
    pub(crate) fn for_each<F: FnMut(&Sample)>(&self, mut f: F) {
        for i in 0..self.num_samples_array {
            let root = &self.roots[i as usize];
            f(root);
            let mut cur = root.next;
            while let Some(idx) = cur {
                let node = self.subs.get(idx);
                f(node);
                cur = node.next;
            }
        }
    }

    /// Walks every materialized sample (roots and chains) for a mutating
    /// pass, e.g. consolidation's outdated/invalid normalization.
    pub(crate) fn for_each_mut<F: FnMut(&mut Sample)>(&mut self, mut f: F) {
        for i in 0..self.num_samples_array {
            f(&mut self.roots[i as usize]);
            let mut cur = self.roots[i as usize].next;
            while let Some(idx) = cur {
                let node = self.subs.get_mut(idx);
                f(node);
                cur = node.next;
            }
        }
    }

    /// Frees every sample for which `keep` returns `false`.
    pub(crate) fn retain<F: Fn(&Sample) -> bool>(&mut self, keep: F) {
        for i in 0..self.num_samples_array {
            if !keep(&self.roots[i as usize]) {
                self.clear_one(Location::Root(i));
            }
            let mut cur = self.roots[i as usize].next;
            let mut to_remove = Vec::new();
            while let Some(idx) = cur {
                let node = self.subs.get(idx);
                if !keep(node) {
                    to_remove.push(idx);
                }
                cur = node.next;
            }
            for idx in to_remove {
                self.remove_sub(i, idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(index: u32, offset: f32) -> Coordinate {
        Coordinate { index, offset: Time::Float(offset) }
    }

    #[test]
    fn locate_create_materializes_placeholders_up_to_index() {
        let mut store = SampleStore::new(true);
        store.locate_create(coord(4, 0.0), 1, false);
        assert_eq!(store.num_samples_array(), 5);
        assert_eq!(store.num_samples_tot(), 1);
        for i in 0..4 {
            assert!(store.sample(Location::Root(i)).status.is_skip());
        }
    }

    #[test]
    fn sub_sample_chain_stays_offset_ordered() {
        let mut store = SampleStore::new(true);
        store.locate_create(coord(0, 0.5), 1, false);
        store.locate_create(coord(0, 0.2), 1, false);
        store.locate_create(coord(0, 0.8), 1, false);
        let mut offsets = Vec::new();
        let mut cur = store.roots[0].next;
        while let Some(idx) = cur {
            let node = store.subs.get(idx);
            offsets.push(node.toffset.as_f32());
            cur = node.next;
        }
        assert_eq!(offsets, vec![0.2, 0.5, 0.8]);
    }

    #[test]
    fn clear_from_removes_tail_only() {
        let mut store = SampleStore::new(true);
        store.locate_create(coord(3, 0.0), 1, false);
        store.locate_create(coord(4, 0.0), 1, false);
        store.locate_create(coord(5, 0.0), 1, false);
        store.apply_from(coord(4, 0.0), FromAction::Clear);
        assert_eq!(store.num_samples_tot(), 1);
        assert!(store.sample(Location::Root(3)).status.is_initialized());
        assert!(!store.sample(Location::Root(3)).status.is_skip());
        assert!(store.sample(Location::Root(4)).status.is_skip());
        assert!(store.sample(Location::Root(5)).status.is_skip());
    }

    #[test]
    fn clear_one_on_a_root_preserves_its_sub_sample_chain() {
        let mut store = SampleStore::new(true);
        store.locate_create(coord(0, 0.0), 1, false);
        store.locate_create(coord(0, 0.5), 1, false);
        assert_eq!(store.num_samples_tot(), 2);

        store.clear_one(Location::Root(0));

        assert!(store.sample(Location::Root(0)).status.is_skip());
        // Clearing the root must not orphan the sub-sample still chained off it.
        assert_eq!(store.num_samples_tot(), 1);
        assert_eq!(store.locate_read(coord(0, 0.5)), Some(Location::Sub { root: 0, slab: store.roots[0].next.unwrap() }));
    }

    #[test]
    fn retain_preserves_chains_on_pruned_roots() {
        let mut store = SampleStore::new(true);
        store.locate_create(coord(0, 0.0), 1, false);
        store.locate_create(coord(0, 0.5), 1, false);
        store.locate_create(coord(1, 0.0), 1, false);

        // Prune only root 0; its sub-sample must survive, not leak.
        store.retain(|s| !(s.tindex == 0 && s.toffset.eq_time(Time::Float(0.0))));

        assert!(store.sample(Location::Root(0)).status.is_skip());
        assert_eq!(store.num_samples_tot(), 2);
        assert!(store.locate_read(coord(0, 0.5)).is_some());
    }

    #[test]
    fn min_array_size_floors_at_32_and_rounds_up() {
        assert_eq!(min_array_size(1), 32);
        assert_eq!(min_array_size(32), 32);
        assert_eq!(min_array_size(33), 64);
        assert_eq!(min_array_size(65), 128);
    }
}
