//! Cache object (C5): binds the status lattice, block registry, and sample
//! store to a time domain and exposes the public operations.

mod consolidate;
mod flags;
mod read;
mod serialize;
mod write;

use std::rc::Rc;

pub use flags::{CacheFlags, ConsolidationFlags, ReadResult, WriteResult};
pub use serialize::deserialize;

use crate::block::{registry, BlockDescriptor, MetaGen};
use crate::sample::{Coordinate, FromAction, Location, SampleStore};
use crate::status::CacheStatus;
use crate::template::{select_indices, CacheTemplate, Name};
use crate::time::Time;

/// A time-indexed sample cache, built from a [`CacheTemplate`].
pub struct Cache {
    pub(crate) id: Name,
    pub(crate) time_is_float: bool,
    pub(crate) t_initial: Time,
    pub(crate) t_final: Time,
    pub(crate) t_step: Time,
    pub(crate) flags: CacheFlags,
    pub(crate) status: CacheStatus,
    pub(crate) registry: Vec<BlockDescriptor>,
    pub(crate) store: SampleStore,
    pub(crate) meta_size: u32,
    pub(crate) meta_gen: Option<Rc<dyn MetaGen>>,
}

impl Cache {
    /// Builds a cache from `template`, including only the blocks `selection`
    /// resolves to (plus every `mandatory` block).
    pub fn new(template: &CacheTemplate, selection: &str) -> Cache {
        let indices = select_indices(template, selection);
        let registry = registry::build(template, &indices);
        log::debug!(
            "cache '{}': built registry with {} block(s) from selection {:?}",
            template.id,
            registry.len(),
            selection
        );
        let mut status = CacheStatus::default();
        status.set_current();
        Cache {
            id: template.id,
            time_is_float: template.time_is_float,
            t_initial: template.t_initial,
            t_final: template.t_final,
            t_step: template.t_step,
            flags: template.flags,
            status,
            registry,
            store: SampleStore::new(template.time_is_float),
            meta_size: template.meta_size,
            meta_gen: template.meta_gen.clone(),
        }
    }

    /// Duplicates this cache. With `copy_data = false`, the clone starts
    /// with an empty sample store; with `true`, every sample is deep-copied.
    pub fn duplicate(&self, copy_data: bool) -> Cache {
        let mut dup = Cache {
            id: self.id,
            time_is_float: self.time_is_float,
            t_initial: self.t_initial,
            t_final: self.t_final,
            t_step: self.t_step,
            flags: self.flags,
            status: self.status,
            registry: self.registry.clone(),
            store: SampleStore::new(self.time_is_float),
            meta_size: self.meta_size,
            meta_gen: self.meta_gen.clone(),
        };
        if copy_data {
            dup.store = self.store.clone();
        }
        dup
    }

    /// Explicit release, for parity with the source's `OMNI_free`; ordinary
    /// `Drop` already does this, so hosts are not required to call it.
    pub fn free(self) {
        drop(self)
    }

    fn has_meta(&self) -> bool {
        self.meta_gen.is_some() && self.meta_size > 0
    }

    fn coordinate(&self, t: Time) -> Option<Coordinate> {
        Coordinate::from_time(t, self.t_initial, self.t_final, self.t_step)
    }

    fn rebuild_registry(&mut self, indices: &[usize], template: &CacheTemplate) {
        self.registry = registry::build(template, indices);
        self.store.clear_all();
        log::debug!("cache '{}': registry rebuilt, {} block(s), samples discarded", self.id, self.registry.len());
    }

    /// Union of the current registry with `selection`'s blocks; always
    /// discards samples.
    pub fn blocks_add(&mut self, template: &CacheTemplate, selection: &str) {
        let mut indices: Vec<usize> = self.registry.iter().map(|b| b.index as usize).collect();
        for i in select_indices(template, selection) {
            if !indices.contains(&i) {
                indices.push(i);
            }
        }
        self.rebuild_registry(&indices, template);
    }

    /// Intersection of the current registry with the complement of
    /// `selection`'s blocks (mandatory blocks are never removed since
    /// `select_indices` always includes them); always discards samples.
    pub fn blocks_remove(&mut self, template: &CacheTemplate, selection: &str) {
        let excluded = select_indices(template, selection);
        let indices: Vec<usize> = self
            .registry
            .iter()
            .map(|b| b.index as usize)
            .filter(|i| !excluded.contains(i) || template.blocks[*i].flags.contains(crate::block::BlockFlags::MANDATORY))
            .collect();
        self.rebuild_registry(&indices, template);
    }

    /// Replaces the registry outright with `selection`'s blocks; always
    /// discards samples.
    pub fn blocks_set(&mut self, template: &CacheTemplate, selection: &str) {
        let indices = select_indices(template, selection);
        self.rebuild_registry(&indices, template);
    }

    /// Adds a single block by template index; a no-op if already present.
    pub fn block_add_by_index(&mut self, template: &CacheTemplate, index: usize) {
        assert!(index < template.blocks.len(), "block_add_by_index: index out of range");
        if self.registry.iter().any(|b| b.index as usize == index) {
            log::trace!("cache '{}': block_add_by_index({}) already present, no-op", self.id, index);
            return;
        }
        let mut indices: Vec<usize> = self.registry.iter().map(|b| b.index as usize).collect();
        indices.push(index);
        self.rebuild_registry(&indices, template);
    }

    /// Removes a single block by template index; a no-op if already absent.
    pub fn block_remove_by_index(&mut self, template: &CacheTemplate, index: usize) {
        if !self.registry.iter().any(|b| b.index as usize == index) {
            log::trace!("cache '{}': block_remove_by_index({}) already absent, no-op", self.id, index);
            return;
        }
        let indices: Vec<usize> = self.registry.iter().map(|b| b.index as usize).filter(|i| *i != index).collect();
        self.rebuild_registry(&indices, template);
    }

    pub fn sample_write<U: std::any::Any>(&mut self, t: Time, user: &U) -> WriteResult {
        write::sample_write(self, t, user)
    }

    pub fn sample_read<U: std::any::Any>(&self, t: Time, user: &mut U) -> ReadResult {
        read::sample_read(self, t, user)
    }

    /// Sets the time domain; discards all samples if any bound actually
    /// changes value.
    pub fn set_range(&mut self, t_initial: Time, t_final: Time, t_step: Time) {
        let changed = !self.t_initial.eq_time(t_initial) || !self.t_final.eq_time(t_final) || !self.t_step.eq_time(t_step);
        self.t_initial = t_initial;
        self.t_final = t_final;
        self.t_step = t_step;
        if changed {
            self.store.clear_all();
            log::debug!("cache '{}': range changed, samples discarded", self.id);
        }
    }

    /// Returns `(t_initial, t_final, t_step)`, each independently assigned.
    pub fn get_range(&self) -> (Time, Time, Time) {
        (self.t_initial, self.t_final, self.t_step)
    }

    pub fn get_num_cached(&self) -> u32 {
        self.store.num_samples_tot()
    }

    pub fn id(&self) -> Name {
        self.id
    }

    /// The cache's current block registry, in template order. Mostly useful
    /// for introspection (e.g. verifying a deserialized cache against the
    /// template it was built from).
    pub fn registry(&self) -> &[BlockDescriptor] {
        &self.registry
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    pub fn is_current(&self) -> bool {
        self.status.is_current()
    }

    pub fn sample_is_valid(&self, t: Time) -> bool {
        match self.coordinate(t).and_then(|c| self.store.locate_read(c)) {
            Some(loc) => self.store.sample(loc).is_sample_valid(),
            None => false,
        }
    }

    pub fn sample_is_current(&self, t: Time) -> bool {
        match self.coordinate(t).and_then(|c| self.store.locate_read(c)) {
            Some(loc) => self.store.sample(loc).is_sample_current(),
            None => false,
        }
    }

    pub fn consolidate(&mut self, flags: ConsolidationFlags) {
        consolidate::consolidate(self, flags)
    }

    pub fn mark_outdated(&mut self) {
        self.status.clear_current();
    }

    pub fn mark_invalid(&mut self) {
        self.status.clear_valid();
    }

    /// Discards every sample; the cache itself remains `valid`/`current`.
    pub fn clear(&mut self) {
        self.store.clear_all();
    }

    pub fn sample_mark_outdated(&mut self, t: Time) {
        if let Some(loc) = self.coordinate(t).and_then(|c| self.store.locate_read(c)) {
            self.store.sample_mut(loc).mark_outdated();
        }
    }

    pub fn sample_mark_invalid(&mut self, t: Time) {
        if let Some(loc) = self.coordinate(t).and_then(|c| self.store.locate_read(c)) {
            self.store.sample_mut(loc).mark_invalid();
        }
    }

    pub fn sample_clear(&mut self, t: Time) {
        if let Some(loc) = self.coordinate(t).and_then(|c| self.store.locate_read(c)) {
            self.store.clear_one(loc);
        }
    }

    pub fn sample_mark_outdated_from(&mut self, t: Time) {
        if let Some(coord) = self.coordinate(t) {
            self.store.apply_from(coord, FromAction::MarkOutdated);
        }
    }

    pub fn sample_mark_invalid_from(&mut self, t: Time) {
        if let Some(coord) = self.coordinate(t) {
            self.store.apply_from(coord, FromAction::MarkInvalid);
        }
    }

    pub fn sample_clear_from(&mut self, t: Time) {
        if let Some(coord) = self.coordinate(t) {
            self.store.apply_from(coord, FromAction::Clear);
        }
    }
}
