//! Block registry operations (§4.3) and cache duplication, via the public API.

mod common;

use std::any::Any;
use std::rc::Rc;

use common::{template_with_step, Vec3};
use omni_sample_cache::block::MetaGen;
use omni_sample_cache::cache::Cache;
use omni_sample_cache::template::{BlockTemplate, CacheTemplate, Name};
use omni_sample_cache::time::Time;

fn t(v: u32) -> Time {
    Time::Int(v)
}

#[test]
fn blocks_add_is_a_union_and_wipes_samples() {
    let (tmpl, _codec) = template_with_step(1, 10);
    let mut cache = Cache::new(&tmpl, "");
    assert_eq!(cache.registry().len(), 1, "x is MANDATORY, always present");

    cache.sample_write(t(3), &Vec3::default());
    assert_eq!(cache.get_num_cached(), 1);

    cache.blocks_add(&tmpl, "x");
    assert_eq!(cache.registry().len(), 1);
    assert_eq!(cache.get_num_cached(), 0, "any registry rebuild discards samples");
}

#[test]
fn blocks_remove_keeps_mandatory_blocks() {
    let (tmpl, _codec) = template_with_step(1, 10);
    let mut cache = Cache::new(&tmpl, "x");
    cache.blocks_remove(&tmpl, "x");
    assert_eq!(cache.registry().len(), 1, "x is mandatory and cannot be removed via selection");
}

#[test]
fn block_add_remove_by_index_is_idempotent() {
    let (tmpl, _codec) = template_with_step(1, 10);
    let mut cache = Cache::new(&tmpl, "");
    let before = cache.get_num_cached();

    cache.block_add_by_index(&tmpl, 0);
    cache.block_add_by_index(&tmpl, 0);
    assert_eq!(cache.registry().len(), 1);
    assert_eq!(cache.get_num_cached(), before);
}

#[test]
fn duplicate_without_data_starts_empty() {
    let (tmpl, _codec) = template_with_step(1, 10);
    let mut cache = Cache::new(&tmpl, "x");
    cache.sample_write(t(3), &Vec3::default());

    let dup = cache.duplicate(false);
    assert_eq!(dup.get_num_cached(), 0);
    assert_eq!(dup.registry().len(), cache.registry().len());
}

#[test]
fn duplicate_with_data_copies_samples() {
    let (tmpl, _codec) = template_with_step(1, 10);
    let mut cache = Cache::new(&tmpl, "x");
    cache.sample_write(t(3), &Vec3::default());

    let dup = cache.duplicate(true);
    assert_eq!(dup.get_num_cached(), 1);
    assert!(dup.sample_is_valid(t(3)));
}

struct ConstMeta;

impl MetaGen for ConstMeta {
    fn generate(&self, _user: &dyn Any, out: &mut [u8]) -> bool {
        out.fill(7);
        true
    }
}

#[test]
fn meta_gen_populates_the_meta_block_on_write() {
    let codec = common::Vec3Codec::new();
    let tmpl = CacheTemplate {
        id: Name::from("test").unwrap(),
        time_is_float: false,
        t_initial: Time::Int(1),
        t_final: Time::Int(10),
        t_step: Time::Int(1),
        flags: Default::default(),
        meta_size: 4,
        meta_gen: Some(Rc::new(ConstMeta)),
        blocks: vec![BlockTemplate {
            id: Name::from("x").unwrap(),
            dtype: omni_sample_cache::block::DataType::Float3,
            element_size: 0,
            flags: omni_sample_cache::block::BlockFlags::MANDATORY | omni_sample_cache::block::BlockFlags::CONST_COUNT,
            codec,
        }],
    };
    let mut cache = Cache::new(&tmpl, "");
    let result = cache.sample_write(t(3), &Vec3::default());
    assert_eq!(result, omni_sample_cache::cache::WriteResult::Success);
    assert!(cache.sample_is_valid(t(3)));
}
