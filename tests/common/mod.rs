//! Shared fixture for the integration tests: the `id="test"` template from
//! the public scenarios (S1-S6) and properties (§8), built only against the
//! crate's public API.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use omni_sample_cache::block::{BlockCodec, BlockData, BlockDataMut, BlockFlags, DataType};
use omni_sample_cache::template::{BlockTemplate, CacheTemplate, Name};
use omni_sample_cache::time::Time;

/// Two 3-component float vectors, the user-data shape of the `x` block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub data: [[f32; 3]; 2],
}

impl Vec3 {
    pub fn new(a: [f32; 3], b: [f32; 3]) -> Vec3 {
        Vec3 { data: [a, b] }
    }
}

fn write_vec3(buf: &mut [u8], v: &Vec3) {
    for (i, elem) in v.data.iter().enumerate() {
        let off = i * 12;
        buf[off..off + 4].copy_from_slice(&elem[0].to_le_bytes());
        buf[off + 4..off + 8].copy_from_slice(&elem[1].to_le_bytes());
        buf[off + 8..off + 12].copy_from_slice(&elem[2].to_le_bytes());
    }
}

fn read_vec3(buf: &[u8]) -> Vec3 {
    let mut v = Vec3::default();
    for (i, elem) in v.data.iter_mut().enumerate() {
        let off = i * 12;
        elem[0] = f32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        elem[1] = f32::from_le_bytes(buf[off + 4..off + 8].try_into().unwrap());
        elem[2] = f32::from_le_bytes(buf[off + 8..off + 12].try_into().unwrap());
    }
    v
}

/// Codec for block `"x"`. `fail_next` lets a test force exactly one write
/// failure (scenario S5) from outside the cache.
pub struct Vec3Codec {
    pub fail_next: Cell<bool>,
}

impl Vec3Codec {
    pub fn new() -> Rc<Vec3Codec> {
        Rc::new(Vec3Codec { fail_next: Cell::new(false) })
    }
}

impl BlockCodec for Vec3Codec {
    fn count(&self, _user: &dyn Any) -> u32 {
        2
    }

    fn write(&self, data: BlockDataMut<'_>, user: &dyn Any) -> bool {
        if self.fail_next.replace(false) {
            return false;
        }
        let v = user.downcast_ref::<Vec3>().expect("fixture: unexpected user type");
        write_vec3(data.data, v);
        true
    }

    fn read(&self, data: BlockData<'_>, user: &mut dyn Any) -> bool {
        let out = user.downcast_mut::<Vec3>().expect("fixture: unexpected user type");
        *out = read_vec3(data.data);
        true
    }
}

/// Builds the `id="test"` template: integer time, domain `[1, 10]` step 1,
/// one mandatory `x` block (`Float3`, const-count 2).
pub fn template() -> (CacheTemplate, Rc<Vec3Codec>) {
    template_with_step(1, 10)
}

/// Same fixture as [`template`] but with a caller-chosen step (so sub-sample
/// coordinates resolve to a non-zero offset) and final bound.
pub fn template_with_step(t_step: u32, t_final: u32) -> (CacheTemplate, Rc<Vec3Codec>) {
    let codec = Vec3Codec::new();
    let template = CacheTemplate {
        id: Name::from("test").unwrap(),
        time_is_float: false,
        t_initial: Time::Int(1),
        t_final: Time::Int(t_final),
        t_step: Time::Int(t_step),
        flags: Default::default(),
        meta_size: 0,
        meta_gen: None,
        blocks: vec![BlockTemplate {
            id: Name::from("x").unwrap(),
            dtype: DataType::Float3,
            element_size: 0,
            flags: BlockFlags::CONST_COUNT | BlockFlags::MANDATORY,
            codec: codec.clone(),
        }],
    };
    (template, codec)
}
