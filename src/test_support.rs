//! Shared fixtures for in-crate unit tests (C9).
//!
//! A single `float3`, const-count-2 block codec (`x`) backs every sibling
//! `#[cfg(test)] mod tests` in this crate, so each module's tests don't
//! re-derive a fixture. The cross-cutting scenario/property tests in
//! `tests/` build their own template inline against the public API, mirroring
//! the granularity split described in the crate-level documentation.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use crate::block::{BlockCodec, BlockData, BlockDataMut, BlockFlags, DataType};
use crate::template::{BlockTemplate, CacheTemplate, Name};
use crate::time::Time;

/// Two 3-component float vectors: the user-data shape the `x` block's codec
/// reads and writes (`dtype = Float3`, `count() = 2`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Vec3 {
    pub(crate) data: [[f32; 3]; 2],
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

/// The `x` block's codec. `fail_next` lets a test force exactly one write
/// failure (scenario S5) without a second fixture type.
pub(crate) struct Vec3Codec {
    pub(crate) fail_next: Cell<bool>,
}

impl Vec3Codec {
    pub(crate) fn new() -> Rc<Vec3Codec> {
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
        let v = user.downcast_ref::<Vec3>().expect("test codec: unexpected user type");
        write_vec3(data.data, v);
        true
    }

    fn read(&self, data: BlockData<'_>, user: &mut dyn Any) -> bool {
        let out = user.downcast_mut::<Vec3>().expect("test codec: unexpected user type");
        *out = read_vec3(data.data);
        true
    }
}

/// A template with id `"test"`, integer time, domain `[1, 10]` step `1`, and
/// one mandatory `x` block (`Float3`, const-count 2) — the fixture the
/// public scenarios (S1-S6) are built from.
pub(crate) fn test_template() -> CacheTemplate {
    test_template_with(Vec3Codec::new())
}

pub(crate) fn test_template_with(codec: Rc<Vec3Codec>) -> CacheTemplate {
    CacheTemplate {
        id: Name::from("test").unwrap(),
        time_is_float: false,
        t_initial: Time::Int(1),
        t_final: Time::Int(10),
        t_step: Time::Int(1),
        flags: Default::default(),
        meta_size: 0,
        meta_gen: None,
        blocks: vec![BlockTemplate {
            id: Name::from("x").unwrap(),
            dtype: DataType::Float3,
            element_size: 0,
            flags: BlockFlags::CONST_COUNT,
            codec,
        }],
    }
}
