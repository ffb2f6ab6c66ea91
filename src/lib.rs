//! A time-indexed sample cache for iterative simulations (cloth, particles,
//! fluids, and similar step-by-step solvers).
//!
//! A host simulator advances time step by step and, for each step, hands the
//! cache a bundle of opaque per-sample data through a small set of
//! host-supplied codecs (see [`block::BlockCodec`]). The cache stores
//! samples keyed by time, tracks per-sample and per-block validity and
//! freshness, supports sparse sub-step insertion between whole time steps,
//! permits partial invalidation of trailing samples when a simulation needs
//! to be re-run from some point, and serializes its index (not the raw
//! sample payload) to a flat buffer so a host can persist it alongside its
//! own document.
//!
//! The cache never interprets block contents: bytes in, bytes out, through
//! whatever codec the host's [`template::CacheTemplate`] supplies.
//!
//! ## Example
//!
//! A cache with one `float3` block, written and read back at a single time.
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use omni_sample_cache::block::{BlockCodec, BlockData, BlockDataMut, BlockFlags, DataType};
//! use omni_sample_cache::cache::Cache;
//! use omni_sample_cache::template::{BlockTemplate, CacheTemplate, Name};
//! use omni_sample_cache::time::Time;
//!
//! struct PositionCodec;
//!
//! impl BlockCodec for PositionCodec {
//!     fn count(&self, _user: &dyn std::any::Any) -> u32 {
//!         1
//!     }
//!
//!     fn write(&self, data: BlockDataMut<'_>, user: &dyn std::any::Any) -> bool {
//!         let pos = user.downcast_ref::<[f32; 3]>().unwrap();
//!         data.data[0..4].copy_from_slice(&pos[0].to_le_bytes());
//!         data.data[4..8].copy_from_slice(&pos[1].to_le_bytes());
//!         data.data[8..12].copy_from_slice(&pos[2].to_le_bytes());
//!         true
//!     }
//!
//!     fn read(&self, data: BlockData<'_>, user: &mut dyn std::any::Any) -> bool {
//!         let pos = user.downcast_mut::<[f32; 3]>().unwrap();
//!         pos[0] = f32::from_le_bytes(data.data[0..4].try_into().unwrap());
//!         pos[1] = f32::from_le_bytes(data.data[4..8].try_into().unwrap());
//!         pos[2] = f32::from_le_bytes(data.data[8..12].try_into().unwrap());
//!         true
//!     }
//! }
//!
//! let template = CacheTemplate {
//!     id: Name::from("cloth").unwrap(),
//!     time_is_float: false,
//!     t_initial: Time::Int(1),
//!     t_final: Time::Int(100),
//!     t_step: Time::Int(1),
//!     flags: Default::default(),
//!     meta_size: 0,
//!     meta_gen: None,
//!     blocks: vec![BlockTemplate {
//!         id: Name::from("position").unwrap(),
//!         dtype: DataType::Float3,
//!         element_size: 0,
//!         flags: BlockFlags::MANDATORY,
//!         codec: Rc::new(PositionCodec),
//!     }],
//! };
//!
//! let mut cache = Cache::new(&template, "");
//! cache.sample_write(Time::Int(3), &[1.0f32, 2.0, 3.0]);
//!
//! let mut out = [0.0f32; 3];
//! let result = cache.sample_read(Time::Int(3), &mut out);
//! assert!(result.is_exact());
//! assert_eq!(out, [1.0, 2.0, 3.0]);
//! ```
//!
//! ## Scope
//!
//! This crate is the cache engine proper: the time-to-sample map, the
//! sample/block/status state machine, the write/read protocol, the
//! templating mechanism that selects which blocks a cache instance
//! contains, range-scoped invalidation and removal, the consolidation pass,
//! and the index serializer. It does not simulate anything, does not
//! interpolate between samples (the hook exists; see
//! [`block::BlockCodec::interp`]), does not persist raw sample payloads
//! (only the index), and does not schedule work across threads.

pub mod block;
pub mod cache;
pub mod error;
pub mod template;
pub mod time;

mod sample;
mod status;

#[cfg(test)]
mod test_support;
