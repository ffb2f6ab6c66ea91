//! Sample store (C4): a contiguous root array plus per-root singly-linked
//! chains of sub-samples, addressed by index rather than pointer.

mod sample;
mod slab;
mod store;

pub use sample::Coordinate;
pub(crate) use sample::{Location, Sample};
pub(crate) use store::{FromAction, SampleStore};
