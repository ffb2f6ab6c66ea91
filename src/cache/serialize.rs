//! Index serializer/deserializer (C6): a flat, copy-append layout for the
//! cache definition plus its block-descriptor array. Sample data is never
//! serialized (see `CacheError::DataSerializationUnsupported`); callbacks
//! are never serialized and are re-bound from the supplied template on load.

use std::rc::Rc;

use super::{Cache, CacheFlags};
use crate::block::{BlockDescriptor, BlockFlags, DataType};
use crate::error::CacheError;
use crate::status::CacheStatus;
use crate::template::{CacheTemplate, Name, MAX_NAME};
use crate::time::Time;

const TAG_SIZE: usize = 1;
const TIME_SIZE: usize = 4;
const U32_SIZE: usize = 4;

/// `id` + `time_tag` + 3 time values + `flags` + `num_blocks` +
/// `num_samples_array` + `num_samples_tot` + `msize`.
const CACHE_DEF_SIZE: usize = MAX_NAME + TAG_SIZE + 3 * TIME_SIZE + 4 * U32_SIZE;

/// `id` + `index` + `dtype` + `element_size` + `flags`.
const BLOCK_DESCRIPTOR_DEF_SIZE: usize = MAX_NAME + U32_SIZE + 1 + U32_SIZE + U32_SIZE;

fn time_bits(t: Time) -> u32 {
    match t {
        Time::Float(v) => v.to_bits(),
        Time::Int(v) => v,
    }
}

fn push_name(buf: &mut Vec<u8>, name: &Name) {
    let mut padded = [0u8; MAX_NAME];
    let bytes = name.as_bytes();
    padded[..bytes.len()].copy_from_slice(bytes);
    buf.extend_from_slice(&padded);
}

/// A cursor over a borrowed byte slice, mirroring the source's
/// offset-advancing reads but bounds-checked instead of raw-pointer.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CacheError> {
        let end = self.pos.checked_add(n).ok_or(CacheError::Truncated)?;
        let slice = self.buf.get(self.pos..end).ok_or(CacheError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, CacheError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, CacheError> {
        Ok(u32::from_le_bytes(self.take(U32_SIZE)?.try_into().unwrap()))
    }

    fn name(&mut self) -> Result<Name, CacheError> {
        let bytes = self.take(MAX_NAME)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let s = std::str::from_utf8(&bytes[..end]).map_err(|_| CacheError::Truncated)?;
        Name::from(s).map_err(|_| CacheError::Truncated)
    }

    fn time(&mut self, time_is_float: bool) -> Result<Time, CacheError> {
        let bits = self.u32()?;
        Ok(if time_is_float { Time::Float(f32::from_bits(bits)) } else { Time::Int(bits) })
    }
}

impl Cache {
    /// Total byte size `serialize` would produce for this cache.
    /// `serialize_data = true` is rejected; sample payloads are not yet
    /// serialized by this crate.
    pub fn serial_size(&self, serialize_data: bool) -> Result<u32, CacheError> {
        if serialize_data {
            return Err(CacheError::DataSerializationUnsupported);
        }
        Ok((CACHE_DEF_SIZE + self.registry.len() * BLOCK_DESCRIPTOR_DEF_SIZE) as u32)
    }

    /// Serializes the cache definition and block registry into a freshly
    /// allocated buffer.
    pub fn serialize(&self, serialize_data: bool) -> Result<Vec<u8>, CacheError> {
        let size = self.serial_size(serialize_data)? as usize;
        let mut buf = Vec::with_capacity(size);
        self.serialize_into(&mut buf, serialize_data)?;
        Ok(buf)
    }

    /// Appends the serialized cache definition and block registry to `buf`.
    pub fn serialize_into(&self, buf: &mut Vec<u8>, serialize_data: bool) -> Result<(), CacheError> {
        if serialize_data {
            return Err(CacheError::DataSerializationUnsupported);
        }

        push_name(buf, &self.id);
        buf.push(self.time_is_float as u8);
        buf.extend_from_slice(&time_bits(self.t_initial).to_le_bytes());
        buf.extend_from_slice(&time_bits(self.t_final).to_le_bytes());
        buf.extend_from_slice(&time_bits(self.t_step).to_le_bytes());
        buf.extend_from_slice(&self.flags.bits().to_le_bytes());
        buf.extend_from_slice(&(self.registry.len() as u32).to_le_bytes());
        // num_samples_array / num_samples_tot: zeroed, sample data is not
        // serialized, so a round-trip always restores an empty cache.
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&self.meta_size.to_le_bytes());

        for block in &self.registry {
            push_name(buf, &block.id);
            buf.extend_from_slice(&block.index.to_le_bytes());
            buf.push(block.dtype as u8);
            buf.extend_from_slice(&block.element_size.to_le_bytes());
            buf.extend_from_slice(&block.flags.bits().to_le_bytes());
        }

        log::debug!("cache '{}': serialized {} block descriptor(s)", self.id, self.registry.len());
        Ok(())
    }
}

/// Rebuilds a cache from a serialized buffer and the template it was built
/// from. The template supplies everything the wire format omits: callbacks,
/// `meta_gen`, and (via `cache_def.id` matching `template.id`) a sanity
/// check that the buffer actually belongs to this category of cache.
pub fn deserialize(bytes: &[u8], template: &CacheTemplate) -> Result<Cache, CacheError> {
    let mut r = Reader::new(bytes);

    let id = r.name()?;
    if id.as_str() != template.id.as_str() {
        log::error!("deserialize: cache id '{id}' does not match template id '{}'", template.id);
        return Err(CacheError::TemplateMismatch { expected: template.id, found: id });
    }

    let time_is_float = r.u8()? != 0;
    let t_initial = r.time(time_is_float)?;
    let t_final = r.time(time_is_float)?;
    let t_step = r.time(time_is_float)?;
    let flags = CacheFlags::from_bits_truncate(r.u32()?);
    let num_blocks = r.u32()?;
    let _num_samples_array = r.u32()?;
    let _num_samples_tot = r.u32()?;
    let meta_size = r.u32()?;

    let mut registry = Vec::with_capacity(num_blocks as usize);
    for _ in 0..num_blocks {
        let block_id = r.name()?;
        let index = r.u32()?;
        let dtype = DataType::from_u8(r.u8()?).ok_or(CacheError::Truncated)?;
        let element_size = r.u32()?;
        let block_flags = BlockFlags::from_bits_truncate(r.u32()?);

        let template_block = template.find_block_by_index(index).ok_or(CacheError::Truncated)?;
        registry.push(BlockDescriptor {
            id: block_id,
            index,
            dtype,
            element_size,
            flags: block_flags,
            codec: Rc::clone(&template_block.codec),
        });
    }

    let mut status = CacheStatus::default();
    status.set_current();

    Ok(Cache {
        id,
        time_is_float,
        t_initial,
        t_final,
        t_step,
        flags,
        status,
        registry,
        store: crate::sample::SampleStore::new(time_is_float),
        meta_size,
        meta_gen: template.meta_gen.clone(),
    })
}
