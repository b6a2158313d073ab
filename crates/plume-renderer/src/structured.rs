// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed storage buffers with a CPU shadow, rebuilt each frame.
//!
//! Path, paint and contour records are small and fully rewritten every
//! flush, so the buffer is volatile: records accumulate in a CPU vec during
//! recording and upload in one write at sync time. Passes bind element
//! windows of the synced buffer.

use bytemuck::Pod;
use plume_core::gpu::{
    BindingResource, BufferDescriptor, BufferId, BufferUsage, GpuDevice, ResourceError,
};
use std::borrow::Cow;

/// A typed, per-frame storage buffer.
#[derive(Debug)]
pub struct StructuredBuffer<T: Pod> {
    label: &'static str,
    data: Vec<T>,
    buffer: Option<BufferId>,
    capacity_bytes: u64,
}

impl<T: Pod> StructuredBuffer<T> {
    /// Creates an empty buffer; GPU memory is allocated on first sync.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            data: Vec::new(),
            buffer: None,
            capacity_bytes: 0,
        }
    }

    /// Appends one record, returning its element index.
    pub fn push(&mut self, value: T) -> u32 {
        let index = self.data.len() as u32;
        self.data.push(value);
        index
    }

    /// Number of records accumulated this frame.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when no records were pushed this frame.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Uploads this frame's records and returns the backing buffer, or
    /// `None` when the frame pushed nothing.
    pub fn sync(&mut self, device: &dyn GpuDevice) -> Result<Option<BufferId>, ResourceError> {
        if self.data.is_empty() {
            return Ok(None);
        }
        let bytes: &[u8] = bytemuck::cast_slice(&self.data);
        if bytes.len() as u64 > self.capacity_bytes {
            if let Some(old) = self.buffer.take() {
                device.destroy_buffer(old)?;
            }
            let new_capacity = (bytes.len() as u64).max(self.capacity_bytes * 2);
            self.buffer = Some(device.create_buffer(&BufferDescriptor {
                label: Some(Cow::Borrowed(self.label)),
                size: new_capacity,
                usage: BufferUsage::STORAGE | BufferUsage::VOLATILE | BufferUsage::COPY_DST,
            })?);
            self.capacity_bytes = new_capacity;
        }
        let buffer = self.buffer.expect("just ensured");
        device.write_buffer(buffer, 0, bytes)?;
        Ok(Some(buffer))
    }

    /// A binding over `[element_offset, element_offset + element_count)` of
    /// the synced buffer. Must be called after [`sync`](Self::sync) returned
    /// a buffer this frame.
    pub fn binding(&self, element_offset: u64, element_count: u64) -> BindingResource {
        let buffer = self
            .buffer
            .expect("binding requested before a successful sync");
        BindingResource::StorageBuffer {
            buffer,
            element_offset,
            element_count,
        }
    }

    /// Clears this frame's records. Capacity is retained.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Destroys the GPU buffer, if one was ever allocated.
    pub fn destroy(&mut self, device: &dyn GpuDevice) {
        if let Some(buffer) = self.buffer.take() {
            if let Err(e) = device.destroy_buffer(buffer) {
                log::warn!(
                    "StructuredBuffer({}): failed to destroy buffer: {e}",
                    self.label
                );
            }
        }
        self.capacity_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;
    use bytemuck::{Pod, Zeroable};

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    struct Record {
        a: u32,
        b: u32,
    }

    #[test]
    fn empty_sync_yields_no_buffer() {
        let device = HeadlessDevice::new();
        let mut buffer = StructuredBuffer::<Record>::new("records");
        assert_eq!(buffer.sync(&*device).unwrap(), None);
    }

    #[test]
    fn push_assigns_sequential_indices() {
        let mut buffer = StructuredBuffer::<Record>::new("records");
        assert_eq!(buffer.push(Record { a: 1, b: 2 }), 0);
        assert_eq!(buffer.push(Record { a: 3, b: 4 }), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn sync_reuses_buffer_until_capacity_exceeded() {
        let device = HeadlessDevice::new();
        let mut buffer = StructuredBuffer::<Record>::new("records");
        buffer.push(Record { a: 1, b: 2 });
        let first = buffer.sync(&*device).unwrap().unwrap();
        buffer.clear();
        buffer.push(Record { a: 5, b: 6 });
        let second = buffer.sync(&*device).unwrap().unwrap();
        assert_eq!(first, second, "same capacity, same buffer");

        buffer.clear();
        for i in 0..64 {
            buffer.push(Record { a: i, b: i });
        }
        let third = buffer.sync(&*device).unwrap().unwrap();
        assert_ne!(first, third, "growth reallocates");
    }
}
