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

//! Per-frame GPU buffer rings.
//!
//! A [`BufferRing`] owns one GPU buffer per frame-in-flight plus a CPU-side
//! shadow buffer. Each frame follows the same discipline:
//!
//! ```text
//! map() -> write into the shadow -> guard drops (upload to current slot)
//!       -> command buffer submitted -> rotate() to the next slot
//! ```
//!
//! The CPU writes slot `i+1` only after the submission that reads slot `i`
//! has been issued, which is what lets the producer keep filling next-frame
//! data while the GPU consumes the previous frame's buffer, without locks.
//! The state machine below turns any violation of that ordering into a loud
//! failure instead of a silent write-after-read hazard.

use bytemuck::Pod;
use plume_core::gpu::{BufferDescriptor, BufferId, BufferUsage, GpuDevice, ResourceError};
use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingPhase {
    /// Nothing mapped this frame.
    Idle,
    /// A map guard is live; the shadow is being written.
    Mapped,
    /// The shadow was uploaded into the current slot; waiting on rotate().
    Uploaded,
}

/// A ring of GPU buffers rotated once per submitted frame.
#[derive(Debug)]
pub struct BufferRing {
    label: &'static str,
    usage: BufferUsage,
    buffers: Vec<BufferId>,
    shadow: Vec<u8>,
    capacity: u64,
    current: usize,
    phase: RingPhase,
    /// Bytes uploaded by the last unmap, for diagnostics.
    last_upload_len: u64,
}

impl BufferRing {
    /// Creates a ring of `slots` buffers of `capacity` bytes each.
    pub fn new(
        device: &dyn GpuDevice,
        label: &'static str,
        usage: BufferUsage,
        slots: usize,
        capacity: u64,
    ) -> Result<Self, ResourceError> {
        debug_assert!(slots >= 2, "a ring of fewer than 2 slots cannot overlap");
        let mut buffers = Vec::with_capacity(slots);
        for i in 0..slots {
            buffers.push(device.create_buffer(&BufferDescriptor {
                label: Some(match i {
                    0 => Cow::Borrowed(label),
                    _ => Cow::Owned(format!("{label} [slot {i}]")),
                }),
                size: capacity,
                usage: usage | BufferUsage::COPY_DST,
            })?);
        }
        Ok(Self {
            label,
            usage,
            buffers,
            shadow: vec![0; capacity as usize],
            capacity,
            current: 0,
            phase: RingPhase::Idle,
            last_upload_len: 0,
        })
    }

    /// Grows the ring to at least `size_in_bytes`, recreating every slot.
    /// Growth is geometric and the ring never shrinks, so repeated small
    /// overshoots don't thrash reallocation.
    pub fn resize(
        &mut self,
        device: &dyn GpuDevice,
        size_in_bytes: u64,
    ) -> Result<(), ResourceError> {
        if size_in_bytes <= self.capacity {
            return Ok(());
        }
        assert_eq!(
            self.phase,
            RingPhase::Idle,
            "BufferRing({}): resize while a frame is in progress",
            self.label
        );
        let new_capacity = size_in_bytes.max(self.capacity * 2);
        log::debug!(
            "BufferRing({}): growing {} -> {} bytes",
            self.label,
            self.capacity,
            new_capacity
        );
        for buffer in self.buffers.iter_mut() {
            device.destroy_buffer(*buffer)?;
            *buffer = device.create_buffer(&BufferDescriptor {
                label: Some(Cow::Borrowed(self.label)),
                size: new_capacity,
                usage: self.usage | BufferUsage::COPY_DST,
            })?;
        }
        self.capacity = new_capacity;
        self.shadow.resize(new_capacity as usize, 0);
        Ok(())
    }

    /// Maps `len` bytes of the shadow buffer for writing.
    ///
    /// Panics if the previous frame's upload has not been rotated out yet —
    /// mapping at that point would overwrite memory the in-flight submission
    /// still reads.
    pub fn map<'a>(
        &'a mut self,
        device: &'a dyn GpuDevice,
        len: u64,
    ) -> Result<MappedBuffer<'a>, ResourceError> {
        assert_eq!(
            self.phase,
            RingPhase::Idle,
            "BufferRing({}): map() before the previous upload was submitted and rotated",
            self.label
        );
        if len > self.capacity {
            return Err(ResourceError::OutOfBounds);
        }
        self.phase = RingPhase::Mapped;
        Ok(MappedBuffer {
            ring: self,
            device,
            len,
        })
    }

    /// Advances to the next slot. Must be called once per submitted frame,
    /// after the command buffer consuming the current slot was handed to the
    /// device. A ring that was not written this frame stays put.
    pub fn rotate(&mut self) {
        match self.phase {
            RingPhase::Idle => {}
            RingPhase::Uploaded => {
                self.current = (self.current + 1) % self.buffers.len();
                self.phase = RingPhase::Idle;
            }
            RingPhase::Mapped => {
                panic!(
                    "BufferRing({}): rotate() while still mapped; the guard must drop first",
                    self.label
                );
            }
        }
    }

    /// The GPU buffer the current frame's passes bind.
    pub fn current_buffer(&self) -> BufferId {
        self.buffers[self.current]
    }

    /// The current slot index (for telemetry and tests).
    pub fn current_slot_index(&self) -> usize {
        self.current
    }

    /// Number of slots in the ring.
    pub fn slot_count(&self) -> usize {
        self.buffers.len()
    }

    /// Current per-slot capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Bytes uploaded by the most recent unmap.
    pub fn last_upload_len(&self) -> u64 {
        self.last_upload_len
    }

    /// Destroys all GPU buffers owned by the ring.
    pub fn destroy(&self, device: &dyn GpuDevice) {
        for buffer in &self.buffers {
            if let Err(e) = device.destroy_buffer(*buffer) {
                log::warn!("BufferRing({}): failed to destroy buffer: {e}", self.label);
            }
        }
    }

    fn unmap_and_upload(&mut self, device: &dyn GpuDevice, len: u64) {
        debug_assert_eq!(self.phase, RingPhase::Mapped);
        if let Err(e) = device.write_buffer(self.current_buffer(), 0, &self.shadow[..len as usize])
        {
            log::error!("BufferRing({}): upload failed: {e}", self.label);
        }
        self.last_upload_len = len;
        self.phase = RingPhase::Uploaded;
    }
}

/// RAII guard over a mapped ring slot.
///
/// Dereferences to the mapped shadow bytes; dropping the guard uploads them
/// into the ring's current GPU slot. The upload can therefore never be
/// skipped, even on an early-return path.
pub struct MappedBuffer<'a> {
    ring: &'a mut BufferRing,
    device: &'a dyn GpuDevice,
    len: u64,
}

impl MappedBuffer<'_> {
    /// Views the mapped bytes as a mutable slice of `T`.
    pub fn as_slice_of_mut<T: Pod>(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(&mut self.ring.shadow[..self.len as usize])
    }

    /// Copies `records` into the front of the mapped range.
    pub fn write_records<T: Pod>(&mut self, records: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(records);
        self.ring.shadow[..bytes.len()].copy_from_slice(bytes);
    }
}

impl Deref for MappedBuffer<'_> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.ring.shadow[..self.len as usize]
    }
}

impl DerefMut for MappedBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.ring.shadow[..self.len as usize]
    }
}

impl Drop for MappedBuffer<'_> {
    fn drop(&mut self) {
        self.ring.unmap_and_upload(self.device, self.len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;
    use plume_core::gpu::BufferUsage;

    fn ring(device: &dyn GpuDevice) -> BufferRing {
        BufferRing::new(device, "test", BufferUsage::VERTEX | BufferUsage::VOLATILE, 3, 64)
            .expect("ring creation")
    }

    #[test]
    fn map_upload_rotate_cycles_slots() {
        let device = HeadlessDevice::new();
        let mut ring = ring(&*device);
        assert_eq!(ring.current_slot_index(), 0);

        for expected_slot in [0usize, 1, 2, 0] {
            assert_eq!(ring.current_slot_index(), expected_slot);
            {
                let mut mapped = ring.map(&*device, 16).unwrap();
                mapped[0] = 0xAB;
            }
            ring.rotate();
        }
    }

    #[test]
    fn guard_drop_uploads_even_on_early_return() {
        let device = HeadlessDevice::new();
        let mut ring = ring(&*device);
        let mut attempt = || -> Result<(), ResourceError> {
            let mut mapped = ring.map(&*device, 8)?;
            mapped[0] = 1;
            // Early return: the guard still uploads on unwind of the scope.
            Err(ResourceError::OutOfBounds)
        };
        assert!(attempt().is_err());
        assert_eq!(ring.last_upload_len(), 8);
        ring.rotate();
        assert_eq!(ring.current_slot_index(), 1);
    }

    #[test]
    #[should_panic(expected = "before the previous upload was submitted")]
    fn double_map_without_rotate_panics() {
        let device = HeadlessDevice::new();
        let mut ring = ring(&*device);
        {
            let _mapped = ring.map(&*device, 8).unwrap();
        }
        // No rotate() between the maps: this would alias in-flight memory.
        let _ = ring.map(&*device, 8);
    }

    #[test]
    fn resize_grows_geometrically_and_never_shrinks() {
        let device = HeadlessDevice::new();
        let mut ring = ring(&*device);
        ring.resize(&*device, 65).unwrap();
        assert_eq!(ring.capacity(), 128, "doubles rather than matching exactly");
        ring.resize(&*device, 64).unwrap();
        assert_eq!(ring.capacity(), 128, "never shrinks");
        ring.resize(&*device, 1000).unwrap();
        assert_eq!(ring.capacity(), 1000.max(256));
    }

    #[test]
    fn oversized_map_is_rejected() {
        let device = HeadlessDevice::new();
        let mut ring = ring(&*device);
        assert!(matches!(
            ring.map(&*device, 65).err(),
            Some(ResourceError::OutOfBounds)
        ));
        // A rejected map leaves the ring usable.
        let _ = ring.map(&*device, 64).unwrap();
    }
}
