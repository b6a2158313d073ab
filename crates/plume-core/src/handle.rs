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

//! Generation-tagged handles for consumer-owned resources.
//!
//! Handles are allocated optimistically on the producer side *before* the
//! underlying object exists on the consumer side, so the producer can keep
//! referencing a resource in subsequent commands without waiting for a round
//! trip. A slot is only returned to the free list once the consumer's destroy
//! acknowledgement has drained back to the producer, and its generation is
//! bumped on reuse, so a stale handle can never alias a newer resource.

use std::fmt;

/// The untyped payload of every handle: a slot index plus the slot's
/// generation at allocation time, packed into a `u64` for cheap copying and
/// map keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle {
    /// Index into the arena's slot table.
    pub index: u32,
    /// Generation the slot had when this handle was allocated.
    pub generation: u32,
}

impl RawHandle {
    /// Packs the handle into a single `u64` (`generation << 32 | index`).
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Unpacks a handle previously produced by [`RawHandle::to_bits`].
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Lifecycle of a handle as observed by the consumer.
///
/// The producer only ever creates `Pending` entries; the consumer is the sole
/// writer of the `Resolved` and `Destroyed` transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Allocated on the producer, not yet materialized on the consumer.
    Pending,
    /// Backed by a live native object.
    Resolved,
    /// Released; any further use is a logged no-op.
    Destroyed,
}

macro_rules! typed_handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub RawHandle);

        impl $name {
            /// The underlying untyped handle.
            pub const fn raw(self) -> RawHandle {
                self.0
            }
        }

        impl From<$name> for RawHandle {
            fn from(h: $name) -> RawHandle {
                h.0
            }
        }
    };
}

typed_handle!(
    /// Identifies a decoded animation file on the consumer.
    FileHandle
);
typed_handle!(
    /// Identifies an artboard instance on the consumer.
    ArtboardHandle
);
typed_handle!(
    /// Identifies a state machine instance on the consumer.
    StateMachineHandle
);
typed_handle!(
    /// Identifies a view model instance on the consumer.
    ViewModelHandle
);
typed_handle!(
    /// Identifies an externally supplied render image on the consumer.
    RenderImageHandle
);
typed_handle!(
    /// Identifies a render target on the consumer.
    RenderTargetHandle
);

/// Producer-side allocator of [`RawHandle`]s.
///
/// Allocation pops the free list when possible; `recycle` must only be called
/// once the destroy acknowledgement for that handle has been observed, which
/// is what guarantees a slot index is never reused while the old object may
/// still be alive on the consumer.
#[derive(Debug, Default)]
pub struct HandleArena {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl HandleArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh handle in the `Pending` state.
    pub fn allocate(&mut self) -> RawHandle {
        if let Some(index) = self.free.pop() {
            RawHandle {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            RawHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Returns a slot to the free list after its destruction was acknowledged
    /// by the consumer. Bumps the generation so outstanding copies of the old
    /// handle become stale.
    ///
    /// A stale or double recycle is logged and ignored; the arena stays
    /// consistent either way.
    pub fn recycle(&mut self, handle: RawHandle) {
        let Some(generation) = self.generations.get_mut(handle.index as usize) else {
            log::error!("recycle of out-of-range handle {handle:?}");
            return;
        };
        if *generation != handle.generation {
            log::warn!("stale recycle of handle {handle:?} (slot is at v{generation})");
            return;
        }
        *generation = generation.wrapping_add(1);
        self.free.push(handle.index);
    }

    /// `true` when `handle`'s generation matches its slot's current one.
    pub fn is_current(&self, handle: RawHandle) -> bool {
        self.generations
            .get(handle.index as usize)
            .is_some_and(|g| *g == handle.generation && !self.free.contains(&handle.index))
    }

    /// Number of slots ever allocated (live + free).
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_unique() {
        let mut arena = HandleArena::new();
        let a = arena.allocate();
        let b = arena.allocate();
        assert_ne!(a, b);
        assert!(arena.is_current(a));
        assert!(arena.is_current(b));
    }

    #[test]
    fn recycle_bumps_generation() {
        let mut arena = HandleArena::new();
        let a = arena.allocate();
        arena.recycle(a);
        let b = arena.allocate();
        // The slot index is reused, but the generation distinguishes them.
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
        assert!(!arena.is_current(a));
        assert!(arena.is_current(b));
    }

    #[test]
    fn slot_not_reused_before_recycle() {
        let mut arena = HandleArena::new();
        let a = arena.allocate();
        let b = arena.allocate();
        assert_ne!(a.index, b.index, "no recycle happened yet");
    }

    #[test]
    fn stale_recycle_is_ignored() {
        let mut arena = HandleArena::new();
        let a = arena.allocate();
        arena.recycle(a);
        let b = arena.allocate();
        // Recycling the stale handle must not free b's slot.
        arena.recycle(a);
        assert!(arena.is_current(b));
        let c = arena.allocate();
        assert_ne!(b, c);
    }

    #[test]
    fn bits_round_trip() {
        let h = RawHandle {
            index: 7,
            generation: 3,
        };
        assert_eq!(RawHandle::from_bits(h.to_bits()), h);
    }
}
