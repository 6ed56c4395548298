//! Growable id-indexed storage with stable, never-reused ids.
//!
//! A [`SlotArena`] maps a 32-bit id directly to `slots[id]`. Ids come from an atomic
//! counter, so concurrent allocations never coordinate beyond one compare-and-swap.
//! The slot vector sits behind a read/write lock: ordinary slot writes share the read
//! side (each slot has its own mutex), and only growth takes the write side.

use crate::error::{EntityKind, GraphError, Result};
use log::{debug, trace};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

type Slot<T> = Mutex<Option<Arc<T>>>;

/// Id-indexed arena of optional entries.
pub struct SlotArena<T> {
    kind: EntityKind,
    // One past the largest id ever handed out or placed.
    next_id: AtomicU32,
    len: AtomicUsize,
    slots: RwLock<Vec<Slot<T>>>,
}

impl<T> SlotArena<T> {
    /// Create an empty arena with `capacity` pre-allocated slots.
    pub fn new(kind: EntityKind, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Mutex::new(None));
        Self {
            kind,
            next_id: AtomicU32::new(0),
            len: AtomicUsize::new(0),
            slots: RwLock::new(slots),
        }
    }

    /// Insert an entry under the next id.
    ///
    /// `build` receives the assigned id so entries can record their own id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IdSpaceExhausted`] when the counter cannot advance and
    /// [`GraphError::OutOfMemory`] when growth fails.
    pub fn add_with(&self, build: impl FnOnce(u32) -> T) -> Result<u32> {
        let id = self.allocate_id()?;
        self.place(id, build(id))?;
        Ok(id)
    }

    /// Insert an entry under the next id.
    pub fn add(&self, value: T) -> Result<u32> {
        self.add_with(|_| value)
    }

    /// Insert an entry under an explicit id.
    ///
    /// The id counter is raised past `id`, so later automatic ids never land on it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SlotOccupied`] if `slots[id]` already holds an entry, and
    /// [`GraphError::IdSpaceExhausted`] for `u32::MAX`, which the counter cannot move past.
    pub fn add_at(&self, id: u32, value: T) -> Result<()> {
        let past = id
            .checked_add(1)
            .ok_or(GraphError::IdSpaceExhausted { kind: self.kind })?;
        self.next_id.fetch_max(past, Ordering::AcqRel);
        self.place(id, value)
    }

    /// Look up the entry at `id`.
    pub fn get(&self, id: u32) -> Option<Arc<T>> {
        if id >= self.high_water() {
            return None;
        }
        let slots = self.slots.read();
        let entry = slots.get(id as usize)?.lock().clone();
        entry
    }

    /// Whether `slots[id]` holds an entry.
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Empty `slots[id]` and return what it held. The id stays retired.
    pub fn remove(&self, id: u32) -> Option<Arc<T>> {
        let slots = self.slots.read();
        let removed = slots.get(id as usize)?.lock().take()?;
        self.len.fetch_sub(1, Ordering::AcqRel);
        trace!("Removed {} {id}", self.kind);
        Some(removed)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the largest id ever assigned.
    pub fn high_water(&self) -> u32 {
        self.next_id.load(Ordering::Acquire)
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.slots.read().len()
    }

    /// Lazily walk occupied slots in id order, skipping holes.
    ///
    /// The walk stops at the high-water mark observed when it was created.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: self,
            next: 0,
            end: self.high_water(),
        }
    }

    /// Consume the arena, yielding every live entry in id order.
    pub fn into_entries(self) -> impl Iterator<Item = Arc<T>> {
        self.slots
            .into_inner()
            .into_iter()
            .filter_map(|slot| slot.into_inner())
    }

    fn allocate_id(&self) -> Result<u32> {
        self.next_id
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |id| id.checked_add(1))
            .map_err(|_| GraphError::IdSpaceExhausted { kind: self.kind })
    }

    fn place(&self, id: u32, value: T) -> Result<()> {
        self.ensure_capacity(id)?;

        let slots = self.slots.read();
        // Storage never shrinks, so the slot is still there after ensure_capacity.
        let slot = slots.get(id as usize).ok_or(GraphError::OutOfMemory {
            requested: id as usize + 1,
        })?;
        let mut slot = slot.lock();
        if slot.is_some() {
            return Err(GraphError::SlotOccupied {
                kind: self.kind,
                id,
            });
        }
        *slot = Some(Arc::new(value));
        self.len.fetch_add(1, Ordering::AcqRel);
        trace!("Placed {} {id}", self.kind);
        Ok(())
    }

    fn ensure_capacity(&self, id: u32) -> Result<()> {
        let index = id as usize;
        if index < self.slots.read().len() {
            return Ok(());
        }

        let mut slots = self.slots.write();
        // Another writer may have grown the arena while we waited for the lock.
        if index < slots.len() {
            return Ok(());
        }

        let old_capacity = slots.len();
        let mut new_capacity = old_capacity.max(1);
        while new_capacity <= index {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(GraphError::OutOfMemory {
                    requested: usize::MAX,
                })?;
        }

        slots
            .try_reserve_exact(new_capacity - old_capacity)
            .map_err(|_| GraphError::OutOfMemory {
                requested: new_capacity,
            })?;
        slots.resize_with(new_capacity, || Mutex::new(None));
        debug!(
            "Grew {} arena from {old_capacity} to {new_capacity} slots",
            self.kind
        );
        Ok(())
    }
}

impl<T> std::fmt::Debug for SlotArena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotArena")
            .field("kind", &self.kind)
            .field("len", &self.len())
            .field("high_water", &self.high_water())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Iterator over the live entries of a [`SlotArena`].
pub struct Iter<'a, T> {
    arena: &'a SlotArena<T>,
    next: u32,
    end: u32,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = Arc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let id = self.next;
            self.next += 1;
            if let Some(entry) = self.arena.get(id) {
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.end - self.next) as usize))
    }
}
