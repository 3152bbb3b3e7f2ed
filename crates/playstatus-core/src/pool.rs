//! Recycling object pool for short-lived per-event values.
//!
//! The host emits values like pending note cuts many times per second.
//! [`RecyclablePool`] keeps released instances on a free list and
//! reinitializes them in place, so the steady state performs no heap
//! allocation.
//!
//! # Ownership
//!
//! The pool owns every instance. [`acquire`](RecyclablePool::acquire)
//! hands out a [`PoolHandle`], which is not `Clone` and is consumed by
//! [`release`](RecyclablePool::release). While a handle exists its slot is
//! *live*: the pool will not reuse or reset it. Each slot carries a
//! generation so a handle that outlived
//! [`despawn_all`](RecyclablePool::despawn_all), or that belongs to another
//! pool, is recognized and ignored instead of touching a reused instance.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Source of unique pool identities, so handles cannot cross pools.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

/// A value that can live in a [`RecyclablePool`].
pub trait Recyclable {
    /// Arguments used to initialize an instance for one use.
    type Init;

    /// Construct a fresh instance.
    fn spawn(init: Self::Init) -> Self;

    /// Reinitialize a recycled instance in place.
    fn reinitialize(&mut self, init: Self::Init);

    /// Clear every externally visible reference the instance holds.
    fn reset(&mut self);
}

/// Exclusive handle to a live pooled instance.
#[derive(Debug)]
pub struct PoolHandle<T> {
    pool_id: u64,
    index: usize,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PoolHandle<T> {
    /// Storage slot this handle refers to.
    pub const fn slot(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
struct Slot<T> {
    item: T,
    generation: u32,
    live: bool,
}

/// Amortized object pool with an explicit live set.
///
/// `acquire` never fails; storage grows when the free list is empty.
#[derive(Debug)]
pub struct RecyclablePool<T: Recyclable> {
    id: u64,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T: Recyclable> RecyclablePool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a pool with storage reserved for `capacity` instances.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    /// Take an instance from the free list, or construct one, and
    /// initialize it with `init`.
    pub fn acquire(&mut self, init: T::Init) -> PoolHandle<T> {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.item.reinitialize(init);
                slot.live = true;
                self.live = self.live.saturating_add(1);
                return PoolHandle {
                    pool_id: self.id,
                    index,
                    generation: slot.generation,
                    _marker: PhantomData,
                };
            }
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            item: T::spawn(init),
            generation: 0,
            live: true,
        });
        // Keep room for every slot on the free list so release never allocates.
        self.free
            .reserve(self.slots.len().saturating_sub(self.free.len()));
        self.live = self.live.saturating_add(1);
        debug!(pool_id = self.id, capacity = self.slots.len(), "Pool grew");

        PoolHandle {
            pool_id: self.id,
            index,
            generation: 0,
            _marker: PhantomData,
        }
    }

    /// Borrow the live instance behind `handle`.
    pub fn get(&self, handle: &PoolHandle<T>) -> Option<&T> {
        if handle.pool_id != self.id {
            return None;
        }
        self.slots
            .get(handle.index)
            .filter(|slot| slot.live && slot.generation == handle.generation)
            .map(|slot| &slot.item)
    }

    /// Mutably borrow the live instance behind `handle`.
    pub fn get_mut(&mut self, handle: &PoolHandle<T>) -> Option<&mut T> {
        if handle.pool_id != self.id {
            return None;
        }
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.live && slot.generation == handle.generation)
            .map(|slot| &mut slot.item)
    }

    /// Reset the instance behind `handle` and return it to the free list.
    ///
    /// Returns `false`, and does nothing else, if the handle no longer
    /// refers to a live instance of this pool.
    pub fn release(&mut self, handle: PoolHandle<T>) -> bool {
        if handle.pool_id != self.id {
            debug!(
                pool_id = self.id,
                handle_pool_id = handle.pool_id,
                "Ignoring release of a handle from another pool"
            );
            return false;
        }
        let Some(slot) = self.slots.get_mut(handle.index) else {
            debug!(pool_id = self.id, slot = handle.index, "Ignoring release of an unknown slot");
            return false;
        };
        if !slot.live || slot.generation != handle.generation {
            debug!(pool_id = self.id, slot = handle.index, "Ignoring release of a stale handle");
            return false;
        }

        slot.item.reset();
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live = self.live.saturating_sub(1);
        true
    }

    /// Forcibly reset every live instance as if it had been released.
    ///
    /// Outstanding handles become stale. Returns how many instances were
    /// reclaimed.
    pub fn despawn_all(&mut self) -> usize {
        let mut reclaimed: usize = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.live {
                slot.item.reset();
                slot.live = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                reclaimed = reclaimed.saturating_add(1);
            }
        }
        self.live = 0;
        reclaimed
    }

    /// Number of instances currently acquired.
    pub const fn live_count(&self) -> usize {
        self.live
    }

    /// Number of instances waiting on the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total number of instances the pool has constructed.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T: Recyclable> Default for RecyclablePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recyclable> Drop for RecyclablePool<T> {
    fn drop(&mut self) {
        let reclaimed = self.despawn_all();
        if reclaimed > 0 {
            debug!(pool_id = self.id, reclaimed, "Pool dropped with live instances");
        }
    }
}
