use core::{mem::{align_of, size_of}, ptr::{self, NonNull}};
use std::alloc::Layout;

use scopeguard::guard;
use strata_logging::{log_debug, log_verbose};

use crate::{
    alloc::Allocator,
    collections::{TryReserveError, LOG_CAT},
    precondition,
};

/// Owning handle to a raw block of `capacity` slots of `T`, allocated from `A`.
///
/// - Produces no allocation for zero-sized types or a capacity of 0.
/// - Catches all overflows in capacity computations (promotes them to "capacity overflow" errors).
/// - Releases its block when dropped, on every exit path.
///
/// This type does not in any way inspect the memory it manages. When dropped it *will* free its memory, but it *won't* try to drop its contents.
/// It is up to the user of `RawBlock` to handle the things *stored* inside of it.
///
/// Note that the capacity of a zero-sized type is always infinite, so `capacity()` always returns `usize::MAX`.
pub(crate) struct RawBlock<T, A: Allocator> {
    ptr:   Option<NonNull<T>>,
    cap:   usize,
    alloc: A,
}

impl<T, A: Allocator> RawBlock<T, A> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Create an empty block without allocating.
    pub const fn new_in(alloc: A) -> Self {
        Self { ptr: None, cap: 0, alloc }
    }

    /// Create a block with exactly `capacity` slots.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        let mut block = Self::new_in(alloc);
        block.try_relocate(capacity, 0)?;
        Ok(block)
    }

    /// Get the capacity of the block.
    ///
    /// This will always be `usize::MAX` if `T` is zero-sized.
    pub fn capacity(&self) -> usize {
        if Self::IS_ZST { usize::MAX } else { self.cap }
    }

    /// Pointer to the first slot, dangling when nothing is allocated.
    pub fn ptr(&self) -> NonNull<T> {
        self.ptr.unwrap_or(NonNull::dangling())
    }

    /// Pointer to slot `idx`.
    ///
    /// # Safety
    ///
    /// `idx` must be at most the capacity of the block.
    pub unsafe fn slot(&self, idx: usize) -> NonNull<T> {
        unsafe { self.ptr().add(idx) }
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    /// Move the first `len` slots into a freshly allocated block of `new_cap` slots and release the old block.
    ///
    /// On error, nothing was changed.
    ///
    /// Slots `[0, len)` must be the only live slots, they are moved bitwise, so the old slots are left logically uninitialized.
    pub fn try_relocate(&mut self, new_cap: usize, len: usize) -> Result<(), TryReserveError> {
        precondition!(len <= new_cap, "Cannot relocate {} elements into a block of {} slots", len, new_cap);

        // A zero-sized block already has every capacity it could ever need
        if Self::IS_ZST {
            return Ok(());
        }
        if new_cap == 0 {
            self.release();
            return Ok(());
        }

        let layout = Layout::array::<T>(new_cap).map_err(|_| TryReserveError::CapacityOverflow)?;
        let new_ptr = match unsafe { self.alloc.alloc(layout) } {
            Some(ptr) => ptr.cast::<T>(),
            None => return Err(TryReserveError::AllocError { layout }),
        };

        if let Some(old_ptr) = self.ptr {
            // SAFETY: both blocks hold at least `len` slots and are distinct allocations
            unsafe { ptr::copy_nonoverlapping(old_ptr.as_ptr(), new_ptr.as_ptr(), len) };
            log_debug!(LOG_CAT, Self::try_relocate, "Relocated {} elements from a block of {} to {} slots", len, self.cap, new_cap);
        }

        self.release();
        self.ptr = Some(new_ptr);
        self.cap = new_cap;
        Ok(())
    }

    /// Destroy the live elements in slots `[from, to)` through the allocator.
    ///
    /// If a destructor panics, the remaining slots are still destroyed.
    ///
    /// # Safety
    ///
    /// Slots `[from, to)` must be live, they are uninitialized afterwards.
    pub unsafe fn destroy_slots(&self, from: usize, to: usize) {
        let mut next = guard(from, |next| {
            for idx in next..to {
                unsafe { self.alloc.destroy(self.slot(idx)) };
            }
        });
        while *next < to {
            let idx = *next;
            *next += 1;
            unsafe { self.alloc.destroy(self.slot(idx)) };
        }
    }

    /// Release the block, any elements still in it are forgotten.
    pub fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: `ptr` was allocated by `self.alloc` with exactly this layout
            unsafe {
                let layout = Layout::from_size_align_unchecked(self.cap * size_of::<T>(), align_of::<T>());
                self.alloc.dealloc(ptr.cast(), layout);
            }
            log_verbose!(LOG_CAT, "Released a block of {} slots", self.cap);
        }
        self.cap = 0;
    }
}

impl<T, A: Allocator> Drop for RawBlock<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

unsafe impl<T: Send, A: Allocator + Send> Send for RawBlock<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBlock<T, A> {}
