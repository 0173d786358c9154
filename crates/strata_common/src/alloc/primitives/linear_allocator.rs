use core::{cell::Cell, ptr::NonNull};
use std::alloc::{Layout, handle_alloc_error};

use strata_logging::log_error;

use crate::{
    alloc::{Allocator, LOG_CAT, primitives::Mallocator},
    precondition,
};

/// Linear/Bump allocator
///
/// An allocator that can freely allocate when there is enough space left in it, but it cannot deallocate,
/// deallocation only takes place for all allocations at once in `reset()`
pub struct LinearAllocator {
    buffer:        NonNull<u8>,
    buffer_layout: Layout,
    head:          Cell<usize>,
}

impl LinearAllocator {
    /// Alignment of the backing buffer
    pub const BUFFER_ALIGN: usize = 16;

    /// Create a new linear allocator with a backing buffer of `size` bytes
    pub fn new(size: usize) -> Self {
        precondition!(size > 0, "A linear allocator needs a non-empty buffer");

        let buffer_layout = match Layout::from_size_align(size, Self::BUFFER_ALIGN) {
            Ok(layout) => layout,
            Err(_) => panic!("Linear allocator buffer of {} bytes is too large", size),
        };
        let buffer = match unsafe { Mallocator.alloc(buffer_layout) } {
            Some(buffer) => buffer,
            None => handle_alloc_error(buffer_layout),
        };

        Self { buffer, buffer_layout, head: Cell::new(0) }
    }

    /// Reset the linear allocator to its empty state
    ///
    /// This takes `&mut self`, so no container can still be holding memory from this allocator.
    pub fn reset(&mut self) {
        self.head.set(0);
    }

    /// Number of bytes handed out since the last reset, including alignment padding
    pub fn used(&self) -> usize {
        self.head.get()
    }

    /// Size of the backing buffer
    pub fn capacity(&self) -> usize {
        self.buffer_layout.size()
    }
}

unsafe impl Allocator for LinearAllocator {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        let head = self.head.get();
        let padding = unsafe { self.buffer.as_ptr().add(head) }.align_offset(layout.align());
        let start = head.checked_add(padding)?;
        let new_head = start.checked_add(layout.size())?;

        if new_head > self.capacity() {
            None
        } else {
            self.head.set(new_head);
            NonNull::new(unsafe { self.buffer.as_ptr().add(start) })
        }
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        if !self.owns(ptr, layout) {
            log_error!(LOG_CAT, Self::dealloc, "Linear allocator asked to free {:p}, which it doesn't own", ptr);
            panic!("Cannot deallocate an allocation that isn't owned by the allocator");
        }
        // No-op, memory is only reclaimed by `reset()`
    }

    fn owns(&self, ptr: NonNull<u8>, _layout: Layout) -> bool {
        let begin = self.buffer.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= begin && addr < begin + self.capacity()
    }

    fn supports_free(&self) -> bool {
        false
    }
}

impl Drop for LinearAllocator {
    fn drop(&mut self) {
        unsafe { Mallocator.dealloc(self.buffer, self.buffer_layout) };
    }
}
