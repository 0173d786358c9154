use core::{cell::Cell, ptr::NonNull};
use std::alloc::{Layout, handle_alloc_error};

use strata_logging::{log_error, log_warning};

use crate::{
    alloc::{Allocator, LOG_CAT, primitives::Mallocator},
    precondition,
};

/// Stack allocator
///
/// A bump allocator that can only free its allocations in the reverse order they were made in.
/// Every allocation is padded up to `max_align`, so the allocator can verify the deallocation order without storing any metadata.
pub struct StackAllocator {
    max_align:     usize,
    buffer:        NonNull<u8>,
    buffer_layout: Layout,
    head:          Cell<usize>,
}

impl StackAllocator {
    /// Create a new stack allocator with a backing buffer of `size` bytes and a maximum alignment for allocations
    pub fn new(size: usize, max_align: usize) -> Self {
        precondition!(size > 0, "A stack allocator needs a non-empty buffer");
        precondition!(max_align.is_power_of_two(), "Maximum alignment needs to be a power of 2, found {}", max_align);

        let buffer_layout = match Layout::from_size_align(size, max_align) {
            Ok(layout) => layout,
            Err(_) => panic!("Stack allocator buffer of {} bytes is too large", size),
        };
        let buffer = match unsafe { Mallocator.alloc(buffer_layout) } {
            Some(buffer) => buffer,
            None => handle_alloc_error(buffer_layout),
        };

        Self { max_align, buffer, buffer_layout, head: Cell::new(0) }
    }

    /// Reset the stack allocator to its empty state
    pub fn reset(&mut self) {
        self.head.set(0);
    }

    /// Number of bytes currently in use
    pub fn used(&self) -> usize {
        self.head.get()
    }

    /// Size of the backing buffer
    pub fn capacity(&self) -> usize {
        self.buffer_layout.size()
    }

    fn padded_size(&self, layout: Layout) -> Option<usize> {
        let mask = self.max_align - 1;
        layout.size().checked_add(mask).map(|size| size & !mask)
    }
}

unsafe impl Allocator for StackAllocator {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.align() > self.max_align {
            log_warning!(LOG_CAT, "Stack allocator can't satisfy an alignment of {} (max {})", layout.align(), self.max_align);
            return None;
        }

        let start = self.head.get();
        let new_head = start.checked_add(self.padded_size(layout)?)?;
        if new_head > self.capacity() {
            None
        } else {
            self.head.set(new_head);
            NonNull::new(unsafe { self.buffer.as_ptr().add(start) })
        }
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        if !self.owns(ptr, layout) {
            log_error!(LOG_CAT, Self::dealloc, "Stack allocator asked to free {:p}, which it doesn't own", ptr);
            panic!("Cannot deallocate an allocation that isn't owned by the allocator");
        }

        let offset = ptr.as_ptr() as usize - self.buffer.as_ptr() as usize;
        let expected_head = self.padded_size(layout).and_then(|size| offset.checked_add(size));
        if expected_head != Some(self.head.get()) {
            log_error!(LOG_CAT, Self::dealloc, "Stack allocator freed out of order: allocation at offset {}, head at {}", offset, self.head.get());
            panic!("Invalid deallocation order");
        }

        self.head.set(offset);
    }

    fn owns(&self, ptr: NonNull<u8>, _layout: Layout) -> bool {
        let begin = self.buffer.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= begin && addr < begin + self.capacity()
    }
}

impl Drop for StackAllocator {
    fn drop(&mut self) {
        unsafe { Mallocator.dealloc(self.buffer, self.buffer_layout) };
    }
}
