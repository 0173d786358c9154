use core::ptr::NonNull;
use std::alloc::Layout;

use strata_logging::log_error;

use crate::alloc::{Allocator, LOG_CAT};

/// Fallback allocator
///
/// An allocator that will first try to allocate memory using its main allocator, if that fails, the allocator will fallback on its secondary allocator
pub struct FallbackAllocator<P: Allocator, F: Allocator> {
    main:     P,
    fallback: F,
}

impl<P: Allocator, F: Allocator> FallbackAllocator<P, F> {
    /// Create a new fallback allocator
    ///
    /// `main` denotes the main allocator
    ///
    /// `fallback` denotes the secondary allocator to use when the main allocator fails to allocate the memory
    pub fn new(main: P, fallback: F) -> Self {
        Self { main, fallback }
    }

    pub fn main(&self) -> &P {
        &self.main
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

unsafe impl<P: Allocator, F: Allocator> Allocator for FallbackAllocator<P, F> {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        unsafe { self.main.alloc(layout).or_else(|| self.fallback.alloc(layout)) }
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        if self.main.owns(ptr, layout) {
            unsafe { self.main.dealloc(ptr, layout) };
        } else if self.fallback.owns(ptr, layout) {
            unsafe { self.fallback.dealloc(ptr, layout) };
        } else {
            log_error!(LOG_CAT, Self::dealloc, "Fallback allocator asked to free {:p}, which neither allocator owns", ptr);
            panic!("Cannot deallocate an allocation that isn't owned by the allocator");
        }
    }

    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        self.main.owns(ptr, layout) || self.fallback.owns(ptr, layout)
    }

    fn supports_free(&self) -> bool {
        self.main.supports_free() && self.fallback.supports_free()
    }
}
