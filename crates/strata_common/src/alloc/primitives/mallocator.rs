use std::{
    alloc::{Layout, GlobalAlloc},
    ptr::NonNull,
};

use crate::alloc::Allocator;

/// Allocator calling directly to the system allocator
///
/// Mallocator retrieves its memory from `mimalloc`, it is the default allocator of every container.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Mallocator;

static MI_MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

unsafe impl Allocator for Mallocator {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { MI_MALLOC.alloc(layout) })
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { MI_MALLOC.dealloc(ptr.as_ptr(), layout) };
    }

    fn owns(&self, _ptr: NonNull<u8>, _layout: Layout) -> bool {
        // We have no real way of knowing that we allocated this, so we'll just assume that we allocated it
        true
    }
}
