use core::ptr::{self, NonNull};
use std::alloc::Layout;

use strata_logging::LogCategory;

pub(crate) const LOG_CAT : LogCategory = LogCategory::new("Alloc");

/// Allocator/Arena that can provide access to heap memory for the program
///
/// Besides acquiring and releasing raw memory, an allocator decides how elements are constructed into and destroyed
/// in memory it handed out. Containers never write or drop elements in their storage directly, they go through
/// [`Allocator::construct`] and [`Allocator::destroy`].
///
/// # Safety
///
/// Implementors must guarantee that a successful `alloc` returns memory that is valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and that stays valid until it is passed to `dealloc`
/// (or, for allocators that don't support freeing, until the allocator is reset through `&mut self` or dropped).
pub unsafe trait Allocator {
    /// Allocate memory from an allocator/arena
    ///
    /// # Return
    ///
    /// If no memory could be allocated, `None` should be returned.
    ///
    /// # Safety
    ///
    /// `layout` must have a non-zero size.
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Deallocate an allocation
    ///
    /// # Panics
    ///
    /// Deallocation may panic, since an incorrect deallocation should not happen
    ///
    /// # Safety
    ///
    /// `ptr` needs to be allocated by this allocator with the same `layout`.
    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout);

    /// Check if the allocator owns the allocation
    ///
    /// This function is mainly meant for sub-allocators
    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool;

    /// Does the allocator support freeing of memory, if not, it means freeing of memory will only happen when the full allocator has been reset
    ///
    /// Default implementation assumes the allocator can free
    fn supports_free(&self) -> bool { true }

    /// Construct `value` in place at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and must not hold a live value.
    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) where
        Self: Sized
    {
        unsafe { slot.as_ptr().write(value) };
    }

    /// Destroy the live value at `slot`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value, which may not be used after this call.
    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) where
        Self: Sized
    {
        unsafe { ptr::drop_in_place(slot.as_ptr()) };
    }
}

unsafe impl<A: Allocator> Allocator for &A {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        unsafe { (**self).alloc(layout) }
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).dealloc(ptr, layout) }
    }

    #[inline]
    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        (**self).owns(ptr, layout)
    }

    #[inline]
    fn supports_free(&self) -> bool {
        (**self).supports_free()
    }

    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { (**self).construct(slot, value) }
    }

    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { (**self).destroy(slot) }
    }
}
