use core::{cell::Cell, ptr::NonNull};
use std::alloc::Layout;

use strata_logging::log_warning;

use crate::alloc::{Allocator, LOG_CAT};

/// Allocator that refuses any allocation that would bring the number of live bytes over a budget.
///
/// Mostly useful to drive containers into their allocation failure paths.
pub struct BudgetAllocator<A: Allocator> {
    inner:  A,
    budget: Cell<usize>,
    used:   Cell<usize>,
}

impl<A: Allocator> BudgetAllocator<A> {
    pub fn new(inner: A, budget: usize) -> Self {
        Self { inner, budget: Cell::new(budget), used: Cell::new(0) }
    }

    pub fn budget(&self) -> usize {
        self.budget.get()
    }

    /// Change the budget, live allocations are unaffected even if they exceed the new budget
    pub fn set_budget(&self, budget: usize) {
        self.budget.set(budget);
    }

    pub fn used(&self) -> usize {
        self.used.get()
    }

    pub fn remaining(&self) -> usize {
        self.budget.get().saturating_sub(self.used.get())
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

unsafe impl<A: Allocator> Allocator for BudgetAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() > self.remaining() {
            log_warning!(LOG_CAT, "Budget allocator refused {} bytes, {} of {} bytes remaining", layout.size(), self.remaining(), self.budget());
            return None;
        }

        let ptr = unsafe { self.inner.alloc(layout) }?;
        self.used.set(self.used.get() + layout.size());
        Some(ptr)
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        self.used.set(self.used.get() - layout.size());
    }

    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        self.inner.owns(ptr, layout)
    }

    fn supports_free(&self) -> bool {
        self.inner.supports_free()
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { self.inner.construct(slot, value) };
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { self.inner.destroy(slot) };
    }
}
