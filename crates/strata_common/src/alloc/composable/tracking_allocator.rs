use core::{cell::Cell, fmt, ptr::NonNull};
use std::alloc::Layout;

use crate::alloc::Allocator;

/// Snapshot of the counters of a [`TrackingAllocator`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct AllocStats {
    /// Number of successful allocations
    pub allocs:     usize,
    /// Number of deallocations
    pub deallocs:   usize,
    /// Number of allocations that returned `None`
    pub failures:   usize,
    /// Bytes currently handed out
    pub live_bytes: usize,
    /// Highest value `live_bytes` has reached
    pub peak_bytes: usize,
    /// Number of values constructed through the allocator
    pub constructs: usize,
    /// Number of values destroyed through the allocator
    pub destroys:   usize,
}

impl AllocStats {
    /// Number of allocations that haven't been freed yet
    pub fn live_allocs(&self) -> usize {
        self.allocs - self.deallocs
    }

    /// Number of constructed values that haven't been destroyed yet
    pub fn live_values(&self) -> usize {
        self.constructs - self.destroys
    }
}

impl fmt::Display for AllocStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocs: {}, deallocs: {}, failures: {}, live: {} B, peak: {} B, constructs: {}, destroys: {}",
            self.allocs, self.deallocs, self.failures, self.live_bytes, self.peak_bytes, self.constructs, self.destroys)
    }
}

/// Allocator that wraps another allocator and keeps count of everything going through it.
pub struct TrackingAllocator<A: Allocator> {
    inner: A,
    stats: Cell<AllocStats>,
}

impl<A: Allocator> TrackingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self { inner, stats: Cell::new(AllocStats::default()) }
    }

    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    /// Reset all counters, returning the old ones
    pub fn reset_stats(&self) -> AllocStats {
        self.stats.replace(AllocStats::default())
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    fn update(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl<A: Allocator + Default> Default for TrackingAllocator<A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

unsafe impl<A: Allocator> Allocator for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = unsafe { self.inner.alloc(layout) };
        self.update(|stats| match ptr {
            Some(_) => {
                stats.allocs += 1;
                stats.live_bytes += layout.size();
                stats.peak_bytes = stats.peak_bytes.max(stats.live_bytes);
            },
            None => stats.failures += 1,
        });
        ptr
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        self.update(|stats| {
            stats.deallocs += 1;
            stats.live_bytes -= layout.size();
        });
    }

    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        self.inner.owns(ptr, layout)
    }

    fn supports_free(&self) -> bool {
        self.inner.supports_free()
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { self.inner.construct(slot, value) };
        self.update(|stats| stats.constructs += 1);
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // A panicking destructor still retires the slot
        self.update(|stats| stats.destroys += 1);
        unsafe { self.inner.destroy(slot) };
    }
}
