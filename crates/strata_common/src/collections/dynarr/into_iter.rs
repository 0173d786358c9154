use core::{fmt, iter::FusedIterator, slice};

use crate::{alloc::Allocator, collections::imp::raw_block::RawBlock};

/// An iterator that moves out of a [`DynArr`](super::DynArr).
///
/// Elements that aren't consumed are destroyed when the iterator is dropped, after which the block is released.
pub struct IntoIter<T, A: Allocator> {
    buf:   RawBlock<T, A>,
    start: usize,
    end:   usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(super) fn new(buf: RawBlock<T, A>, len: usize) -> Self {
        Self { buf, start: 0, end: len }
    }

    /// Returns the remaining items of this iterator as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.slot(self.start).as_ptr(), self.end - self.start) }
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.slot(self.start).as_ptr(), self.end - self.start) }
    }

    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let idx = self.start;
        self.start += 1;
        Some(unsafe { self.buf.slot(idx).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }

    fn count(self) -> usize {
        self.len()
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        Some(unsafe { self.buf.slot(self.end).read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: only `[start, end)` is still live
        unsafe { self.buf.destroy_slots(self.start, self.end) };
        // RawBlock handles deallocation
    }
}
