use core::fmt;

use crate::{
    alloc::Allocator,
    collections::ReserveStrategy,
    debug_precondition, precondition,
    utils::same_object,
};

use super::DynArr;

/// A position inside a [`DynArr`], in `[0, len]`.
///
/// A cursor at `len` is the end cursor, and can't be dereferenced.
/// Cursors remember the dynamic array they came from, comparing cursors from different dynamic arrays is a contract violation.
pub struct Cursor<'a, T, A: Allocator, R: ReserveStrategy> {
    owner: &'a DynArr<T, A, R>,
    idx:   usize,
}

impl<'a, T, A: Allocator, R: ReserveStrategy> Cursor<'a, T, A, R> {
    pub(super) fn new(owner: &'a DynArr<T, A, R>, idx: usize) -> Self {
        Self { owner, idx }
    }

    /// Index of the element the cursor points at
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn is_end(&self) -> bool {
        self.idx == self.owner.len()
    }

    /// Get the element the cursor points at.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[track_caller]
    pub fn get(&self) -> &'a T {
        precondition!(!self.is_end(), "Cannot dereference an end cursor");
        let owner: &'a DynArr<T, A, R> = self.owner;
        &owner[self.idx]
    }

    /// Move the cursor to the next element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[track_caller]
    pub fn move_next(&mut self) {
        precondition!(!self.is_end(), "Cannot move a cursor past the end");
        self.idx += 1;
    }

    /// Move the cursor to the previous element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the first element.
    #[track_caller]
    pub fn move_prev(&mut self) {
        precondition!(self.idx > 0, "Cannot move a cursor before the first element");
        self.idx -= 1;
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Clone for Cursor<'_, T, A, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Copy for Cursor<'_, T, A, R> {}

impl<T, A: Allocator, R: ReserveStrategy> PartialEq for Cursor<'_, T, A, R> {
    #[track_caller]
    fn eq(&self, other: &Self) -> bool {
        debug_precondition!(same_object(self.owner, other.owner), "Comparing cursors of different dynamic arrays");
        self.idx == other.idx
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Eq for Cursor<'_, T, A, R> {}

impl<T, A: Allocator, R: ReserveStrategy> fmt::Debug for Cursor<'_, T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("idx", &self.idx).field("len", &self.owner.len()).finish()
    }
}

/// A position inside a [`DynArr`] that allows modifying the element it points at.
///
/// Only one mutable cursor can exist for a dynamic array at a time, so it can't be compared to other cursors, use [`CursorMut::is_end`] instead.
pub struct CursorMut<'a, T, A: Allocator, R: ReserveStrategy> {
    owner: &'a mut DynArr<T, A, R>,
    idx:   usize,
}

impl<'a, T, A: Allocator, R: ReserveStrategy> CursorMut<'a, T, A, R> {
    pub(super) fn new(owner: &'a mut DynArr<T, A, R>, idx: usize) -> Self {
        Self { owner, idx }
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn is_end(&self) -> bool {
        self.idx == self.owner.len()
    }

    #[track_caller]
    pub fn get(&self) -> &T {
        precondition!(!self.is_end(), "Cannot dereference an end cursor");
        &self.owner[self.idx]
    }

    #[track_caller]
    pub fn get_mut(&mut self) -> &mut T {
        precondition!(!self.is_end(), "Cannot dereference an end cursor");
        &mut self.owner[self.idx]
    }

    #[track_caller]
    pub fn move_next(&mut self) {
        precondition!(!self.is_end(), "Cannot move a cursor past the end");
        self.idx += 1;
    }

    #[track_caller]
    pub fn move_prev(&mut self) {
        precondition!(self.idx > 0, "Cannot move a cursor before the first element");
        self.idx -= 1;
    }

    /// Turn the mutable cursor into a regular cursor at the same position.
    pub fn into_cursor(self) -> Cursor<'a, T, A, R> {
        Cursor::new(self.owner, self.idx)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> fmt::Debug for CursorMut<'_, T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut").field("idx", &self.idx).field("len", &self.owner.len()).finish()
    }
}
