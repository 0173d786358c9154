use core::{
    fmt,
    iter::FusedIterator,
    marker::PhantomData,
    ptr::NonNull,
};
use std::alloc::Layout;

use scopeguard::guard;

use crate::{
    alloc::{Allocator, primitives::Mallocator},
    precondition,
    utils::precondition_failed,
};

use super::{handle_reserve_error, PushError, Sequence, TryReserveError};

/// A doubly linked list.
///
/// Pushing and popping at either end take *O*(1) time, removing at an index walks from whichever end is closer.
pub struct DoubleLinkedList<T, A: Allocator = Mallocator> {
    head:     Option<NonNull<Node<T>>>,
    tail:     Option<NonNull<Node<T>>>,
    len:      usize,
    alloc:    A,
    _phantom: PhantomData<Box<Node<T>>>,
}

struct Node<T> {
    prev: Option<NonNull<Node<T>>>,
    next: Option<NonNull<Node<T>>>,
    elem: T,
}

impl<T> DoubleLinkedList<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Mallocator)
    }
}

impl<T, A: Allocator> DoubleLinkedList<T, A> {
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self { head: None, tail: None, len: 0, alloc, _phantom: PhantomData }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    fn alloc_node(&self, elem: T) -> Result<NonNull<Node<T>>, PushError<T>> {
        let layout = Layout::new::<Node<T>>();
        match unsafe { self.alloc.alloc(layout) } {
            Some(ptr) => {
                let node = ptr.cast::<Node<T>>();
                unsafe { self.alloc.construct(node, Node { prev: None, next: None, elem }) };
                Ok(node)
            },
            None => Err(PushError { value: elem, error: TryReserveError::AllocError { layout } }),
        }
    }

    unsafe fn take_node(&self, node: NonNull<Node<T>>) -> T {
        let elem = unsafe { node.as_ptr().read().elem };
        unsafe { self.alloc.dealloc(node.cast(), Layout::new::<Node<T>>()) };
        elem
    }

    unsafe fn free_node(alloc: &A, node: NonNull<Node<T>>) {
        unsafe {
            alloc.destroy(node);
            alloc.dealloc(node.cast(), Layout::new::<Node<T>>());
        }
    }

    /// Unlink `node` from the list, fixing up its neighbours.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) {
        let (prev, next) = unsafe { (node.as_ref().prev, node.as_ref().next) };
        match prev {
            Some(mut prev) => unsafe { prev.as_mut().next = next },
            None => self.head = next,
        }
        match next {
            Some(mut next) => unsafe { next.as_mut().prev = prev },
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    /// Adds an element to the front of the list.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[track_caller]
    pub fn push_front(&mut self, elem: T) {
        if let Err(err) = self.try_push_front(elem) {
            handle_reserve_error(err.error);
        }
    }

    pub fn try_push_front(&mut self, elem: T) -> Result<(), PushError<T>> {
        let mut node = self.alloc_node(elem)?;
        unsafe { node.as_mut().next = self.head };
        match self.head {
            Some(mut head) => unsafe { head.as_mut().prev = Some(node) },
            None => self.tail = Some(node),
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Adds an element to the back of the list.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[track_caller]
    pub fn push_back(&mut self, elem: T) {
        if let Err(err) = self.try_push_back(elem) {
            handle_reserve_error(err.error);
        }
    }

    pub fn try_push_back(&mut self, elem: T) -> Result<(), PushError<T>> {
        let mut node = self.alloc_node(elem)?;
        unsafe { node.as_mut().prev = self.tail };
        match self.tail {
            Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    pub fn try_pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        unsafe {
            self.unlink(head);
            Some(self.take_node(head))
        }
    }

    /// # Panics
    ///
    /// Panics if the list is empty.
    #[track_caller]
    pub fn pop_front(&mut self) -> T {
        match self.try_pop_front() {
            Some(elem) => elem,
            None => precondition_failed(format_args!("pop_front called on an empty linked list")),
        }
    }

    pub fn try_pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        unsafe {
            self.unlink(tail);
            Some(self.take_node(tail))
        }
    }

    /// # Panics
    ///
    /// Panics if the list is empty.
    #[track_caller]
    pub fn pop_back(&mut self) -> T {
        match self.try_pop_back() {
            Some(elem) => elem,
            None => precondition_failed(format_args!("pop_back called on an empty linked list")),
        }
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        precondition!(index < self.len, "Cannot remove index {} from a linked list of length {}", index, self.len);
        unsafe {
            let node = self.node_at(index);
            self.unlink(node);
            self.take_node(node)
        }
    }

    /// Walk to the node at `index`, starting from the closest end.
    ///
    /// # Safety
    ///
    /// `index < len`
    unsafe fn node_at(&self, index: usize) -> NonNull<Node<T>> {
        let node = if index <= self.len / 2 {
            let mut node = self.head;
            for _ in 0..index {
                node = node.and_then(|node| unsafe { node.as_ref().next });
            }
            node
        } else {
            let mut node = self.tail;
            for _ in index + 1..self.len {
                node = node.and_then(|node| unsafe { node.as_ref().prev });
            }
            node
        };
        match node {
            Some(node) => node,
            None => precondition_failed(format_args!("index {} out of bounds for a linked list of length {}", index, self.len)),
        }
    }

    /// Destroys all elements and frees all nodes.
    pub fn clear(&mut self) {
        let head = self.head.take();
        self.tail = None;
        self.len = 0;

        let alloc = &self.alloc;
        let mut cur = guard(head, |mut cur| {
            while let Some(node) = cur {
                unsafe {
                    cur = node.as_ref().next;
                    Self::free_node(alloc, node);
                }
            }
        });
        while let Some(node) = *cur {
            unsafe {
                *cur = node.as_ref().next;
                Self::free_node(alloc, node);
            }
        }
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| unsafe { &(*node.as_ptr()).elem })
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).elem })
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|node| unsafe { &(*node.as_ptr()).elem })
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.tail.map(|node| unsafe { &mut (*node.as_ptr()).elem })
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { head: self.head, tail: self.tail, len: self.len, _phantom: PhantomData }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut { head: self.head, tail: self.tail, len: self.len, _phantom: PhantomData }
    }
}

impl<T, A: Allocator> Drop for DoubleLinkedList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

unsafe impl<T: Send, A: Allocator + Send> Send for DoubleLinkedList<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for DoubleLinkedList<T, A> {}

impl<T, A: Allocator + Default> Default for DoubleLinkedList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for DoubleLinkedList<T, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DoubleLinkedList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T: PartialEq, A0: Allocator, A1: Allocator> PartialEq<DoubleLinkedList<T, A1>> for DoubleLinkedList<T, A0> {
    fn eq(&self, other: &DoubleLinkedList<T, A1>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for DoubleLinkedList<T, A> {}

impl<T, const N: usize> From<[T; N]> for DoubleLinkedList<T> {
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<T, A: Allocator + Default> FromIterator<T> for DoubleLinkedList<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T, A: Allocator> Extend<T> for DoubleLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|elem| self.push_back(elem));
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for DoubleLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|elem| self.push_back(*elem));
    }
}

impl<T, A: Allocator> Sequence<T> for DoubleLinkedList<T, A> {
    fn push_front(&mut self, value: T) {
        DoubleLinkedList::push_front(self, value)
    }

    fn push_back(&mut self, value: T) {
        DoubleLinkedList::push_back(self, value)
    }

    fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        DoubleLinkedList::try_push_front(self, value)
    }

    fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        DoubleLinkedList::try_push_back(self, value)
    }

    fn try_pop_front(&mut self) -> Option<T> {
        DoubleLinkedList::try_pop_front(self)
    }

    fn try_pop_back(&mut self) -> Option<T> {
        DoubleLinkedList::try_pop_back(self)
    }

    fn front(&self) -> Option<&T> {
        DoubleLinkedList::front(self)
    }

    fn back(&self) -> Option<&T> {
        DoubleLinkedList::back(self)
    }

    fn front_mut(&mut self) -> Option<&mut T> {
        DoubleLinkedList::front_mut(self)
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        DoubleLinkedList::back_mut(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        DoubleLinkedList::clear(self)
    }
}

//--------------------------------------------------------------

pub struct Iter<'a, T: 'a> {
    head:     Option<NonNull<Node<T>>>,
    tail:     Option<NonNull<Node<T>>>,
    len:      usize,
    _phantom: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.head = node.next;
            self.len -= 1;
            &node.elem
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.tail = node.prev;
            self.len -= 1;
            &node.elem
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { head: self.head, tail: self.tail, len: self.len, _phantom: PhantomData }
    }
}

pub struct IterMut<'a, T: 'a> {
    head:     Option<NonNull<Node<T>>>,
    tail:     Option<NonNull<Node<T>>>,
    len:      usize,
    _phantom: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.head = node.next;
            self.len -= 1;
            &mut node.elem
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.tail = node.prev;
            self.len -= 1;
            &mut node.elem
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// An owning iterator over the elements of a [`DoubleLinkedList`].
pub struct IntoIter<T, A: Allocator> {
    list: DoubleLinkedList<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.try_pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.try_pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T, A: Allocator> IntoIterator for DoubleLinkedList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DoubleLinkedList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DoubleLinkedList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        alloc::{primitives::*, composable::*},
        collections::test_utils::DropCounter,
    };

    #[test]
    fn push_and_pop() {
        let mut list = DoubleLinkedList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        assert_eq!(list.len(), 3);

        assert_eq!(list.pop_back(), 3);
        assert_eq!(list.pop_front(), 1);
        assert_eq!(list.front(), list.back());
        assert_eq!(list.pop_back(), 2);
        assert!(list.is_empty());
        assert_eq!(list.try_pop_back(), None);
        assert_eq!(list.try_pop_front(), None);
    }

    #[test]
    #[should_panic(expected = "empty linked list")]
    fn pop_back_empty() {
        let mut list = DoubleLinkedList::<i32>::new();
        list.pop_back();
    }

    #[test]
    fn remove_from_both_halves() {
        let mut list: DoubleLinkedList<_> = (0..10).collect();
        assert_eq!(list.remove(8), 8);
        assert_eq!(list.remove(1), 1);
        assert_eq!(list.remove(7), 9);
        assert_eq!(list.remove(0), 0);
        assert_eq!(list.back(), Some(&7));
        assert_eq!(list.front(), Some(&2));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2, 3, 4, 5, 6, 7]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [7, 6, 5, 4, 3, 2]);
    }

    #[test]
    #[should_panic(expected = "Cannot remove index 2")]
    fn remove_out_of_bounds() {
        let mut list = DoubleLinkedList::from([0, 1]);
        list.remove(2);
    }

    #[test]
    fn double_ended_iteration() {
        let mut list = DoubleLinkedList::from([1, 2, 3, 4]);

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        for elem in list.iter_mut().rev() {
            *elem *= 2;
        }
        let mut into_iter = list.into_iter();
        assert_eq!(into_iter.next_back(), Some(8));
        assert_eq!(into_iter.collect::<Vec<_>>(), [2, 4, 6]);
    }

    #[test]
    fn clone_and_eq() {
        let list = DoubleLinkedList::from([1, 2, 3]);
        let copy = list.clone();
        assert_eq!(list, copy);
        assert_eq!(format!("{copy:?}"), "[1, 2, 3]");

        let other = DoubleLinkedList::from([1, 2]);
        assert_ne!(list, other);
    }

    #[test]
    fn no_leaks() {
        let alloc = TrackingAllocator::new(Mallocator);
        let drops = Rc::new(Cell::new(0));
        {
            let mut list = DoubleLinkedList::new_in(&alloc);
            for i in 0..8 {
                list.push_front(DropCounter::new(&drops, i));
            }
            list.remove(5);
            drop(list.pop_back());
            assert_eq!(drops.get(), 2);

            list.clear();
            assert_eq!(drops.get(), 8);
            assert_eq!(alloc.stats().live_allocs(), 0);

            list.push_back(DropCounter::new(&drops, 8));
        }

        let stats = alloc.stats();
        assert_eq!(stats.live_allocs(), 0);
        assert_eq!(stats.constructs, 9);
        assert_eq!(drops.get(), 9);
    }

    #[test]
    fn allocation_failure() {
        let alloc = BudgetAllocator::new(Mallocator, 0);
        let mut list = DoubleLinkedList::new_in(&alloc);
        let err = list.try_push_front("value").unwrap_err();
        assert_eq!(err.into_inner(), "value");
        assert!(list.is_empty());
    }
}
