use core::{
    fmt,
    iter::FusedIterator,
    marker::PhantomData,
    ptr::NonNull,
};
use std::alloc::Layout;

use scopeguard::guard;
use static_assertions::assert_eq_size;

use crate::{
    alloc::{Allocator, primitives::Mallocator},
    precondition,
    utils::precondition_failed,
};

use super::{handle_reserve_error, PushError, Sequence, TryReserveError};

/// A singly linked list with a tail pointer.
///
/// Pushing at either end and popping at the front take *O*(1) time, popping at the back takes *O*(n) time.
/// Every node is allocated from `A` and constructed through its [`construct`](Allocator::construct) hook.
pub struct SingleLinkedList<T, A: Allocator = Mallocator> {
    head:     Option<NonNull<Node<T>>>,
    tail:     Option<NonNull<Node<T>>>,
    len:      usize,
    alloc:    A,
    _phantom: PhantomData<Box<Node<T>>>,
}

struct Node<T> {
    next: Option<NonNull<Node<T>>>,
    elem: T,
}

assert_eq_size!(Option<NonNull<Node<u8>>>, *const u8);

impl<T> SingleLinkedList<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Mallocator)
    }
}

impl<T, A: Allocator> SingleLinkedList<T, A> {
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
                unsafe { self.alloc.construct(node, Node { next: None, elem }) };
                Ok(node)
            },
            None => Err(PushError { value: elem, error: TryReserveError::AllocError { layout } }),
        }
    }

    /// Move the element out of an unlinked node and free the node
    unsafe fn take_node(&self, node: NonNull<Node<T>>) -> T {
        let elem = unsafe { node.as_ptr().read().elem };
        unsafe { self.alloc.dealloc(node.cast(), Layout::new::<Node<T>>()) };
        elem
    }

    /// Destroy the element of an unlinked node and free the node
    unsafe fn free_node(alloc: &A, node: NonNull<Node<T>>) {
        unsafe {
            alloc.destroy(node);
            alloc.dealloc(node.cast(), Layout::new::<Node<T>>());
        }
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

    /// Tries to add an element to the front of the list, handing it back if no node could be allocated.
    pub fn try_push_front(&mut self, elem: T) -> Result<(), PushError<T>> {
        let mut node = self.alloc_node(elem)?;
        unsafe { node.as_mut().next = self.head };
        if self.tail.is_none() {
            self.tail = Some(node);
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

    /// Tries to add an element to the back of the list, handing it back if no node could be allocated.
    pub fn try_push_back(&mut self, elem: T) -> Result<(), PushError<T>> {
        let node = self.alloc_node(elem)?;
        match self.tail {
            Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Removes the first element and returns it, or `None` if the list is empty.
    pub fn try_pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        unsafe {
            self.head = head.as_ref().next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.len -= 1;
            Some(self.take_node(head))
        }
    }

    /// Removes the first element and returns it.
    ///
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

    /// Removes the last element and returns it, or `None` if the list is empty.
    ///
    /// This takes *O*(n) time, as the node before the tail has to be found.
    pub fn try_pop_back(&mut self) -> Option<T> {
        match self.len {
            0 => None,
            1 => self.try_pop_front(),
            len => unsafe {
                let mut before = self.node_at(len - 2);
                let tail = before.as_ref().next?;
                before.as_mut().next = None;
                self.tail = Some(before);
                self.len -= 1;
                Some(self.take_node(tail))
            },
        }
    }

    /// Removes the last element and returns it.
    ///
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
        if index == 0 {
            return self.pop_front();
        }

        unsafe {
            let mut before = self.node_at(index - 1);
            // SAFETY: `index < len`, so `before` has a successor
            let node = before.as_ref().next.unwrap_unchecked();
            before.as_mut().next = node.as_ref().next;
            if self.tail == Some(node) {
                self.tail = Some(before);
            }
            self.len -= 1;
            self.take_node(node)
        }
    }

    /// # Safety
    ///
    /// `index < len`
    unsafe fn node_at(&self, index: usize) -> NonNull<Node<T>> {
        let mut node = self.head;
        for _ in 0..index {
            node = node.and_then(|node| unsafe { node.as_ref().next });
        }
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
        // Keep freeing the remaining nodes if a destructor panics
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
        Iter { next: self.head, len: self.len, _phantom: PhantomData }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut { next: self.head, len: self.len, _phantom: PhantomData }
    }
}

impl<T, A: Allocator> Drop for SingleLinkedList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

unsafe impl<T: Send, A: Allocator + Send> Send for SingleLinkedList<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for SingleLinkedList<T, A> {}

impl<T, A: Allocator + Default> Default for SingleLinkedList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for SingleLinkedList<T, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for SingleLinkedList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T: PartialEq, A0: Allocator, A1: Allocator> PartialEq<SingleLinkedList<T, A1>> for SingleLinkedList<T, A0> {
    fn eq(&self, other: &SingleLinkedList<T, A1>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for SingleLinkedList<T, A> {}

impl<T, const N: usize> From<[T; N]> for SingleLinkedList<T> {
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<T, A: Allocator + Default> FromIterator<T> for SingleLinkedList<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T, A: Allocator> Extend<T> for SingleLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|elem| self.push_back(elem));
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for SingleLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|elem| self.push_back(*elem));
    }
}

impl<T, A: Allocator> Sequence<T> for SingleLinkedList<T, A> {
    fn push_front(&mut self, value: T) {
        SingleLinkedList::push_front(self, value)
    }

    fn push_back(&mut self, value: T) {
        SingleLinkedList::push_back(self, value)
    }

    fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        SingleLinkedList::try_push_front(self, value)
    }

    fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        SingleLinkedList::try_push_back(self, value)
    }

    fn try_pop_front(&mut self) -> Option<T> {
        SingleLinkedList::try_pop_front(self)
    }

    fn try_pop_back(&mut self) -> Option<T> {
        SingleLinkedList::try_pop_back(self)
    }

    fn front(&self) -> Option<&T> {
        SingleLinkedList::front(self)
    }

    fn back(&self) -> Option<&T> {
        SingleLinkedList::back(self)
    }

    fn front_mut(&mut self) -> Option<&mut T> {
        SingleLinkedList::front_mut(self)
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        SingleLinkedList::back_mut(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        SingleLinkedList::clear(self)
    }
}

//--------------------------------------------------------------

pub struct Iter<'a, T: 'a> {
    next:     Option<NonNull<Node<T>>>,
    len:      usize,
    _phantom: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.next = node.next;
            self.len -= 1;
            &node.elem
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { next: self.next, len: self.len, _phantom: PhantomData }
    }
}

pub struct IterMut<'a, T: 'a> {
    next:     Option<NonNull<Node<T>>>,
    len:      usize,
    _phantom: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.next.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.next = node.next;
            self.len -= 1;
            &mut node.elem
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// An owning iterator over the elements of a [`SingleLinkedList`].
pub struct IntoIter<T, A: Allocator> {
    list: SingleLinkedList<T, A>,
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

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T, A: Allocator> IntoIterator for SingleLinkedList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a SingleLinkedList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut SingleLinkedList<T, A> {
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
        let mut list = SingleLinkedList::new();
        assert!(list.is_empty());
        assert_eq!(list.try_pop_front(), None);
        assert_eq!(list.try_pop_back(), None);

        list.push_back(2);
        list.push_back(3);
        list.push_front(1);
        assert_eq!(list.len(), 3);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));

        assert_eq!(list.pop_back(), 3);
        assert_eq!(list.back(), Some(&2));
        assert_eq!(list.pop_front(), 1);
        assert_eq!(list.pop_back(), 2);
        assert!(list.is_empty());
        assert_eq!(list.back(), None);

        list.push_back(4);
        assert_eq!(list.front(), Some(&4));
        assert_eq!(list.back(), Some(&4));
    }

    #[test]
    #[should_panic(expected = "empty linked list")]
    fn pop_front_empty() {
        let mut list = SingleLinkedList::<i32>::new();
        list.pop_front();
    }

    #[test]
    #[should_panic(expected = "empty linked list")]
    fn pop_back_empty() {
        let mut list = SingleLinkedList::<i32>::new();
        list.pop_back();
    }

    #[test]
    fn remove() {
        let mut list = SingleLinkedList::from([0, 1, 2, 3, 4]);
        assert_eq!(list.remove(2), 2);
        assert_eq!(list.remove(0), 0);
        assert_eq!(list.remove(2), 4);
        assert_eq!(list, SingleLinkedList::from([1, 3]));
        assert_eq!(list.back(), Some(&3));

        list.push_back(5);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 3, 5]);
    }

    #[test]
    #[should_panic(expected = "Cannot remove index 3")]
    fn remove_out_of_bounds() {
        let mut list = SingleLinkedList::from([0, 1, 2]);
        list.remove(3);
    }

    #[test]
    fn front_back_mut() {
        let mut list = SingleLinkedList::from([1, 2, 3]);
        *list.front_mut().unwrap() = 10;
        *list.back_mut().unwrap() = 30;
        for elem in &mut list {
            *elem += 1;
        }
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [11, 3, 31]);
    }

    #[test]
    fn clone_and_eq() {
        let list = SingleLinkedList::from(["a".to_string(), "b".to_string()]);
        let mut copy = list.clone();
        assert_eq!(copy, list);

        copy.push_back("c".to_string());
        assert_ne!(copy, list);
        assert_eq!(format!("{list:?}"), r#"["a", "b"]"#);
    }

    #[test]
    fn into_iter() {
        let list: SingleLinkedList<_> = (1..=4).collect();
        let iter = list.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.collect::<Vec<_>>(), [1, 2, 3, 4]);
    }

    #[test]
    fn no_leaks() {
        let alloc = TrackingAllocator::new(Mallocator);
        let drops = Rc::new(Cell::new(0));
        {
            let mut list = SingleLinkedList::new_in(&alloc);
            for i in 0..10 {
                list.push_back(DropCounter::new(&drops, i));
            }
            assert_eq!(alloc.stats().live_allocs(), 10);

            let popped = list.pop_front();
            assert_eq!(popped.value, 0);
            list.remove(4);
            assert_eq!(drops.get(), 1);

            let mut iter = list.into_iter();
            iter.next();
        }

        let stats = alloc.stats();
        assert_eq!(stats.live_allocs(), 0);
        assert_eq!(stats.live_bytes, 0);
        assert_eq!(drops.get(), 10);
    }

    #[test]
    fn allocation_failure() {
        let alloc = BudgetAllocator::new(Mallocator, 0);
        let mut list = SingleLinkedList::new_in(&alloc);

        let err = list.try_push_back(5).unwrap_err();
        assert_eq!(err.value, 5);
        assert!(list.is_empty());

        alloc.set_budget(1024);
        assert!(list.try_push_front(5).is_ok());
    }

    #[test]
    fn lifo_on_stack_allocator() {
        let alloc = StackAllocator::new(1024, 16);
        {
            let mut list = SingleLinkedList::new_in(&alloc);
            list.extend([1u32, 2, 3, 4]);
            while let Some(elem) = list.try_pop_back() {
                assert!(elem > 0);
            }
        }
        assert_eq!(alloc.used(), 0);
    }
}
