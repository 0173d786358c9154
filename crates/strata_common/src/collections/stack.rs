use core::{fmt, marker::PhantomData};

use super::{DynArr, PushError, Sequence};

/// A last-in, first-out container on top of any [`Sequence`].
///
/// Elements are pushed to and popped from the back of the underlying sequence.
pub struct Stack<T, S: Sequence<T> = DynArr<T>> {
    seq:      S,
    _phantom: PhantomData<T>,
}

impl<T> Stack<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::from_sequence(DynArr::new())
    }
}

impl<T, S: Sequence<T>> Stack<T, S> {
    /// Create a stack on top of an existing sequence, its back becomes the top of the stack.
    #[inline]
    pub const fn from_sequence(seq: S) -> Self {
        Self { seq, _phantom: PhantomData }
    }

    pub fn into_sequence(self) -> S {
        self.seq
    }

    pub fn push(&mut self, value: T) {
        self.seq.push_back(value);
    }

    /// Push a value, handing it back if the underlying sequence could not make room for it.
    pub fn try_push(&mut self, value: T) -> Result<(), PushError<T>> {
        self.seq.try_push_back(value)
    }

    /// Remove the top element.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[track_caller]
    pub fn pop(&mut self) -> T {
        self.seq.pop_back()
    }

    pub fn try_pop(&mut self) -> Option<T> {
        self.seq.try_pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.seq.back()
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.seq.back_mut()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn clear(&mut self) {
        self.seq.clear();
    }
}

impl<T, S: Sequence<T> + Default> Default for Stack<T, S> {
    fn default() -> Self {
        Self::from_sequence(S::default())
    }
}

impl<T, S: Sequence<T> + Clone> Clone for Stack<T, S> {
    fn clone(&self) -> Self {
        Self::from_sequence(self.seq.clone())
    }
}

impl<T, S: Sequence<T> + fmt::Debug> fmt::Debug for Stack<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stack").field(&self.seq).finish()
    }
}

impl<T, S: Sequence<T> + Default> FromIterator<T> for Stack<T, S> {
    /// Pushes every element in order, so the last element ends up on top.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::default();
        iter.into_iter().for_each(|value| stack.push(value));
        stack
    }
}

#[cfg(test)]
mod tests {
    use crate::collections::{DoubleLinkedList, SingleLinkedList};
    use super::*;

    fn lifo<S: Sequence<i32> + Default>() {
        let mut stack = Stack::<i32, S>::default();
        assert!(stack.is_empty());
        for i in 0..5 {
            stack.push(i);
        }
        assert_eq!(stack.len(), 5);
        assert_eq!(stack.peek(), Some(&4));

        *stack.peek_mut().unwrap() = 40;
        assert_eq!(stack.pop(), 40);
        assert_eq!(stack.pop(), 3);
        assert_eq!(stack.try_pop(), Some(2));

        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.try_pop(), None);
        assert_eq!(stack.peek(), None);
    }

    #[test]
    fn lifo_on_dynarr() {
        lifo::<DynArr<i32>>();
    }

    #[test]
    fn lifo_on_single_linked_list() {
        lifo::<SingleLinkedList<i32>>();
    }

    #[test]
    fn lifo_on_double_linked_list() {
        lifo::<DoubleLinkedList<i32>>();
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn pop_empty() {
        let mut stack = Stack::<i32>::new();
        stack.pop();
    }

    #[test]
    fn collect_and_clone() {
        let stack: Stack<_> = (1..=3).collect();
        let mut copy = stack.clone();
        assert_eq!(copy.pop(), 3);
        assert_eq!(stack.len(), 3);
        assert_eq!(format!("{stack:?}"), "Stack([1, 2, 3])");
        assert_eq!(stack.into_sequence(), [1, 2, 3]);
    }

    #[test]
    fn try_push_hands_value_back() {
        use crate::alloc::{composable::BudgetAllocator, primitives::Mallocator};

        let alloc = BudgetAllocator::new(Mallocator, 16);
        let mut stack = Stack::from_sequence(SingleLinkedList::new_in(&alloc));
        assert!(stack.try_push(1u64).is_ok());
        let err = stack.try_push(2u64).unwrap_err();
        assert_eq!(err.into_inner(), 2);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop(), 1);
    }
}
