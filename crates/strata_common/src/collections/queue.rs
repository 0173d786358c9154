use core::{fmt, marker::PhantomData};

use super::{PushError, Sequence, SingleLinkedList};

/// A first-in, first-out container on top of any [`Sequence`].
///
/// Elements are pushed to the back and popped from the front of the underlying sequence.
/// The default [`SingleLinkedList`] does both in *O*(1) time.
pub struct Queue<T, S: Sequence<T> = SingleLinkedList<T>> {
    seq:      S,
    _phantom: PhantomData<T>,
}

impl<T> Queue<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::from_sequence(SingleLinkedList::new())
    }
}

impl<T, S: Sequence<T>> Queue<T, S> {
    /// Create a queue on top of an existing sequence, its front becomes the front of the queue.
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

    /// Remove the front element.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    #[track_caller]
    pub fn pop(&mut self) -> T {
        self.seq.pop_front()
    }

    pub fn try_pop(&mut self) -> Option<T> {
        self.seq.try_pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.seq.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.seq.front_mut()
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

impl<T, S: Sequence<T> + Default> Default for Queue<T, S> {
    fn default() -> Self {
        Self::from_sequence(S::default())
    }
}

impl<T, S: Sequence<T> + Clone> Clone for Queue<T, S> {
    fn clone(&self) -> Self {
        Self::from_sequence(self.seq.clone())
    }
}

impl<T, S: Sequence<T> + fmt::Debug> fmt::Debug for Queue<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Queue").field(&self.seq).finish()
    }
}

impl<T, S: Sequence<T> + Default> FromIterator<T> for Queue<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::default();
        iter.into_iter().for_each(|value| queue.push(value));
        queue
    }
}
