use core::fmt;
use std::alloc::{Layout, handle_alloc_error};

use strata_logging::{log_severe, LogCategory};
use thiserror::Error;

mod imp;
#[cfg(test)]
mod test_utils;

pub mod dynarr;
pub mod single_linked_list;
pub mod double_linked_list;
mod stack;
mod queue;

pub use dynarr::{DynArr, Cursor, CursorMut};
pub use single_linked_list::SingleLinkedList;
pub use double_linked_list::DoubleLinkedList;
pub use stack::Stack;
pub use queue::Queue;

pub(crate) const LOG_CAT : LogCategory = LogCategory::new("Collections");

//--------------------------------------------------------------

/// The error type for `try_reserve` methods.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum TryReserveError {
    /// Error due to the computed capacity exceeding the collection's maximum (usually `isize::MAX` bytes).
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The memory allocator returned an error
    #[error("memory allocation of {} bytes failed", layout.size())]
    AllocError {
        /// The layout of the allocation request that failed
        layout: Layout,
    },
}

/// Error returned by the `try_push_*` methods, gives back the value that could not be pushed.
#[derive(Error)]
#[error("failed to push value: {error}")]
pub struct PushError<T> {
    pub value: T,
    #[source]
    pub error: TryReserveError,
}

impl<T> PushError<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError").field("error", &self.error).finish_non_exhaustive()
    }
}

/// Report an allocation failure of an infallible operation and never return.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn handle_reserve_error(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => {
            log_severe!(LOG_CAT, handle_reserve_error, "Capacity overflow");
            panic!("capacity overflow");
        },
        TryReserveError::AllocError { layout } => {
            log_severe!(LOG_CAT, handle_reserve_error, "Failed to allocate {} bytes (align {})", layout.size(), layout.align());
            if let Some(logger) = strata_logging::get_logger() {
                logger.flush();
            }
            handle_alloc_error(layout)
        },
    }
}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to fit the next element(s).
    ///
    /// Returns `None` if the capacity were to overflow
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize>;
}

/// A reserve strategy that doubles the current capacity, starting from a capacity of 1.
///
/// If the doubled capacity is still too small, the minimum required capacity is used.
pub struct DoublingReserveStrategy;

impl ReserveStrategy for DoublingReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize> {
        let double_cap = if cur_capacity == 0 { 1 } else { cur_capacity.checked_mul(2)? };
        Some(double_cap.max(min_capacity))
    }
}

/// A reserve strategy that doubles the current capacity, but never returns a capacity under `MIN`.
pub struct MinCapacityReserveStrategy<const MIN: usize>;

impl<const MIN: usize> ReserveStrategy for MinCapacityReserveStrategy<MIN> {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize> {
        DoublingReserveStrategy::calculate(cur_capacity, min_capacity).map(|cap| cap.max(MIN))
    }
}

//--------------------------------------------------------------

/// A container that can be grown and shrunk at both of its ends.
///
/// This is the set of operations [`Stack`] and [`Queue`] are built on.
pub trait Sequence<T> {
    fn push_front(&mut self, value: T);
    fn push_back(&mut self, value: T);

    fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>>;
    fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>>;

    fn try_pop_front(&mut self) -> Option<T>;
    fn try_pop_back(&mut self) -> Option<T>;

    /// Remove the first element.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    fn pop_front(&mut self) -> T {
        match self.try_pop_front() {
            Some(value) => value,
            None => crate::utils::precondition_failed(format_args!("pop_front called on an empty sequence")),
        }
    }

    /// Remove the last element.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    fn pop_back(&mut self) -> T {
        match self.try_pop_back() {
            Some(value) => value,
            None => crate::utils::precondition_failed(format_args!("pop_back called on an empty sequence")),
        }
    }

    fn front(&self) -> Option<&T>;
    fn back(&self) -> Option<&T>;
    fn front_mut(&mut self) -> Option<&mut T>;
    fn back_mut(&mut self) -> Option<&mut T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}
