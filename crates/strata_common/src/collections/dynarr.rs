use core::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr,
    slice,
};

use crate::{
    alloc::{Allocator, primitives::Mallocator},
    precondition,
    utils::precondition_failed,
};

use super::{
    imp::raw_block::RawBlock,
    handle_reserve_error, DoublingReserveStrategy, PushError, ReserveStrategy, Sequence, TryReserveError,
};

mod cursor;
mod into_iter;

pub use cursor::{Cursor, CursorMut};
pub use into_iter::IntoIter;

/// A contiguous growable array type, also known as a dynamic array, or DynArr.
///
/// Dynamic arrays have *O*(1) indexing, amortized *O*(1) push and pop at the back, and *O*(n) push and pop at the front.
///
/// _Note: It was decided to not name this `Vec` as in the standard library, as this is easily confusable with a math vector_
///
/// # Examples
///
/// ```
/// # use strata_common::{dynarr, collections::DynArr};
/// let mut arr = DynArr::new();
/// arr.push_back(1);
/// arr.push_back(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, [7, 2, 1, 2, 3]);
/// ```
///
/// The [`dynarr!`](crate::dynarr) macro is provided for convenient initialization:
///
/// ```
/// # use strata_common::dynarr;
/// let mut arr1 = dynarr![1, 2, 3];
/// arr1.push_back(4);
/// let arr2 = dynarr![1, 2, 3, 4];
/// assert_eq!(arr1, arr2);
///
/// let zeros = dynarr![0; 5];
/// assert_eq!(zeros, [0, 0, 0, 0, 0]);
/// ```
///
/// # Indexing
///
/// Indexing outside of `[0, len)` is a contract violation and will panic, no matter the build configuration.
/// Use [`DynArr::get`] and [`DynArr::get_mut`] if you want to check whether the index is in the `DynArr`.
///
/// # Allocation
///
/// All memory is acquired from the allocator `A`, and every element is constructed into and destroyed in that memory through
/// the allocator's [`construct`](Allocator::construct) and [`destroy`](Allocator::destroy) hooks.
///
/// # Capacity and reallocation
///
/// The capacity of a dynamic array is the amount of space allocated for any future elements that will be added onto the array.
/// This is not to be confused with the *length* of the dynamic array, which specifies the number of actual elements within the dynamic array.
/// If a dynamic array's length would exceed its capacity, the reserve strategy `R` calculates a new capacity, a new block is allocated,
/// and all elements are moved into it. With the default [`DoublingReserveStrategy`], an empty array grows to a capacity of 1, and every
/// following growth doubles it.
///
/// The capacity only shrinks when [`DynArr::reset`] is called, which releases all memory.
///
/// # Guarantees
///
/// - A `DynArr` with a capacity of 0 has no allocation.
/// - A `DynArr` of a zero-sized type never allocates and reports a capacity of `usize::MAX`.
/// - When an allocation fails, the array is left exactly as it was.
pub struct DynArr<T, A: Allocator = Mallocator, R: ReserveStrategy = DoublingReserveStrategy> {
    buf:      RawBlock<T, A>,
    len:      usize,
    _phantom: PhantomData<R>,
}

impl<T> DynArr<T> {
    /// Constructs a new, empty `DynArr<T>`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Mallocator)
    }

    /// Constructs a new, empty `DynArr<T>` with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[must_use]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Mallocator)
    }

    /// Constructs a `DynArr<T>` holding `n` clones of `elem`, with a capacity of exactly `n`.
    #[must_use]
    #[track_caller]
    pub fn from_elem(elem: T, n: usize) -> Self where
        T: Clone
    {
        Self::from_elem_in(elem, n, Mallocator)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> DynArr<T, A, R> {
    /// Constructs a new, empty `DynArr<T, A, R>` using the given allocator.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self { buf: RawBlock::new_in(alloc), len: 0, _phantom: PhantomData }
    }

    /// Constructs a new, empty `DynArr<T, A, R>` with exactly `capacity` slots, using the given allocator.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[must_use]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(arr) => arr,
            Err(err) => handle_reserve_error(err),
        }
    }

    /// Tries to construct a new, empty `DynArr<T, A, R>` with exactly `capacity` slots, using the given allocator.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        let buf = RawBlock::try_with_capacity_in(capacity, alloc)?;
        Ok(Self { buf, len: 0, _phantom: PhantomData })
    }

    /// Constructs a `DynArr<T, A, R>` from a slice, cloning each element in order.
    ///
    /// The capacity is exactly the length of the slice.
    #[track_caller]
    pub fn from_slice_in(slice: &[T], alloc: A) -> Self where
        T: Clone
    {
        let mut arr = Self::with_capacity_in(slice.len(), alloc);
        for elem in slice {
            // SAFETY: the capacity was reserved up front
            unsafe { arr.push_within_capacity(elem.clone()) };
        }
        arr
    }

    /// Constructs a `DynArr<T, A, R>` holding `n` clones of `elem`, with a capacity of exactly `n`.
    #[track_caller]
    pub fn from_elem_in(elem: T, n: usize, alloc: A) -> Self where
        T: Clone
    {
        let mut arr = Self::with_capacity_in(n, alloc);
        if n > 0 {
            for _ in 1..n {
                // SAFETY: the capacity was reserved up front
                unsafe { arr.push_within_capacity(elem.clone()) };
            }
            unsafe { arr.push_within_capacity(elem) };
        }
        arr
    }

    /// Returns the total number of elements the dynamic array can hold without reallocating.
    ///
    /// This is `usize::MAX` for zero-sized types.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the dynamic array.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dynamic array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Returns a raw pointer to the buffer, or a dangling pointer if the dynamic array didn't allocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr().as_ptr()
    }

    /// Returns a raw mutable pointer to the buffer, or a dangling pointer if the dynamic array didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr().as_ptr()
    }

    /// Extracts a slice containing the entire dynamic array.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, len)` are live
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire dynamic array.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `[0, len)` are live
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    //--------------------------------------------------------------

    /// Reserves capacity for at least `capacity` elements in total.
    ///
    /// Does nothing if the capacity is already sufficient, otherwise the dynamic array is moved into a block of exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[track_caller]
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            handle_reserve_error(err);
        }
    }

    /// Tries to reserve capacity for at least `capacity` elements in total.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, or the allocator reports a failure, an error is returned and the dynamic array is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        self.buf.try_relocate(capacity, self.len)
    }

    fn grow_one(&mut self) -> Result<(), TryReserveError> {
        let min_cap = self.len.checked_add(1).ok_or(TryReserveError::CapacityOverflow)?;
        let new_cap = R::calculate(self.capacity(), min_cap).ok_or(TryReserveError::CapacityOverflow)?;
        self.buf.try_relocate(new_cap, self.len)
    }

    /// Appends an element to the back of the dynamic array, growing it when full.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[track_caller]
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            handle_reserve_error(err.error);
        }
    }

    /// Tries to append an element to the back of the dynamic array.
    ///
    /// # Errors
    ///
    /// If growing failed, the value is handed back together with the error, and the dynamic array is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        if self.len == self.capacity() {
            if let Err(error) = self.grow_one() {
                return Err(PushError { value, error });
            }
        }
        // SAFETY: there is at least 1 raw slot
        unsafe { self.push_within_capacity(value) };
        Ok(())
    }

    /// # Safety
    ///
    /// There must be at least 1 raw slot.
    unsafe fn push_within_capacity(&mut self, value: T) {
        unsafe { self.buf.allocator().construct(self.buf.slot(self.len), value) };
        self.len += 1;
    }

    /// Inserts an element at the front of the dynamic array, moving all other elements one slot up.
    ///
    /// This takes *O*(n) time.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[track_caller]
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            handle_reserve_error(err.error);
        }
    }

    /// Tries to insert an element at the front of the dynamic array.
    ///
    /// # Errors
    ///
    /// If growing failed, the value is handed back together with the error, and the dynamic array is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        if self.len == self.capacity() {
            if let Err(error) = self.grow_one() {
                return Err(PushError { value, error });
            }
        }

        // Elements are only leaked if constructing the new element panics
        let len = mem::replace(&mut self.len, 0);
        unsafe {
            let base = self.buf.ptr().as_ptr();
            ptr::copy(base, base.add(1), len);
            self.buf.allocator().construct(self.buf.slot(0), value);
        }
        self.len = len + 1;
        Ok(())
    }

    /// Removes the last element from the dynamic array and returns it.
    ///
    /// The capacity is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn pop_back(&mut self) -> T {
        match self.try_pop_back() {
            Some(value) => value,
            None => precondition_failed(format_args!("pop_back called on an empty dynamic array")),
        }
    }

    /// Removes the last element from the dynamic array and returns it, or `None` if it is empty.
    pub fn try_pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now considered raw
        Some(unsafe { self.buf.slot(self.len).read() })
    }

    /// Removes the first element from the dynamic array and returns it, moving all other elements one slot down.
    ///
    /// This takes *O*(n) time.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn pop_front(&mut self) -> T {
        match self.try_pop_front() {
            Some(value) => value,
            None => precondition_failed(format_args!("pop_front called on an empty dynamic array")),
        }
    }

    /// Removes the first element from the dynamic array and returns it, or `None` if it is empty.
    pub fn try_pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        unsafe {
            let base = self.buf.ptr().as_ptr();
            let value = base.read();
            ptr::copy(base.add(1), base, self.len);
            Some(value)
        }
    }

    /// Destroys all elements, keeping the allocated capacity.
    pub fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        // SAFETY: slots `[0, len)` were live and are no longer tracked
        unsafe { self.buf.destroy_slots(0, len) };
    }

    /// Destroys all elements and releases the allocated block, leaving the dynamic array with a capacity of 0.
    pub fn reset(&mut self) {
        self.clear();
        self.buf.release();
    }

    /// Takes the contents out of the dynamic array, leaving it empty and without an allocation.
    ///
    /// The emptied array keeps a clone of the allocator.
    pub fn take(&mut self) -> Self where
        A: Clone
    {
        let alloc = self.allocator().clone();
        mem::replace(self, Self::new_in(alloc))
    }

    //--------------------------------------------------------------

    #[inline]
    #[track_caller]
    fn check_index(&self, idx: usize) {
        precondition!(idx < self.len, "index {} is out of bounds for a dynamic array of length {}", idx, self.len);
    }

    /// Returns a reference to the element at `idx`, or `None` if it is out of bounds.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.as_slice().get(idx)
    }

    /// Returns a mutable reference to the element at `idx`, or `None` if it is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(idx)
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    //--------------------------------------------------------------

    /// Returns a cursor to the first element.
    ///
    /// For an empty dynamic array, this is equal to [`DynArr::end`].
    pub fn begin(&self) -> Cursor<'_, T, A, R> {
        Cursor::new(self, 0)
    }

    /// Returns a cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T, A, R> {
        Cursor::new(self, self.len)
    }

    /// Returns a mutable cursor to the first element.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, A, R> {
        CursorMut::new(self, 0)
    }

    /// Returns an iterator over the elements.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator that allows modifying each element.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Drop for DynArr<T, A, R> {
    fn drop(&mut self) {
        self.clear();
        // RawBlock handles deallocation
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Deref for DynArr<T, A, R> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> DerefMut for DynArr<T, A, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Index<usize> for DynArr<T, A, R> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, idx: usize) -> &T {
        self.check_index(idx);
        // SAFETY: `idx` was checked to be a live slot
        unsafe { self.buf.slot(idx).as_ref() }
    }
}

impl<T, A: Allocator, R: ReserveStrategy> IndexMut<usize> for DynArr<T, A, R> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, idx: usize) -> &mut T {
        self.check_index(idx);
        // SAFETY: `idx` was checked to be a live slot
        unsafe { self.buf.slot(idx).as_mut() }
    }
}

impl<T: Clone, A: Allocator + Clone, R: ReserveStrategy> Clone for DynArr<T, A, R> {
    /// Clones the dynamic array into a new block with the same capacity.
    fn clone(&self) -> Self {
        let mut arr = Self::with_capacity_in(self.capacity(), self.allocator().clone());
        for elem in self.iter() {
            // SAFETY: the clone has the same capacity as `self`
            unsafe { arr.push_within_capacity(elem.clone()) };
        }
        arr
    }

    /// Releases the current storage, then clones `source` into a new block with the same capacity.
    fn clone_from(&mut self, source: &Self) {
        self.reset();
        self.reserve(source.capacity());
        for elem in source.iter() {
            unsafe { self.push_within_capacity(elem.clone()) };
        }
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy> Default for DynArr<T, A, R> {
    /// Creates an empty `DynArr<T, A, R>`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: Allocator, R: ReserveStrategy> fmt::Debug for DynArr<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: Hash, A: Allocator, R: ReserveStrategy> Hash for DynArr<T, A, R> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> AsRef<[T]> for DynArr<T, A, R> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator, R: ReserveStrategy> AsMut<[T]> for DynArr<T, A, R> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, const N: usize> From<[T; N]> for DynArr<T> {
    /// Allocates a dynamic array with a capacity of exactly `N` and moves the array's elements into it.
    #[track_caller]
    fn from(arr: [T; N]) -> Self {
        let mut dynarr = Self::with_capacity(N);
        for elem in arr {
            // SAFETY: the capacity was reserved up front
            unsafe { dynarr.push_within_capacity(elem) };
        }
        dynarr
    }
}

impl<T: Clone> From<&[T]> for DynArr<T> {
    /// Allocates a dynamic array with a capacity of exactly the slice's length and clones the slice's elements into it.
    #[track_caller]
    fn from(slice: &[T]) -> Self {
        Self::from_slice_in(slice, Mallocator)
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy> FromIterator<T> for DynArr<T, A, R> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::default();
        arr.extend(iter);
        arr
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Extend<T> for DynArr<T, A, R> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator, R: ReserveStrategy> Extend<&'a T> for DynArr<T, A, R> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(*elem);
        }
    }
}

impl<'a, T, A: Allocator, R: ReserveStrategy> IntoIterator for &'a DynArr<T, A, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator, R: ReserveStrategy> IntoIterator for &'a mut DynArr<T, A, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> IntoIterator for DynArr<T, A, R> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    /// Creates a consuming iterator, that is, one that moves each value out of the dynamic array (from start to end).
    /// The dynamic array cannot be used after calling this.
    fn into_iter(self) -> Self::IntoIter {
        let arr = mem::ManuallyDrop::new(self);
        // SAFETY: `arr` is never dropped, so the block is moved out exactly once
        let buf = unsafe { ptr::read(&arr.buf) };
        IntoIter::new(buf, arr.len)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Sequence<T> for DynArr<T, A, R> {
    fn push_front(&mut self, value: T) {
        DynArr::push_front(self, value)
    }

    fn push_back(&mut self, value: T) {
        DynArr::push_back(self, value)
    }

    fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        DynArr::try_push_front(self, value)
    }

    fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        DynArr::try_push_back(self, value)
    }

    fn try_pop_front(&mut self) -> Option<T> {
        DynArr::try_pop_front(self)
    }

    fn try_pop_back(&mut self) -> Option<T> {
        DynArr::try_pop_back(self)
    }

    fn front(&self) -> Option<&T> {
        DynArr::front(self)
    }

    fn back(&self) -> Option<&T> {
        DynArr::back(self)
    }

    fn front_mut(&mut self) -> Option<&mut T> {
        DynArr::front_mut(self)
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        DynArr::back_mut(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        DynArr::clear(self)
    }
}

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq {
    ([$($vars:tt)*] $lhs:ty) => {
        impl<$($vars)* T, U, A: Allocator, R: ReserveStrategy> PartialEq<DynArr<U, A, R>> for $lhs where
            T: PartialEq<U>
        {
            #[inline]
            fn eq(&self, other: &DynArr<U, A, R>) -> bool { self[..] == **other }
        }
    };
}

macro_rules! impl_dynarr_partial_eq {
    ([$($vars:tt)*] $rhs:ty) => {
        impl<$($vars)* T, U, A: Allocator, R: ReserveStrategy> PartialEq<$rhs> for DynArr<T, A, R> where
            T: PartialEq<U>
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { **self == other[..] }
        }
    };
}

impl_dynarr_partial_eq! { [] [U] }
impl_dynarr_partial_eq! { ['a,] &'a [U] }
impl_dynarr_partial_eq! { ['a,] &'a mut [U] }
impl_dynarr_partial_eq! { [const N: usize,] [U; N] }
impl_dynarr_partial_eq! { ['a, const N: usize,] &'a [U; N] }

impl_slice_partial_eq! { [] [T] }
impl_slice_partial_eq! { ['a,] &'a [T] }
impl_slice_partial_eq! { [const N: usize,] [T; N] }

impl<T, U, A0, A1, R0, R1> PartialEq<DynArr<U, A1, R1>> for DynArr<T, A0, R0> where
    T: PartialEq<U>,
    A0: Allocator,
    A1: Allocator,
    R0: ReserveStrategy,
    R1: ReserveStrategy,
{
    #[inline]
    fn eq(&self, other: &DynArr<U, A1, R1>) -> bool {
        **self == **other
    }
}

impl<T: Eq, A: Allocator, R: ReserveStrategy> Eq for DynArr<T, A, R> {}

//--------------------------------------------------------------

/// Creates a [`DynArr`] containing the arguments.
///
/// - Create a [`DynArr`] containing a given list of elements, with a capacity of exactly the number of elements:
///
/// ```
/// # use strata_common::dynarr;
/// let arr = dynarr![1, 2, 3];
/// assert_eq!(arr[0], 1);
/// assert_eq!(arr.capacity(), 3);
/// ```
///
/// - Create a [`DynArr`] from a given element and size:
///
/// ```
/// # use strata_common::dynarr;
/// let arr = dynarr![1; 3];
/// assert_eq!(arr, [1, 1, 1]);
/// ```
///
/// The second form requires `T` to implement [`Clone`].
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::collections::DynArr::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::DynArr::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::collections::DynArr::from([$($x),+])
    };
}

#[cfg(test)]
mod tests;
