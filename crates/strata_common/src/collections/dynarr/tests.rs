use std::{alloc::Layout, cell::Cell, collections::hash_map::DefaultHasher, hash::{Hash, Hasher}, panic::{self, AssertUnwindSafe}, rc::Rc};

use super::*;
use crate::{
    alloc::{primitives::*, composable::*},
    collections::{test_utils::*, MinCapacityReserveStrategy},
};

#[test]
fn dynarr_new() {
    let arr = DynArr::<i32>::new();
    assert_eq!(arr.capacity(), 0);
    assert_eq!(arr.len(), 0);
    assert!(arr.is_empty());

    let arr = DynArr::<i32>::with_capacity(21);
    assert_eq!(arr.capacity(), 21);
    assert_eq!(arr.len(), 0);
}

#[test]
fn dynarr_empty_doesnt_allocate() {
    let alloc = TrackingAllocator::new(Mallocator);
    {
        let arr = DynArr::<i32, _>::new_in(&alloc);
        assert_eq!(arr.capacity(), 0);
        let arr = DynArr::<i32, _>::with_capacity_in(0, &alloc);
        assert_eq!(arr.capacity(), 0);
    }
    assert_eq!(alloc.stats().allocs, 0);
}

#[test]
fn dynarr_from_list() {
    let arr = dynarr![1, 2, 3, 4, 5];
    assert_eq!(arr.len(), 5);
    assert_eq!(arr.capacity(), 5);
    assert!(arr.iter().copied().eq(1..=5));

    let arr = dynarr!["hello", "world", "!"];
    assert_eq!(arr, ["hello", "world", "!"]);

    let arr: DynArr<i32> = dynarr![];
    assert_eq!(arr.capacity(), 0);

    let arr = dynarr![7; 4];
    assert_eq!(arr, [7, 7, 7, 7]);
    assert_eq!(arr.capacity(), 4);
}

#[test]
fn dynarr_from_slice() {
    let slice: &[String] = &["a".to_string(), "b".to_string()];
    let arr = DynArr::from(slice);
    assert_eq!(arr, slice);
    assert_eq!(arr.capacity(), 2);

    let alloc = TrackingAllocator::new(Mallocator);
    let arr = DynArr::<_, _>::from_slice_in(&[1u8, 2, 3], &alloc);
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(alloc.stats().constructs, 3);
}

#[test]
fn dynarr_push_and_access() {
    let mut arr = DynArr::<i32>::new();

    arr.push_back(42);
    assert_eq!(arr.capacity(), 1);
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0], 42);

    arr.push_back(84);
    assert_eq!(arr.capacity(), 2);
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[1], 84);

    arr[0] = 7;
    assert_eq!(arr.front(), Some(&7));
    assert_eq!(arr.back(), Some(&84));
    *arr.back_mut().unwrap() = 3;
    *arr.front_mut().unwrap() += 1;
    assert_eq!(arr, [8, 3]);

    assert_eq!(arr.get(1), Some(&3));
    assert_eq!(arr.get(2), None);
    assert_eq!(arr.get_mut(2), None);
}

#[test]
fn dynarr_doubling_growth() {
    let mut arr = DynArr::<usize>::new();
    for k in 1..=100 {
        arr.push_back(k);
        assert_eq!(arr.capacity(), k.next_power_of_two());
        assert!(arr.len() <= arr.capacity());
    }
    assert!(arr.iter().copied().eq(1..=100));
}

#[test]
fn dynarr_min_capacity_strategy() {
    let mut arr = DynArr::<i32, Mallocator, MinCapacityReserveStrategy<8>>::new_in(Mallocator);
    arr.push_back(1);
    assert_eq!(arr.capacity(), 8);
    arr.extend(2..=9);
    assert_eq!(arr.capacity(), 16);
}

#[test]
fn dynarr_push_front() {
    let mut arr = DynArr::new();
    for i in 0..1000 {
        arr.push_front(i);
    }
    assert_eq!(arr.len(), 1000);
    assert_eq!(arr[0], 999);
    assert_eq!(arr[999], 0);
    assert!(arr.iter().copied().eq((0..1000).rev()));
}

#[test]
fn dynarr_pop() {
    let mut arr = dynarr![1, 2, 3, 4];
    let cap = arr.capacity();

    assert_eq!(arr.pop_back(), 4);
    assert_eq!(arr.pop_front(), 1);
    assert_eq!(arr, [2, 3]);
    assert_eq!(arr.capacity(), cap);

    assert_eq!(arr.try_pop_front(), Some(2));
    assert_eq!(arr.try_pop_back(), Some(3));
    assert_eq!(arr.try_pop_back(), None);
    assert_eq!(arr.try_pop_front(), None);
    assert_eq!(arr.capacity(), cap);
}

#[test]
#[should_panic]
fn dynarr_pop_back_empty() {
    let mut arr = DynArr::<i32>::new();
    arr.pop_back();
}

#[test]
#[should_panic]
fn dynarr_pop_front_empty() {
    let mut arr = DynArr::<i32>::new();
    arr.pop_front();
}

#[test]
#[should_panic(expected = "out of bounds")]
fn dynarr_index_out_of_bounds() {
    let arr = dynarr![1, 2, 3];
    let _value = arr[3];
}

#[test]
#[should_panic(expected = "out of bounds")]
fn dynarr_index_mut_out_of_bounds() {
    let mut arr = DynArr::<i32>::with_capacity(4);
    arr[0] = 1;
}

#[test]
fn dynarr_reserve() {
    let mut arr = DynArr::<i32>::new();
    arr.reserve(21);
    assert_eq!(arr.capacity(), 21);

    arr.reserve(5);
    assert_eq!(arr.capacity(), 21);

    let mut arr = dynarr![1, 2, 3];
    assert_eq!(arr.try_reserve(10), Ok(()));
    assert_eq!(arr.capacity(), 10);
    assert_eq!(arr, [1, 2, 3]);
}

#[test]
fn dynarr_reserve_and_push() {
    let mut arr = DynArr::<i32>::new();
    arr.reserve(10);

    for i in 0..10 {
        arr.push_back(i);
    }
    assert_eq!(arr.capacity(), 10);

    arr.push_back(10);
    assert_eq!(arr.capacity(), 20);
}

#[test]
fn dynarr_capacity_overflow() {
    let mut arr = DynArr::<u64>::new();
    assert_eq!(arr.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    assert_eq!(arr.capacity(), 0);
}

#[test]
fn dynarr_clear_and_reset() {
    let alloc = TrackingAllocator::new(Mallocator);
    let mut arr = DynArr::<String, _>::new_in(&alloc);
    arr.extend(["a", "b", "c"].map(String::from));
    let cap = arr.capacity();

    arr.clear();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), cap);
    assert_eq!(alloc.stats().live_allocs(), 1);
    assert_eq!(alloc.stats().destroys, 3);

    arr.push_back("d".to_string());
    arr.reset();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 0);
    assert_eq!(alloc.stats().live_allocs(), 0);
    assert_eq!(alloc.stats().live_values(), 0);
}

#[test]
fn dynarr_clone() {
    let mut arr = DynArr::<i32>::with_capacity(8);
    arr.extend([1, 2, 3]);

    let mut copy = arr.clone();
    assert_eq!(copy, arr);
    assert_eq!(copy.capacity(), 8);
    assert_ne!(copy.as_ptr(), arr.as_ptr());

    copy[0] = 10;
    copy.push_back(4);
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(copy, [10, 2, 3, 4]);

    let mut other = dynarr![9; 20];
    other.clone_from(&arr);
    assert_eq!(other, arr);
    assert_eq!(other.capacity(), 8);
}

#[test]
fn dynarr_clone_panic_leaks_nothing() {
    let clones_left = Rc::new(Cell::new(2));
    let drops = Rc::new(Cell::new(0));

    let mut arr = DynArr::new();
    for _ in 0..4 {
        arr.push_back(PanicOnClone::new(&clones_left, &drops));
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| arr.clone()));
    assert!(result.is_err());
    // The 2 successful clones were dropped when the partial copy unwound
    assert_eq!(drops.get(), 2);

    drop(arr);
    assert_eq!(drops.get(), 6);
}

#[test]
fn dynarr_take() {
    let mut arr = dynarr![1, 2, 3];
    let moved = arr.take();

    assert_eq!(moved, [1, 2, 3]);
    assert_eq!(moved.capacity(), 3);
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 0);

    arr.push_back(5);
    assert_eq!(arr, [5]);
}

#[test]
fn dynarr_self_assignment() {
    let mut arr = dynarr![1, 2, 3];
    arr.reserve(6);

    arr = arr.clone();
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(arr.capacity(), 6);

    arr = arr.take();
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(arr.capacity(), 6);
}

#[test]
fn dynarr_no_leaks() {
    let alloc = TrackingAllocator::new(Mallocator);
    let drops = Rc::new(Cell::new(0));
    {
        let mut arr = DynArr::<DropCounter, _>::new_in(&alloc);
        for i in 0..100 {
            arr.push_back(DropCounter::new(&drops, i));
        }
        for i in 0..10 {
            arr.push_front(DropCounter::new(&drops, -i));
        }
        let copy = arr.clone();
        assert_eq!(copy, arr);
    }

    let stats = alloc.stats();
    assert_eq!(stats.live_allocs(), 0);
    assert_eq!(stats.live_bytes, 0);
    assert_eq!(stats.constructs, stats.destroys);
    assert_eq!(drops.get(), 220);
}

#[test]
fn dynarr_popped_values_drop_once() {
    let drops = Rc::new(Cell::new(0));
    let mut arr = DynArr::new();
    for i in 0..4 {
        arr.push_back(DropCounter::new(&drops, i));
    }

    let front = arr.pop_front();
    let back = arr.pop_back();
    assert_eq!((front.value, back.value), (0, 3));
    assert_eq!(drops.get(), 0);

    drop(front);
    drop(back);
    drop(arr);
    assert_eq!(drops.get(), 4);
}

#[test]
fn dynarr_shared_arena() {
    let alloc = TrackingAllocator::new(LinearAllocator::new(1024));
    {
        let mut a = DynArr::<u32, _>::new_in(&alloc);
        let mut b = DynArr::<u64, _>::new_in(&alloc);
        for i in 0..10 {
            a.push_back(i);
            b.push_front(i as u64);
        }
        assert_eq!(a[9], 9);
        assert_eq!(b[0], 9);
    }
    assert_eq!(alloc.stats().live_allocs(), 0);
    assert!(alloc.inner().used() > 0);
}

#[test]
fn dynarr_stack_allocator_with_exact_capacity() {
    let alloc = StackAllocator::new(256, 16);
    {
        let mut arr = DynArr::<u32, _>::with_capacity_in(16, &alloc);
        arr.extend(0..16);
        assert_eq!(arr.len(), 16);
    }
    assert_eq!(alloc.used(), 0);
}

#[test]
fn dynarr_allocation_failure_leaves_array_unchanged() {
    let alloc = BudgetAllocator::new(Mallocator, 48);
    let mut arr = DynArr::<u64, _>::new_in(&alloc);
    for i in 0..4 {
        arr.push_back(i);
    }
    assert_eq!(arr.capacity(), 4);
    let ptr = arr.as_ptr();

    let err = arr.try_push_back(4).unwrap_err();
    assert_eq!(err.value, 4);
    assert_eq!(err.error, TryReserveError::AllocError { layout: Layout::new::<[u64; 8]>() });
    assert_eq!(arr, [0, 1, 2, 3]);
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.as_ptr(), ptr);

    let err = arr.try_push_front(9).unwrap_err();
    assert_eq!(err.into_inner(), 9);
    assert_eq!(arr, [0, 1, 2, 3]);

    assert!(arr.try_reserve(100).is_err());
    assert_eq!(arr.capacity(), 4);

    assert_eq!(arr.try_pop_back(), Some(3));
    assert!(arr.try_push_back(3).is_ok());
}

#[test]
fn dynarr_zero_sized() {
    let alloc = TrackingAllocator::new(Mallocator);
    let mut arr = DynArr::<(), _>::new_in(&alloc);
    assert_eq!(arr.capacity(), usize::MAX);

    for _ in 0..100 {
        arr.push_back(());
        arr.push_front(());
    }
    assert_eq!(arr.len(), 200);
    arr.pop_front();
    assert_eq!(arr.len(), 199);
    assert_eq!(alloc.stats().allocs, 0);
}

#[test]
fn dynarr_cursors() {
    let arr = dynarr![1, 2, 3, 4];

    let mut sum = 0;
    let mut cur = arr.begin();
    while cur != arr.end() {
        sum += *cur.get();
        cur.move_next();
    }
    assert_eq!(sum, 10);
    assert!(cur.is_end());

    cur.move_prev();
    assert_eq!(cur.index(), 3);
    assert_eq!(*cur.get(), 4);

    let empty = DynArr::<i32>::new();
    assert_eq!(empty.begin(), empty.end());
}

#[test]
#[should_panic(expected = "end cursor")]
fn dynarr_cursor_deref_end() {
    let arr = dynarr![1, 2];
    arr.end().get();
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "different dynamic arrays")]
fn dynarr_cursor_foreign_compare() {
    let a = dynarr![1, 2];
    let b = dynarr![1, 2];
    let _ = a.begin() == b.begin();
}

#[test]
fn dynarr_cursor_mut() {
    let mut arr = dynarr![1, 2, 3];

    let mut cur = arr.begin_mut();
    while !cur.is_end() {
        *cur.get_mut() *= 10;
        cur.move_next();
    }
    let cur = cur.into_cursor();
    assert!(cur.is_end());

    assert_eq!(arr, [10, 20, 30]);
}

#[test]
fn dynarr_iter() {
    let mut arr = dynarr![1, 2, 3];
    for x in &mut arr {
        *x += 1;
    }
    assert_eq!((&arr).into_iter().sum::<i32>(), 9);
    assert_eq!(arr.iter().rev().copied().collect::<DynArr<_>>(), [4, 3, 2]);
}

#[test]
fn dynarr_into_iter() {
    let arr = dynarr!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
    let mut iter = arr.into_iter();
    assert_eq!(iter.len(), 4);
    assert_eq!(iter.next().as_deref(), Some("a"));
    assert_eq!(iter.next_back().as_deref(), Some("d"));
    assert_eq!(iter.as_slice(), ["b", "c"]);
    assert_eq!(iter.collect::<Vec<_>>(), ["b", "c"]);
}

#[test]
fn dynarr_into_iter_drops_remaining() {
    let alloc = TrackingAllocator::new(Mallocator);
    let drops = Rc::new(Cell::new(0));
    {
        let mut arr: DynArr<DropCounter, _> = DynArr::new_in(&alloc);
        for i in 0..5 {
            arr.push_back(DropCounter::new(&drops, i));
        }
        let mut iter = arr.into_iter();
        let first = iter.next();
        assert_eq!(first.map(|x| x.value), Some(0));
    }
    assert_eq!(drops.get(), 5);
    assert_eq!(alloc.stats().live_allocs(), 0);
}

#[test]
fn dynarr_equality_and_hash() {
    let arr = dynarr![1, 2, 3];
    let slice: &[i32] = &[1, 2, 3];

    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(arr, *slice);
    assert_eq!(arr, slice);
    assert_eq!([1, 2, 3], arr);
    assert_eq!(slice, arr);
    assert_ne!(arr, [1, 2]);

    let other = DynArr::<i32, _>::from_slice_in(slice, TrackingAllocator::new(Mallocator));
    assert_eq!(arr, other);

    let hash = |value: &dyn Fn(&mut DefaultHasher)| {
        let mut hasher = DefaultHasher::new();
        value(&mut hasher);
        hasher.finish()
    };
    assert_eq!(hash(&|h| arr.hash(h)), hash(&|h| slice.hash(h)));
}

#[test]
fn dynarr_debug() {
    let arr = dynarr![1, 2, 3];
    assert_eq!(format!("{arr:?}"), "[1, 2, 3]");
}

#[test]
fn dynarr_extend_from_refs() {
    let mut arr = DynArr::<i32>::new();
    arr.extend(&[1, 2, 3]);
    arr.extend([4, 5].iter());
    assert_eq!(arr, [1, 2, 3, 4, 5]);
    assert_eq!(arr.capacity(), 8);
}

#[test]
fn dynarr_as_sequence() {
    fn fill<S: Sequence<i32>>(seq: &mut S) {
        seq.push_back(2);
        seq.push_front(1);
        seq.push_back(3);
    }

    let mut arr = DynArr::new();
    fill(&mut arr);
    assert_eq!(Sequence::len(&arr), 3);
    assert_eq!(Sequence::pop_front(&mut arr), 1);
    assert_eq!(Sequence::pop_back(&mut arr), 3);
    assert_eq!(Sequence::front(&arr), Some(&2));
}
