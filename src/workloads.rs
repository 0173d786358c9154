use strata_common::{
    alloc::{Allocator, composable::{AllocStats, TrackingAllocator}},
    collections::{DoubleLinkedList, DynArr, PushError, Queue, SingleLinkedList, Stack, TryReserveError},
};
use strata_logging::{log_info, log_verbose, log_warning};

use crate::{
    config::Config,
    error::{Result, StrataError},
    LOG_CAT,
};

/// Allocator statistics of a single finished workload
#[derive(Clone, Copy, Debug)]
pub struct Report {
    pub name:  &'static str,
    pub stats: AllocStats,
}

type Workload<A> = fn(&Config, &TrackingAllocator<A>) -> Result<()>;

/// Run every workload against `alloc`, in order, and collect the statistics of each.
///
/// Every workload has to release everything it allocated before the next one starts.
pub fn run_all<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<DynArr<Report>> {
    let workloads: [(&'static str, Workload<A>); 6] = [
        ("dynarr_back", dynarr_back::<A>),
        ("dynarr_front", dynarr_front::<A>),
        ("single_linked_list", single_linked_list::<A>),
        ("double_linked_list", double_linked_list::<A>),
        ("stack", stack::<A>),
        ("queue", queue::<A>),
    ];

    let mut reports = DynArr::with_capacity(workloads.len());
    for (name, workload) in workloads {
        if name == "queue" && config.lifo_only() {
            log_warning!(LOG_CAT, "Skipping '{}', the {:?} allocator only frees in LIFO order", name, config.allocator);
            continue;
        }

        log_verbose!(LOG_CAT, "Running '{}' with {} elements", name, config.count);
        alloc.reset_stats();
        let res = workload(config, alloc);
        let stats = alloc.reset_stats();
        res?;

        if stats.live_allocs() != 0 {
            return Err(StrataError::Leak { workload: name, allocs: stats.live_allocs() });
        }

        log_info!(LOG_CAT, "{}: {}", name, stats);
        reports.push_back(Report { name, stats });
    }
    Ok(reports)
}

fn failed(workload: &'static str) -> impl FnOnce(TryReserveError) -> StrataError {
    move |source| StrataError::Workload { workload, source }
}

fn push_failed<T>(workload: &'static str) -> impl FnOnce(PushError<T>) -> StrataError {
    move |err| StrataError::Workload { workload, source: err.error }
}

fn expect_contents(workload: &'static str, matches: bool) -> Result<()> {
    if matches { Ok(()) } else { Err(StrataError::Mismatch(workload)) }
}

fn values(config: &Config) -> core::ops::Range<u64> {
    0..config.count as u64
}

fn dynarr_back<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<()> {
    const NAME: &str = "dynarr_back";

    let mut arr: DynArr<u64, &TrackingAllocator<A>> = DynArr::new_in(alloc);
    if config.lifo_only() {
        arr.try_reserve(config.count).map_err(failed(NAME))?;
    }

    for i in values(config) {
        arr.try_push_back(i).map_err(push_failed(NAME))?;
    }
    expect_contents(NAME, arr.iter().copied().eq(values(config)))?;

    let mut expected = values(config).rev();
    while let Some(value) = arr.try_pop_back() {
        expect_contents(NAME, expected.next() == Some(value))?;
    }
    expect_contents(NAME, expected.next().is_none())
}

fn dynarr_front<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<()> {
    const NAME: &str = "dynarr_front";

    let mut arr: DynArr<u64, &TrackingAllocator<A>> = DynArr::new_in(alloc);
    if config.lifo_only() {
        arr.try_reserve(config.count).map_err(failed(NAME))?;
    }

    for i in values(config) {
        arr.try_push_front(i).map_err(push_failed(NAME))?;
    }
    expect_contents(NAME, arr.iter().copied().eq(values(config).rev()))?;

    let mut cursor = arr.begin_mut();
    while !cursor.is_end() {
        *cursor.get_mut() += 1;
        cursor.move_next();
    }

    let mut expected = values(config).rev().map(|value| value + 1);
    while let Some(value) = arr.try_pop_front() {
        expect_contents(NAME, expected.next() == Some(value))?;
    }
    expect_contents(NAME, expected.next().is_none())
}

// Pushing and popping at the front keeps the node frees in LIFO order.
fn single_linked_list<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<()> {
    const NAME: &str = "single_linked_list";

    let mut list = SingleLinkedList::new_in(alloc);
    for i in values(config) {
        list.try_push_front(i).map_err(push_failed(NAME))?;
    }
    expect_contents(NAME, list.len() == config.count)?;
    expect_contents(NAME, list.iter().copied().eq(values(config).rev()))?;

    let mut expected = values(config).rev();
    while let Some(value) = list.try_pop_front() {
        expect_contents(NAME, expected.next() == Some(value))?;
    }
    expect_contents(NAME, list.is_empty())
}

fn double_linked_list<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<()> {
    const NAME: &str = "double_linked_list";

    let mut list = DoubleLinkedList::new_in(alloc);
    for i in values(config) {
        list.try_push_back(i).map_err(push_failed(NAME))?;
    }
    expect_contents(NAME, list.iter().copied().eq(values(config)))?;
    expect_contents(NAME, list.iter().rev().copied().eq(values(config).rev()))?;

    let mut expected = values(config).rev();
    while let Some(value) = list.try_pop_back() {
        expect_contents(NAME, expected.next() == Some(value))?;
    }
    expect_contents(NAME, list.is_empty())
}

fn stack<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<()> {
    const NAME: &str = "stack";

    let mut arr: DynArr<u64, &TrackingAllocator<A>> = DynArr::new_in(alloc);
    if config.lifo_only() {
        arr.try_reserve(config.count).map_err(failed(NAME))?;
    }

    let mut stack: Stack<u64, DynArr<u64, &TrackingAllocator<A>>> = Stack::from_sequence(arr);
    for i in values(config) {
        stack.try_push(i).map_err(push_failed(NAME))?;
    }
    expect_contents(NAME, stack.len() == config.count)?;

    let mut expected = values(config).rev();
    while let Some(value) = stack.try_pop() {
        expect_contents(NAME, expected.next() == Some(value))?;
    }
    expect_contents(NAME, stack.is_empty())
}

fn queue<A: Allocator>(config: &Config, alloc: &TrackingAllocator<A>) -> Result<()> {
    const NAME: &str = "queue";

    let mut queue: Queue<u64, SingleLinkedList<u64, &TrackingAllocator<A>>> = Queue::from_sequence(SingleLinkedList::new_in(alloc));
    for i in values(config) {
        queue.try_push(i).map_err(push_failed(NAME))?;
    }
    expect_contents(NAME, queue.front().copied() == values(config).next())?;

    let mut expected = values(config);
    while let Some(value) = queue.try_pop() {
        expect_contents(NAME, expected.next() == Some(value))?;
    }
    expect_contents(NAME, queue.is_empty())
}

#[cfg(test)]
mod tests {
    use strata_common::alloc::{
        composable::BudgetAllocator,
        primitives::{LinearAllocator, Mallocator, StackAllocator},
    };

    use super::*;
    use crate::{cli::AllocatorKind, config::STACK_MAX_ALIGN};

    fn config(allocator: AllocatorKind, count: usize) -> Config {
        Config {
            count,
            allocator,
            arena_size: strata_common::MiB(1),
            log_level: strata_logging::LogLevel::Info,
            log_file: None,
            quiet: true,
        }
    }

    #[test]
    fn malloc_runs_everything() {
        let config = config(AllocatorKind::Malloc, 100);
        let alloc = TrackingAllocator::new(Mallocator);
        let reports = run_all(&config, &alloc).unwrap();

        assert_eq!(reports.len(), 6);
        for report in &reports {
            assert_eq!(report.stats.live_allocs(), 0, "{}", report.name);
            assert_eq!(report.stats.live_bytes, 0, "{}", report.name);
        }

        // 100 elements double their way up to a capacity of 128
        let back = &reports[0];
        assert_eq!(back.name, "dynarr_back");
        assert_eq!(back.stats.allocs, 8);
        assert_eq!(back.stats.peak_bytes, (64 + 128) * 8);
        assert_eq!(back.stats.constructs, 100);

        // One node per element
        assert_eq!(reports[2].stats.allocs, 100);
        assert_eq!(reports[3].stats.allocs, 100);
    }

    #[test]
    fn stack_allocator_skips_queue() {
        let config = config(AllocatorKind::Stack, 100);
        let alloc = TrackingAllocator::new(StackAllocator::new(config.arena_size, STACK_MAX_ALIGN));
        let reports = run_all(&config, &alloc).unwrap();

        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(|report| report.name != "queue"));
        // Arrays allocate exactly once
        assert_eq!(reports[0].stats.allocs, 1);
        assert_eq!(alloc.inner().used(), 0);
    }

    #[test]
    fn linear_allocator_runs_everything() {
        let config = config(AllocatorKind::Linear, 50);
        let alloc = TrackingAllocator::new(LinearAllocator::new(config.arena_size));
        let reports = run_all(&config, &alloc).unwrap();
        assert_eq!(reports.len(), 6);
    }

    #[test]
    fn budget_failure_is_reported() {
        let config = config(AllocatorKind::Budget, 1000);
        let alloc = TrackingAllocator::new(BudgetAllocator::new(Mallocator, 256));
        let err = run_all(&config, &alloc).unwrap_err();

        assert!(matches!(err, StrataError::Workload { workload: "dynarr_back", source: TryReserveError::AllocError { .. } }));
        // Whatever was allocated before the failure has been handed back
        assert_eq!(alloc.inner().used(), 0);
    }

    #[test]
    fn empty_workloads() {
        let config = config(AllocatorKind::Malloc, 0);
        let alloc = TrackingAllocator::new(Mallocator);
        let reports = run_all(&config, &alloc).unwrap();
        assert!(reports.iter().all(|report| report.stats.allocs == 0));
    }
}
