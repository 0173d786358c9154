mod fallback_allocator;
mod tracking_allocator;
mod budget_allocator;

pub use fallback_allocator::*;
pub use tracking_allocator::*;
pub use budget_allocator::*;
