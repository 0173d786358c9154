mod mallocator;
mod linear_allocator;
mod stack_allocator;

pub use mallocator::*;
pub use linear_allocator::*;
pub use stack_allocator::*;
