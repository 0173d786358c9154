mod alloc;

pub mod primitives;
pub mod composable;

pub use alloc::*;
pub use std::alloc::Layout;
