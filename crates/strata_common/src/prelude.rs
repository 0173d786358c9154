pub use crate::bytes::*;

pub use crate::alloc::{Allocator, primitives::Mallocator};
pub use crate::collections::{DynArr, SingleLinkedList, DoubleLinkedList, Stack, Queue, Sequence};
pub use crate::dynarr;
