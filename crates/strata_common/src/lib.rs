//! Allocator-aware containers.
//!
//! The crate is split in two halves:
//! - [`alloc`]: the [`Allocator`](alloc::Allocator) trait and a set of primitive and composable allocators.
//! - [`collections`]: containers that take an allocator as a generic parameter, i.e. [`DynArr`](collections::DynArr),
//!   the linked lists and the [`Stack`](collections::Stack)/[`Queue`](collections::Queue) adapters.

mod bytes;

pub mod utils;
pub mod alloc;
pub mod collections;
pub mod prelude;

pub use bytes::*;
