use std::path::PathBuf;

use strata_logging::LogLevel;

use crate::cli::{AllocatorKind, Args};
use crate::error::{Result, StrataError};

/// Largest alignment the stack allocator hands out
pub const STACK_MAX_ALIGN: usize = 16;

/// Runtime configuration derived from CLI arguments
#[derive(Clone, Debug)]
pub struct Config {
    pub count:      usize,
    pub allocator:  AllocatorKind,
    pub arena_size: usize,
    pub log_level:  LogLevel,
    pub log_file:   Option<PathBuf>,
    pub quiet:      bool,
}

impl Config {
    /// Build configuration from parsed CLI arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.allocator != AllocatorKind::Malloc && args.arena_size == 0 {
            return Err(StrataError::InvalidArgument(format!("the {:?} allocator needs a non-zero arena size", args.allocator)));
        }

        Ok(Config {
            count: args.count,
            allocator: args.allocator,
            arena_size: args.arena_size,
            log_level: args.log_level.into(),
            log_file: args.log_file.clone(),
            quiet: args.quiet,
        })
    }

    /// Whether the allocator can only free in the reverse order of allocation
    pub fn lifo_only(&self) -> bool {
        self.allocator == AllocatorKind::Stack
    }
}
