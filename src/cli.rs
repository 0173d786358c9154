use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strata_logging::LogLevel;

/// Allocator backing the workloads
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum AllocatorKind {
    /// General purpose heap allocator
    Malloc,
    /// Bump allocator that frees in LIFO order
    Stack,
    /// Bump allocator that never frees
    Linear,
    /// Heap allocator with a byte budget of `--arena-size`
    Budget,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogLevelArg {
    Severe,
    Error,
    Warning,
    Info,
    Verbose,
    Debug,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Severe  => LogLevel::Severe,
            LogLevelArg::Error   => LogLevel::Error,
            LogLevelArg::Warning => LogLevel::Warning,
            LogLevelArg::Info    => LogLevel::Info,
            LogLevelArg::Verbose => LogLevel::Verbose,
            LogLevelArg::Debug   => LogLevel::Debug,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "strata", about = "Exercise allocator-aware containers against different allocators")]
pub struct Args {
    /// Number of elements pushed by each workload
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub count: usize,

    /// Allocator used by the containers
    #[arg(short = 'a', long, value_enum, default_value_t = AllocatorKind::Malloc)]
    pub allocator: AllocatorKind,

    /// Size in bytes of the arena for the stack and linear allocators, or the budget for the budget allocator
    #[arg(long, value_name = "BYTES", default_value_t = strata_common::MiB(1))]
    pub arena_size: usize,

    /// Maximum level of messages that get logged
    #[arg(short = 'l', long, value_enum, default_value_t = LogLevelArg::Info)]
    pub log_level: LogLevelArg,

    /// Also write the log to FILE
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Don't log to the console
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
