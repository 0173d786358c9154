mod cli;
mod config;
mod error;
mod workloads;

use std::fs::File;

use clap::Parser;
use strata_common::alloc::{
    Allocator,
    composable::{BudgetAllocator, TrackingAllocator},
    primitives::{LinearAllocator, Mallocator, StackAllocator},
};
use strata_logging::{get_logger, log_info, set_logger, LogCategory, Logger};

use cli::{AllocatorKind, Args};
use config::{Config, STACK_MAX_ALIGN};
use error::{Result, StrataError};

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

fn main() {
    if let Err(e) = run() {
        if let Some(logger) = get_logger() {
            logger.flush();
        }
        eprintln!("strata: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;
    setup_logger(&config)?;

    log_info!(LOG_CAT, "Running workloads with {} elements on the {:?} allocator", config.count, config.allocator);
    match config.allocator {
        AllocatorKind::Malloc => run_with(&config, Mallocator)?,
        AllocatorKind::Stack  => run_with(&config, StackAllocator::new(config.arena_size, STACK_MAX_ALIGN))?,
        AllocatorKind::Linear => run_with(&config, LinearAllocator::new(config.arena_size))?,
        AllocatorKind::Budget => run_with(&config, BudgetAllocator::new(Mallocator, config.arena_size))?,
    }

    if let Some(logger) = get_logger() {
        logger.flush();
    }
    Ok(())
}

fn setup_logger(config: &Config) -> Result<()> {
    let logger = Logger::new();
    logger.set_max_level(config.log_level);
    logger.set_log_to_console(!config.quiet);

    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        logger.add_writer(Box::new(file)).map_err(|_| StrataError::TooManyWriters)?;
    }

    set_logger(logger).map_err(|_| StrataError::LoggerAlreadySet)?;
    Ok(())
}

fn run_with<A: Allocator>(config: &Config, alloc: A) -> Result<()> {
    let alloc = TrackingAllocator::new(alloc);
    let reports = workloads::run_all(config, &alloc)?;

    let total_allocs: usize = reports.iter().map(|report| report.stats.allocs).sum();
    log_info!(LOG_CAT, "Finished {} workloads, {} allocations in total", reports.len(), total_allocs);
    if let Some(busiest) = reports.iter().max_by_key(|report| report.stats.peak_bytes) {
        log_info!(LOG_CAT, "Highest peak: {} B in '{}'", busiest.stats.peak_bytes, busiest.name);
    }
    Ok(())
}
