use strata_common::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("A logger was already installed")]
    LoggerAlreadySet,

    #[error("The logger has no free writer slots left")]
    TooManyWriters,

    #[error("Workload '{workload}' failed: {source}")]
    Workload {
        workload: &'static str,
        #[source]
        source:   TryReserveError,
    },

    #[error("Workload '{0}' produced unexpected contents")]
    Mismatch(&'static str),

    #[error("Workload '{workload}' leaked {allocs} allocation(s)")]
    Leak {
        workload: &'static str,
        allocs:   usize,
    },
}

pub type Result<T> = std::result::Result<T, StrataError>;
