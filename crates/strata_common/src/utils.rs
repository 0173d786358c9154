use core::{fmt, ptr};

use strata_logging::{log_severe, LogCategory};

pub const LOG_CAT : LogCategory = LogCategory::new("Common");

/// Check a caller-side contract, panicking when it doesn't hold.
///
/// Use this for contracts that protect memory safety, these are checked in every build.
#[macro_export]
macro_rules! precondition {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::utils::precondition_failed(format_args!($($arg)+));
        }
    };
}

/// Check a caller-side contract in builds with `debug_assertions`.
///
/// Violating a debug precondition never results in undefined behavior, only in a wrong answer.
#[macro_export]
macro_rules! debug_precondition {
    ($cond:expr, $($arg:tt)+) => {
        if $crate::utils::DEBUG_PRECONDITIONS && !$cond {
            $crate::utils::precondition_failed(format_args!($($arg)+));
        }
    };
}

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        #[doc(hidden)]
        pub const DEBUG_PRECONDITIONS : bool = true;
    } else {
        #[doc(hidden)]
        pub const DEBUG_PRECONDITIONS : bool = false;
    }
}

#[doc(hidden)]
#[cold]
#[inline(never)]
#[track_caller]
pub fn precondition_failed(args: fmt::Arguments) -> ! {
    log_severe!(LOG_CAT, precondition_failed, "Precondition violated: {}", args);
    if let Some(logger) = strata_logging::get_logger() {
        logger.flush();
    }
    panic!("{}", args);
}

/// Check if two references point to the same object
#[inline]
pub fn same_object<T: ?Sized>(a: &T, b: &T) -> bool {
    ptr::addr_eq(a as *const T, b as *const T)
}

#[cfg(test)]
mod tests {
    #[test]
    fn precondition_holds() {
        precondition!(1 + 1 == 2, "math is broken");
        debug_precondition!(true, "never fires");
    }

    #[test]
    #[should_panic(expected = "index 3 out of bounds")]
    fn precondition_fails() {
        let idx = 3;
        precondition!(idx < 2, "index {} out of bounds", idx);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "diagnostic")]
    fn debug_precondition_fails_in_debug() {
        debug_precondition!(false, "diagnostic");
    }

    #[test]
    fn same_object_compares_addresses() {
        let a = 1;
        let b = 1;
        assert!(super::same_object(&a, &a));
        assert!(!super::same_object(&a, &b));
    }
}
