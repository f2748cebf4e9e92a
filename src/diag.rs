//! Misuse and invariant diagnostics.
//!
//! With the `misuse-warnings` feature (on by default) these macros forward
//! to the `log` facade under the `prime_hashtable` target. Without it they
//! expand to nothing, so disabled warnings cost nothing at runtime.

/// Report a caller mistake that the table tolerates, such as operating on
/// a destroyed handle.
macro_rules! misuse {
    ($($arg:tt)+) => {{
        #[cfg(feature = "misuse-warnings")]
        {
            log::warn!(target: "prime_hashtable", $($arg)+);
        }
    }};
}

/// Report a broken internal invariant. The table keeps going.
macro_rules! invariant_broken {
    ($($arg:tt)+) => {{
        #[cfg(feature = "misuse-warnings")]
        {
            log::error!(target: "prime_hashtable", $($arg)+);
        }
    }};
}

pub(crate) use invariant_broken;
pub(crate) use misuse;
