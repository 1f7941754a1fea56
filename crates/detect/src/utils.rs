//! Utility macros shared by the engine modules.

/// Returns early with an error if a condition is not met.
///
/// Works like `assert!`, except it returns `Err($error)` instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(id < capacity, RegistrationError::keyword_id_out_of_range(id, capacity));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    // repeated init within one test binary fails and is ignored
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();
}
