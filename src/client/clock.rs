//! Time port — monotonic milliseconds and blocking delays.
//!
//! The liveness reporter gates its writes on elapsed time and the retry
//! helper sleeps between attempts; both consume this trait instead of a
//! platform timer so that tests can script time.

/// Monotonic clock capability.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (boot). Monotonic.
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds.
    fn sleep_ms(&self, ms: u32);
}
