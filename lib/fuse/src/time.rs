use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the epoch, for log timestamps and the like.
pub fn timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Closed timelike curve, reality compromised")
        .as_secs()
}

/// The current clock's nanoseconds, truncated to 32 bits. Used as the default
/// simulation seed when none is given on the command line.
pub fn default_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Closed timelike curve, reality compromised")
        .as_nanos() as u32
}
