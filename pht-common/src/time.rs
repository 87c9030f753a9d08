//! Timestamp utilities
//!
//! Every server-assigned timestamp (registration, draw, ballot, run
//! submission) comes from here so the services agree on the clock.

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_utc() {
        let t = now();
        assert_eq!(t.timezone(), Utc);
    }

    #[test]
    fn test_now_is_monotonic_enough() {
        let a = now();
        let b = now();
        assert!(b >= a);
    }
}
