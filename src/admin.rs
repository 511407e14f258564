//! Grown-up gate in front of the dev dashboard.
//!
//! A shared passcode keeps kids out of the admin tools; it is not an account
//! system. The comparison still runs in time independent of where the first
//! mismatch is.

use crate::error::Rejection;

/// Compare two byte strings without early exit on the first difference.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = u32::from(a.len() != b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= u32::from(x ^ y);
    }
    diff == 0
}

pub fn verify(entered: &str, expected: &str) -> Result<(), Rejection> {
    if constant_time_eq(entered.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        crate::logging::warn("dev unlock: wrong passcode");
        Err(Rejection::InvalidPasscode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_whole_strings() {
        assert!(constant_time_eq(b"EARTHADMIN2025", b"EARTHADMIN2025"));
        assert!(!constant_time_eq(b"EARTHADMIN2025", b"EARTHADMIN2024"));
        assert!(!constant_time_eq(b"EARTH", b"EARTHADMIN2025"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn passcode_is_case_sensitive() {
        assert_eq!(verify("earthadmin2025", "EARTHADMIN2025"), Err(Rejection::InvalidPasscode));
        assert_eq!(verify("EARTHADMIN2025", "EARTHADMIN2025"), Ok(()));
    }
}
