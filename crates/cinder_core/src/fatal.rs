//! # Fatal Hook
//!
//! The only channel for memory-corruption-class invariant violations.
//!
//! Recoverable conditions (capacity exhaustion, missing components) are
//! returned as [`EcsError`](crate::EcsError). Anything routed through here
//! means an arena index was forged, reused after release, or overran its
//! buffer. Execution cannot continue safely, so the hook never returns.
//!
//! The release profile sets `panic = "abort"`, which turns the panic raised
//! here into process termination.

use std::fmt;

/// Numeric code identifying the subsystem whose invariant was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FatalCode {
    /// A pool handle outside the pool, or one not currently allocated.
    PoolRelease = 100,
    /// A stack allocation would pass the end of the buffer.
    StackOverflow = 200,
    /// A stack marker is ahead of the cursor or from an earlier epoch.
    StackMarker = 201,
    /// A stack span was freed by a rollback or a full reset.
    StackSpan = 202,
    /// Sparse and dense arrays disagree.
    StorageCorrupted = 300,
}

impl FatalCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for FatalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.code(), self)
    }
}

/// Reports a fatal invariant violation and terminates.
///
/// # Panics
///
/// Always. That is the point.
#[cold]
#[track_caller]
pub fn fatal(code: FatalCode, reason: &str) -> ! {
    tracing::error!(code = code.code(), reason, "fatal invariant violation");
    panic!("fatal error {code}: {reason}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped_by_subsystem() {
        assert_eq!(FatalCode::PoolRelease.code() / 100, 1);
        assert_eq!(FatalCode::StackOverflow.code() / 100, 2);
        assert_eq!(FatalCode::StackSpan.code() / 100, 2);
        assert_eq!(FatalCode::StorageCorrupted.code() / 100, 3);
    }

    #[test]
    #[should_panic(expected = "fatal error 100")]
    fn test_fatal_panics_with_code() {
        fatal(FatalCode::PoolRelease, "handle 9 outside pool of 4");
    }
}
