//! Error types for the `colony-core` crate.
//!
//! [`ColonyError`] separates bad input ([`ColonyError::InvalidArgument`])
//! from illegal once-only transitions ([`ColonyError::InvalidState`]). Both
//! are surfaced to the caller immediately and never retried. Transport
//! failures are deliberately absent: sync is best-effort and every later
//! sync supersedes a lost one.

use colony_world::WorldError;

/// Errors raised by colony state operations.
#[derive(Debug, thiserror::Error)]
pub enum ColonyError {
    /// Missing or invalid input, e.g. a nil player id.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// The operation violates a once-only transition, e.g. setting the
    /// center twice.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// Which transition was violated.
        reason: String,
    },

    /// A persisted record could not be decoded.
    #[error("malformed record: {reason}")]
    MalformedRecord {
        /// What was malformed.
        reason: String,
    },

    /// The world oracle rejected a request; for spawning this means the
    /// configured agent kind does not exist, which is a deployment error.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

impl ColonyError {
    /// Shorthand for [`ColonyError::InvalidArgument`].
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ColonyError::InvalidState`].
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }
}
