//! Error types for the `colony-world` crate.

use colony_types::AgentRef;

/// Errors that can occur at the world oracle boundary.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The configured agent kind is not registered with the world.
    #[error("unknown agent kind: {0}")]
    UnknownAgentKind(String),

    /// An agent reference does not resolve to a live entity.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentRef),
}
