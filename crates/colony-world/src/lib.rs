//! World geometry and the world oracle boundary for colony management.
//!
//! The colony layer treats the voxel world as an external collaborator. This
//! crate defines that boundary ([`WorldOracle`]), the pure border geometry
//! used to draw a colony's limits, and a deterministic [`FlatWorld`] that
//! implements the oracle for the headless engine and for tests.
//!
//! # Modules
//!
//! - [`building`] -- [`BuildingInfo`], the client's view of finished buildings.
//! - [`error`] -- Error types for world-oracle operations.
//! - [`flat_world`] -- Seeded flat-terrain [`FlatWorld`].
//! - [`geometry`] -- [`compute_border`] grid snapping.
//! - [`oracle`] -- The [`WorldOracle`] trait and [`AgentSnapshot`].

pub mod building;
pub mod error;
pub mod flat_world;
pub mod geometry;
pub mod oracle;

// Re-export primary types at crate root.
pub use building::BuildingInfo;
pub use error::WorldError;
pub use flat_world::{COLONIST_KIND, FlatWorld};
pub use geometry::{Border, DEFAULT_BORDER_SIZE, compute_border};
pub use oracle::{AgentSnapshot, WorldOracle};
