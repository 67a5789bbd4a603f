//! Colony state synchronization between an authoritative server and its
//! client mirrors.
//!
//! The server side owns the truth and only ever talks to the network from its
//! tick: mutations set a dirty flag, and the next tick sends one full-state
//! overwrite. The client side applies those overwrites and layers its own
//! prediction state on top.
//!
//! # Modules
//!
//! - [`server`] -- [`ColonyServerState`]: center, population, game mode,
//!   colonist spawning and persistence.
//! - [`areas`] -- [`AreaRegistry`]: automation areas refreshed one at a time.
//! - [`scheduler`] -- [`RoundRobin`]: the pure "which area next" decision.
//! - [`session`] -- [`ColonySession`]: the explicit per-player handle that
//!   routes requests and drives both server-side ticks.
//! - [`client`] -- [`ColonyClientState`]: the mirror, center prediction,
//!   agent selection and building queries.
//! - [`area_mirror`] -- client-side copy of area snapshots.
//! - [`interaction`] -- agent-follow and combat box-selection state.
//! - [`requirements`] -- weighted building and block requirement checks.
//! - [`professions`] -- hooks for profession business rules.
//! - [`presentation`] -- prompt and render hooks, plus the prompt lock.
//! - [`transport`] -- send-side traits for both directions.
//! - [`config`] -- `colony-config.yaml` loading.
//! - [`error`] -- [`ColonyError`].
//!
//! [`ColonyServerState`]: server::ColonyServerState
//! [`AreaRegistry`]: areas::AreaRegistry
//! [`RoundRobin`]: scheduler::RoundRobin
//! [`ColonySession`]: session::ColonySession
//! [`ColonyClientState`]: client::ColonyClientState
//! [`ColonyError`]: error::ColonyError

pub mod area_mirror;
pub mod areas;
pub mod client;
pub mod config;
pub mod error;
pub mod interaction;
pub mod presentation;
pub mod professions;
pub mod requirements;
pub mod scheduler;
pub mod server;
pub mod session;
pub mod transport;

pub use area_mirror::AreaMirror;
pub use areas::{AreaRegistry, AreasTick, MAX_AREA_SIDE, RefreshState, ServerArea};
pub use client::{ClientContext, ColonyClientState};
pub use config::{ColonyConfig, ConfigError};
pub use error::ColonyError;
pub use presentation::{PLACE_CENTER_PROMPT, Presentation, PresentationLog, PromptSlot};
pub use professions::{ProfessionHooks, ProfessionRoster};
pub use scheduler::RoundRobin;
pub use server::ColonyServerState;
pub use session::{ColonySession, SessionTick};
pub use transport::{ClientOutbox, ClientTransport, ServerOutbox, ServerTransport};
