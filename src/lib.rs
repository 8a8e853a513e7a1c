//! Bonding-curve token launchpad engine
//!
//! Tokens launch on a per-mint constant-product curve priced from virtual
//! reserves. Trading runs until the curve's real base reserve reaches the
//! configured limit; the curve then completes and its liquidity can be
//! migrated, once, to an external venue.
//!
//! State lives in a `Launchpad`: one authority-gated `GlobalConfig`, a
//! registry of `BondingCurve`s keyed by mint, and a journal of events.
//! Custody, token metadata and the venue are host capabilities (see
//! [`host`]) passed into each operation; [`memory`] provides in-memory
//! versions of all of them.
//!
//! Every operation either commits in full or fails with a typed error and
//! no effect on launchpad state.

#![forbid(unsafe_code)]

pub mod completion;
pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod keys;
pub mod memory;
pub mod migration;
pub mod registry;
pub mod swap;

pub use completion::CompletionMonitor;
pub use config::{ConfigSettings, ConfigStore, GlobalConfig, SettingsError};
pub use curve::{BondingCurve, CurveState};
pub use curve_model::{Direction, Reserves, SwapQuote};
pub use engine::Launchpad;
pub use error::{HostError, LaunchpadError, Result};
pub use events::LaunchpadEvent;
pub use host::{
    AssociatedAccounts, Asset, Custody, LedgerOp, MetadataRegistry, MigrationVenue, PoolHandle,
    PoolRequest, TokenLedger, TokenMetadata,
};
pub use memory::{InMemoryLedger, InMemoryMetadata, InMemoryVenue};
pub use migration::MigrationCoordinator;
pub use registry::CurveRegistry;
pub use swap::{SwapEngine, SwapRequest};
