//! Launchpad engine facade
//!
//! Owns the config store, the curve registry and the event journal, and
//! routes each operation to its engine. Host collaborators are passed in
//! per call; the launchpad never holds on to them.

use curve_model::{progress_bps, spot_price, Direction, SwapQuote};
use log::info;
use solana_program::pubkey::Pubkey;

use crate::config::{ConfigSettings, ConfigStore, GlobalConfig};
use crate::curve::BondingCurve;
use crate::error::Result;
use crate::events::LaunchpadEvent;
use crate::host::{Custody, MetadataRegistry, MigrationVenue, PoolHandle, TokenMetadata};
use crate::keys;
use crate::migration::MigrationCoordinator;
use crate::registry::CurveRegistry;
use crate::swap::{SwapEngine, SwapRequest};

/// Bonding-curve launchpad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launchpad {
    program_id: Pubkey,
    store: ConfigStore,
    registry: CurveRegistry,
    events: Vec<LaunchpadEvent>,
}

impl Launchpad {
    /// Launchpad deriving its keys under `program_id`; `deployer` may
    /// write the first config
    pub fn new(program_id: Pubkey, deployer: Pubkey) -> Self {
        info!("launchpad {} created, deployer={}", program_id, deployer);
        Self {
            program_id,
            store: ConfigStore::new(deployer),
            registry: CurveRegistry::new(program_id),
            events: Vec::new(),
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Key of the global config
    pub fn config_key(&self) -> Pubkey {
        keys::config_key(&self.program_id).0
    }

    /// Key the curve for `mint` has, or would have once launched
    pub fn curve_key(&self, mint: &Pubkey) -> Pubkey {
        keys::curve_key(&self.program_id, mint).0
    }

    pub fn config(&self) -> Option<&GlobalConfig> {
        self.store.get()
    }

    pub fn registry(&self) -> &CurveRegistry {
        &self.registry
    }

    pub fn curve(&self, mint: &Pubkey) -> Option<&BondingCurve> {
        self.registry.curve(mint)
    }

    pub fn curve_by_key(&self, key: &Pubkey) -> Option<&BondingCurve> {
        self.registry.curve_by_key(key)
    }

    pub fn curves(&self) -> impl Iterator<Item = &BondingCurve> {
        self.registry.curves()
    }

    /// Events of every committed operation, oldest first
    pub fn events(&self) -> &[LaunchpadEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LaunchpadEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================
    // Operations
    // ========================================

    /// Write the global config; see `ConfigStore::configure`
    pub fn configure(&mut self, caller: &Pubkey, settings: ConfigSettings) -> Result<&GlobalConfig> {
        let config = self.store.configure(caller, settings)?;
        self.events.push(LaunchpadEvent::ConfigUpdated {
            authority: config.authority,
            fee_recipient: config.fee_recipient,
            curve_limit: config.curve_limit,
            buy_fee_percentage: config.buy_fee_percentage,
            sell_fee_percentage: config.sell_fee_percentage,
            migration_fee_percentage: config.migration_fee_percentage,
        });
        Ok(config)
    }

    /// Launch a token on a new curve; see `CurveRegistry::launch`
    ///
    /// Fails with `NotConfigured` before the first `configure`.
    pub fn launch<H, M>(
        &mut self,
        host: &mut H,
        metadata_registry: &mut M,
        creator: &Pubkey,
        mint: &Pubkey,
        metadata: TokenMetadata,
    ) -> Result<&BondingCurve>
    where
        H: Custody,
        M: MetadataRegistry,
    {
        let config = self.store.require()?;
        self.registry
            .launch(config, host, metadata_registry, creator, mint, metadata, &mut self.events)
    }

    /// Trade against the curve of `mint`; see `SwapEngine::swap`
    pub fn swap<H: Custody>(&mut self, host: &mut H, mint: &Pubkey, request: &SwapRequest) -> Result<SwapQuote> {
        let config = self.store.require()?;
        let curve = self.registry.require_mut(mint)?;
        SwapEngine::new(config).swap(curve, host, request, &mut self.events)
    }

    /// Spend `lamports` on tokens of `mint`
    pub fn buy<H: Custody>(
        &mut self,
        host: &mut H,
        trader: &Pubkey,
        mint: &Pubkey,
        lamports: u64,
        minimum_tokens_out: u64,
    ) -> Result<SwapQuote> {
        self.swap(host, mint, &SwapRequest::buy(*trader, lamports, minimum_tokens_out))
    }

    /// Sell `tokens` of `mint` for lamports
    pub fn sell<H: Custody>(
        &mut self,
        host: &mut H,
        trader: &Pubkey,
        mint: &Pubkey,
        tokens: u64,
        minimum_lamports_out: u64,
    ) -> Result<SwapQuote> {
        self.swap(host, mint, &SwapRequest::sell(*trader, tokens, minimum_lamports_out))
    }

    /// Move a completed curve to the venue; see `MigrationCoordinator::migrate`
    pub fn migrate<H, V>(&mut self, host: &mut H, venue: &mut V, caller: &Pubkey, mint: &Pubkey) -> Result<PoolHandle>
    where
        H: Custody,
        V: MigrationVenue,
    {
        let config = self.store.require()?;
        let curve = self.registry.require_mut(mint)?;
        MigrationCoordinator::new(config).migrate(curve, host, venue, caller, &mut self.events)
    }

    // ========================================
    // Read-only pricing
    // ========================================

    /// Price a trade on the current reserves without executing it
    pub fn quote(&self, mint: &Pubkey, direction: Direction, amount_in: u64) -> Result<SwapQuote> {
        let config = self.store.require()?;
        let curve = self.registry.require(mint)?;
        SwapEngine::new(config).quote(curve, direction, amount_in)
    }

    /// Spot price of `mint`, lamports per token base unit scaled by 1e9
    pub fn spot_price(&self, mint: &Pubkey) -> Result<u64> {
        let curve = self.registry.require(mint)?;
        Ok(spot_price(&curve.reserves())?)
    }

    /// How far the curve of `mint` is toward completion, in bps
    pub fn progress_bps(&self, mint: &Pubkey) -> Result<u64> {
        let config = self.store.require()?;
        let curve = self.registry.require(mint)?;
        Ok(progress_bps(curve.real_sol_reserve, config.curve_limit))
    }
}
