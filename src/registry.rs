//! Curve registry: launch and lookup of bonding curves

use std::collections::BTreeMap;

use log::{info, warn};
use solana_program::pubkey::Pubkey;

use crate::config::GlobalConfig;
use crate::curve::BondingCurve;
use crate::error::{LaunchpadError, Result};
use crate::events::LaunchpadEvent;
use crate::host::{Asset, Custody, LedgerOp, MetadataRegistry, TokenMetadata};
use crate::keys::curve_key;

/// Every curve this launchpad has created, keyed by mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveRegistry {
    program_id: Pubkey,
    curves: BTreeMap<Pubkey, BondingCurve>,
    /// Curve key -> mint
    by_key: BTreeMap<Pubkey, Pubkey>,
}

impl CurveRegistry {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id, curves: BTreeMap::new(), by_key: BTreeMap::new() }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn curve(&self, mint: &Pubkey) -> Option<&BondingCurve> {
        self.curves.get(mint)
    }

    pub fn curve_by_key(&self, key: &Pubkey) -> Option<&BondingCurve> {
        self.by_key.get(key).and_then(|mint| self.curves.get(mint))
    }

    /// Curve for `mint`, or `CurveNotFound`
    pub fn require(&self, mint: &Pubkey) -> Result<&BondingCurve> {
        self.curves.get(mint).ok_or(LaunchpadError::CurveNotFound(*mint))
    }

    pub(crate) fn require_mut(&mut self, mint: &Pubkey) -> Result<&mut BondingCurve> {
        self.curves.get_mut(mint).ok_or(LaunchpadError::CurveNotFound(*mint))
    }

    /// Curves in mint order
    pub fn curves(&self) -> impl Iterator<Item = &BondingCurve> {
        self.curves.values()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Create the bonding curve for `mint`
    ///
    /// Mints the full supply to the creator's associated account, moves the
    /// initial real token reserve into the curve's custody and registers the
    /// metadata. The curve is only recorded once the ledger batch applied.
    ///
    /// Metadata is registered before the batch runs. If the batch then
    /// fails, the registration stays behind and undoing it is up to the
    /// host.
    ///
    /// # Errors
    /// * `CurveAlreadyExists` - `mint` already has a curve
    /// * `Host` - a collaborator failed
    #[allow(clippy::too_many_arguments)]
    pub fn launch<H, M>(
        &mut self,
        config: &GlobalConfig,
        host: &mut H,
        metadata_registry: &mut M,
        creator: &Pubkey,
        mint: &Pubkey,
        metadata: TokenMetadata,
        journal: &mut Vec<LaunchpadEvent>,
    ) -> Result<&BondingCurve>
    where
        H: Custody,
        M: MetadataRegistry,
    {
        if self.curves.contains_key(mint) {
            warn!("launch rejected: curve for {} already exists", mint);
            return Err(LaunchpadError::CurveAlreadyExists(*mint));
        }

        let (key, bump) = curve_key(&self.program_id, mint);
        let curve = BondingCurve::new(*mint, key, bump, *creator, config);

        metadata_registry.register(mint, &metadata)?;
        let creator_account = host.create_associated_account(creator, mint)?;
        let custody_account = host.create_associated_account(&key, mint)?;

        let mut ops = vec![LedgerOp::MintTo { mint: *mint, to: creator_account, amount: curve.token_total_supply }];
        if curve.real_token_reserve > 0 {
            ops.push(LedgerOp::Transfer {
                asset: Asset::Token(*mint),
                from: creator_account,
                to: custody_account,
                amount: curve.real_token_reserve,
            });
        }
        host.execute(&ops)?;

        info!(
            "launched {} ({}) curve={} creator={} supply={}",
            metadata.symbol, mint, key, creator, curve.token_total_supply
        );
        journal.push(LaunchpadEvent::TokenLaunched {
            mint: *mint,
            curve: key,
            creator: *creator,
            name: metadata.name,
            symbol: metadata.symbol,
            uri: metadata.uri,
            total_supply: curve.token_total_supply,
        });

        self.by_key.insert(key, *mint);
        Ok(&*self.curves.entry(*mint).or_insert(curve))
    }
}
