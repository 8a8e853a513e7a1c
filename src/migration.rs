//! Migration of completed curves to the external venue

use curve_model::split_fee;
use log::{info, warn};
use solana_program::pubkey::Pubkey;

use crate::config::GlobalConfig;
use crate::curve::{BondingCurve, CurveState};
use crate::error::{LaunchpadError, Result};
use crate::events::LaunchpadEvent;
use crate::host::{Asset, Custody, LedgerOp, MigrationVenue, PoolHandle, PoolRequest};

/// Hands a completed curve's liquidity to a `MigrationVenue`
#[derive(Debug, Clone, Copy)]
pub struct MigrationCoordinator<'a> {
    config: &'a GlobalConfig,
}

impl<'a> MigrationCoordinator<'a> {
    pub fn new(config: &'a GlobalConfig) -> Self {
        Self { config }
    }

    /// Migrate `curve`
    ///
    /// The migration fee is taken from the real base reserve and paid to
    /// the fee recipient. The remaining lamports and every custodied token
    /// go to the pool the venue creates. Real reserves end at zero.
    ///
    /// # Errors
    /// * `NotCompleted` - curve is still Active
    /// * `AlreadyMigrated` - curve was migrated before
    /// * `Unauthorized` - caller is not the config authority
    /// * `Host` - the venue or the ledger failed
    pub fn migrate<H, V>(
        &self,
        curve: &mut BondingCurve,
        host: &mut H,
        venue: &mut V,
        caller: &Pubkey,
        journal: &mut Vec<LaunchpadEvent>,
    ) -> Result<PoolHandle>
    where
        H: Custody,
        V: MigrationVenue,
    {
        match curve.state {
            CurveState::Active => {
                warn!("migrate rejected: curve {} has not completed", curve.mint);
                return Err(LaunchpadError::NotCompleted);
            }
            CurveState::Migrated => {
                warn!("migrate rejected: curve {} already migrated", curve.mint);
                return Err(LaunchpadError::AlreadyMigrated);
            }
            CurveState::Completed => {}
        }
        if caller != &self.config.authority {
            warn!("migrate rejected: {} is not the authority", caller);
            return Err(LaunchpadError::Unauthorized);
        }

        let split = split_fee(curve.real_sol_reserve, self.config.migration_fee_percentage)?;
        let token_amount = curve.real_token_reserve;

        let mut next = curve.clone();
        next.real_sol_reserve = 0;
        next.real_token_reserve = 0;
        next.advance(CurveState::Migrated)?;

        let request = PoolRequest { mint: curve.mint, sol_amount: split.net, token_amount };
        let pool = venue.create_pool(&request)?;

        let custody_account = host.associated_account(&curve.key, &curve.mint);
        let vault_account = host.create_associated_account(&pool.vault_authority, &curve.mint)?;

        let mut ops = Vec::with_capacity(3);
        if split.fee > 0 {
            ops.push(LedgerOp::Transfer {
                asset: Asset::Native,
                from: curve.key,
                to: self.config.fee_recipient,
                amount: split.fee,
            });
        }
        if split.net > 0 {
            ops.push(LedgerOp::Transfer {
                asset: Asset::Native,
                from: curve.key,
                to: pool.vault_authority,
                amount: split.net,
            });
        }
        if token_amount > 0 {
            ops.push(LedgerOp::Transfer {
                asset: Asset::Token(curve.mint),
                from: custody_account,
                to: vault_account,
                amount: token_amount,
            });
        }
        host.execute(&ops)?;

        info!(
            "migrated {} to pool {}: sol={} tokens={} fee={}",
            curve.mint, pool.pool, split.net, token_amount, split.fee
        );
        journal.push(LaunchpadEvent::MigrationCompleted {
            mint: curve.mint,
            pool: pool.pool,
            sol_amount: split.net,
            token_amount,
            migration_fee: split.fee,
        });
        *curve = next;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSettings;
    use crate::host::{AssociatedAccounts, TokenLedger};
    use crate::keys::curve_key;
    use crate::memory::{InMemoryLedger, InMemoryVenue};

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn config(migration_fee: u8) -> GlobalConfig {
        let mut settings = ConfigSettings::default_for(key(1));
        settings.fee_recipient = key(9);
        settings.migration_fee_percentage = migration_fee;
        GlobalConfig::from(settings)
    }

    /// Completed curve holding `sol` lamports and `tokens` tokens in custody
    fn completed(config: &GlobalConfig, sol: u64, tokens: u64) -> (BondingCurve, InMemoryLedger) {
        let mint = key(3);
        let (address, bump) = curve_key(&key(7), &mint);
        let mut curve = BondingCurve::new(mint, address, bump, key(2), config);
        curve.real_sol_reserve = sol;
        curve.real_token_reserve = tokens;
        curve.advance(CurveState::Completed).unwrap();

        let mut ledger = InMemoryLedger::default();
        let custody = ledger.create_associated_account(&address, &mint).unwrap();
        ledger.execute(&[LedgerOp::MintTo { mint, to: custody, amount: tokens }]).unwrap();
        ledger.airdrop(&address, sol).unwrap();
        (curve, ledger)
    }

    #[test]
    fn test_migrate_moves_liquidity() {
        let config = config(2);
        let (mut curve, mut ledger) = completed(&config, 50_000_000_000, 200_000_000);
        let mut venue = InMemoryVenue::default();
        let mut journal = Vec::new();

        let pool = MigrationCoordinator::new(&config)
            .migrate(&mut curve, &mut ledger, &mut venue, &key(1), &mut journal)
            .unwrap();

        assert!(curve.is_migrated());
        assert_eq!(curve.real_sol_reserve, 0);
        assert_eq!(curve.real_token_reserve, 0);

        assert_eq!(ledger.lamports(&key(9)), 1_000_000_000);
        assert_eq!(ledger.lamports(&pool.vault_authority), 49_000_000_000);
        assert_eq!(ledger.lamports(&curve.key), 0);
        assert_eq!(ledger.token_balance(&pool.vault_authority, &curve.mint), 200_000_000);
        assert_eq!(ledger.balance(&ledger.associated_account(&curve.key, &curve.mint), Asset::Token(curve.mint)), 0);

        assert_eq!(venue.pools().len(), 1);
        assert_eq!(venue.pools()[0].0.sol_amount, 49_000_000_000);
        assert!(matches!(
            journal.as_slice(),
            [LaunchpadEvent::MigrationCompleted { migration_fee: 1_000_000_000, .. }]
        ));
    }

    #[test]
    fn test_migrate_once() {
        let config = config(0);
        let (mut curve, mut ledger) = completed(&config, 10, 10);
        let mut venue = InMemoryVenue::default();
        let coordinator = MigrationCoordinator::new(&config);

        coordinator.migrate(&mut curve, &mut ledger, &mut venue, &key(1), &mut Vec::new()).unwrap();
        let result = coordinator.migrate(&mut curve, &mut ledger, &mut venue, &key(1), &mut Vec::new());
        assert_eq!(result, Err(LaunchpadError::AlreadyMigrated));
        assert_eq!(venue.pools().len(), 1);
    }

    #[test]
    fn test_active_curve_not_completed() {
        let config = config(0);
        let mut curve = BondingCurve::new(key(3), key(4), 255, key(2), &config);
        let result = MigrationCoordinator::new(&config).migrate(
            &mut curve,
            &mut InMemoryLedger::default(),
            &mut InMemoryVenue::default(),
            &key(1),
            &mut Vec::new(),
        );
        assert_eq!(result, Err(LaunchpadError::NotCompleted));
    }

    #[test]
    fn test_non_authority_rejected() {
        let config = config(0);
        let (mut curve, mut ledger) = completed(&config, 10, 10);
        let before = (curve.clone(), ledger.clone());

        let result = MigrationCoordinator::new(&config).migrate(
            &mut curve,
            &mut ledger,
            &mut InMemoryVenue::default(),
            &key(2),
            &mut Vec::new(),
        );
        assert_eq!(result, Err(LaunchpadError::Unauthorized));
        assert_eq!((curve, ledger), before);
    }

    #[test]
    fn test_venue_failure_keeps_curve_completed() {
        let config = config(0);
        let (mut curve, mut ledger) = completed(&config, 10, 10);
        let before = (curve.clone(), ledger.clone());
        let mut journal = Vec::new();

        let result = MigrationCoordinator::new(&config).migrate(
            &mut curve,
            &mut ledger,
            &mut InMemoryVenue::closed(),
            &key(1),
            &mut journal,
        );
        assert!(matches!(result, Err(LaunchpadError::Host(_))));
        assert_eq!((curve, ledger), before);
        assert!(journal.is_empty());
    }
}
