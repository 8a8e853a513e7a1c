//! Bonding curve account and its lifecycle

use curve_model::Reserves;
use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::config::GlobalConfig;
use crate::error::{LaunchpadError, Result};
use crate::keys::base58;

/// Lifecycle of a curve
///
/// Moves forward only: Active -> Completed -> Migrated, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CurveState {
    /// Trading
    Active,
    /// Curve limit reached, waiting for migration
    Completed,
    /// Liquidity handed to the external venue
    Migrated,
}

impl CurveState {
    /// The state this one may move to, if any
    pub fn next(self) -> Option<CurveState> {
        match self {
            CurveState::Active => Some(CurveState::Completed),
            CurveState::Completed => Some(CurveState::Migrated),
            CurveState::Migrated => None,
        }
    }

    /// Validate a move to `to`
    pub fn transition(self, to: CurveState) -> Result<CurveState> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(LaunchpadError::InvalidStateTransition { from: self, to })
        }
    }

    pub fn is_trading(self) -> bool {
        self == CurveState::Active
    }
}

/// Per-mint bonding curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondingCurve {
    #[serde(with = "base58")]
    pub mint: Pubkey,
    /// Derived curve key (also the custody owner)
    #[serde(with = "base58")]
    pub key: Pubkey,
    pub bump: u8,
    #[serde(with = "base58")]
    pub creator: Pubkey,

    // Virtual reserves shape the price
    pub virtual_token_reserve: u64,
    pub virtual_sol_reserve: u64,

    // Real reserves are held in custody
    pub real_token_reserve: u64,
    pub real_sol_reserve: u64,

    pub token_total_supply: u64,
    pub state: CurveState,
}

impl BondingCurve {
    /// Fresh Active curve seeded from the config's initial reserves
    pub fn new(mint: Pubkey, key: Pubkey, bump: u8, creator: Pubkey, config: &GlobalConfig) -> Self {
        Self {
            mint,
            key,
            bump,
            creator,
            virtual_token_reserve: config.initial_virtual_token_reserve,
            virtual_sol_reserve: config.initial_virtual_sol_reserve,
            real_token_reserve: config.initial_real_token_reserve,
            real_sol_reserve: 0,
            token_total_supply: config.total_token_supply,
            state: CurveState::Active,
        }
    }

    pub fn reserves(&self) -> Reserves {
        Reserves {
            virtual_token: self.virtual_token_reserve,
            virtual_sol: self.virtual_sol_reserve,
            real_token: self.real_token_reserve,
            real_sol: self.real_sol_reserve,
        }
    }

    pub fn set_reserves(&mut self, reserves: Reserves) {
        self.virtual_token_reserve = reserves.virtual_token;
        self.virtual_sol_reserve = reserves.virtual_sol;
        self.real_token_reserve = reserves.real_token;
        self.real_sol_reserve = reserves.real_sol;
    }

    /// Move the lifecycle one step forward
    pub fn advance(&mut self, to: CurveState) -> Result<()> {
        self.state = self.state.transition(to)?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.state.is_trading()
    }

    pub fn is_completed(&self) -> bool {
        self.state == CurveState::Completed
    }

    pub fn is_migrated(&self) -> bool {
        self.state == CurveState::Migrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert_eq!(CurveState::Active.transition(CurveState::Completed), Ok(CurveState::Completed));
        assert_eq!(CurveState::Completed.transition(CurveState::Migrated), Ok(CurveState::Migrated));
    }

    #[test]
    fn test_rejected_transitions() {
        let all = [CurveState::Active, CurveState::Completed, CurveState::Migrated];
        for from in all {
            for to in all {
                if from.next() == Some(to) {
                    continue;
                }
                assert_eq!(
                    from.transition(to),
                    Err(LaunchpadError::InvalidStateTransition { from, to })
                );
            }
        }
    }

    #[test]
    fn test_advance_keeps_state_on_error() {
        let config = GlobalConfig::from(crate::config::ConfigSettings::default_for(Pubkey::new_from_array([1; 32])));
        let mut curve = BondingCurve::new(
            Pubkey::new_from_array([2; 32]),
            Pubkey::new_from_array([3; 32]),
            255,
            Pubkey::new_from_array([4; 32]),
            &config,
        );

        assert!(curve.advance(CurveState::Migrated).is_err());
        assert!(curve.is_active());

        curve.advance(CurveState::Completed).unwrap();
        assert!(curve.advance(CurveState::Active).is_err());
        assert!(curve.is_completed());
    }
}
