//! Launchpad event journal
//!
//! One event per committed state change, appended in commit order. A
//! failed operation appends nothing.

use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::keys::base58;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LaunchpadEvent {
    ConfigUpdated {
        #[serde(with = "base58")]
        authority: Pubkey,
        #[serde(with = "base58")]
        fee_recipient: Pubkey,
        curve_limit: u64,
        buy_fee_percentage: u8,
        sell_fee_percentage: u8,
        migration_fee_percentage: u8,
    },
    TokenLaunched {
        #[serde(with = "base58")]
        mint: Pubkey,
        #[serde(with = "base58")]
        curve: Pubkey,
        #[serde(with = "base58")]
        creator: Pubkey,
        name: String,
        symbol: String,
        uri: String,
        total_supply: u64,
    },
    TokenPurchased {
        #[serde(with = "base58")]
        mint: Pubkey,
        #[serde(with = "base58")]
        trader: Pubkey,
        sol_amount: u64,
        token_amount: u64,
        fee: u64,
        /// Spot price after the trade, lamports per base unit scaled by 1e9
        price: u64,
    },
    TokenSold {
        #[serde(with = "base58")]
        mint: Pubkey,
        #[serde(with = "base58")]
        trader: Pubkey,
        token_amount: u64,
        sol_amount: u64,
        /// Charged in tokens
        fee: u64,
        price: u64,
    },
    CurveCompleted {
        #[serde(with = "base58")]
        mint: Pubkey,
        virtual_sol_reserve: u64,
        virtual_token_reserve: u64,
        real_sol_reserve: u64,
        real_token_reserve: u64,
    },
    MigrationCompleted {
        #[serde(with = "base58")]
        mint: Pubkey,
        #[serde(with = "base58")]
        pool: Pubkey,
        sol_amount: u64,
        token_amount: u64,
        migration_fee: u64,
    },
}

impl LaunchpadEvent {
    /// Mint the event concerns, if any
    pub fn mint(&self) -> Option<&Pubkey> {
        match self {
            LaunchpadEvent::ConfigUpdated { .. } => None,
            LaunchpadEvent::TokenLaunched { mint, .. }
            | LaunchpadEvent::TokenPurchased { mint, .. }
            | LaunchpadEvent::TokenSold { mint, .. }
            | LaunchpadEvent::CurveCompleted { mint, .. }
            | LaunchpadEvent::MigrationCompleted { mint, .. } => Some(mint),
        }
    }
}
