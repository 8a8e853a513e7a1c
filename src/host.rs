//! Host capabilities consumed by the launchpad
//!
//! The launchpad never moves funds or writes foreign accounts itself. It
//! describes the effect and hands it to one of these traits, synchronously.
//! An implementation either applies a call in full or fails with no effect;
//! the launchpad treats any failure as aborting the enclosing operation.

use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::error::HostError;
use crate::keys::base58;

/// What a balance is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    /// Base asset (lamports), held directly by an identity
    Native,
    /// Tokens of a mint, held by a token account
    Token(Pubkey),
}

/// One ledger mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOp {
    /// Create `amount` new tokens in token account `to`
    MintTo { mint: Pubkey, to: Pubkey, amount: u64 },
    /// Move `amount` of `asset` between two accounts
    Transfer { asset: Asset, from: Pubkey, to: Pubkey, amount: u64 },
    /// Destroy `amount` tokens held by token account `from`
    Burn { mint: Pubkey, from: Pubkey, amount: u64 },
}

/// Token ledger capability: balances plus batched mutations
pub trait TokenLedger {
    /// Balance of `account` in `asset`; unknown accounts hold zero
    fn balance(&self, account: &Pubkey, asset: Asset) -> u64;

    /// Apply `ops` in order as one unit
    ///
    /// Either every op is applied or none is.
    fn execute(&mut self, ops: &[LedgerOp]) -> Result<(), HostError>;
}

/// Associated token account capability
pub trait AssociatedAccounts {
    /// Address of `owner`'s token account for `mint` (pure derivation)
    fn associated_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey;

    /// Create the account if missing; returns its address either way
    fn create_associated_account(&mut self, owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, HostError>;
}

/// Ledger plus associated accounts, the custody side of the host
pub trait Custody: TokenLedger + AssociatedAccounts {}

impl<T: TokenLedger + AssociatedAccounts> Custody for T {}

/// Name, symbol and uri of a launched token; passed through unvalidated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

/// Metadata registry capability
pub trait MetadataRegistry {
    fn register(&mut self, mint: &Pubkey, metadata: &TokenMetadata) -> Result<(), HostError>;
}

/// Liquidity a completed curve hands to the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolRequest {
    #[serde(with = "base58")]
    pub mint: Pubkey,
    /// Lamports after the migration fee
    pub sol_amount: u64,
    pub token_amount: u64,
}

/// Pool created by the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolHandle {
    #[serde(with = "base58")]
    pub pool: Pubkey,
    /// Identity that receives the lamports and owns the token vault
    #[serde(with = "base58")]
    pub vault_authority: Pubkey,
}

/// External trading venue capability
pub trait MigrationVenue {
    fn create_pool(&mut self, request: &PoolRequest) -> Result<PoolHandle, HostError>;
}
