//! In-memory host collaborators
//!
//! Reference implementations of the host capabilities. Tests drive the
//! launchpad through them, and embedders can use them as a simulator.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;

use crate::error::HostError;
use crate::host::{
    AssociatedAccounts, Asset, LedgerOp, MetadataRegistry, MigrationVenue, PoolHandle, PoolRequest,
    TokenLedger, TokenMetadata,
};

/// Program id the in-memory ledger derives associated accounts under
pub const ASSOCIATED_PROGRAM_ID: Pubkey = Pubkey::new_from_array(*b"associated-token-account-program");

/// Program id the in-memory venue derives pools under
pub const VENUE_PROGRAM_ID: Pubkey = Pubkey::new_from_array(*b"external-venue-program-00000000!");

/// Owner and mint of a token account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountInfo {
    pub owner: Pubkey,
    pub mint: Pubkey,
}

/// Balances, token accounts and mint supplies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryLedger {
    associated_program: Pubkey,
    token_accounts: BTreeMap<Pubkey, TokenAccountInfo>,
    balances: BTreeMap<(Pubkey, Asset), u64>,
    supply: BTreeMap<Pubkey, u64>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(ASSOCIATED_PROGRAM_ID)
    }
}

impl InMemoryLedger {
    pub fn new(associated_program: Pubkey) -> Self {
        Self {
            associated_program,
            token_accounts: BTreeMap::new(),
            balances: BTreeMap::new(),
            supply: BTreeMap::new(),
        }
    }

    /// Credit lamports out of thin air
    pub fn airdrop(&mut self, owner: &Pubkey, lamports: u64) -> Result<(), HostError> {
        credit(&mut self.balances, *owner, Asset::Native, lamports)
    }

    pub fn lamports(&self, owner: &Pubkey) -> u64 {
        self.balance(owner, Asset::Native)
    }

    /// Token balance of `owner`'s associated account for `mint`
    pub fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        let account = self.associated_account(owner, mint);
        self.balance(&account, Asset::Token(*mint))
    }

    pub fn supply(&self, mint: &Pubkey) -> u64 {
        self.supply.get(mint).copied().unwrap_or(0)
    }

    pub fn token_account(&self, address: &Pubkey) -> Option<&TokenAccountInfo> {
        self.token_accounts.get(address)
    }

    fn check_token_account(&self, address: &Pubkey, mint: &Pubkey) -> Result<(), HostError> {
        let info = self
            .token_accounts
            .get(address)
            .ok_or(HostError::AccountNotFound(*address))?;
        if &info.mint != mint {
            return Err(HostError::MintMismatch { account: *address, mint: *mint });
        }
        Ok(())
    }
}

fn credit(
    balances: &mut BTreeMap<(Pubkey, Asset), u64>,
    account: Pubkey,
    asset: Asset,
    amount: u64,
) -> Result<(), HostError> {
    let entry = balances.entry((account, asset)).or_insert(0);
    *entry = entry.checked_add(amount).ok_or(HostError::Overflow(account))?;
    Ok(())
}

fn debit(
    balances: &mut BTreeMap<(Pubkey, Asset), u64>,
    account: Pubkey,
    asset: Asset,
    amount: u64,
) -> Result<(), HostError> {
    let have = balances.get(&(account, asset)).copied().unwrap_or(0);
    if have < amount {
        return Err(HostError::InsufficientBalance { account, have, need: amount });
    }
    balances.insert((account, asset), have - amount);
    Ok(())
}

impl TokenLedger for InMemoryLedger {
    fn balance(&self, account: &Pubkey, asset: Asset) -> u64 {
        self.balances.get(&(*account, asset)).copied().unwrap_or(0)
    }

    fn execute(&mut self, ops: &[LedgerOp]) -> Result<(), HostError> {
        // Work on copies; commit only if every op applies
        let mut balances = self.balances.clone();
        let mut supply = self.supply.clone();

        for op in ops {
            match *op {
                LedgerOp::MintTo { mint, to, amount } => {
                    self.check_token_account(&to, &mint)?;
                    credit(&mut balances, to, Asset::Token(mint), amount)?;
                    let total = supply.entry(mint).or_insert(0);
                    *total = total.checked_add(amount).ok_or(HostError::Overflow(mint))?;
                }
                LedgerOp::Transfer { asset, from, to, amount } => {
                    if let Asset::Token(mint) = asset {
                        self.check_token_account(&from, &mint)?;
                        self.check_token_account(&to, &mint)?;
                    }
                    debit(&mut balances, from, asset, amount)?;
                    credit(&mut balances, to, asset, amount)?;
                }
                LedgerOp::Burn { mint, from, amount } => {
                    self.check_token_account(&from, &mint)?;
                    debit(&mut balances, from, Asset::Token(mint), amount)?;
                    let total = supply.entry(mint).or_insert(0);
                    *total = total.checked_sub(amount).ok_or(HostError::Overflow(mint))?;
                }
            }
        }

        self.balances = balances;
        self.supply = supply;
        Ok(())
    }
}

impl AssociatedAccounts for InMemoryLedger {
    fn associated_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[owner.as_ref(), mint.as_ref()], &self.associated_program).0
    }

    fn create_associated_account(&mut self, owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, HostError> {
        let address = self.associated_account(owner, mint);
        self.token_accounts
            .entry(address)
            .or_insert(TokenAccountInfo { owner: *owner, mint: *mint });
        Ok(address)
    }
}

/// Metadata keyed by mint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryMetadata {
    entries: BTreeMap<Pubkey, TokenMetadata>,
}

impl InMemoryMetadata {
    pub fn get(&self, mint: &Pubkey) -> Option<&TokenMetadata> {
        self.entries.get(mint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataRegistry for InMemoryMetadata {
    fn register(&mut self, mint: &Pubkey, metadata: &TokenMetadata) -> Result<(), HostError> {
        if self.entries.contains_key(mint) {
            return Err(HostError::MetadataAlreadyRegistered(*mint));
        }
        self.entries.insert(*mint, metadata.clone());
        Ok(())
    }
}

/// Venue that records every pool it is asked to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryVenue {
    program_id: Pubkey,
    open: bool,
    pools: Vec<(PoolRequest, PoolHandle)>,
}

impl Default for InMemoryVenue {
    fn default() -> Self {
        Self { program_id: VENUE_PROGRAM_ID, open: true, pools: Vec::new() }
    }
}

impl InMemoryVenue {
    /// Venue that rejects every pool
    pub fn closed() -> Self {
        Self { open: false, ..Self::default() }
    }

    pub fn pools(&self) -> &[(PoolRequest, PoolHandle)] {
        &self.pools
    }
}

impl MigrationVenue for InMemoryVenue {
    fn create_pool(&mut self, request: &PoolRequest) -> Result<PoolHandle, HostError> {
        if !self.open {
            return Err(HostError::VenueRejected("venue closed".to_string()));
        }

        let (pool, _) = Pubkey::find_program_address(&[b"pool", request.mint.as_ref()], &self.program_id);
        let (vault_authority, _) = Pubkey::find_program_address(&[b"vault", pool.as_ref()], &self.program_id);
        let handle = PoolHandle { pool, vault_authority };

        self.pools.push((*request, handle));
        Ok(handle)
    }
}
