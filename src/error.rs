//! Launchpad errors

use curve_model::CurveError;
use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::curve::CurveState;

/// Failure reported by a host collaborator (ledger, metadata registry, venue)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("account {0} does not exist")]
    AccountNotFound(Pubkey),

    #[error("account {account} holds {have}, needs {need}")]
    InsufficientBalance { account: Pubkey, have: u64, need: u64 },

    #[error("account {account} does not hold mint {mint}")]
    MintMismatch { account: Pubkey, mint: Pubkey },

    #[error("metadata for mint {0} already registered")]
    MetadataAlreadyRegistered(Pubkey),

    #[error("balance overflow on account {0}")]
    Overflow(Pubkey),

    #[error("venue rejected pool: {0}")]
    VenueRejected(String),
}

/// Every way a launchpad operation can fail
///
/// All variants are terminal: the operation that produced one committed
/// nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    #[error("fee percentage must be within 0..=100")]
    InvalidFeePercentage,

    #[error("caller is not the configured authority")]
    Unauthorized,

    #[error("a bonding curve already exists for mint {0}")]
    CurveAlreadyExists(Pubkey),

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("bonding curve is no longer trading")]
    CurveCompleted,

    #[error("output {amount_out} below minimum {minimum}")]
    SlippageExceeded { amount_out: u64, minimum: u64 },

    #[error("insufficient base asset: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("insufficient token balance: have {have}, need {need}")]
    InsufficientTokenBalance { have: u64, need: u64 },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("bonding curve has not completed")]
    NotCompleted,

    #[error("bonding curve already migrated")]
    AlreadyMigrated,

    #[error("global config has not been set")]
    NotConfigured,

    #[error("no bonding curve for mint {0}")]
    CurveNotFound(Pubkey),

    #[error("authority must be a non-default key")]
    InvalidAuthority,

    #[error("authority cannot be changed once set")]
    AuthorityChangeForbidden,

    #[error("invalid reserve configuration: {0}")]
    InvalidReserveConfig(&'static str),

    #[error("invalid curve state transition {from:?} -> {to:?}")]
    InvalidStateTransition { from: CurveState, to: CurveState },

    #[error("host: {0}")]
    Host(#[from] HostError),
}

impl From<CurveError> for LaunchpadError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidFeePercentage => LaunchpadError::InvalidFeePercentage,
            CurveError::ZeroAmount => LaunchpadError::ZeroAmount,
            CurveError::InvalidReserves => LaunchpadError::InvalidReserveConfig("zero virtual reserve"),
            CurveError::Overflow => LaunchpadError::ArithmeticOverflow,
        }
    }
}

pub type Result<T> = core::result::Result<T, LaunchpadError>;
