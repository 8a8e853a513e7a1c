//! Curve Model - Pure bonding-curve math for the launchpad engine
//!
//! This crate holds the arithmetic the launchpad trusts with custody:
//! fee splitting and constant-product pricing over virtual/real reserves.
//! Everything is integer-only, overflow-checked and floor-rounded so the
//! same inputs produce the same outputs on every platform.
//!
//! The stateful engine (`launchpad`) imports these functions directly and
//! never re-derives the formulas.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod fee;
pub mod math;

pub use fee::{split_fee, FeeSplit};
pub use math::{
    constant_product_out, progress_bps, quote, quote_buy, quote_sell, spot_price, Direction,
    Reserves, SwapQuote,
};

/// Fee percentages are whole percent (100 = 100%)
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Largest accepted fee percentage
pub const MAX_FEE_PERCENTAGE: u8 = 100;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Spot price scale: lamports per token base unit, scaled by 1e9
pub const PRICE_SCALE: u64 = 1_000_000_000;

/// Error types for curve arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Fee percentage above 100
    InvalidFeePercentage,
    /// Input (or the amount it buys) is zero
    ZeroAmount,
    /// Virtual reserves cannot price a trade
    InvalidReserves,
    /// Arithmetic overflow or underflow
    Overflow,
}
