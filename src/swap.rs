//! Swap engine: buys and sells against one bonding curve
//!
//! A swap is priced on a copy of the curve. The copy is committed only
//! after the ledger batch moving the funds has been applied, so a failed
//! swap leaves the curve, the ledger and the journal as they were.

use curve_model::{Direction, SwapQuote};
use log::{debug, warn};
use solana_program::pubkey::Pubkey;

use crate::completion::CompletionMonitor;
use crate::config::GlobalConfig;
use crate::curve::BondingCurve;
use crate::error::{LaunchpadError, Result};
use crate::events::LaunchpadEvent;
use crate::host::{Asset, Custody, LedgerOp};

/// One trade as submitted by a trader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    pub trader: Pubkey,
    pub direction: Direction,
    /// Lamports for a buy, tokens for a sell
    pub amount_in: u64,
    /// Smallest acceptable output
    pub minimum_amount_out: u64,
}

impl SwapRequest {
    pub fn buy(trader: Pubkey, lamports: u64, minimum_tokens_out: u64) -> Self {
        Self { trader, direction: Direction::Buy, amount_in: lamports, minimum_amount_out: minimum_tokens_out }
    }

    pub fn sell(trader: Pubkey, tokens: u64, minimum_lamports_out: u64) -> Self {
        Self { trader, direction: Direction::Sell, amount_in: tokens, minimum_amount_out: minimum_lamports_out }
    }
}

/// Prices and settles swaps under one global config
#[derive(Debug, Clone, Copy)]
pub struct SwapEngine<'a> {
    config: &'a GlobalConfig,
}

impl<'a> SwapEngine<'a> {
    pub fn new(config: &'a GlobalConfig) -> Self {
        Self { config }
    }

    fn fee_percentage(&self, direction: Direction) -> u8 {
        match direction {
            Direction::Buy => self.config.buy_fee_percentage,
            Direction::Sell => self.config.sell_fee_percentage,
        }
    }

    /// Price a trade without applying it
    ///
    /// # Errors
    /// * `ZeroAmount` - `amount_in` is zero, or the trade nets or yields nothing
    /// * `CurveCompleted` - the curve no longer trades
    /// * `ArithmeticOverflow` - a reserve would leave u64 range
    pub fn quote(&self, curve: &BondingCurve, direction: Direction, amount_in: u64) -> Result<SwapQuote> {
        if amount_in == 0 {
            return Err(LaunchpadError::ZeroAmount);
        }
        if !curve.is_active() {
            return Err(LaunchpadError::CurveCompleted);
        }
        Ok(curve_model::quote(curve.reserves(), direction, amount_in, self.fee_percentage(direction))?)
    }

    /// Execute a trade against `curve`
    ///
    /// Checks run in order: zero amount, lifecycle, trader balance,
    /// pricing, slippage. A successful buy is followed by the completion
    /// check before returning.
    ///
    /// # Errors
    /// * `ZeroAmount` - see `quote`
    /// * `CurveCompleted` - curve is Completed or Migrated
    /// * `InsufficientFunds` - buyer holds fewer lamports than `amount_in`
    /// * `InsufficientTokenBalance` - seller holds fewer tokens than `amount_in`
    /// * `SlippageExceeded` - output below `minimum_amount_out`
    /// * `ArithmeticOverflow` - a reserve would leave u64 range
    /// * `Host` - the ledger rejected the settlement batch
    pub fn swap<H: Custody>(
        &self,
        curve: &mut BondingCurve,
        host: &mut H,
        request: &SwapRequest,
        journal: &mut Vec<LaunchpadEvent>,
    ) -> Result<SwapQuote> {
        if request.amount_in == 0 {
            return Err(LaunchpadError::ZeroAmount);
        }
        if !curve.is_active() {
            warn!("swap rejected: curve {} is {:?}", curve.mint, curve.state);
            return Err(LaunchpadError::CurveCompleted);
        }

        match request.direction {
            Direction::Buy => {
                let have = host.balance(&request.trader, Asset::Native);
                if have < request.amount_in {
                    return Err(LaunchpadError::InsufficientFunds { have, need: request.amount_in });
                }
            }
            Direction::Sell => {
                let trader_account = host.associated_account(&request.trader, &curve.mint);
                let have = host.balance(&trader_account, Asset::Token(curve.mint));
                if have < request.amount_in {
                    return Err(LaunchpadError::InsufficientTokenBalance { have, need: request.amount_in });
                }
            }
        }

        let quote = self.quote(curve, request.direction, request.amount_in)?;
        if quote.amount_out < request.minimum_amount_out {
            return Err(LaunchpadError::SlippageExceeded {
                amount_out: quote.amount_out,
                minimum: request.minimum_amount_out,
            });
        }

        let mut next = curve.clone();
        next.set_reserves(quote.reserves);
        let price = curve_model::spot_price(&quote.reserves)?;

        let mut events = Vec::with_capacity(2);
        match request.direction {
            Direction::Buy => {
                events.push(LaunchpadEvent::TokenPurchased {
                    mint: next.mint,
                    trader: request.trader,
                    sol_amount: quote.amount_in,
                    token_amount: quote.amount_out,
                    fee: quote.fee,
                    price,
                });
                let monitor = CompletionMonitor::new(self.config.curve_limit);
                events.extend(monitor.observe(&mut next)?);
            }
            Direction::Sell => {
                events.push(LaunchpadEvent::TokenSold {
                    mint: next.mint,
                    trader: request.trader,
                    token_amount: quote.amount_in,
                    sol_amount: quote.amount_out,
                    fee: quote.fee,
                    price,
                });
            }
        }

        let ops = self.settlement(&next, host, request, &quote)?;
        host.execute(&ops)?;

        debug!(
            "{:?} {}: in={} fee={} out={} real_sol={}",
            request.direction, next.mint, quote.amount_in, quote.fee, quote.amount_out, next.real_sol_reserve
        );
        *curve = next;
        journal.extend(events);
        Ok(quote)
    }

    /// Ledger batch settling `quote`
    ///
    /// Fees are paid in the input asset; a zero fee leg is skipped.
    fn settlement<H: Custody>(
        &self,
        curve: &BondingCurve,
        host: &mut H,
        request: &SwapRequest,
        quote: &SwapQuote,
    ) -> Result<Vec<LedgerOp>> {
        let mint = curve.mint;
        let token = Asset::Token(mint);
        let custody_account = host.associated_account(&curve.key, &mint);
        let trader_account = host.associated_account(&request.trader, &mint);

        let mut ops = Vec::with_capacity(3);
        match quote.direction {
            Direction::Buy => {
                host.create_associated_account(&request.trader, &mint)?;
                if quote.fee > 0 {
                    ops.push(LedgerOp::Transfer {
                        asset: Asset::Native,
                        from: request.trader,
                        to: self.config.fee_recipient,
                        amount: quote.fee,
                    });
                }
                ops.push(LedgerOp::Transfer {
                    asset: Asset::Native,
                    from: request.trader,
                    to: curve.key,
                    amount: quote.net_in,
                });
                ops.push(LedgerOp::Transfer {
                    asset: token,
                    from: custody_account,
                    to: trader_account,
                    amount: quote.amount_out,
                });
            }
            Direction::Sell => {
                if quote.fee > 0 {
                    let fee_account = host.create_associated_account(&self.config.fee_recipient, &mint)?;
                    ops.push(LedgerOp::Transfer {
                        asset: token,
                        from: trader_account,
                        to: fee_account,
                        amount: quote.fee,
                    });
                }
                ops.push(LedgerOp::Transfer {
                    asset: token,
                    from: trader_account,
                    to: custody_account,
                    amount: quote.net_in,
                });
                ops.push(LedgerOp::Transfer {
                    asset: Asset::Native,
                    from: curve.key,
                    to: request.trader,
                    amount: quote.amount_out,
                });
            }
        }
        Ok(ops)
    }
}
