//! Constant product bonding-curve math (x·y=k) over virtual reserves

use crate::{split_fee, CurveError, BPS_DENOMINATOR, PRICE_SCALE};

/// Trade direction, seen from the trader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Spend base asset (lamports), receive tokens
    Buy,
    /// Spend tokens, receive base asset
    Sell,
}

/// Reserve snapshot of one curve
///
/// Virtual reserves shape the price; real reserves are what the curve
/// actually holds in custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reserves {
    pub virtual_token: u64,
    pub virtual_sol: u64,
    pub real_token: u64,
    pub real_sol: u64,
}

/// Priced trade, not yet applied anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub direction: Direction,
    /// Gross input paid by the trader
    pub amount_in: u64,
    /// Fee taken from the input, in the input asset
    pub fee: u64,
    /// Input that reaches the curve
    pub net_in: u64,
    /// Output paid to the trader
    pub amount_out: u64,
    /// Reserves after the trade
    pub reserves: Reserves,
}

/// Output of a constant-product trade
///
/// out = reserve_out - ceil(reserve_in * reserve_out / (reserve_in + net_in))
///     = floor(reserve_out * net_in / (reserve_in + net_in))
///
/// The payout is floored, so the reserve left behind is rounded up and
/// `k` never decreases across a trade.
///
/// # Arguments
/// * `reserve_in` - Virtual reserve of the asset being paid in
/// * `reserve_out` - Virtual reserve of the asset being paid out
/// * `net_in` - Input after fees
pub fn constant_product_out(reserve_in: u64, reserve_out: u64, net_in: u64) -> Result<u64, CurveError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(CurveError::InvalidReserves);
    }

    // u64 * u64 always fits in u128
    let numerator = (reserve_out as u128) * (net_in as u128);
    let denominator = (reserve_in as u128)
        .checked_add(net_in as u128)
        .ok_or(CurveError::Overflow)?;
    let out = numerator / denominator;

    // out < reserve_out, so it fits
    u64::try_from(out).map_err(|_| CurveError::Overflow)
}

/// Quote a buy: `amount_in` lamports for tokens
///
/// # Arguments
/// * `reserves` - Current reserves
/// * `amount_in` - Gross lamports paid
/// * `fee_percentage` - Buy fee, whole percent
///
/// # Returns
/// * `SwapQuote` with fee split, tokens out and reserves after
/// * `CurveError::ZeroAmount` if the input, its net, or the output is zero
/// * `CurveError::Overflow` if any reserve would leave u64 range
pub fn quote_buy(reserves: Reserves, amount_in: u64, fee_percentage: u8) -> Result<SwapQuote, CurveError> {
    if amount_in == 0 {
        return Err(CurveError::ZeroAmount);
    }

    let split = split_fee(amount_in, fee_percentage)?;
    if split.net == 0 {
        return Err(CurveError::ZeroAmount);
    }

    let token_out = constant_product_out(reserves.virtual_sol, reserves.virtual_token, split.net)?;
    if token_out == 0 {
        return Err(CurveError::ZeroAmount);
    }

    let after = Reserves {
        virtual_sol: reserves.virtual_sol.checked_add(split.net).ok_or(CurveError::Overflow)?,
        virtual_token: reserves.virtual_token.checked_sub(token_out).ok_or(CurveError::Overflow)?,
        real_sol: reserves.real_sol.checked_add(split.net).ok_or(CurveError::Overflow)?,
        real_token: reserves.real_token.checked_sub(token_out).ok_or(CurveError::Overflow)?,
    };

    Ok(SwapQuote {
        direction: Direction::Buy,
        amount_in,
        fee: split.fee,
        net_in: split.net,
        amount_out: token_out,
        reserves: after,
    })
}

/// Quote a sell: `amount_in` tokens for lamports
///
/// The fee is taken from the token input, same as for buys.
///
/// # Arguments
/// * `reserves` - Current reserves
/// * `amount_in` - Gross tokens paid
/// * `fee_percentage` - Sell fee, whole percent
pub fn quote_sell(reserves: Reserves, amount_in: u64, fee_percentage: u8) -> Result<SwapQuote, CurveError> {
    if amount_in == 0 {
        return Err(CurveError::ZeroAmount);
    }

    let split = split_fee(amount_in, fee_percentage)?;
    if split.net == 0 {
        return Err(CurveError::ZeroAmount);
    }

    let sol_out = constant_product_out(reserves.virtual_token, reserves.virtual_sol, split.net)?;
    if sol_out == 0 {
        return Err(CurveError::ZeroAmount);
    }

    // real_sol < sol_out means the curve would pay out lamports it never took in
    let after = Reserves {
        virtual_token: reserves.virtual_token.checked_add(split.net).ok_or(CurveError::Overflow)?,
        virtual_sol: reserves.virtual_sol.checked_sub(sol_out).ok_or(CurveError::Overflow)?,
        real_token: reserves.real_token.checked_add(split.net).ok_or(CurveError::Overflow)?,
        real_sol: reserves.real_sol.checked_sub(sol_out).ok_or(CurveError::Overflow)?,
    };

    Ok(SwapQuote {
        direction: Direction::Sell,
        amount_in,
        fee: split.fee,
        net_in: split.net,
        amount_out: sol_out,
        reserves: after,
    })
}

/// Quote in either direction
pub fn quote(
    reserves: Reserves,
    direction: Direction,
    amount_in: u64,
    fee_percentage: u8,
) -> Result<SwapQuote, CurveError> {
    match direction {
        Direction::Buy => quote_buy(reserves, amount_in, fee_percentage),
        Direction::Sell => quote_sell(reserves, amount_in, fee_percentage),
    }
}

/// Spot price in lamports per token unit, scaled by PRICE_SCALE
///
/// Saturates at `u64::MAX` once the virtual token reserve is nearly drained.
pub fn spot_price(reserves: &Reserves) -> Result<u64, CurveError> {
    if reserves.virtual_token == 0 {
        return Err(CurveError::InvalidReserves);
    }
    let price = (reserves.virtual_sol as u128) * (PRICE_SCALE as u128) / (reserves.virtual_token as u128);
    Ok(u64::try_from(price).unwrap_or(u64::MAX))
}

/// Progress of `real_sol` toward `curve_limit`, in bps, capped at 100%
pub fn progress_bps(real_sol: u64, curve_limit: u64) -> u64 {
    if curve_limit == 0 {
        return BPS_DENOMINATOR;
    }
    let bps = (real_sol as u128) * (BPS_DENOMINATOR as u128) / (curve_limit as u128);
    bps.min(BPS_DENOMINATOR as u128) as u64
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn reserves() -> impl Strategy<Value = Reserves> {
        (1u64..=1u64 << 52, 1u64..=1u64 << 44, 0u64..=1u64 << 44).prop_map(|(vt, vs, rs)| Reserves {
            virtual_token: vt,
            virtual_sol: vs,
            real_token: vt,
            real_sol: rs.min(vs),
        })
    }

    proptest! {
        #[test]
        fn prop_buy_output_below_reserve(r in reserves(), amount in 1u64..=1u64 << 50, fee in 0u8..=100) {
            if let Ok(q) = quote_buy(r, amount, fee) {
                prop_assert!(q.amount_out < r.virtual_token);
                prop_assert_eq!(q.net_in + q.fee, amount);
                prop_assert!(q.reserves.real_sol > r.real_sol);
            }
        }

        #[test]
        fn prop_k_never_decreases(r in reserves(), amount in 1u64..=1u64 << 50, fee in 0u8..=100, buy in any::<bool>()) {
            let direction = if buy { Direction::Buy } else { Direction::Sell };
            if let Ok(q) = quote(r, direction, amount, fee) {
                let k0 = (r.virtual_sol as u128) * (r.virtual_token as u128);
                let k1 = (q.reserves.virtual_sol as u128) * (q.reserves.virtual_token as u128);
                prop_assert!(k1 >= k0);
            }
        }

        #[test]
        fn prop_round_trip_loses_value(r in reserves(), amount in 1u64..=1u64 << 40, fee in 0u8..=100) {
            if let Ok(bought) = quote_buy(r, amount, fee) {
                if let Ok(sold) = quote_sell(bought.reserves, bought.amount_out, fee) {
                    prop_assert!(sold.amount_out <= bought.net_in);
                    if bought.fee > 0 || sold.fee > 0 {
                        prop_assert!(sold.amount_out < amount);
                    }
                }
            }
        }
    }
}
