//! Fee calculator

use crate::{CurveError, MAX_FEE_PERCENTAGE, PERCENT_DENOMINATOR};

/// A gross amount split into what reaches the curve and what the fee recipient keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    /// Amount left after the fee
    pub net: u64,
    /// Fee amount (floor of `amount * pct / 100`)
    pub fee: u64,
}

/// Split `amount` into net amount and fee
///
/// The fee is floored, so `net + fee == amount` always holds and the fee
/// never exceeds `amount`.
///
/// # Arguments
/// * `amount` - Gross amount
/// * `fee_percentage` - Whole percent, 0..=100
///
/// # Returns
/// * `FeeSplit` on success
/// * `CurveError::InvalidFeePercentage` if `fee_percentage > 100`
pub fn split_fee(amount: u64, fee_percentage: u8) -> Result<FeeSplit, CurveError> {
    if fee_percentage > MAX_FEE_PERCENTAGE {
        return Err(CurveError::InvalidFeePercentage);
    }

    let fee = (amount as u128)
        .checked_mul(fee_percentage as u128)
        .ok_or(CurveError::Overflow)?
        / PERCENT_DENOMINATOR as u128;
    let fee = u64::try_from(fee).map_err(|_| CurveError::Overflow)?;
    let net = amount.checked_sub(fee).ok_or(CurveError::Overflow)?;

    Ok(FeeSplit { net, fee })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fee_floors() {
        let split = split_fee(10_000, 5).unwrap();
        assert_eq!(split, FeeSplit { net: 9_500, fee: 500 });

        // 5% of 19 = 0.95 -> 0
        let split = split_fee(19, 5).unwrap();
        assert_eq!(split, FeeSplit { net: 19, fee: 0 });
    }

    #[test]
    fn test_split_fee_bounds() {
        assert_eq!(split_fee(1_000, 0).unwrap().fee, 0);
        assert_eq!(split_fee(1_000, 100).unwrap(), FeeSplit { net: 0, fee: 1_000 });
        assert_eq!(split_fee(1_000, 101), Err(CurveError::InvalidFeePercentage));
        assert_eq!(split_fee(0, 255), Err(CurveError::InvalidFeePercentage));
    }

    #[test]
    fn test_split_fee_max_amount() {
        let split = split_fee(u64::MAX, 100).unwrap();
        assert_eq!(split.fee, u64::MAX);
        assert_eq!(split.net, 0);

        let split = split_fee(u64::MAX, 33).unwrap();
        assert_eq!(split.net + split.fee, u64::MAX);
    }
}
