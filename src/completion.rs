//! Completion of a curve once its real base reserve reaches the limit

use log::info;

use crate::curve::{BondingCurve, CurveState};
use crate::error::Result;
use crate::events::LaunchpadEvent;

/// Watches curves after each buy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionMonitor {
    curve_limit: u64,
}

impl CompletionMonitor {
    pub fn new(curve_limit: u64) -> Self {
        Self { curve_limit }
    }

    pub fn curve_limit(&self) -> u64 {
        self.curve_limit
    }

    /// Whether `curve` has raised enough to stop trading
    pub fn reached(&self, curve: &BondingCurve) -> bool {
        curve.real_sol_reserve >= self.curve_limit
    }

    /// Complete `curve` if it is Active and at or past the limit
    ///
    /// Returns the completion event when the curve changed state. Curves
    /// that are already Completed or Migrated are left alone.
    pub fn observe(&self, curve: &mut BondingCurve) -> Result<Option<LaunchpadEvent>> {
        if !curve.is_active() || !self.reached(curve) {
            return Ok(None);
        }

        curve.advance(CurveState::Completed)?;
        info!(
            "curve {} completed: real_sol={} limit={}",
            curve.mint, curve.real_sol_reserve, self.curve_limit
        );

        Ok(Some(LaunchpadEvent::CurveCompleted {
            mint: curve.mint,
            virtual_sol_reserve: curve.virtual_sol_reserve,
            virtual_token_reserve: curve.virtual_token_reserve,
            real_sol_reserve: curve.real_sol_reserve,
            real_token_reserve: curve.real_token_reserve,
        }))
    }
}
