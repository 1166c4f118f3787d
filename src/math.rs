//! Mathematical utilities for the vault
//! Checked U256 arithmetic plus the share/price formulas used by the ledger and strategies
use odra::casper_types::U256;
use crate::errors::MathError;

/// Fixed-point scale for prices and shares (1e18)
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Shares minted to the first depositor of an empty vault (100 shares)
pub const BOOTSTRAP_SHARES: u128 = 100 * SCALE;

/// Percentage denominator
pub const PERCENT: u128 = 100;

/// Maximum tolerated divergence between two price readings, in percent
pub const SLIPPAGE_PERCENT: u128 = 5;

/// Share of every price increase diverted to rewards, in percent
pub const PROFIT_SHARE_PERCENT: u128 = 1;

/// Default fraction of total value kept in the strategy, in percent
pub const DEFAULT_INVEST_PERCENT: u8 = 90;

/// Safe math operations for U256
pub struct SafeMath;

impl SafeMath {
    /// Safe addition with overflow check
    pub fn add(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_add(b).ok_or(MathError::Overflow)
    }

    /// Safe subtraction with underflow check
    pub fn sub(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_sub(b).ok_or(MathError::Underflow)
    }

    /// Safe multiplication with overflow check
    pub fn mul(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_mul(b).ok_or(MathError::Overflow)
    }

    /// Safe division with zero check
    pub fn div(a: U256, b: U256) -> Result<U256, MathError> {
        if b.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(a / b)
    }

    /// `a * b / denominator`, truncating toward zero
    pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
        Self::div(Self::mul(a, b)?, denominator)
    }

    /// Returns the minimum of two U256 values
    pub fn min(a: U256, b: U256) -> U256 {
        if a < b { a } else { b }
    }

    /// Returns the maximum of two U256 values
    pub fn max(a: U256, b: U256) -> U256 {
        if a > b { a } else { b }
    }
}

/// Result of a profit skim calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skim {
    /// Price reduction applied per share (1e18 scale)
    pub per_share: U256,
    /// Asset amount diverted to the reward accumulator
    pub amount: U256,
}

/// Share accounting formulas (supply-ratio pricing)
pub struct ShareMath;

impl ShareMath {
    /// Shares minted for a deposit of `assets`.
    ///
    /// `total_value` is the vault value measured before the deposit arrives.
    /// An empty vault always mints `BOOTSTRAP_SHARES`.
    pub fn shares_for_deposit(
        assets: U256,
        total_value: U256,
        total_shares: U256,
    ) -> Result<U256, MathError> {
        if total_shares.is_zero() {
            return Ok(U256::from(BOOTSTRAP_SHARES));
        }
        SafeMath::mul_div(total_shares, assets, total_value)
    }

    /// Assets paid out for burning `shares`: `shares * total_value / total_shares`
    pub fn assets_for_shares(
        shares: U256,
        total_value: U256,
        total_shares: U256,
    ) -> Result<U256, MathError> {
        SafeMath::mul_div(shares, total_value, total_shares)
    }

    /// Value per share scaled by 1e18, 0 when there are no shares
    pub fn price_per_share(total_value: U256, total_shares: U256) -> Result<U256, MathError> {
        if total_shares.is_zero() {
            return Ok(U256::zero());
        }
        SafeMath::mul_div(total_value, U256::from(SCALE), total_shares)
    }

    /// Profit share taken from a price move from `old_price` to `new_price`.
    ///
    /// Only appreciation is skimmed; an uninitialized old price skims nothing.
    pub fn skim(old_price: U256, new_price: U256, total_shares: U256) -> Result<Skim, MathError> {
        if old_price.is_zero() || new_price <= old_price {
            return Ok(Skim { per_share: U256::zero(), amount: U256::zero() });
        }
        let increase = SafeMath::sub(new_price, old_price)?;
        let per_share = SafeMath::mul_div(
            increase,
            U256::from(PROFIT_SHARE_PERCENT),
            U256::from(PERCENT),
        )?;
        let amount = SafeMath::mul_div(per_share, total_shares, U256::from(SCALE))?;
        Ok(Skim { per_share, amount })
    }

    /// Portion of `total_value` that should stay on hand when `invest_percent` is deployed
    pub fn reserve_target(total_value: U256, invest_percent: u8) -> Result<U256, MathError> {
        let kept = PERCENT.saturating_sub(invest_percent as u128);
        SafeMath::mul_div(total_value, U256::from(kept), U256::from(PERCENT))
    }
}

/// Conversions between base-asset amounts and yield-protocol units
pub struct UnitMath;

impl UnitMath {
    /// Base-asset value of `units` at `price` (assets per unit, 1e18 scale)
    pub fn value_of(units: U256, price: U256) -> Result<U256, MathError> {
        SafeMath::mul_div(units, price, U256::from(SCALE))
    }

    /// Units to redeem so that at least `amount` of base asset comes back.
    /// amount * 1e18 / price + 1
    pub fn units_for_amount(amount: U256, price: U256) -> Result<U256, MathError> {
        let units = SafeMath::mul_div(amount, U256::from(SCALE), price)?;
        SafeMath::add(units, U256::one())
    }
}
