//! Price validation gate and virtual-price watermark
//!
//! Every valuation-dependent action compares the strategy's spot price with
//! the oracle price and with the watermark before trusting it.
use odra::prelude::*;
use odra::casper_types::U256;
use crate::math::{SafeMath, PERCENT, SLIPPAGE_PERCENT};

/// Price readings reported by a strategy
#[odra::odra_type]
pub struct Valuation {
    /// Spot price reported by the yield protocol (assets per unit, 1e18 scale)
    pub spot_price: U256,
    /// Independent reference price from the oracle
    pub oracle_price: U256,
    /// Last validated watermark, 0 while uninitialized
    pub virtual_price: U256,
    /// Base-asset value of the strategy position at the spot price
    pub total_value: U256,
}

/// Price divergence checks
pub struct PriceGate;

impl PriceGate {
    /// True when the two readings are equal or the larger exceeds the smaller
    /// by no more than `SLIPPAGE_PERCENT`: `hi <= lo * 105 / 100` (truncating).
    pub fn validate(reference: U256, candidate: U256) -> bool {
        if reference == candidate {
            return true;
        }
        let lo = SafeMath::min(reference, candidate);
        let hi = SafeMath::max(reference, candidate);
        match lo.checked_mul(U256::from(PERCENT + SLIPPAGE_PERCENT)) {
            Some(scaled) => !(hi > scaled / U256::from(PERCENT)),
            // bound exceeds U256::MAX
            None => true,
        }
    }

    /// Spot vs oracle, then spot vs watermark once the watermark is seeded
    pub fn check(valuation: &Valuation) -> bool {
        if !Self::validate(valuation.oracle_price, valuation.spot_price) {
            return false;
        }
        valuation.virtual_price.is_zero()
            || Self::validate(valuation.virtual_price, valuation.spot_price)
    }
}

/// Forward-only watermark
pub struct Watermark;

impl Watermark {
    /// Next watermark after a validated reading.
    ///
    /// Seeds from the oracle on first use, then only ever moves up to the spot price.
    pub fn ratchet(current: U256, spot_price: U256, oracle_price: U256) -> U256 {
        if current.is_zero() {
            oracle_price
        } else if spot_price > current {
            spot_price
        } else {
            current
        }
    }
}
