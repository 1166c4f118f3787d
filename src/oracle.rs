//! Price Oracle - independent reference price for the deployed asset
//!
//! The strategy compares this value against the spot price reported by the
//! yield protocol. Readings carry no freshness guarantee; `is_stale` exists
//! for monitoring only.

use odra::prelude::*;
use odra::casper_types::U256;

/// Errors raised by the price oracle
#[odra::odra_error]
pub enum OracleError {
    /// Caller is not the oracle admin
    Unauthorized = 400,
    /// Price must be non-zero
    InvalidPrice = 401,
}

/// Event emitted when the reference price changes
#[odra::event]
pub struct PriceUpdated {
    /// Previous price (0 on first publication)
    pub old_value: U256,
    /// New price (scaled by 1e18)
    pub new_value: U256,
    /// Block time of the update
    pub timestamp: u64,
}

/// Single-feed price oracle
#[odra::module]
pub struct PriceOracle {
    /// Latest published price (scaled by 1e18)
    value: Var<U256>,
    /// Block time of the last update
    last_update: Var<u64>,
    /// Age after which the feed reports itself stale
    max_staleness: Var<u64>,
    /// Admin address
    admin: Var<Address>,
}

#[odra::module]
impl PriceOracle {
    /// Initialize the oracle with its first price
    pub fn init(&mut self, initial_value: U256) {
        let caller = self.env().caller();
        self.admin.set(caller);
        self.max_staleness.set(3_600_000); // 1 hour, block time is in milliseconds
        self.publish(initial_value);
    }

    /// Publish a new price (admin only)
    pub fn set_value(&mut self, value: U256) {
        self.only_admin();
        self.publish(value);
    }

    /// Latest published price
    pub fn get_value(&self) -> U256 {
        self.value.get_or_default()
    }

    pub fn last_update(&self) -> u64 {
        self.last_update.get_or_default()
    }

    /// Whether the last update is older than `max_staleness`
    pub fn is_stale(&self) -> bool {
        let now = self.env().get_block_time();
        now.saturating_sub(self.last_update()) > self.max_staleness.get_or_default()
    }

    /// Update max staleness period (admin only)
    pub fn set_max_staleness(&mut self, millis: u64) {
        self.only_admin();
        self.max_staleness.set(millis);
    }

    pub fn get_admin(&self) -> Address {
        self.admin.get_or_revert_with(OracleError::Unauthorized)
    }

    fn publish(&mut self, value: U256) {
        if value.is_zero() {
            self.env().revert(OracleError::InvalidPrice);
        }
        let old_value = self.value.get_or_default();
        let timestamp = self.env().get_block_time();
        self.value.set(value);
        self.last_update.set(timestamp);

        self.env().emit_event(PriceUpdated {
            old_value,
            new_value: value,
            timestamp,
        });
    }

    fn only_admin(&self) {
        let caller = self.env().caller();
        let admin = self.admin.get_or_revert_with(OracleError::Unauthorized);
        if caller != admin {
            self.env().revert(OracleError::Unauthorized);
        }
    }
}

/// Interface the strategies read reference prices through
#[odra::external_contract]
pub trait PriceFeed {
    /// Latest reference price (scaled by 1e18)
    fn get_value(&self) -> U256;
}
