//! Yield Strategies - pluggable capital deployment behind the vault
//!
//! A strategy wraps the base asset into a yield-bearing position and reports
//! a `Valuation` the vault validates before trusting it. Every strategy is
//! bound 1:1 to one vault and only that vault may move its capital.
//!
//! Implementations:
//! - `LendingStrategy`: supplies the asset to a `YieldProtocol` pool
//! - `HoldStrategy`: keeps the asset idle (migration target, dry runs)

pub mod lending_strategy;
pub mod hold_strategy;
pub mod errors;
pub mod events;

use odra::prelude::*;
use odra::casper_types::U256;
use crate::price::Valuation;

pub use lending_strategy::LendingStrategy;
pub use hold_strategy::HoldStrategy;
pub use errors::StrategyError;
pub use events::*;

/// Interface the vault drives its active strategy through
#[odra::external_contract]
pub trait YieldStrategy {
    /// Underlying asset the strategy accepts
    fn asset(&self) -> Address;

    /// Current readings without side effects
    fn get_valuation(&self) -> Valuation;

    /// Validated readings; advances the virtual-price watermark (vault only)
    fn refresh_valuation(&mut self) -> Valuation;

    /// Deploy `amount` already transferred to the strategy (vault only)
    fn mint(&mut self, amount: U256);

    /// Return at least `amount` to the vault or revert (vault only)
    fn withdraw(&mut self, amount: U256) -> U256;

    /// Return the entire position to the vault (vault only)
    fn withdraw_all(&mut self) -> U256;

    /// Base-asset value of the position at the spot price
    fn total_value(&self) -> U256;
}
