//! Events emitted by the yield vault
use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when assets are deposited for shares
#[odra::event]
pub struct Deposit {
    pub owner: Address,
    pub assets: U256,
    pub shares: U256,
}

/// Event emitted when shares are burned for assets
#[odra::event]
pub struct Withdraw {
    pub owner: Address,
    pub assets: U256,
    pub shares: U256,
}

/// Event emitted when on-hand assets are deployed into the strategy
#[odra::event]
pub struct Invested {
    pub strategy: Address,
    pub amount: U256,
}

/// Event emitted when the on-hand reserve is topped up from the strategy
#[odra::event]
pub struct Rebalanced {
    pub strategy: Address,
    pub requested: U256,
    pub received: U256,
}

/// Event emitted when part of a price increase is diverted to rewards
#[odra::event]
pub struct ProfitSkimmed {
    /// Price before the skim (1e18 scale)
    pub old_price: U256,
    /// Price observed before the skim was deducted
    pub new_price: U256,
    /// Asset amount added to the reward accumulator
    pub amount: U256,
    /// Whether the amount was pulled out of the strategy
    pub from_strategy: bool,
}

/// Event emitted when the active strategy is replaced
#[odra::event]
pub struct StrategyChanged {
    pub old_strategy: Address,
    pub new_strategy: Address,
    /// Assets recovered from the old strategy
    pub drained: U256,
}

/// Event emitted when accrued rewards leave the vault
#[odra::event]
pub struct RewardsDistributed {
    pub distributor: Address,
    pub amount: U256,
}

#[odra::event]
pub struct RewardDistributorSet {
    pub distributor: Address,
}

#[odra::event]
pub struct InvestPercentUpdated {
    pub old_percent: u8,
    pub new_percent: u8,
}

#[odra::event]
pub struct AdminTransferred {
    pub old_admin: Address,
    pub new_admin: Address,
}
