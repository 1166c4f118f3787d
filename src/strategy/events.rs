//! Events for yield strategies

use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when a strategy is bound to its vault
#[odra::event]
pub struct VaultBound {
    pub strategy: Address,
    pub vault: Address,
}

/// Event emitted when the watermark moves
#[odra::event]
pub struct VirtualPriceUpdated {
    pub old_price: U256,
    pub new_price: U256,
}

/// Event emitted when capital is put to work
#[odra::event]
pub struct StrategyMinted {
    /// Asset amount deployed
    pub amount: U256,
    /// Protocol units received (equal to `amount` for idle strategies)
    pub units: U256,
}

/// Event emitted when capital is returned to the vault
#[odra::event]
pub struct StrategyRedeemed {
    pub requested: U256,
    pub received: U256,
}

/// Event emitted when the whole position is returned to the vault
#[odra::event]
pub struct StrategyDrained {
    pub amount: U256,
}
