//! Event definitions shared by the CEP-18 ledgers
use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when tokens (or vault shares) are transferred, minted or burned
#[odra::event]
pub struct Transfer {
    /// From address (the ledger itself on mint)
    pub from: Address,
    /// To address (the ledger itself on burn)
    pub to: Address,
    /// Amount transferred
    pub value: U256,
}

/// Event emitted when approval is granted
#[odra::event]
pub struct Approval {
    /// Owner address
    pub owner: Address,
    /// Spender address
    pub spender: Address,
    /// Amount approved
    pub value: U256,
}
