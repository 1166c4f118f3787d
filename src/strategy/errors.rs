//! Error types for yield strategies

use odra::prelude::*;

/// Errors raised by strategies
#[odra::odra_error]
pub enum StrategyError {
    /// Caller is not the bound vault
    NotVault = 200,
    /// Caller is not the strategy admin
    Unauthorized = 201,
    /// Vault binding already set
    VaultAlreadySet = 202,
    /// No vault bound yet
    VaultNotSet = 203,
    /// Zero amount not allowed
    ZeroAmount = 204,
    /// Spot price diverged from the oracle or the watermark
    PriceDivergence = 205,
    /// Position cannot cover the requested amount
    InsufficientLiquidity = 206,
    /// Protocol paid out less than requested
    StrategyShortfall = 207,
    /// Asset transfer returned false
    TransferFailed = 208,
    /// Reentrant call
    Locked = 209,
    /// Missing configuration
    InvalidConfiguration = 210,
}
