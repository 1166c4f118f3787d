//! Error definitions for the yield vault
use odra::prelude::*;

/// Errors raised by the vault
#[odra::odra_error]
pub enum VaultError {
    /// Zero amount not allowed
    ZeroAmount = 1,

    /// Deposit too small to mint a share
    ZeroShares = 2,

    /// Withdrawal too small to pay out any asset
    ZeroAssets = 3,

    /// Caller holds fewer shares than requested
    InsufficientBalance = 4,

    /// Caller is not the vault admin
    Unauthorized = 5,

    /// Parameter out of range or missing configuration
    InvalidConfiguration = 6,

    /// New strategy equals the active one
    SameStrategy = 7,

    /// New strategy manages a different asset
    InvalidStrategy = 8,

    /// Nothing accrued to distribute
    NoRewardsAccrued = 9,

    /// Reward distributor not configured
    RewardDistributorNotSet = 10,

    /// Strategy prices failed validation
    PriceDivergence = 11,

    /// Asset transfer returned false
    TransferFailed = 12,

    /// Strategy returned less than requested
    StrategyShortfall = 13,

    /// Old strategy still holds value after draining
    StrategyNotDrained = 14,

    /// Shares outstanding but the vault is worth nothing
    ZeroTotalValue = 15,

    /// On-hand reserve cannot cover the payout
    InsufficientLiquidity = 16,

    /// Reentrant call
    Locked = 17,

    /// First deposit too small to give shares a non-zero price
    ZeroPrice = 18,
}
