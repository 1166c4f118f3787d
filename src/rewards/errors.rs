//! Error definitions for reward distribution
use odra::prelude::*;

#[odra::odra_error]
pub enum RewardError {
    /// Caller is not the distributor admin
    Unauthorized = 500,

    /// Caller is not the registered notifier
    NotNotifier = 501,

    /// Zero amount not allowed
    ZeroAmount = 502,

    /// Reward duration must be non-zero
    InvalidDuration = 503,

    /// Distributor balance does not cover the new reward window
    InsufficientRewardBalance = 504,

    /// Reward amount too small for the window
    RewardTooSmall = 505,

    /// Missing configuration
    InvalidConfiguration = 506,
}
