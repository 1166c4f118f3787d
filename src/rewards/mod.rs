//! Reward forwarding
//!
//! The vault pushes skimmed profit to a `RewardNotifier`. `RewardDistributor`
//! is the bundled sink: it records each notification as a linear reward
//! window over a fixed duration.

pub mod reward_distributor;
pub mod errors;

pub use reward_distributor::{RewardAdded, RewardDistributor};
pub use errors::RewardError;

use odra::prelude::*;
use odra::casper_types::U256;

/// Interface the vault notifies after transferring rewards
#[odra::external_contract]
pub trait RewardNotifier {
    /// `amount` has just been transferred to the notifier
    fn notify_reward_amount(&mut self, amount: U256);
}
