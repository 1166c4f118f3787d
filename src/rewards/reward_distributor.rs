//! Reward Distributor - linear reward windows funded by the vault
//!
//! Each notification opens a new window of `duration` milliseconds. Rewards
//! still unpaid from a running window roll into the new rate.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::RewardError;
use crate::math::SafeMath;
use crate::token::Cep18TokenContractRef;

/// Event emitted when a reward window is (re)started
#[odra::event]
pub struct RewardAdded {
    /// Amount notified
    pub amount: U256,
    /// New emission rate per millisecond
    pub reward_rate: U256,
    /// End of the window (block time, ms)
    pub period_finish: u64,
}

#[odra::event]
pub struct NotifierUpdated {
    pub old_notifier: Address,
    pub new_notifier: Address,
}

#[odra::module]
pub struct RewardDistributor {
    /// Token rewards are paid in
    reward_token: Var<Address>,
    /// Only address allowed to notify (the vault)
    notifier: Var<Address>,
    admin: Var<Address>,
    /// Window length in milliseconds
    duration: Var<u64>,
    reward_rate: Var<U256>,
    period_finish: Var<u64>,
    last_update: Var<u64>,
    total_notified: Var<U256>,
}

#[odra::module]
impl RewardDistributor {
    /// Initialize the distributor
    ///
    /// # Arguments
    /// * `reward_token` - Token the vault forwards (the vault asset)
    /// * `notifier` - Vault allowed to notify
    /// * `duration` - Reward window in milliseconds
    pub fn init(&mut self, reward_token: Address, notifier: Address, duration: u64) {
        if duration == 0 {
            self.env().revert(RewardError::InvalidDuration);
        }
        let caller = self.env().caller();
        self.reward_token.set(reward_token);
        self.notifier.set(notifier);
        self.admin.set(caller);
        self.duration.set(duration);
        self.reward_rate.set(U256::zero());
        self.period_finish.set(0);
        self.last_update.set(0);
        self.total_notified.set(U256::zero());
    }

    /// Start a new reward window for `amount` already transferred in
    pub fn notify_reward_amount(&mut self, amount: U256) {
        let caller = self.env().caller();
        let notifier = self.notifier.get_or_revert_with(RewardError::InvalidConfiguration);
        if caller != notifier {
            self.env().revert(RewardError::NotNotifier);
        }
        if amount.is_zero() {
            self.env().revert(RewardError::ZeroAmount);
        }

        let now = self.env().get_block_time();
        let duration = self.duration.get_or_default();
        let period_finish = self.period_finish.get_or_default();

        let pending = if now >= period_finish {
            amount
        } else {
            let remaining = U256::from(period_finish - now);
            let leftover = SafeMath::mul(remaining, self.reward_rate.get_or_default())
                .unwrap_or_revert(&self.env());
            SafeMath::add(amount, leftover).unwrap_or_revert(&self.env())
        };
        let reward_rate = SafeMath::div(pending, U256::from(duration)).unwrap_or_revert(&self.env());
        if reward_rate.is_zero() {
            self.env().revert(RewardError::RewardTooSmall);
        }

        // the window must be fully funded
        let committed = SafeMath::mul(reward_rate, U256::from(duration)).unwrap_or_revert(&self.env());
        let token = Cep18TokenContractRef::new(self.env(), self.reward_token());
        if token.balance_of(self.env().self_address()) < committed {
            self.env().revert(RewardError::InsufficientRewardBalance);
        }

        let new_finish = now + duration;
        self.reward_rate.set(reward_rate);
        self.last_update.set(now);
        self.period_finish.set(new_finish);
        let total = self.total_notified.get_or_default();
        self.total_notified.set(SafeMath::add(total, amount).unwrap_or_revert(&self.env()));

        self.env().emit_event(RewardAdded {
            amount,
            reward_rate,
            period_finish: new_finish,
        });
    }

    pub fn set_notifier(&mut self, notifier: Address) {
        self.only_admin();
        let old_notifier = self.notifier();
        self.notifier.set(notifier);
        self.env().emit_event(NotifierUpdated {
            old_notifier,
            new_notifier: notifier,
        });
    }

    pub fn set_duration(&mut self, duration: u64) {
        self.only_admin();
        if duration == 0 {
            self.env().revert(RewardError::InvalidDuration);
        }
        self.duration.set(duration);
    }

    // ========================================
    // Views
    // ========================================

    pub fn reward_token(&self) -> Address {
        self.reward_token.get_or_revert_with(RewardError::InvalidConfiguration)
    }

    pub fn notifier(&self) -> Address {
        self.notifier.get_or_revert_with(RewardError::InvalidConfiguration)
    }

    pub fn duration(&self) -> u64 {
        self.duration.get_or_default()
    }

    pub fn reward_rate(&self) -> U256 {
        self.reward_rate.get_or_default()
    }

    pub fn period_finish(&self) -> u64 {
        self.period_finish.get_or_default()
    }

    pub fn last_update(&self) -> u64 {
        self.last_update.get_or_default()
    }

    pub fn total_notified(&self) -> U256 {
        self.total_notified.get_or_default()
    }

    /// Rewards emitted so far in the current window
    pub fn emitted(&self) -> U256 {
        let now = self.env().get_block_time();
        let end = now.min(self.period_finish.get_or_default());
        let start = self.last_update.get_or_default();
        if end <= start {
            return U256::zero();
        }
        SafeMath::mul(U256::from(end - start), self.reward_rate.get_or_default())
            .unwrap_or_revert(&self.env())
    }

    pub fn get_admin(&self) -> Address {
        self.admin.get_or_revert_with(RewardError::Unauthorized)
    }

    fn only_admin(&self) {
        let caller = self.env().caller();
        if caller != self.get_admin() {
            self.env().revert(RewardError::Unauthorized);
        }
    }
}
