//! Yield Vault - pooled single-asset vault with a pluggable strategy
//!
//! Depositors receive CEP-18 shares priced against the vault's total value
//! (strategy position plus on-hand reserve). Every operation that relies on a
//! valuation first refreshes the strategy readings and runs them through the
//! price gate; appreciation found there is skimmed into the reward accrual.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::VaultError;
use super::events::*;
use crate::math::{SafeMath, ShareMath, BOOTSTRAP_SHARES, DEFAULT_INVEST_PERCENT};
use crate::price::PriceGate;
use crate::rewards::RewardNotifierContractRef;
use crate::strategy::YieldStrategyContractRef;
use crate::token::{Cep18TokenContractRef, TokenLedger};

/// Validated totals captured at the start of an operation
struct Snapshot {
    /// Strategy value plus on-hand reserve, after any skim
    total_value: U256,
    total_shares: U256,
}

/// Yield vault
#[odra::module]
pub struct YieldVault {
    /// Claim shares (CEP-18)
    shares: SubModule<TokenLedger>,
    /// Underlying asset address
    asset: Var<Address>,
    /// Active strategy
    strategy: Var<Address>,
    /// Admin address
    admin: Var<Address>,
    /// Value per share after the last skim (1e18 scale), 0 while empty
    current_price: Var<U256>,
    /// Skimmed profit held for the reward distributor
    total_reward_accrued: Var<U256>,
    /// Reward sink, optional
    reward_distributor: Var<Address>,
    /// Share of total value kept in the strategy
    invest_percent: Var<u8>,
    /// Reentrancy lock
    locked: Var<bool>,
}

#[odra::module]
impl YieldVault {
    /// Initialize the vault
    ///
    /// # Arguments
    /// * `asset_address` - Underlying CEP-18 asset
    /// * `strategy_address` - Initial strategy (bind it with `set_vault` afterwards)
    /// * `name` - Share token name
    /// * `symbol` - Share token symbol
    pub fn init(&mut self, asset_address: Address, strategy_address: Address, name: String, symbol: String) {
        let caller = self.env().caller();
        self.asset.set(asset_address);
        self.strategy.set(strategy_address);
        self.admin.set(caller);
        self.current_price.set(U256::zero());
        self.total_reward_accrued.set(U256::zero());
        self.invest_percent.set(DEFAULT_INVEST_PERCENT);
        self.locked.set(false);
        self.shares.init(name, symbol);
    }

    // ========================================
    // CEP-18 Share Token
    // ========================================

    pub fn name(&self) -> String {
        self.shares.name()
    }

    pub fn symbol(&self) -> String {
        self.shares.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.shares.decimals()
    }

    pub fn total_supply(&self) -> U256 {
        self.shares.total_supply()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.shares.balance_of(owner)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.shares.allowance(owner, spender)
    }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        self.shares.transfer(to, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        self.shares.approve(spender, amount)
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        self.shares.transfer_from(from, to, amount)
    }

    // ========================================
    // Deposit / Withdraw
    // ========================================

    /// Deposit `amount` of the asset (approve the vault first)
    ///
    /// # Returns
    /// Shares minted; the first deposit into an empty vault always mints
    /// `BOOTSTRAP_SHARES`
    pub fn deposit(&mut self, amount: U256) -> U256 {
        self.lock();

        if amount.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        let snapshot = self.checkpoint();

        let bootstrap = snapshot.total_shares.is_zero();
        if !bootstrap && snapshot.total_value.is_zero() {
            self.env().revert(VaultError::ZeroTotalValue);
        }
        let shares = ShareMath::shares_for_deposit(amount, snapshot.total_value, snapshot.total_shares)
            .unwrap_or_revert(&self.env());
        if shares.is_zero() {
            self.env().revert(VaultError::ZeroShares);
        }

        // an empty vault must come out of the first deposit with a non-zero price
        let bootstrap_price = if bootstrap {
            let total_value = SafeMath::add(snapshot.total_value, amount).unwrap_or_revert(&self.env());
            let price = ShareMath::price_per_share(total_value, shares).unwrap_or_revert(&self.env());
            if price.is_zero() {
                self.env().revert(VaultError::ZeroPrice);
            }
            Some(price)
        } else {
            None
        };

        let caller = self.env().caller();
        let mut asset = self.asset_ref();
        if !asset.transfer_from(caller, self.env().self_address(), amount) {
            self.env().revert(VaultError::TransferFailed);
        }
        self.shares.mint(caller, shares);

        if let Some(price) = bootstrap_price {
            self.current_price.set(price);
        }

        self.env().emit_event(Deposit {
            owner: caller,
            assets: amount,
            shares,
        });

        self.unlock();
        shares
    }

    /// Burn `shares` and receive their share of the vault value
    ///
    /// Pulls the shortfall from the strategy when the on-hand reserve is not
    /// enough; any failure there reverts the whole withdrawal.
    pub fn withdraw(&mut self, shares: U256) -> U256 {
        self.lock();

        if shares.is_zero() {
            self.env().revert(VaultError::ZeroAmount);
        }
        let caller = self.env().caller();
        if self.shares.balance_of(caller) < shares {
            self.env().revert(VaultError::InsufficientBalance);
        }
        let snapshot = self.checkpoint();

        let amount = ShareMath::assets_for_shares(shares, snapshot.total_value, snapshot.total_shares)
            .unwrap_or_revert(&self.env());
        if amount.is_zero() {
            self.env().revert(VaultError::ZeroAssets);
        }

        let on_hand = self.on_hand_reserve();
        if amount > on_hand {
            let shortfall = SafeMath::sub(amount, on_hand).unwrap_or_revert(&self.env());
            self.pull_from_strategy(shortfall);
            if self.on_hand_reserve() < amount {
                self.env().revert(VaultError::InsufficientLiquidity);
            }
        }

        let mut asset = self.asset_ref();
        if !asset.transfer(caller, amount) {
            self.env().revert(VaultError::TransferFailed);
        }
        self.shares.burn(caller, shares);

        if self.shares.total_supply().is_zero() {
            self.current_price.set(U256::zero());
        }

        self.env().emit_event(Withdraw {
            owner: caller,
            assets: amount,
            shares,
        });

        self.unlock();
        amount
    }

    // ========================================
    // Capital Management (Admin Only)
    // ========================================

    /// Move on-hand assets above the reserve target into the strategy.
    /// Returns the amount invested, 0 when the reserve is at or below target.
    pub fn invest(&mut self) -> U256 {
        self.only_admin();
        self.lock();

        let snapshot = self.checkpoint();
        let target = self.reserve_target(snapshot.total_value);
        let on_hand = self.on_hand_reserve();
        if on_hand <= target {
            self.unlock();
            return U256::zero();
        }

        let amount = SafeMath::sub(on_hand, target).unwrap_or_revert(&self.env());
        let strategy_address = self.strategy_address();
        let mut asset = self.asset_ref();
        if !asset.transfer(strategy_address, amount) {
            self.env().revert(VaultError::TransferFailed);
        }
        let mut strategy = YieldStrategyContractRef::new(self.env(), strategy_address);
        strategy.mint(amount);

        self.env().emit_event(Invested {
            strategy: strategy_address,
            amount,
        });

        self.unlock();
        amount
    }

    /// Top the on-hand reserve back up to its target from the strategy.
    /// Returns the amount received, 0 when the reserve is at or above target.
    pub fn rebalance(&mut self) -> U256 {
        self.only_admin();
        self.lock();

        let snapshot = self.checkpoint();
        let target = self.reserve_target(snapshot.total_value);
        let on_hand = self.on_hand_reserve();
        if on_hand >= target {
            self.unlock();
            return U256::zero();
        }

        let requested = SafeMath::sub(target, on_hand).unwrap_or_revert(&self.env());
        let received = self.pull_from_strategy(requested);

        self.env().emit_event(Rebalanced {
            strategy: self.strategy_address(),
            requested,
            received,
        });

        self.unlock();
        received
    }

    /// Drain the active strategy and switch to `new_strategy`
    ///
    /// # Returns
    /// Assets recovered from the old strategy
    pub fn change_strategy(&mut self, new_strategy: Address) -> U256 {
        self.only_admin();
        self.lock();

        let old_strategy = self.strategy_address();
        if new_strategy == old_strategy {
            self.env().revert(VaultError::SameStrategy);
        }
        let candidate = YieldStrategyContractRef::new(self.env(), new_strategy);
        if candidate.asset() != self.asset() {
            self.env().revert(VaultError::InvalidStrategy);
        }

        self.checkpoint();

        let mut strategy = YieldStrategyContractRef::new(self.env(), old_strategy);
        let drained = strategy.withdraw_all();
        if !strategy.total_value().is_zero() {
            self.env().revert(VaultError::StrategyNotDrained);
        }
        self.strategy.set(new_strategy);

        self.env().emit_event(StrategyChanged {
            old_strategy,
            new_strategy,
            drained,
        });

        self.unlock();
        drained
    }

    /// Run the price gate and the profit skim without moving user funds
    ///
    /// # Returns
    /// Updated `current_price`
    pub fn harvest(&mut self) -> U256 {
        self.only_admin();
        self.lock();
        self.checkpoint();
        self.unlock();
        self.current_price.get_or_default()
    }

    // ========================================
    // Rewards
    // ========================================

    /// Forward the accrued skim to the reward distributor and notify it
    pub fn distribute_rewards(&mut self) -> U256 {
        self.only_admin();
        self.lock();

        let distributor = self
            .reward_distributor
            .get_or_revert_with(VaultError::RewardDistributorNotSet);
        let amount = self.total_reward_accrued.get_or_default();
        if amount.is_zero() {
            self.env().revert(VaultError::NoRewardsAccrued);
        }

        let mut asset = self.asset_ref();
        if !asset.transfer(distributor, amount) {
            self.env().revert(VaultError::TransferFailed);
        }
        let mut notifier = RewardNotifierContractRef::new(self.env(), distributor);
        notifier.notify_reward_amount(amount);
        self.total_reward_accrued.set(U256::zero());

        self.env().emit_event(RewardsDistributed { distributor, amount });

        self.unlock();
        amount
    }

    pub fn set_reward_distributor(&mut self, distributor: Address) {
        self.only_admin();
        self.reward_distributor.set(distributor);
        self.env().emit_event(RewardDistributorSet { distributor });
    }

    // ========================================
    // Admin Functions
    // ========================================

    /// Share of total value deployed by `invest`, in `1..=99`
    pub fn set_invest_percent(&mut self, percent: u8) {
        self.only_admin();
        if percent == 0 || percent > 99 {
            self.env().revert(VaultError::InvalidConfiguration);
        }
        let old_percent = self.invest_percent();
        self.invest_percent.set(percent);

        self.env().emit_event(InvestPercentUpdated {
            old_percent,
            new_percent: percent,
        });
    }

    pub fn transfer_admin(&mut self, new_admin: Address) {
        self.only_admin();
        let old_admin = self.get_admin();
        self.admin.set(new_admin);

        self.env().emit_event(AdminTransferred { old_admin, new_admin });
    }

    // ========================================
    // Views
    // ========================================

    pub fn asset(&self) -> Address {
        self.asset.get_or_revert_with(VaultError::InvalidConfiguration)
    }

    pub fn strategy(&self) -> Address {
        self.strategy_address()
    }

    pub fn current_price(&self) -> U256 {
        self.current_price.get_or_default()
    }

    pub fn total_reward_accrued(&self) -> U256 {
        self.total_reward_accrued.get_or_default()
    }

    /// Asset balance held by the vault minus funds earmarked for rewards
    pub fn on_hand_reserve(&self) -> U256 {
        let balance = self.asset_ref().balance_of(self.env().self_address());
        SafeMath::sub(balance, self.total_reward_accrued.get_or_default())
            .unwrap_or_revert(&self.env())
    }

    /// Strategy value plus on-hand reserve, unvalidated
    pub fn total_value(&self) -> U256 {
        let strategy = YieldStrategyContractRef::new(self.env(), self.strategy_address());
        SafeMath::add(strategy.total_value(), self.on_hand_reserve()).unwrap_or_revert(&self.env())
    }

    /// Preview of shares minted for `assets`
    pub fn convert_to_shares(&self, assets: U256) -> U256 {
        let total_shares = self.shares.total_supply();
        if total_shares.is_zero() {
            return U256::from(BOOTSTRAP_SHARES);
        }
        let total_value = self.total_value();
        if total_value.is_zero() {
            return U256::zero();
        }
        ShareMath::shares_for_deposit(assets, total_value, total_shares).unwrap_or_revert(&self.env())
    }

    /// Preview of assets paid for `shares`
    pub fn convert_to_assets(&self, shares: U256) -> U256 {
        let total_shares = self.shares.total_supply();
        if total_shares.is_zero() {
            return U256::zero();
        }
        ShareMath::assets_for_shares(shares, self.total_value(), total_shares)
            .unwrap_or_revert(&self.env())
    }

    pub fn invest_percent(&self) -> u8 {
        self.invest_percent.get_or_default()
    }

    pub fn reward_distributor(&self) -> Option<Address> {
        self.reward_distributor.get()
    }

    pub fn get_admin(&self) -> Address {
        self.admin.get_or_revert_with(VaultError::Unauthorized)
    }

    // ========================================
    // Internal Functions
    // ========================================

    /// Validate strategy readings, skim appreciation and capture totals
    fn checkpoint(&mut self) -> Snapshot {
        let mut strategy = YieldStrategyContractRef::new(self.env(), self.strategy_address());
        let valuation = strategy.refresh_valuation();
        if !PriceGate::check(&valuation) {
            self.env().revert(VaultError::PriceDivergence);
        }

        let total_shares = self.shares.total_supply();
        let mut total_value = SafeMath::add(valuation.total_value, self.on_hand_reserve())
            .unwrap_or_revert(&self.env());
        if total_shares.is_zero() {
            return Snapshot { total_value, total_shares };
        }

        let old_price = self.current_price.get_or_default();
        let new_price = ShareMath::price_per_share(total_value, total_shares)
            .unwrap_or_revert(&self.env());
        // outstanding shares always carry a non-zero price
        if new_price.is_zero() {
            self.env().revert(VaultError::ZeroTotalValue);
        }
        let skim = ShareMath::skim(old_price, new_price, total_shares).unwrap_or_revert(&self.env());

        if skim.amount.is_zero() {
            self.current_price.set(new_price);
            return Snapshot { total_value, total_shares };
        }

        // otherwise earmarked out of the on-hand reserve
        let from_strategy = valuation.total_value >= skim.amount;
        if from_strategy {
            let received = strategy.withdraw(skim.amount);
            if received < skim.amount {
                self.env().revert(VaultError::StrategyShortfall);
            }
        }

        let accrued = self.total_reward_accrued.get_or_default();
        self.total_reward_accrued
            .set(SafeMath::add(accrued, skim.amount).unwrap_or_revert(&self.env()));
        total_value = SafeMath::sub(total_value, skim.amount).unwrap_or_revert(&self.env());
        self.current_price
            .set(SafeMath::sub(new_price, skim.per_share).unwrap_or_revert(&self.env()));

        self.env().emit_event(ProfitSkimmed {
            old_price,
            new_price,
            amount: skim.amount,
            from_strategy,
        });

        Snapshot { total_value, total_shares }
    }

    /// Ask the strategy for `amount`; anything less reverts
    fn pull_from_strategy(&mut self, amount: U256) -> U256 {
        let mut strategy = YieldStrategyContractRef::new(self.env(), self.strategy_address());
        let received = strategy.withdraw(amount);
        if received < amount {
            self.env().revert(VaultError::StrategyShortfall);
        }
        received
    }

    fn reserve_target(&self, total_value: U256) -> U256 {
        ShareMath::reserve_target(total_value, self.invest_percent()).unwrap_or_revert(&self.env())
    }

    fn asset_ref(&self) -> Cep18TokenContractRef {
        Cep18TokenContractRef::new(self.env(), self.asset())
    }

    fn strategy_address(&self) -> Address {
        self.strategy.get_or_revert_with(VaultError::InvalidConfiguration)
    }

    fn only_admin(&self) {
        let caller = self.env().caller();
        if caller != self.get_admin() {
            self.env().revert(VaultError::Unauthorized);
        }
    }

    /// Reentrancy lock
    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(VaultError::Locked);
        }
        self.locked.set(true);
    }

    /// Reentrancy unlock
    fn unlock(&mut self) {
        self.locked.set(false);
    }
}
