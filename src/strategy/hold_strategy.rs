//! Hold Strategy - keeps the vault asset idle
//!
//! Prices are fixed at 1:1, so the gate always passes and the position value
//! is simply the asset balance. Useful as a safe harbour when migrating away
//! from a lending strategy.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::StrategyError;
use super::events::*;
use crate::math::SCALE;
use crate::price::Valuation;
use crate::token::Cep18TokenContractRef;

#[odra::module]
pub struct HoldStrategy {
    asset: Var<Address>,
    vault: Var<Address>,
    admin: Var<Address>,
    locked: Var<bool>,
}

#[odra::module]
impl HoldStrategy {
    pub fn init(&mut self, asset_address: Address) {
        let caller = self.env().caller();
        self.asset.set(asset_address);
        self.admin.set(caller);
        self.locked.set(false);
    }

    /// Bind the strategy to its vault (admin only, once)
    pub fn set_vault(&mut self, vault: Address) {
        let caller = self.env().caller();
        if caller != self.get_admin() {
            self.env().revert(StrategyError::Unauthorized);
        }
        if self.vault.get().is_some() {
            self.env().revert(StrategyError::VaultAlreadySet);
        }
        self.vault.set(vault);

        self.env().emit_event(VaultBound {
            strategy: self.env().self_address(),
            vault,
        });
    }

    pub fn get_valuation(&self) -> Valuation {
        Valuation {
            spot_price: U256::from(SCALE),
            oracle_price: U256::from(SCALE),
            virtual_price: U256::from(SCALE),
            total_value: self.balance(),
        }
    }

    pub fn refresh_valuation(&mut self) -> Valuation {
        self.only_vault();
        self.get_valuation()
    }

    pub fn mint(&mut self, amount: U256) {
        self.only_vault();
        self.lock();
        if amount.is_zero() {
            self.env().revert(StrategyError::ZeroAmount);
        }
        if self.balance() < amount {
            self.env().revert(StrategyError::InsufficientLiquidity);
        }
        self.env().emit_event(StrategyMinted { amount, units: amount });
        self.unlock();
    }

    pub fn withdraw(&mut self, amount: U256) -> U256 {
        let vault = self.only_vault();
        self.lock();
        if amount.is_zero() {
            self.env().revert(StrategyError::ZeroAmount);
        }
        if self.balance() < amount {
            self.env().revert(StrategyError::InsufficientLiquidity);
        }
        self.send(vault, amount);

        self.env().emit_event(StrategyRedeemed {
            requested: amount,
            received: amount,
        });
        self.unlock();
        amount
    }

    pub fn withdraw_all(&mut self) -> U256 {
        let vault = self.only_vault();
        self.lock();
        let amount = self.balance();
        if !amount.is_zero() {
            self.send(vault, amount);
        }
        self.env().emit_event(StrategyDrained { amount });
        self.unlock();
        amount
    }

    pub fn total_value(&self) -> U256 {
        self.balance()
    }

    pub fn asset(&self) -> Address {
        self.asset.get_or_revert_with(StrategyError::InvalidConfiguration)
    }

    pub fn vault(&self) -> Option<Address> {
        self.vault.get()
    }

    pub fn get_admin(&self) -> Address {
        self.admin.get_or_revert_with(StrategyError::Unauthorized)
    }

    fn balance(&self) -> U256 {
        Cep18TokenContractRef::new(self.env(), self.asset()).balance_of(self.env().self_address())
    }

    fn send(&self, to: Address, amount: U256) {
        let mut asset = Cep18TokenContractRef::new(self.env(), self.asset());
        if !asset.transfer(to, amount) {
            self.env().revert(StrategyError::TransferFailed);
        }
    }

    fn only_vault(&self) -> Address {
        let vault = self.vault.get_or_revert_with(StrategyError::VaultNotSet);
        if self.env().caller() != vault {
            self.env().revert(StrategyError::NotVault);
        }
        vault
    }

    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(StrategyError::Locked);
        }
        self.locked.set(true);
    }

    fn unlock(&mut self) {
        self.locked.set(false);
    }
}
