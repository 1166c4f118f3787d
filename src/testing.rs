//! Test doubles for the vault suite

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::math::SCALE;
use crate::price::Valuation;
use crate::token::Cep18TokenContractRef;
use crate::vault::YieldVaultContractRef;

/// Strategy with settable prices that holds the asset idle.
/// With `reenter` set, `withdraw` calls back into the vault.
#[odra::module]
pub struct MockStrategy {
    asset: Var<Address>,
    vault: Var<Address>,
    spot_price: Var<U256>,
    oracle_price: Var<U256>,
    virtual_price: Var<U256>,
    reenter: Var<bool>,
}

#[odra::module]
impl MockStrategy {
    pub fn init(&mut self, asset_address: Address) {
        self.asset.set(asset_address);
        self.set_prices(U256::from(SCALE), U256::from(SCALE), U256::from(SCALE));
        self.reenter.set(false);
    }

    pub fn set_vault(&mut self, vault: Address) {
        self.vault.set(vault);
    }

    pub fn set_prices(&mut self, spot_price: U256, oracle_price: U256, virtual_price: U256) {
        self.spot_price.set(spot_price);
        self.oracle_price.set(oracle_price);
        self.virtual_price.set(virtual_price);
    }

    pub fn set_reenter(&mut self, reenter: bool) {
        self.reenter.set(reenter);
    }

    /// Send part of the position away, as a protocol loss would
    pub fn lose(&mut self, amount: U256, sink: Address) {
        Cep18TokenContractRef::new(self.env(), self.asset()).transfer(sink, amount);
    }

    pub fn asset(&self) -> Address {
        self.asset.get_or_revert_with(crate::strategy::StrategyError::InvalidConfiguration)
    }

    pub fn get_valuation(&self) -> Valuation {
        Valuation {
            spot_price: self.spot_price.get_or_default(),
            oracle_price: self.oracle_price.get_or_default(),
            virtual_price: self.virtual_price.get_or_default(),
            total_value: self.total_value(),
        }
    }

    pub fn refresh_valuation(&mut self) -> Valuation {
        self.get_valuation()
    }

    #[allow(unused_variables)]
    pub fn mint(&mut self, amount: U256) {}

    pub fn withdraw(&mut self, amount: U256) -> U256 {
        let vault = self.vault_address();
        if self.reenter.get_or_default() {
            YieldVaultContractRef::new(self.env(), vault).withdraw(U256::one());
        }
        Cep18TokenContractRef::new(self.env(), self.asset()).transfer(vault, amount);
        amount
    }

    pub fn withdraw_all(&mut self) -> U256 {
        let amount = self.total_value();
        if !amount.is_zero() {
            Cep18TokenContractRef::new(self.env(), self.asset()).transfer(self.vault_address(), amount);
        }
        amount
    }

    pub fn total_value(&self) -> U256 {
        Cep18TokenContractRef::new(self.env(), self.asset()).balance_of(self.env().self_address())
    }

    fn vault_address(&self) -> Address {
        self.vault.get_or_revert_with(crate::strategy::StrategyError::VaultNotSet)
    }
}
