//! Lending Strategy - deploys the vault asset into a yield pool
//!
//! Spot price is the pool exchange rate, cross-checked against an external
//! price feed and the strategy's own virtual-price watermark before any
//! capital moves.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::StrategyError;
use super::events::*;
use crate::math::{SafeMath, UnitMath};
use crate::oracle::PriceFeedContractRef;
use crate::price::{PriceGate, Valuation, Watermark};
use crate::protocol::YieldProtocolContractRef;
use crate::token::Cep18TokenContractRef;

/// Single-tenant lending strategy
#[odra::module]
pub struct LendingStrategy {
    /// Underlying asset address
    asset: Var<Address>,
    /// Yield protocol (pool) address
    protocol: Var<Address>,
    /// Reference price feed
    oracle: Var<Address>,
    /// Bound vault
    vault: Var<Address>,
    /// Admin address
    admin: Var<Address>,
    /// Last validated spot price, 0 while uninitialized
    virtual_price: Var<U256>,
    /// Reentrancy lock
    locked: Var<bool>,
}

#[odra::module]
impl LendingStrategy {
    /// Initialize the strategy
    ///
    /// # Arguments
    /// * `asset_address` - Base asset the vault deposits
    /// * `protocol_address` - Yield pool to supply into
    /// * `oracle_address` - Independent price feed for the pool unit
    pub fn init(&mut self, asset_address: Address, protocol_address: Address, oracle_address: Address) {
        let caller = self.env().caller();
        self.asset.set(asset_address);
        self.protocol.set(protocol_address);
        self.oracle.set(oracle_address);
        self.admin.set(caller);
        self.virtual_price.set(U256::zero());
        self.locked.set(false);
    }

    /// Bind the strategy to its vault (admin only, once)
    pub fn set_vault(&mut self, vault: Address) {
        self.only_admin();
        if self.vault.get().is_some() {
            self.env().revert(StrategyError::VaultAlreadySet);
        }
        self.vault.set(vault);

        self.env().emit_event(VaultBound {
            strategy: self.env().self_address(),
            vault,
        });
    }

    // ========================================
    // Valuation
    // ========================================

    pub fn get_valuation(&self) -> Valuation {
        self.read_valuation()
    }

    pub fn refresh_valuation(&mut self) -> Valuation {
        self.only_vault();
        self.validated_valuation()
    }

    pub fn total_value(&self) -> U256 {
        self.read_valuation().total_value
    }

    // ========================================
    // Capital Movement (Vault Only)
    // ========================================

    /// Supply `amount` of idle asset to the pool
    pub fn mint(&mut self, amount: U256) {
        self.only_vault();
        self.lock();

        if amount.is_zero() {
            self.env().revert(StrategyError::ZeroAmount);
        }
        self.validated_valuation();

        if self.idle_balance() < amount {
            self.env().revert(StrategyError::InsufficientLiquidity);
        }

        let protocol_address = self.protocol_address();
        let mut asset = self.asset_ref();
        if !asset.approve(protocol_address, amount) {
            self.env().revert(StrategyError::TransferFailed);
        }
        let mut protocol = YieldProtocolContractRef::new(self.env(), protocol_address);
        let units = protocol.deposit(amount);

        self.env().emit_event(StrategyMinted { amount, units });

        self.unlock();
    }

    /// Return at least `amount` to the vault
    ///
    /// Redeems `amount * 1e18 / spot + 1` units so truncation never short-funds
    /// the vault. Everything the strategy holds idle afterwards goes back too.
    pub fn withdraw(&mut self, amount: U256) -> U256 {
        let vault = self.only_vault();
        self.lock();

        if amount.is_zero() {
            self.env().revert(StrategyError::ZeroAmount);
        }
        let valuation = self.validated_valuation();

        let idle = self.idle_balance();
        if idle < amount {
            let needed = SafeMath::sub(amount, idle).unwrap_or_revert(&self.env());
            let held = self.position_units();
            let mut units = UnitMath::units_for_amount(needed, valuation.spot_price)
                .unwrap_or_revert(&self.env());
            if units > held {
                let held_value = UnitMath::value_of(held, valuation.spot_price)
                    .unwrap_or_revert(&self.env());
                if held_value < needed {
                    self.env().revert(StrategyError::InsufficientLiquidity);
                }
                units = held;
            }
            let mut protocol = YieldProtocolContractRef::new(self.env(), self.protocol_address());
            protocol.redeem(units);
        }

        let received = self.idle_balance();
        if received < amount {
            self.env().revert(StrategyError::StrategyShortfall);
        }
        self.send_to_vault(vault, received);

        self.env().emit_event(StrategyRedeemed {
            requested: amount,
            received,
        });

        self.unlock();
        received
    }

    /// Redeem the whole position and return everything to the vault.
    /// Runs without a price check so the vault can always exit a liquid pool.
    pub fn withdraw_all(&mut self) -> U256 {
        let vault = self.only_vault();
        self.lock();

        let units = self.position_units();
        if !units.is_zero() {
            let mut protocol = YieldProtocolContractRef::new(self.env(), self.protocol_address());
            protocol.redeem(units);
        }

        let amount = self.idle_balance();
        if !amount.is_zero() {
            self.send_to_vault(vault, amount);
        }

        self.env().emit_event(StrategyDrained { amount });

        self.unlock();
        amount
    }

    // ========================================
    // Admin Functions
    // ========================================

    /// Clear the watermark; the next validated read reseeds it from the oracle
    pub fn reset_virtual_price(&mut self) {
        self.only_admin();
        let old_price = self.virtual_price.get_or_default();
        self.virtual_price.set(U256::zero());

        self.env().emit_event(VirtualPriceUpdated {
            old_price,
            new_price: U256::zero(),
        });
    }

    // ========================================
    // Views
    // ========================================

    pub fn asset(&self) -> Address {
        self.asset.get_or_revert_with(StrategyError::InvalidConfiguration)
    }

    pub fn vault(&self) -> Option<Address> {
        self.vault.get()
    }

    pub fn protocol(&self) -> Address {
        self.protocol_address()
    }

    pub fn oracle(&self) -> Address {
        self.oracle.get_or_revert_with(StrategyError::InvalidConfiguration)
    }

    pub fn virtual_price(&self) -> U256 {
        self.virtual_price.get_or_default()
    }

    /// Pool units held by the strategy
    pub fn position_units(&self) -> U256 {
        let protocol = YieldProtocolContractRef::new(self.env(), self.protocol_address());
        protocol.balance_of(self.env().self_address())
    }

    pub fn get_admin(&self) -> Address {
        self.admin.get_or_revert_with(StrategyError::Unauthorized)
    }

    // ========================================
    // Internal Functions
    // ========================================

    fn read_valuation(&self) -> Valuation {
        let protocol = YieldProtocolContractRef::new(self.env(), self.protocol_address());
        let feed = PriceFeedContractRef::new(self.env(), self.oracle());

        let spot_price = protocol.exchange_rate();
        let oracle_price = feed.get_value();
        let units = protocol.balance_of(self.env().self_address());
        let position_value = UnitMath::value_of(units, spot_price).unwrap_or_revert(&self.env());
        let total_value = SafeMath::add(position_value, self.idle_balance())
            .unwrap_or_revert(&self.env());

        Valuation {
            spot_price,
            oracle_price,
            virtual_price: self.virtual_price.get_or_default(),
            total_value,
        }
    }

    /// Readings that passed the gate, with the watermark advanced
    fn validated_valuation(&mut self) -> Valuation {
        let mut valuation = self.read_valuation();
        if !PriceGate::check(&valuation) {
            self.env().revert(StrategyError::PriceDivergence);
        }

        let old_price = valuation.virtual_price;
        let new_price = Watermark::ratchet(old_price, valuation.spot_price, valuation.oracle_price);
        if new_price != old_price {
            self.virtual_price.set(new_price);
            self.env().emit_event(VirtualPriceUpdated { old_price, new_price });
        }

        valuation.virtual_price = new_price;
        valuation
    }

    fn idle_balance(&self) -> U256 {
        self.asset_ref().balance_of(self.env().self_address())
    }

    fn send_to_vault(&self, vault: Address, amount: U256) {
        let mut asset = self.asset_ref();
        if !asset.transfer(vault, amount) {
            self.env().revert(StrategyError::TransferFailed);
        }
    }

    fn asset_ref(&self) -> Cep18TokenContractRef {
        Cep18TokenContractRef::new(self.env(), self.asset())
    }

    fn protocol_address(&self) -> Address {
        self.protocol.get_or_revert_with(StrategyError::InvalidConfiguration)
    }

    fn only_vault(&self) -> Address {
        let caller = self.env().caller();
        let vault = self.vault.get_or_revert_with(StrategyError::VaultNotSet);
        if caller != vault {
            self.env().revert(StrategyError::NotVault);
        }
        vault
    }

    fn only_admin(&self) {
        let caller = self.env().caller();
        let admin = self.admin.get_or_revert_with(StrategyError::Unauthorized);
        if caller != admin {
            self.env().revert(StrategyError::Unauthorized);
        }
    }

    /// Reentrancy lock
    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(StrategyError::Locked);
        }
        self.locked.set(true);
    }

    /// Reentrancy unlock
    fn unlock(&mut self) {
        self.locked.set(false);
    }
}
