//! Yield Pool - CEP-4626 style interest-bearing pool
//!
//! Users supply the underlying asset and receive pool units. Interest is
//! booked by the pool admin through `accrue_yield`, which raises the
//! exchange rate of every outstanding unit.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::ProtocolError;
use crate::math::{SafeMath, SCALE};
use crate::token::{Cep18TokenContractRef, TokenLedger};

/// Event emitted when the asset is supplied to the pool
#[odra::event]
pub struct Supplied {
    /// Supplier address
    pub supplier: Address,
    /// Asset amount supplied
    pub assets: U256,
    /// Pool units minted
    pub units: U256,
}

/// Event emitted when units are redeemed
#[odra::event]
pub struct Redeemed {
    /// Redeemer address
    pub redeemer: Address,
    /// Pool units burned
    pub units: U256,
    /// Asset amount paid out
    pub assets: U256,
}

/// Event emitted when interest is booked
#[odra::event]
pub struct YieldAccrued {
    /// Interest amount added to the pool
    pub amount: U256,
    /// Exchange rate after accrual (scaled by 1e18)
    pub exchange_rate: U256,
}

/// Interest-bearing pool
#[odra::module]
pub struct YieldPool {
    /// Pool units
    units: SubModule<TokenLedger>,
    /// Underlying asset address
    asset: Var<Address>,
    /// Assets owned by the pool (including accrued interest)
    total_assets: Var<U256>,
    /// Admin address
    admin: Var<Address>,
    /// Whether redemptions are frozen
    withdrawals_frozen: Var<bool>,
}

#[odra::module]
impl YieldPool {
    /// Initialize the pool for an underlying asset
    pub fn init(&mut self, asset_address: Address) {
        let caller = self.env().caller();
        self.asset.set(asset_address);
        self.total_assets.set(U256::zero());
        self.admin.set(caller);
        self.withdrawals_frozen.set(false);
        self.units.init(String::from("Yield Pool Unit"), String::from("ypUNIT"));
    }

    // ========================================
    // Supply / Redeem
    // ========================================

    /// Supply `amount` of the asset (caller must approve the pool first)
    ///
    /// # Returns
    /// Pool units minted to the caller
    pub fn deposit(&mut self, amount: U256) -> U256 {
        if amount.is_zero() {
            self.env().revert(ProtocolError::ZeroAmount);
        }
        let caller = self.env().caller();
        let units = self.convert_to_units(amount);
        if units.is_zero() {
            self.env().revert(ProtocolError::ZeroUnits);
        }

        let mut asset = self.asset_ref();
        if !asset.transfer_from(caller, self.env().self_address(), amount) {
            self.env().revert(ProtocolError::TransferFailed);
        }

        let total_assets = self.total_assets.get_or_default();
        self.total_assets.set(SafeMath::add(total_assets, amount).unwrap_or_revert(&self.env()));
        self.units.mint(caller, units);

        self.env().emit_event(Supplied {
            supplier: caller,
            assets: amount,
            units,
        });

        units
    }

    /// Burn `units` and pay out the underlying asset at the current rate
    pub fn redeem(&mut self, units: U256) -> U256 {
        if units.is_zero() {
            self.env().revert(ProtocolError::ZeroAmount);
        }
        if self.withdrawals_frozen.get_or_default() {
            self.env().revert(ProtocolError::WithdrawalsFrozen);
        }
        let caller = self.env().caller();
        if self.units.balance_of(caller) < units {
            self.env().revert(ProtocolError::InsufficientUnits);
        }

        let assets = self.convert_to_assets(units);
        self.units.burn(caller, units);
        let total_assets = self.total_assets.get_or_default();
        self.total_assets.set(SafeMath::sub(total_assets, assets).unwrap_or_revert(&self.env()));

        let mut asset = self.asset_ref();
        if !asset.transfer(caller, assets) {
            self.env().revert(ProtocolError::TransferFailed);
        }

        self.env().emit_event(Redeemed {
            redeemer: caller,
            units,
            assets,
        });

        assets
    }

    // ========================================
    // Views
    // ========================================

    /// Assets per unit (scaled by 1e18); 1e18 while the pool is empty
    pub fn exchange_rate(&self) -> U256 {
        let supply = self.units.total_supply();
        if supply.is_zero() {
            return U256::from(SCALE);
        }
        SafeMath::mul_div(self.total_assets.get_or_default(), U256::from(SCALE), supply)
            .unwrap_or_revert(&self.env())
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.units.balance_of(owner)
    }

    pub fn total_supply(&self) -> U256 {
        self.units.total_supply()
    }

    pub fn total_assets(&self) -> U256 {
        self.total_assets.get_or_default()
    }

    pub fn asset(&self) -> Address {
        self.asset.get_or_revert_with(ProtocolError::InvalidConfiguration)
    }

    /// Units minted for `assets` supplied now
    pub fn convert_to_units(&self, assets: U256) -> U256 {
        let supply = self.units.total_supply();
        let total_assets = self.total_assets.get_or_default();
        if supply.is_zero() || total_assets.is_zero() {
            return assets; // 1:1 initial rate
        }
        SafeMath::mul_div(assets, supply, total_assets).unwrap_or_revert(&self.env())
    }

    /// Assets paid for redeeming `units` now
    pub fn convert_to_assets(&self, units: U256) -> U256 {
        let supply = self.units.total_supply();
        if supply.is_zero() {
            return U256::zero();
        }
        SafeMath::mul_div(units, self.total_assets.get_or_default(), supply)
            .unwrap_or_revert(&self.env())
    }

    pub fn withdrawals_frozen(&self) -> bool {
        self.withdrawals_frozen.get_or_default()
    }

    // ========================================
    // Admin Functions
    // ========================================

    /// Book `amount` of interest; pulls the funds from the admin
    pub fn accrue_yield(&mut self, amount: U256) {
        self.only_admin();
        if amount.is_zero() {
            self.env().revert(ProtocolError::ZeroAmount);
        }
        let caller = self.env().caller();
        let mut asset = self.asset_ref();
        if !asset.transfer_from(caller, self.env().self_address(), amount) {
            self.env().revert(ProtocolError::TransferFailed);
        }
        let total_assets = self.total_assets.get_or_default();
        self.total_assets.set(SafeMath::add(total_assets, amount).unwrap_or_revert(&self.env()));

        self.env().emit_event(YieldAccrued {
            amount,
            exchange_rate: self.exchange_rate(),
        });
    }

    pub fn set_withdrawals_frozen(&mut self, frozen: bool) {
        self.only_admin();
        self.withdrawals_frozen.set(frozen);
    }

    fn asset_ref(&self) -> Cep18TokenContractRef {
        let asset = self.asset.get_or_revert_with(ProtocolError::InvalidConfiguration);
        Cep18TokenContractRef::new(self.env(), asset)
    }

    fn only_admin(&self) {
        let caller = self.env().caller();
        let admin = self.admin.get_or_revert_with(ProtocolError::Unauthorized);
        if caller != admin {
            self.env().revert(ProtocolError::Unauthorized);
        }
    }
}

/// Interface strategies use to reach the yield protocol
#[odra::external_contract]
pub trait YieldProtocol {
    /// Supply assets, returns units minted
    fn deposit(&mut self, amount: U256) -> U256;

    /// Redeem units, returns assets paid out
    fn redeem(&mut self, units: U256) -> U256;

    /// Assets per unit (scaled by 1e18)
    fn exchange_rate(&self) -> U256;

    /// Units held by `owner`
    fn balance_of(&self, owner: Address) -> U256;
}
