//! Base asset token for dev deployments and tests
use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TokenError;
use crate::token::TokenLedger;

/// CEP-18 base asset with admin-restricted minting
#[odra::module]
pub struct AssetToken {
    ledger: SubModule<TokenLedger>,
    minter: Var<Address>,
}

#[odra::module]
impl AssetToken {
    pub fn init(&mut self, name: String, symbol: String) {
        let caller = self.env().caller();
        self.minter.set(caller);
        self.ledger.init(name, symbol);
    }

    pub fn name(&self) -> String { self.ledger.name() }
    pub fn symbol(&self) -> String { self.ledger.symbol() }
    pub fn decimals(&self) -> u8 { self.ledger.decimals() }
    pub fn total_supply(&self) -> U256 { self.ledger.total_supply() }
    pub fn balance_of(&self, owner: Address) -> U256 { self.ledger.balance_of(owner) }
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 { self.ledger.allowance(owner, spender) }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        self.ledger.transfer(to, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        self.ledger.approve(spender, amount)
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        self.ledger.transfer_from(from, to, amount)
    }

    /// Mint new tokens (minter only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        let caller = self.env().caller();
        if Some(caller) != self.minter.get() {
            self.env().revert(TokenError::Unauthorized);
        }
        self.ledger.mint(to, amount);
    }

    pub fn minter(&self) -> Address {
        self.minter.get_or_revert_with(TokenError::Unauthorized)
    }
}
