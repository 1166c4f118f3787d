//! Yield vault module
//!
//! Pools a single asset from many depositors, issues CEP-18 shares against it
//! and deploys most of the capital through a swappable `YieldStrategy`.
//! Share prices move only after the strategy's readings pass the price gate.

pub mod yield_vault;
pub mod errors;
pub mod events;

#[cfg(test)]
mod tests;

pub use yield_vault::{YieldVault, YieldVaultContractRef};
pub use errors::VaultError;
pub use events::*;
