#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
extern crate alloc;

// Shared building blocks
pub mod errors;
pub mod events;
pub mod math;
pub mod price;
pub mod token;
pub mod tokens;

// Collaborators: reference price and the yield protocol
pub mod oracle;
pub mod protocol;

// Strategies and the vault
pub mod strategy;
pub mod vault;

// Reward forwarding
pub mod rewards;

#[cfg(test)]
mod testing;
