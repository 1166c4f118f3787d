//! Yield Protocol - interest-bearing pool the lending strategy deploys into
//!
//! Depositors receive pool units whose exchange rate against the underlying
//! asset grows as yield accrues. The vault never talks to the pool directly;
//! only strategies do, through the `YieldProtocol` interface.

pub mod yield_pool;
pub mod errors;

pub use yield_pool::{YieldPool, YieldProtocolContractRef};
pub use errors::ProtocolError;
pub use yield_pool::{Supplied, Redeemed, YieldAccrued};
