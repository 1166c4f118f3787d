//! Error types for the yield protocol

use odra::prelude::*;

/// Errors raised by the yield pool
#[odra::odra_error]
pub enum ProtocolError {
    /// Zero amount not allowed
    ZeroAmount = 300,
    /// Holder does not own enough units
    InsufficientUnits = 301,
    /// Redemptions are currently frozen
    WithdrawalsFrozen = 302,
    /// Asset transfer returned false
    TransferFailed = 303,
    /// Caller is not authorized
    Unauthorized = 304,
    /// Deposit too small to mint a unit
    ZeroUnits = 305,
    /// Underlying asset not configured
    InvalidConfiguration = 306,
}
