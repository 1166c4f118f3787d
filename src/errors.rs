//! Errors shared across the token ledgers and the checked math helpers
use odra::prelude::*;

/// Errors raised by the CEP-18 ledgers (asset token and vault shares)
#[odra::odra_error]
pub enum TokenError {
    /// Insufficient allowance for transfer
    InsufficientAllowance = 100,

    /// Insufficient balance for operation
    InsufficientBalance = 101,

    /// Caller may not mint
    Unauthorized = 102,
}

/// Errors raised by checked U256 arithmetic
#[odra::odra_error]
#[derive(Debug)]
pub enum MathError {
    /// Overflow error
    Overflow = 150,

    /// Underflow error
    Underflow = 151,

    /// Division by zero
    DivisionByZero = 152,
}
