//! Custody desk client for crypto deposit verification.
//!
//! The desk's SDK surface is deliberately narrow: the reconciler only ever
//! re-queries a deposit or provisions a deposit address. Everything else the
//! vendor offers stays behind this boundary.

pub mod client;
pub mod error;
pub mod http;

pub use client::{CustodyClient, DepositAddress, VerifiedDeposit};
pub use error::CustodyError;
pub use http::HttpCustodyClient;

#[cfg(test)]
pub use client::MockCustodyClient;
