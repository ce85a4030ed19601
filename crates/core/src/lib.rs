//! Core business logic for Kobo.
//!
//! This crate contains pure reconciliation logic with ZERO web framework or
//! database dependencies. All domain types, settlement rules, and calculations
//! live here; persistence and transport are supplied by adapter crates.
//!
//! # Modules
//!
//! - `reconcile` - Transfer events, settlement state machine, and the worker
//! - `fees` - Processing and gateway fee schedules
//! - `fx` - Currency conversion and spot rate lookup
//! - `custody` - Custody desk client for crypto deposit verification

pub mod custody;
pub mod fees;
pub mod fx;
pub mod reconcile;
