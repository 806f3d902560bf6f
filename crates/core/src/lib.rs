//! Core business logic for Paisa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Wallet balance mutation rules and transaction planning
//! - `payment` - Payment gateway abstraction and signature verification

pub mod ledger;
pub mod payment;
