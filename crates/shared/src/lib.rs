//! Shared types, errors, and configuration for Paisa.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
