//! Shared types, errors, and configuration for Rentora.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Optimistic-concurrency tokens for mutable aggregates
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::BillingConfig;
pub use error::{AppError, AppResult};
