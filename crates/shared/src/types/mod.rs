//! Common types used across the application.

pub mod id;
pub mod money;
pub mod version;

pub use id::*;
pub use money::{Currency, Money};
pub use version::ConcurrencyToken;
