//! Optimistic-concurrency tokens for mutable aggregates.
//!
//! Every mutating lifecycle operation takes the expected token and returns
//! the bumped one; a losing concurrent writer fails explicitly instead of
//! silently overwriting.

use serde::{Deserialize, Serialize};

/// A row-version stamp on a mutable aggregate.
///
/// The token is compared before a mutation and incremented on every
/// successful write. Persistence layers map it to a `WHERE version = $n`
/// compare-and-swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcurrencyToken(pub i64);

impl ConcurrencyToken {
    /// The version of a freshly created aggregate.
    #[must_use]
    pub const fn initial() -> Self {
        Self(1)
    }

    /// Returns the token for the next write.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version number.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl Default for ConcurrencyToken {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}
