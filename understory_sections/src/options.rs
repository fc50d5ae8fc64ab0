// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph configuration.

/// Options controlling edit validation and wrapper pooling.
///
/// Used by [`GraphManager::with_options`](crate::GraphManager::with_options).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphOptions {
    /// Reject item removals that cover only part of a subsection.
    ///
    /// When `false`, such removals fall back to an approximate child count: every
    /// subsection starting inside the range is treated as fully removed and the
    /// remainder of the count is charged to leaf items.
    /// Defaults to `true` in debug builds and `false` otherwise.
    pub strict_removals: bool,
    /// Maximum number of released wrappers retained per child kind.
    pub pool_capacity: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            strict_removals: cfg!(debug_assertions),
            pool_capacity: 32,
        }
    }
}

impl GraphOptions {
    /// Set [`GraphOptions::strict_removals`].
    pub fn with_strict_removals(mut self, strict: bool) -> Self {
        self.strict_removals = strict;
        self
    }

    /// Set [`GraphOptions::pool_capacity`].
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }
}
