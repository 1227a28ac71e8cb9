// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Handshake configuration.

use std::time::Duration;

/// Bulk passes per round when nothing else is configured.
pub const DEFAULT_PASSES: u32 = 500;

/// Tunables shared by both roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Full passes over the bulk slots per round.
    pub passes: u32,
    /// Rounds the client runs before shutting down; `None` runs forever.
    pub rounds: Option<u64>,
    /// Upper bound for every doorbell wait; `None` blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl HandshakeConfig {
    /// Set the pass count.
    #[must_use]
    pub const fn with_passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    /// Set the round limit.
    #[must_use]
    pub const fn with_rounds(mut self, rounds: u64) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Set the wait timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            passes: DEFAULT_PASSES,
            rounds: None,
            timeout: None,
        }
    }
}
