// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{api::rate_limit::RateLimiter, blockchain::ChainRegistry, config::Config};

/// Shared, read-only handler state.
///
/// Only the rate limiter's window table mutates, behind its own lock.
#[derive(Clone)]
pub struct AppState {
    pub registry: ChainRegistry,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: &Config, registry: ChainRegistry) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
        ));
        Self {
            registry,
            rate_limiter,
        }
    }
}
