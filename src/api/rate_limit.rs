// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-window rate limiting per client IP.
//!
//! Windows live in a bounded in-process LRU; the least recently seen clients
//! are evicted first, which at worst resets their quota early.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroUsize,
    sync::Mutex,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use lru::LruCache;

use crate::{error::ApiError, state::AppState};

/// Distinct clients tracked at once.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct Window {
    started_at: Instant,
    count: u32,
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

pub struct RateLimiter {
    windows: Mutex<LruCache<IpAddr, Window>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_capacity(max_requests, window, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(max_requests: u32, window: Duration, capacity: usize) -> Self {
        Self {
            windows: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            max_requests,
            window,
        }
    }

    /// Count one request from `client` at `now`.
    pub fn check(&self, client: IpAddr, now: Instant) -> Decision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let window = windows.get_or_insert_mut(client, || Window {
            started_at: now,
            count: 0,
        });
        if now.saturating_duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        let allowed = window.count < self.max_requests;
        if allowed {
            window.count += 1;
        }

        Decision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests - window.count,
            reset_after: self
                .window
                .saturating_sub(now.saturating_duration_since(window.started_at)),
        }
    }
}

/// Client address: the peer socket when known, else the first
/// `X-Forwarded-For` hop.
fn client_ip(req: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn set_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from(decision.reset_after.as_secs()),
    );
}

/// Axum middleware rejecting clients over quota with 429.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_ip(&req);
    let decision = state.rate_limiter.check(client, Instant::now());

    if !decision.allowed {
        tracing::warn!(client = %client, "Rate limit exceeded");
        return Err(ApiError::too_many_requests(
            decision.reset_after.as_secs().max(1),
        ));
    }

    let mut response = next.run(req).await;
    set_headers(response.headers_mut(), &decision);
    Ok(response)
}
