// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use relayrs::domain::models::rate_limit::RateLimitPolicy;
use relayrs::domain::services::api_rate_limiter::{
    ApiRateLimiter, HEADER_RATE_LIMIT_REMAINING, HEADER_RATE_LIMIT_RESET,
};
use relayrs::infrastructure::cache::redis_client::RedisClient;
use relayrs::infrastructure::services::distributed_rate_limiter::DistributedRateLimiter;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// 构造一个共享缓存不可达的限流器（fail open路径）
async fn limiter(prefix: &str, limit: i64, window_seconds: u64) -> Arc<DistributedRateLimiter> {
    // Nothing listens on port 1, so every cache call fails fast
    let redis = RedisClient::new("redis://127.0.0.1:1").await.unwrap();

    let mut policy = RateLimitPolicy::new(prefix, limit);
    policy.window_seconds = window_seconds;

    DistributedRateLimiter::new(redis, policy)
}

#[tokio::test]
async fn test_acquire_blocks_once_quota_is_exhausted() {
    let limiter = limiter("quota-bound", 2, 60).await;

    limiter.acquire().await;
    limiter.acquire().await;
    assert_eq!(limiter.remaining(), 0);

    // The third permit cannot be granted inside the current window
    let blocked = timeout(Duration::from_millis(250), limiter.acquire()).await;
    assert!(blocked.is_err());
    assert_eq!(limiter.remaining(), 0);
}

#[tokio::test]
async fn test_acquire_resumes_after_window_rollover() {
    let limiter = limiter("rollover", 1, 1).await;

    limiter.acquire().await;
    assert_eq!(limiter.remaining(), 0);

    let started = Instant::now();
    limiter.acquire().await;
    let waited = started.elapsed();

    // The second permit only lands after the one second window rolled
    assert!(waited >= Duration::from_millis(300), "waited {:?}", waited);
    assert!(waited < Duration::from_secs(5), "waited {:?}", waited);
    assert_eq!(limiter.remaining(), 0);
}

#[tokio::test]
async fn test_reset_moves_forward_on_rollover() {
    let limiter = limiter("monotonic", 1, 1).await;

    let first_reset = limiter.reset_at();
    limiter.acquire().await;
    limiter.acquire().await;

    assert!(limiter.reset_at() > first_reset);
}

#[tokio::test]
async fn test_response_headers_override_local_estimate() {
    let limiter = limiter("headers", 100, 60).await;

    let mut headers = HeaderMap::new();
    headers.insert(HEADER_RATE_LIMIT_REMAINING, HeaderValue::from_static("0"));
    let reset = (Utc::now().timestamp() + 60).to_string();
    headers.insert(
        HEADER_RATE_LIMIT_RESET,
        HeaderValue::from_str(&reset).unwrap(),
    );

    limiter.report_headers(&headers).await;

    assert_eq!(limiter.remaining(), 0);
    assert!(!limiter.can_execute_batch(1));

    let blocked = timeout(Duration::from_millis(250), limiter.acquire()).await;
    assert!(blocked.is_err());

    // A later response may also raise the budget again
    let mut headers = HeaderMap::new();
    headers.insert(HEADER_RATE_LIMIT_REMAINING, HeaderValue::from_static("42"));
    limiter.report_headers(&headers).await;

    assert_eq!(limiter.remaining(), 42);
    assert!(limiter.can_execute_batch(42));
}

#[tokio::test]
async fn test_headers_without_rate_limit_fields_are_ignored() {
    let limiter = limiter("no-headers", 7, 60).await;

    limiter.report_headers(&HeaderMap::new()).await;

    assert_eq!(limiter.remaining(), 7);
}

#[tokio::test]
async fn test_can_execute_batch_boundaries() {
    let limiter = limiter("batch", 5, 60).await;

    assert!(limiter.can_execute_batch(5));
    assert!(!limiter.can_execute_batch(6));

    // An expired window counts as executable: acquiring will roll it
    let mut headers = HeaderMap::new();
    headers.insert(HEADER_RATE_LIMIT_REMAINING, HeaderValue::from_static("0"));
    let past = (Utc::now().timestamp() - 5).to_string();
    headers.insert(
        HEADER_RATE_LIMIT_RESET,
        HeaderValue::from_str(&past).unwrap(),
    );
    limiter.report_headers(&headers).await;

    assert!(limiter.can_execute_batch(100));
}

#[tokio::test]
async fn test_fail_open_when_cache_is_unreachable() {
    let limiter = limiter("fail-open", 10, 60).await;

    // Give the background cache load a moment to fail
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The compiled-in default quota stays in effect
    assert_eq!(limiter.remaining(), 10);
    let granted = timeout(Duration::from_millis(250), limiter.acquire()).await;
    assert!(granted.is_ok());
    assert_eq!(limiter.remaining(), 9);
}
