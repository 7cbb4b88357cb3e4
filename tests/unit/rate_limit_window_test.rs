// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use relayrs::domain::models::rate_limit::{RateLimitPolicy, RateLimitWindow};

#[test]
fn test_policy_defaults_to_one_minute_window() {
    let policy = RateLimitPolicy::new("chartscan", 10000);
    assert_eq!(policy.window_seconds, 60);
    assert_eq!(policy.window(), Duration::seconds(60));
    assert_eq!(policy.default_limit, 10000);
}

#[test]
fn test_fresh_window_grants_default_limit() {
    let policy = RateLimitPolicy::new("soundwave", 1000);
    let window = RateLimitWindow::fresh(&policy);

    assert_eq!(window.remaining, 1000);
    assert!(window.reset_at > Utc::now());
    assert!(!window.is_expired(Utc::now()));
}

#[test]
fn test_try_consume_stops_at_zero() {
    let policy = RateLimitPolicy::new("svc", 2);
    let mut window = RateLimitWindow::fresh(&policy);

    assert!(window.try_consume());
    assert!(window.try_consume());
    assert_eq!(window.remaining, 0);

    // The counter never goes negative
    assert!(!window.try_consume());
    assert_eq!(window.remaining, 0);
}

#[test]
fn test_is_expired_once_reset_time_passes() {
    let policy = RateLimitPolicy::new("svc", 5);
    let mut window = RateLimitWindow::fresh(&policy);
    window.reset_at = Utc::now() - Duration::seconds(1);

    assert!(window.is_expired(Utc::now()));
}

#[test]
fn test_reset_restores_quota_and_moves_reset_forward() {
    let policy = RateLimitPolicy::new("svc", 3);
    let mut window = RateLimitWindow::fresh(&policy);

    while window.try_consume() {}
    let previous_reset = window.reset_at;

    std::thread::sleep(std::time::Duration::from_millis(10));
    window.reset(&policy);

    assert_eq!(window.remaining, 3);
    assert!(window.reset_at > previous_reset);
}
