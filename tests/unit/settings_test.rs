// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use relayrs::config::settings::Settings;

#[test]
fn test_settings_defaults() {
    let settings = Settings::new().expect("settings load from defaults");

    assert!(settings.database.url.starts_with("sqlite://"));
    assert_eq!(settings.redis.url, "redis://127.0.0.1:6379");

    // One quota entry per upstream API
    assert_eq!(settings.rate_limiting.window_seconds, 60);
    let chartscan = settings
        .rate_limiting
        .upstreams
        .get("chartscan")
        .expect("chartscan upstream configured");
    assert_eq!(chartscan.service_prefix, "chartscan");
    assert_eq!(chartscan.default_limit, 10000);

    let soundwave = settings
        .rate_limiting
        .upstreams
        .get("soundwave")
        .expect("soundwave upstream configured");
    assert_eq!(soundwave.service_prefix, "soundwave");
    assert_eq!(soundwave.default_limit, 1000);

    assert_eq!(settings.outbox.poll_interval_seconds, 2);
    assert_eq!(settings.outbox.batch_size, 50);

    assert_eq!(settings.metrics.listen_addr, "0.0.0.0:9000");
    settings
        .metrics
        .listen_addr
        .parse::<std::net::SocketAddr>()
        .expect("metrics listen address is a socket address");
}
