// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 未设置RUST_LOG时的默认日志过滤指令
const DEFAULT_LOG_DIRECTIVES: &str = "info,relayrs=debug";

/// 初始化日志订阅器
///
/// 限流等待和发件箱认领竞争都只体现在日志和指标里，
/// 本服务自身的日志默认开到debug级别
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_DIRECTIVES.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
