// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动Prometheus指标导出器
///
/// 监听地址来自配置（metrics.listen_addr）。导出器安装失败
/// 不影响限流和发件箱调度，只记录警告（多实例共用一台机器
/// 或测试环境中端口可能已被占用）。
///
/// # 参数
///
/// * `settings` - 指标导出配置
pub fn init_metrics(settings: &MetricsSettings) {
    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}. Metrics exporter disabled.",
                settings.listen_addr, e
            );
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}
