// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// 应用程序配置设置
///
/// 包含数据库、Redis、限流和发件箱调度等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    pub redis: RedisSettings,
    /// 限流配置
    pub rate_limiting: RateLimitingSettings,
    /// 发件箱配置
    pub outbox: OutboxSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
}

/// 限流配置设置
#[derive(Debug, Deserialize)]
pub struct RateLimitingSettings {
    /// 配额窗口长度（秒）
    pub window_seconds: u64,
    /// 各上游API的配额配置，键为上游名称
    pub upstreams: HashMap<String, UpstreamQuotaSettings>,
}

/// 单个上游API的配额配置
#[derive(Debug, Deserialize)]
pub struct UpstreamQuotaSettings {
    /// 共享缓存键的命名空间前缀
    pub service_prefix: String,
    /// 每个窗口的默认许可数
    pub default_limit: i64,
}

/// 指标导出配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus导出器监听地址
    pub listen_addr: String,
}

/// 发件箱配置设置
#[derive(Debug, Deserialize)]
pub struct OutboxSettings {
    /// 轮询间隔（秒）
    pub poll_interval_seconds: u64,
    /// 每次轮询的最大记录数
    pub batch_size: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default DB pool settings
            .set_default("database.url", "sqlite://relayrs.db?mode=rwc")?
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Redis settings
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            // Default Rate Limiting settings (one entry per upstream API)
            .set_default("rate_limiting.window_seconds", 60)?
            .set_default("rate_limiting.upstreams.chartscan.service_prefix", "chartscan")?
            .set_default("rate_limiting.upstreams.chartscan.default_limit", 10000)?
            .set_default("rate_limiting.upstreams.soundwave.service_prefix", "soundwave")?
            .set_default("rate_limiting.upstreams.soundwave.default_limit", 1000)?
            // Default Outbox settings
            .set_default("outbox.poll_interval_seconds", 2)?
            .set_default("outbox.batch_size", 50)?
            // Default Metrics settings
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RELAYRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
