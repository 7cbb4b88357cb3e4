// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 限流策略
///
/// 描述单个上游API的配额参数。不同上游共享完全相同的
/// 限流机制，差异仅在于配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// 共享缓存键的命名空间前缀，标识目标上游API
    pub service_prefix: String,
    /// 每个窗口授予的默认许可数，在缓存不可用时兜底（fail open）
    pub default_limit: i64,
    /// 窗口长度（秒）
    pub window_seconds: u64,
}

impl RateLimitPolicy {
    /// 创建新的限流策略，窗口长度为默认的一分钟
    pub fn new(service_prefix: impl Into<String>, default_limit: i64) -> Self {
        Self {
            service_prefix: service_prefix.into(),
            default_limit,
            window_seconds: 60,
        }
    }

    /// 窗口长度
    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_seconds as i64)
    }
}

/// 限流窗口
///
/// 单个上游API当前配额窗口的进程内状态，
/// 通过共享缓存在实例间尽力同步。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// 当前窗口剩余许可数
    pub remaining: i64,
    /// 当前窗口的滚动时间点
    pub reset_at: DateTime<Utc>,
}

impl RateLimitWindow {
    /// 以默认配额开启一个新窗口
    pub fn fresh(policy: &RateLimitPolicy) -> Self {
        Self {
            remaining: policy.default_limit,
            reset_at: Utc::now() + policy.window(),
        }
    }

    /// 窗口是否已在逻辑上过期（滚动时间已到）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_at
    }

    /// 将窗口滚动到下一个周期
    pub fn reset(&mut self, policy: &RateLimitPolicy) {
        self.remaining = policy.default_limit;
        self.reset_at = Utc::now() + policy.window();
    }

    /// 尝试消耗一个许可
    ///
    /// # 返回值
    ///
    /// 剩余许可大于零时消耗一个并返回true，否则返回false
    pub fn try_consume(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}
