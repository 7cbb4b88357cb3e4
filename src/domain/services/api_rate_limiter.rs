// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

/// 上游携带剩余配额的响应头
pub const HEADER_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
/// 上游携带窗口重置时间（Unix秒）的响应头
pub const HEADER_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

/// API限流器接口
///
/// 约束对单个配额受限上游API的出站调用速率，
/// 配额由同一服务的所有运行实例共享。
#[async_trait]
pub trait ApiRateLimiter: Send + Sync {
    /// 获取一个许可
    ///
    /// 阻塞（异步等待）直到当前窗口有可用许可，可能跨越多次
    /// 窗口滚动。该操作不会失败：配额耗尽只会推迟，不会报错。
    /// 需要截止时间的调用方应在外层用超时或取消包裹。
    async fn acquire(&self);

    /// 判断一批请求能否在不超出配额的情况下执行
    ///
    /// # 参数
    ///
    /// * `expected_count` - 预期的请求数
    ///
    /// # 返回值
    ///
    /// 当前窗口剩余许可足够、或窗口已在逻辑上过期时返回true
    fn can_execute_batch(&self, expected_count: i64) -> bool;

    /// 用上游响应头中的配额信息修正本地与共享状态
    ///
    /// 仅应用存在的字段；上游给出的值无条件覆盖本地估计。
    /// 主要用于上游返回429时的纠偏。
    async fn report_headers(&self, headers: &HeaderMap);

    /// 当前窗口剩余许可数
    fn remaining(&self) -> i64;

    /// 当前窗口的滚动时间点
    fn reset_at(&self) -> DateTime<Utc>;
}
