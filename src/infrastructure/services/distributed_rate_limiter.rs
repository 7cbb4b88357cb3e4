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

use crate::domain::models::rate_limit::{RateLimitPolicy, RateLimitWindow};
use crate::domain::services::api_rate_limiter::{
    ApiRateLimiter, HEADER_RATE_LIMIT_REMAINING, HEADER_RATE_LIMIT_RESET,
};
use crate::infrastructure::cache::redis_client::RedisClient;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use metrics::counter;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// 等待下一次探测的最小间隔（毫秒）
const MIN_POLL_INTERVAL_MS: i64 = 100;

/// 分布式API限流器
///
/// 单个上游API的配额闸门，进程内用一把互斥锁串行化计数器的
/// 读改写，跨实例通过Redis尽力同步（构造时读取，变更后写回）。
/// 计数器的扣减本身没有分布式锁：设计上接受实例间的最终一致
/// 偏差，以换取低延迟。Redis不可用时退化为编译期默认配额
/// （fail open），可用性优先于严格的配额执行。
pub struct DistributedRateLimiter {
    redis: RedisClient,
    policy: RateLimitPolicy,
    window: Mutex<RateLimitWindow>,
}

impl DistributedRateLimiter {
    /// 创建新的分布式限流器
    ///
    /// 共享缓存中的状态在后台尽力加载：加载完成前获取的许可
    /// 按编译期默认配额计算。
    ///
    /// # 参数
    ///
    /// * `redis` - Redis客户端
    /// * `policy` - 该上游的限流策略
    ///
    /// # 返回值
    ///
    /// 返回限流器实例
    pub fn new(redis: RedisClient, policy: RateLimitPolicy) -> Arc<Self> {
        let limiter = Arc::new(Self {
            window: Mutex::new(RateLimitWindow::fresh(&policy)),
            redis,
            policy,
        });

        let loader = limiter.clone();
        tokio::spawn(async move {
            loader.load_from_cache().await;
        });

        limiter
    }

    fn remaining_key(&self) -> String {
        format!("{}:rate:remaining", self.policy.service_prefix)
    }

    fn reset_key(&self) -> String {
        format!("{}:rate:reset", self.policy.service_prefix)
    }

    /// 从共享缓存加载最近一次已知的窗口状态
    async fn load_from_cache(&self) {
        let remaining = self.redis.get(&self.remaining_key()).await;
        let reset = self.redis.get(&self.reset_key()).await;

        let (remaining, reset) = match (remaining, reset) {
            (Ok(remaining), Ok(reset)) => (remaining, reset),
            (Err(e), _) | (_, Err(e)) => {
                // Fail open: keep the compiled-in defaults
                debug!(
                    "{} rate limit state unavailable, using defaults: {}",
                    self.policy.service_prefix, e
                );
                return;
            }
        };

        let mut window = self.window.lock();

        if let Some(value) = remaining.and_then(|v| v.parse::<i64>().ok()) {
            window.remaining = value;
        }

        if let Some(epoch) = reset.and_then(|v| v.parse::<i64>().ok()) {
            if let Some(reset_at) = Utc.timestamp_opt(epoch, 0).single() {
                window.reset_at = reset_at;
            }
        }

        info!(
            "{} rate limiter init complete: remaining={}, reset_at={}",
            self.policy.service_prefix, window.remaining, window.reset_at
        );
    }

    /// 将窗口快照异步写回共享缓存（尽力而为）
    fn persist(&self, snapshot: RateLimitWindow) {
        let redis = self.redis.clone();
        let prefix = self.policy.service_prefix.clone();
        let remaining_key = self.remaining_key();
        let reset_key = self.reset_key();
        let ttl = (self.policy.window_seconds * 2) as usize;

        tokio::spawn(async move {
            let result = async {
                redis
                    .set(&remaining_key, &snapshot.remaining.to_string(), ttl)
                    .await?;
                redis
                    .set(&reset_key, &snapshot.reset_at.timestamp().to_string(), ttl)
                    .await
            }
            .await;

            if let Err(e) = result {
                debug!("{} rate limit state not persisted: {}", prefix, e);
            }
        });
    }
}

#[async_trait]
impl ApiRateLimiter for DistributedRateLimiter {
    async fn acquire(&self) {
        loop {
            let reset_at = {
                let mut window = self.window.lock();
                let now = Utc::now();

                if window.is_expired(now) {
                    window.reset(&self.policy);
                    debug!(
                        "{} rate limiter reset: remaining={}, reset_at={}",
                        self.policy.service_prefix, window.remaining, window.reset_at
                    );
                }

                if window.try_consume() {
                    let snapshot = *window;
                    drop(window);
                    self.persist(snapshot);
                    counter!("api_rate_limiter_acquired_total", "service" => self.policy.service_prefix.clone())
                        .increment(1);
                    return;
                }

                window.reset_at
            };

            let wait_ms = (reset_at - Utc::now())
                .num_milliseconds()
                .max(MIN_POLL_INTERVAL_MS);
            info!(
                "{} rate limit reached. Waiting {:.1}s until {}",
                self.policy.service_prefix,
                wait_ms as f64 / 1000.0,
                reset_at
            );
            counter!("api_rate_limiter_waits_total", "service" => self.policy.service_prefix.clone())
                .increment(1);
            sleep(Duration::from_millis(wait_ms as u64)).await;
        }
    }

    fn can_execute_batch(&self, expected_count: i64) -> bool {
        let window = self.window.lock();
        window.remaining >= expected_count || window.is_expired(Utc::now())
    }

    async fn report_headers(&self, headers: &HeaderMap) {
        let new_remaining = headers
            .get(HEADER_RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());

        let new_reset = headers
            .get(HEADER_RATE_LIMIT_RESET)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single());

        if new_remaining.is_none() && new_reset.is_none() {
            return;
        }

        let snapshot = {
            let mut window = self.window.lock();

            // Upstream truth wins over the local estimate
            if let Some(remaining) = new_remaining {
                window.remaining = remaining;
            }

            if let Some(reset_at) = new_reset {
                window.reset_at = reset_at;
            }

            *window
        };

        debug!(
            "{} rate limiter updated from headers: remaining={}, reset_at={}",
            self.policy.service_prefix, snapshot.remaining, snapshot.reset_at
        );
        self.persist(snapshot);
    }

    fn remaining(&self) -> i64 {
        self.window.lock().remaining
    }

    fn reset_at(&self) -> DateTime<Utc> {
        self.window.lock().reset_at
    }
}
