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

use crate::config::settings::OutboxSettings;
use crate::domain::models::events::{SubmissionCreated, SubmissionStatusChanged};
use crate::domain::models::outbox::{OutboxEvent, OutboxEventType};
use crate::domain::repositories::outbox_event_repository::OutboxEventRepository;
use crate::domain::services::message_bus::{BusMessage, MessageBus};
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

/// 发件箱工作器
///
/// 持续轮询发件箱中待发布的记录，逐条条件认领后发布到消息
/// 总线并标记终态。多个进程可以并发运行同一循环：正确性完全
/// 依赖存储的条件写认领，而不是任何额外的锁。
pub struct OutboxWorker<R: OutboxEventRepository> {
    /// 仓库
    repo: Arc<R>,
    /// 消息总线
    bus: Arc<dyn MessageBus>,
    /// 本工作器的认领标识
    worker_id: String,
    /// 轮询间隔
    poll_interval: Duration,
    /// 每次轮询的最大记录数
    batch_size: u64,
}

impl<R: OutboxEventRepository> OutboxWorker<R> {
    /// 创建新的发件箱工作器实例
    ///
    /// # 参数
    ///
    /// * `repo` - 发件箱事件仓库
    /// * `bus` - 消息总线
    /// * `settings` - 发件箱配置
    ///
    /// # 返回值
    ///
    /// 返回新的发件箱工作器实例
    pub fn new(repo: Arc<R>, bus: Arc<dyn MessageBus>, settings: &OutboxSettings) -> Self {
        let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "relayrs".to_string());
        Self {
            repo,
            bus,
            worker_id: format!("{}:{}", host, Uuid::new_v4()),
            poll_interval: Duration::from_secs(settings.poll_interval_seconds),
            batch_size: settings.batch_size,
        }
    }

    /// 处理一批待发布的发件箱事件
    ///
    /// 从存储中按创建时间取一页未认领的Pending记录，逐条认领、
    /// 发布并标记。认领竞争失败静默跳过；发布或映射失败把记录
    /// 标记为Failed，不会自动重试。
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 本轮处理完成
    /// * `Err(WorkerError)` - 存储访问失败，本轮中止
    pub async fn process_pending_events(&self) -> Result<(), WorkerError> {
        let events = self.repo.find_pending(self.batch_size).await?;

        if events.is_empty() {
            return Ok(());
        }

        info!("Processing {} pending outbox events", events.len());

        for event in events {
            if !self.repo.try_claim(event.id, &self.worker_id).await? {
                // Lost the race to another worker, or the record is no
                // longer claimable. Expected under concurrency.
                counter!("outbox_claim_lost_total").increment(1);
                continue;
            }

            match self.dispatch(&event).await {
                Ok(()) => {
                    self.repo.mark_published(event.id).await?;
                    counter!("outbox_published_total").increment(1);
                }
                Err(e) => {
                    error!(
                        "Failed to publish outbox event {} for submission {} (correlation {}): {}",
                        event.id, event.submission_id, event.correlation_id, e
                    );
                    self.repo.mark_failed(event.id).await?;
                    counter!("outbox_failed_total").increment(1);
                }
            }
        }

        Ok(())
    }

    /// 将已认领的记录映射为具体消息并发布
    async fn dispatch(&self, event: &OutboxEvent) -> Result<(), WorkerError> {
        let event_type: OutboxEventType = event.event_type.parse()?;

        // The payload must deserialize into the closed event set before
        // it is allowed onto the bus.
        match event_type {
            OutboxEventType::SubmissionCreated => {
                let _: SubmissionCreated = serde_json::from_value(event.payload.clone())?;
            }
            OutboxEventType::SubmissionStatusChanged => {
                let _: SubmissionStatusChanged = serde_json::from_value(event.payload.clone())?;
            }
        }

        let message = BusMessage {
            message_id: event.id,
            correlation_id: event.correlation_id.clone(),
            payload: event.payload.clone(),
        };

        self.bus.publish(&event_type.exchange(), message).await?;

        Ok(())
    }
}

#[async_trait]
impl<R: OutboxEventRepository + 'static> Worker for OutboxWorker<R> {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Outbox worker {} started", self.worker_id);
        loop {
            if let Err(e) = self.process_pending_events().await {
                error!("Error processing outbox events: {}", e);
            }
            sleep(self.poll_interval).await;
        }
    }

    fn name(&self) -> &str {
        "outbox_worker"
    }
}
