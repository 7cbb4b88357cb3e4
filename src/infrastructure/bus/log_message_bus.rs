// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::message_bus::{BusError, BusMessage, MessageBus};
use async_trait::async_trait;
use tracing::info;

/// 日志消息总线
///
/// MessageBus接口的本地替身：把消息写入结构化日志而不是真实
/// 传输。未接入总线客户端的环境（本地开发、单机部署）使用它，
/// 发件箱语义保持不变。
pub struct LogMessageBus;

#[async_trait]
impl MessageBus for LogMessageBus {
    async fn publish(&self, exchange: &str, message: BusMessage) -> Result<(), BusError> {
        info!(
            exchange,
            message_id = %message.message_id,
            correlation_id = %message.correlation_id,
            "Publishing message"
        );
        Ok(())
    }
}
