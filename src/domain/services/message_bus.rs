// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 总线错误类型
#[derive(Error, Debug)]
pub enum BusError {
    /// 发布失败
    #[error("Publish failed: {0}")]
    Publish(String),
}

/// 总线消息
///
/// 消息ID取自发件箱记录ID，供下游消费者去重；
/// 关联ID贯穿整条链路用于追踪。
#[derive(Debug, Clone, PartialEq)]
pub struct BusMessage {
    /// 消息ID
    pub message_id: Uuid,
    /// 关联ID
    pub correlation_id: String,
    /// 消息负载
    pub payload: serde_json::Value,
}

/// 消息总线接口
///
/// 按逻辑交换机名称寻址的至少一次发布抽象。
/// 真实的总线客户端由部署环境接入，本仓库只依赖该接口。
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// 将消息发布到指定交换机
    async fn publish(&self, exchange: &str, message: BusMessage) -> Result<(), BusError>;
}
