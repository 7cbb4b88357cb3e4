// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::events::{SubmissionCreated, SubmissionStatusChanged};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 发件箱事件实体
///
/// 表示一条随领域写入一同落库的待发布记录（发件箱模式）。
/// 记录由发件箱工作器认领、发布到消息总线并标记终态，
/// 发布后保留在存储中作为审计轨迹，不会被删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    /// 事件唯一标识符，同时作为总线消息ID用于下游去重
    pub id: Uuid,
    /// 关联的投稿ID
    pub submission_id: Uuid,
    /// 策展人用户ID，存储分区键之一
    pub curator_user_id: Uuid,
    /// 目录条目ID，存储分区键之一
    pub catalog_item_id: Uuid,
    /// 曲目ID
    pub track_id: Uuid,
    /// 事件类型判别符，取值限于封闭集合
    pub event_type: String,
    /// 事件负载，发布时按事件类型反序列化校验
    pub payload: serde_json::Value,
    /// 事件状态，跟踪发布进度
    pub state: OutboxState,
    /// 关联ID，作为总线消息的关联ID用于链路追踪
    pub correlation_id: String,
    /// 认领该记录的工作器标识
    pub worker_id: Option<String>,
    /// 认领时间。认领没有租约超时：工作器在认领后、
    /// 标记终态前崩溃会使记录一直处于锁定状态
    pub locked_at: Option<DateTime<Utc>>,
    /// 创建时间，轮询按此字段升序排列
    pub created_at: DateTime<Utc>,
    /// 发布成功时间
    pub published_at: Option<DateTime<Utc>>,
    /// 发布失败时间
    pub failed_at: Option<DateTime<Utc>>,
}

impl OutboxEvent {
    fn new(event_type: OutboxEventType, payload: serde_json::Value, correlation_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            submission_id: Uuid::nil(),
            curator_user_id: Uuid::nil(),
            catalog_item_id: Uuid::nil(),
            track_id: Uuid::nil(),
            event_type: event_type.to_string(),
            payload,
            state: OutboxState::Pending,
            correlation_id,
            worker_id: None,
            locked_at: None,
            created_at: Utc::now(),
            published_at: None,
            failed_at: None,
        }
    }

    /// 从投稿创建事件构建发件箱记录
    ///
    /// # 参数
    ///
    /// * `event` - 投稿创建事件负载
    ///
    /// # 返回值
    ///
    /// 返回处于Pending状态、未被认领的发件箱记录，
    /// 分区字段与负载中的聚合ID保持一致
    pub fn submission_created(event: &SubmissionCreated) -> Self {
        let payload =
            serde_json::to_value(event).expect("submission created payload serializes to JSON");
        let mut record = Self::new(
            OutboxEventType::SubmissionCreated,
            payload,
            event.correlation_id.clone(),
        );
        record.submission_id = event.submission_id;
        record.curator_user_id = event.curator_user_id;
        record.catalog_item_id = event.catalog_item_id;
        record.track_id = event.track_id;
        record.created_at = event.created_at;
        record
    }

    /// 从投稿状态变更事件构建发件箱记录
    pub fn submission_status_changed(
        event: &SubmissionStatusChanged,
        catalog_item_id: Uuid,
        track_id: Uuid,
    ) -> Self {
        let payload =
            serde_json::to_value(event).expect("status changed payload serializes to JSON");
        let mut record = Self::new(
            OutboxEventType::SubmissionStatusChanged,
            payload,
            event.correlation_id.clone(),
        );
        record.submission_id = event.submission_id;
        record.curator_user_id = event.curator_user_id;
        record.catalog_item_id = catalog_item_id;
        record.track_id = track_id;
        record
    }
}

/// 发件箱事件类型枚举
///
/// 封闭集合：发布时未知的事件类型是不支持的错误条件，
/// 记录会被标记为Failed而不是被静默丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxEventType {
    /// 投稿已创建
    SubmissionCreated,
    /// 投稿状态已变更
    SubmissionStatusChanged,
}

impl OutboxEventType {
    /// 事件发布的目标交换机名称
    pub fn exchange(&self) -> String {
        format!("exchange:{}", self)
    }
}

impl fmt::Display for OutboxEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboxEventType::SubmissionCreated => write!(f, "submission.created"),
            OutboxEventType::SubmissionStatusChanged => write!(f, "submission.status_changed"),
        }
    }
}

impl FromStr for OutboxEventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submission.created" => Ok(OutboxEventType::SubmissionCreated),
            "submission.status_changed" => Ok(OutboxEventType::SubmissionStatusChanged),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

/// 未知事件类型错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown outbox event type: {0}")]
pub struct UnknownEventType(pub String);

/// 发件箱事件状态枚举
///
/// Pending经由成功认领进入锁定，随后到达Published或Failed终态；
/// 终态至多到达一次，之后认领永远失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutboxState {
    /// 待发布，记录已创建但尚未被认领
    #[default]
    Pending,
    /// 已发布，记录已成功发布到消息总线
    Published,
    /// 发布失败，记录发布出错且不会自动重试
    Failed,
}
