// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 投稿已创建事件
///
/// 当艺人向策展人的歌单投稿成功落库时触发。
/// 事件负载与发件箱记录在同一工作单元内写入，
/// 由发件箱工作器异步发布到消息总线。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCreated {
    /// 投稿唯一标识符
    pub submission_id: Uuid,
    /// 艺人用户ID
    pub artist_id: Uuid,
    /// 策展人用户ID
    pub curator_user_id: Uuid,
    /// 目录条目ID（歌单）
    pub catalog_item_id: Uuid,
    /// 曲目ID
    pub track_id: Uuid,
    /// 投稿创建时间
    pub created_at: DateTime<Utc>,
    /// 关联ID，用于跨服务链路追踪
    pub correlation_id: String,
}

/// 投稿状态已变更事件
///
/// 当策展人接受、拒绝或以其他方式推进投稿状态时触发。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStatusChanged {
    /// 投稿唯一标识符
    pub submission_id: Uuid,
    /// 变更前状态
    pub old_status: String,
    /// 变更后状态
    pub new_status: String,
    /// 策展人用户ID
    pub curator_user_id: Uuid,
    /// 状态变更时间
    pub updated_at: DateTime<Utc>,
    /// 关联ID，用于跨服务链路追踪
    pub correlation_id: String,
}
