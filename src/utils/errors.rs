// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::outbox::UnknownEventType;
use crate::domain::repositories::outbox_event_repository::RepositoryError;
use crate::domain::services::message_bus::BusError;
use thiserror::Error;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// 不支持的事件类型
    #[error("{0}")]
    UnsupportedEventType(#[from] UnknownEventType),

    /// 事件负载无效
    #[error("Invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// 总线错误
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}
