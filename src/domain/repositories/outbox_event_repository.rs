// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::outbox::OutboxEvent;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 发件箱事件仓库特质
///
/// 定义发件箱记录的数据访问接口。认领是一次布尔条件写
/// （compare-and-swap），而不是互斥锁：并发工作器对同一条
/// Pending记录的认领至多有一个成功，失败方静默跳过。
#[async_trait]
pub trait OutboxEventRepository: Send + Sync {
    /// 创建发件箱事件
    async fn create(&self, event: &OutboxEvent) -> Result<OutboxEvent, RepositoryError>;

    /// 根据ID查找发件箱事件
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OutboxEvent>, RepositoryError>;

    /// 查找待发布且未被认领的事件，按创建时间升序分页
    async fn find_pending(&self, limit: u64) -> Result<Vec<OutboxEvent>, RepositoryError>;

    /// 尝试认领一条记录
    ///
    /// 仅当记录仍为Pending且未被锁定时写入认领标记。
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 认领成功，调用方获得独占处理权
    /// * `Ok(false)` - 竞争失败或记录已不可认领
    async fn try_claim(&self, id: Uuid, worker_id: &str) -> Result<bool, RepositoryError>;

    /// 标记事件发布成功并清除认领标记
    async fn mark_published(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 标记事件发布失败并清除认领标记
    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError>;
}
