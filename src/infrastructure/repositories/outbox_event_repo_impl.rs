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

use crate::domain::models::outbox::{OutboxEvent, OutboxState};
use crate::domain::repositories::outbox_event_repository::{
    OutboxEventRepository, RepositoryError,
};
use crate::infrastructure::database::entities::outbox_event::{self, SeaOutboxState};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 发件箱事件仓库实现
#[derive(Clone)]
pub struct OutboxEventRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl OutboxEventRepoImpl {
    /// 创建新的发件箱事件仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<OutboxState> for SeaOutboxState {
    fn from(state: OutboxState) -> Self {
        match state {
            OutboxState::Pending => SeaOutboxState::Pending,
            OutboxState::Published => SeaOutboxState::Published,
            OutboxState::Failed => SeaOutboxState::Failed,
        }
    }
}

impl From<SeaOutboxState> for OutboxState {
    fn from(state: SeaOutboxState) -> Self {
        match state {
            SeaOutboxState::Pending => OutboxState::Pending,
            SeaOutboxState::Published => OutboxState::Published,
            SeaOutboxState::Failed => OutboxState::Failed,
        }
    }
}

#[async_trait]
impl OutboxEventRepository for OutboxEventRepoImpl {
    async fn create(&self, event: &OutboxEvent) -> Result<OutboxEvent, RepositoryError> {
        let active_model: outbox_event::ActiveModel = event.clone().into();

        outbox_event::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(event.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OutboxEvent>, RepositoryError> {
        let model = outbox_event::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_pending(&self, limit: u64) -> Result<Vec<OutboxEvent>, RepositoryError> {
        let models = outbox_event::Entity::find()
            .filter(outbox_event::Column::State.eq(SeaOutboxState::Pending))
            .filter(outbox_event::Column::LockedAt.is_null())
            .order_by_asc(outbox_event::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        let events = models.into_iter().map(Into::into).collect();

        Ok(events)
    }

    async fn try_claim(&self, id: Uuid, worker_id: &str) -> Result<bool, RepositoryError> {
        // Conditional write: the claim only lands if the record is still
        // pending and unlocked. Zero affected rows means a lost race.
        let result = outbox_event::Entity::update_many()
            .col_expr(
                outbox_event::Column::LockedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .col_expr(
                outbox_event::Column::WorkerId,
                Expr::value(worker_id.to_string()),
            )
            .filter(outbox_event::Column::Id.eq(id))
            .filter(outbox_event::Column::State.eq(SeaOutboxState::Pending))
            .filter(outbox_event::Column::LockedAt.is_null())
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn mark_published(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut active: outbox_event::ActiveModel = outbox_event::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        active.state = Set(SeaOutboxState::Published);
        active.published_at = Set(Some(Utc::now().into()));
        active.locked_at = Set(None);
        active.worker_id = Set(None);

        active.update(self.db.as_ref()).await?;

        Ok(())
    }

    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut active: outbox_event::ActiveModel = outbox_event::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        active.state = Set(SeaOutboxState::Failed);
        active.failed_at = Set(Some(Utc::now().into()));
        active.locked_at = Set(None);
        active.worker_id = Set(None);

        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}

impl From<outbox_event::Model> for OutboxEvent {
    fn from(model: outbox_event::Model) -> Self {
        Self {
            id: model.id,
            submission_id: model.submission_id,
            curator_user_id: model.curator_user_id,
            catalog_item_id: model.catalog_item_id,
            track_id: model.track_id,
            event_type: model.event_type,
            payload: model.payload,
            state: model.state.into(),
            correlation_id: model.correlation_id,
            worker_id: model.worker_id,
            locked_at: model.locked_at.map(Into::into),
            created_at: model.created_at.into(),
            published_at: model.published_at.map(Into::into),
            failed_at: model.failed_at.map(Into::into),
        }
    }
}

impl From<OutboxEvent> for outbox_event::ActiveModel {
    fn from(event: OutboxEvent) -> Self {
        Self {
            id: Set(event.id),
            submission_id: Set(event.submission_id),
            curator_user_id: Set(event.curator_user_id),
            catalog_item_id: Set(event.catalog_item_id),
            track_id: Set(event.track_id),
            event_type: Set(event.event_type),
            payload: Set(event.payload),
            state: Set(event.state.into()),
            correlation_id: Set(event.correlation_id),
            worker_id: Set(event.worker_id),
            locked_at: Set(event.locked_at.map(Into::into)),
            created_at: Set(event.created_at.into()),
            published_at: Set(event.published_at.map(Into::into)),
            failed_at: Set(event.failed_at.map(Into::into)),
        }
    }
}
