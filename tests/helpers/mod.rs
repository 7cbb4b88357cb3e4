// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use relayrs::domain::models::events::SubmissionCreated;
use relayrs::domain::models::outbox::OutboxEvent;
use relayrs::domain::services::message_bus::{BusError, BusMessage, MessageBus};
use relayrs::infrastructure::database::entities::outbox_event;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema};
use std::sync::Arc;
use uuid::Uuid;

/// 创建带有发件箱表结构的内存SQLite数据库
pub async fn setup_outbox_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    // A single pooled connection keeps every query on the same in-memory db
    opt.max_connections(1);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to in-memory sqlite");

    let schema = Schema::new(DbBackend::Sqlite);
    let stmt = schema.create_table_from_entity(outbox_event::Entity);
    db.execute(db.get_database_backend().build(&stmt))
        .await
        .expect("Failed to create outbox_events table");

    Arc::new(db)
}

/// 构造一条投稿创建事件对应的发件箱记录
pub fn sample_submission_created_event() -> OutboxEvent {
    let payload = SubmissionCreated {
        submission_id: Uuid::new_v4(),
        artist_id: Uuid::new_v4(),
        curator_user_id: Uuid::new_v4(),
        catalog_item_id: Uuid::new_v4(),
        track_id: Uuid::new_v4(),
        created_at: Utc::now(),
        correlation_id: Uuid::new_v4().to_string(),
    };

    OutboxEvent::submission_created(&payload)
}

/// 内存消息总线
///
/// 记录发布的消息供断言使用
pub struct InMemoryMessageBus {
    pub published: Mutex<Vec<(String, BusMessage)>>,
}

impl InMemoryMessageBus {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, exchange: &str, message: BusMessage) -> Result<(), BusError> {
        self.published.lock().push((exchange.to_string(), message));
        Ok(())
    }
}

/// 始终发布失败的消息总线
pub struct FailingMessageBus;

#[async_trait]
impl MessageBus for FailingMessageBus {
    async fn publish(&self, _exchange: &str, _message: BusMessage) -> Result<(), BusError> {
        Err(BusError::Publish("bus unavailable".to_string()))
    }
}
