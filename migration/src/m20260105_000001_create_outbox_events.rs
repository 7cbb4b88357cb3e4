use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create outbox_events table
        manager
            .create_table(
                Table::create()
                    .table(OutboxEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OutboxEvents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OutboxEvents::SubmissionId).uuid().not_null())
                    .col(
                        ColumnDef::new(OutboxEvents::CuratorUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OutboxEvents::CatalogItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OutboxEvents::TrackId).uuid().not_null())
                    .col(ColumnDef::new(OutboxEvents::EventType).string().not_null())
                    .col(ColumnDef::new(OutboxEvents::Payload).json().not_null())
                    .col(
                        ColumnDef::new(OutboxEvents::State)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(OutboxEvents::CorrelationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OutboxEvents::WorkerId).string())
                    .col(ColumnDef::new(OutboxEvents::LockedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(OutboxEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(OutboxEvents::PublishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OutboxEvents::FailedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // The dispatcher polls by (state, locked_at) and drains in creation order
        manager
            .create_index(
                Index::create()
                    .name("idx_outbox_state_locked_created")
                    .table(OutboxEvents::Table)
                    .col(OutboxEvents::State)
                    .col(OutboxEvents::LockedAt)
                    .col(OutboxEvents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_outbox_submission_id")
                    .table(OutboxEvents::Table)
                    .col(OutboxEvents::SubmissionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OutboxEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OutboxEvents {
    Table,
    Id,
    SubmissionId,
    CuratorUserId,
    CatalogItemId,
    TrackId,
    EventType,
    Payload,
    State,
    CorrelationId,
    WorkerId,
    LockedAt,
    CreatedAt,
    PublishedAt,
    FailedAt,
}
