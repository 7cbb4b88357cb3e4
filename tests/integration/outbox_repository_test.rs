// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{sample_submission_created_event, setup_outbox_db};
use chrono::{Duration, Utc};
use relayrs::domain::models::outbox::OutboxState;
use relayrs::domain::repositories::outbox_event_repository::{
    OutboxEventRepository, RepositoryError,
};
use relayrs::infrastructure::repositories::outbox_event_repo_impl::OutboxEventRepoImpl;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_find_by_id() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let event = sample_submission_created_event();
    repo.create(&event).await.unwrap();

    let stored = repo
        .find_by_id(event.id)
        .await
        .unwrap()
        .expect("event exists");

    assert_eq!(stored.id, event.id);
    assert_eq!(stored.submission_id, event.submission_id);
    assert_eq!(stored.event_type, "submission.created");
    assert_eq!(stored.state, OutboxState::Pending);
    assert_eq!(stored.payload, event.payload);
    assert!(stored.worker_id.is_none());
    assert!(stored.locked_at.is_none());
}

#[tokio::test]
async fn test_find_by_id_missing_returns_none() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let found = repo.find_by_id(Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_find_pending_filters_and_orders_by_created_at() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let mut oldest = sample_submission_created_event();
    oldest.created_at = Utc::now() - Duration::seconds(30);
    let mut middle = sample_submission_created_event();
    middle.created_at = Utc::now() - Duration::seconds(20);
    let mut newest = sample_submission_created_event();
    newest.created_at = Utc::now() - Duration::seconds(10);

    // Neither a locked nor a terminal record is claimable work
    let mut locked = sample_submission_created_event();
    locked.locked_at = Some(Utc::now());
    locked.worker_id = Some("other-worker".to_string());
    let mut published = sample_submission_created_event();
    published.state = OutboxState::Published;
    published.published_at = Some(Utc::now());

    // Insert out of order on purpose
    repo.create(&newest).await.unwrap();
    repo.create(&locked).await.unwrap();
    repo.create(&oldest).await.unwrap();
    repo.create(&published).await.unwrap();
    repo.create(&middle).await.unwrap();

    let pending = repo.find_pending(10).await.unwrap();
    let ids: Vec<_> = pending.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![oldest.id, middle.id, newest.id]);

    let page = repo.find_pending(2).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, oldest.id);
    assert_eq!(page[1].id, middle.id);
}

#[tokio::test]
async fn test_try_claim_succeeds_exactly_once() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let event = sample_submission_created_event();
    repo.create(&event).await.unwrap();

    let (first, second) = tokio::join!(
        repo.try_claim(event.id, "worker-a"),
        repo.try_claim(event.id, "worker-b")
    );

    let successes = [first.unwrap(), second.unwrap()]
        .iter()
        .filter(|claimed| **claimed)
        .count();
    assert_eq!(successes, 1);

    let stored = repo.find_by_id(event.id).await.unwrap().unwrap();
    assert!(stored.locked_at.is_some());
    assert!(stored.worker_id.is_some());
    assert_eq!(stored.state, OutboxState::Pending);
}

#[tokio::test]
async fn test_claimed_record_is_invisible_to_polling() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let event = sample_submission_created_event();
    repo.create(&event).await.unwrap();

    assert!(repo.try_claim(event.id, "worker-a").await.unwrap());
    assert!(repo.find_pending(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_published_clears_claim_and_is_terminal() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let event = sample_submission_created_event();
    repo.create(&event).await.unwrap();

    assert!(repo.try_claim(event.id, "worker-a").await.unwrap());
    repo.mark_published(event.id).await.unwrap();

    let stored = repo.find_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.state, OutboxState::Published);
    assert!(stored.published_at.is_some());
    assert!(stored.locked_at.is_none());
    assert!(stored.worker_id.is_none());

    // Terminal states are never claimable again
    assert!(!repo.try_claim(event.id, "worker-b").await.unwrap());
}

#[tokio::test]
async fn test_mark_failed_clears_claim_and_is_terminal() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let event = sample_submission_created_event();
    repo.create(&event).await.unwrap();

    assert!(repo.try_claim(event.id, "worker-a").await.unwrap());
    repo.mark_failed(event.id).await.unwrap();

    let stored = repo.find_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.state, OutboxState::Failed);
    assert!(stored.failed_at.is_some());
    assert!(stored.locked_at.is_none());
    assert!(stored.worker_id.is_none());

    assert!(!repo.try_claim(event.id, "worker-b").await.unwrap());
    assert!(repo.find_pending(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_published_missing_record() {
    let db = setup_outbox_db().await;
    let repo = OutboxEventRepoImpl::new(db);

    let result = repo.mark_published(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}
