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

use migration::{Migrator, MigratorTrait};
use relayrs::config::settings::Settings;
use relayrs::domain::models::rate_limit::RateLimitPolicy;
use relayrs::infrastructure::bus::log_message_bus::LogMessageBus;
use relayrs::infrastructure::cache::redis_client::RedisClient;
use relayrs::infrastructure::database::connection;
use relayrs::infrastructure::repositories::outbox_event_repo_impl::OutboxEventRepoImpl;
use relayrs::infrastructure::services::distributed_rate_limiter::DistributedRateLimiter;
use relayrs::utils::telemetry;
use relayrs::workers::manager::WorkerManager;
use relayrs::workers::outbox_worker::OutboxWorker;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动后台工作器
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting relayrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    relayrs::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Redis Client
    let redis_client = RedisClient::new(&settings.redis.url).await?;
    info!("Redis client initialized");

    // 5. Initialize Rate Limiters (one per quota-limited upstream API).
    //    Callers issuing upstream requests acquire permits from these.
    let mut rate_limiters = HashMap::new();
    for (name, upstream) in &settings.rate_limiting.upstreams {
        let mut policy =
            RateLimitPolicy::new(upstream.service_prefix.clone(), upstream.default_limit);
        policy.window_seconds = settings.rate_limiting.window_seconds;

        let limiter = DistributedRateLimiter::new(redis_client.clone(), policy);
        rate_limiters.insert(name.clone(), limiter);
    }
    info!(
        "{} upstream rate limiters initialized",
        rate_limiters.len()
    );

    // 6. Initialize Outbox Components
    let outbox_repo = Arc::new(OutboxEventRepoImpl::new(db.clone()));
    let bus = Arc::new(LogMessageBus);

    // 7. Start Workers
    let mut worker_manager = WorkerManager::new();
    let outbox_worker = Arc::new(OutboxWorker::new(outbox_repo, bus, &settings.outbox));
    worker_manager.spawn(outbox_worker);
    info!("Outbox worker started");

    worker_manager.wait_for_shutdown().await;

    Ok(())
}
