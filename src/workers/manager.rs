// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::worker::Worker;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 启动后台工作器并在收到关闭信号时终止它们
pub struct WorkerManager {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// 启动工作器
    ///
    /// 将工作器循环放到独立任务上运行，避免阻塞主线程
    ///
    /// # 参数
    ///
    /// * `worker` - 要启动的工作器
    pub fn spawn(&mut self, worker: Arc<dyn Worker>) {
        let handle = tokio::spawn(async move {
            let name = worker.name().to_string();
            if let Err(e) = worker.run().await {
                error!("Worker {} exited with error: {}", name, e);
            }
        });
        self.handles.push(handle);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}

impl Default for WorkerManager {
    fn default() -> Self {
        Self::new()
    }
}
