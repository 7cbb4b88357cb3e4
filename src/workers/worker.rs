// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;

/// 后台工作器接口
///
/// 发件箱调度这类长驻轮询循环实现此接口，
/// 由工作管理器统一启动和关闭
#[async_trait]
pub trait Worker: Send + Sync {
    /// 运行工作器主循环
    ///
    /// 正常情况下不返回；返回错误表示循环已无法继续
    async fn run(&self) -> Result<(), WorkerError>;

    /// 工作器名称，用于日志标识
    fn name(&self) -> &str;
}
