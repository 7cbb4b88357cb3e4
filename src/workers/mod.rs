// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 实现后台任务处理和工作器管理：
/// - 工作器特质（worker）：后台工作器的统一接口
/// - 工作管理器（manager）：工作器的启动与优雅关闭
/// - 发件箱工作器（outbox_worker）：认领并发布发件箱事件
pub mod manager;
pub mod outbox_worker;
pub mod worker;
