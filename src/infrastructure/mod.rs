// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对具体技术的抽象和封装。
/// 基础设施层负责与外部系统的交互，包括数据库、缓存、消息总线等。
///
/// 包含的子模块：
/// - 缓存（cache）：提供Redis协调存储的客户端封装
/// - 数据库（database）：提供sea-orm连接池和实体定义
/// - 仓库（repositories）：领域仓库接口的sea-orm实现
/// - 服务（services）：分布式限流器实现
/// - 总线（bus）：消息总线接口的本地替身实现
/// - 指标（metrics）：Prometheus指标导出
pub mod bus;
pub mod cache;
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod services;
