// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 发件箱事件仓库（outbox_event_repository）：管理发件箱记录的
///   创建、轮询、条件认领与终态标记
///
/// 这些接口确保了领域层不依赖于具体的数据存储技术，
/// 提高了系统的可测试性和可维护性。
pub mod outbox_event_repository;
