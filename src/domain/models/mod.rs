// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 领域事件（events）：发布到消息总线的类型化事件负载
/// - 发件箱事件（outbox）：随领域写入一同落库的待发布记录
/// - 限流窗口（rate_limit）：上游API配额窗口及其策略
///
/// 这些模型构成了跨实例协调的数据基础。
pub mod events;
pub mod outbox;
pub mod rate_limit;
