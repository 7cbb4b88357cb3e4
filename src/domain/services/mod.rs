// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块定义跨实例协调所依赖的服务接口：
/// - API限流器（api_rate_limiter）：上游API调用的分布式配额闸门
/// - 消息总线（message_bus)：至少一次投递的发布抽象
///
/// 具体实现由基础设施层提供，真实的总线传输由部署环境接入。
pub mod api_rate_limiter;
pub mod message_bus;
