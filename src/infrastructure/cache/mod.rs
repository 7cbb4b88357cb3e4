// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供Redis客户端封装，作为跨实例的共享协调存储
pub mod redis_client;
