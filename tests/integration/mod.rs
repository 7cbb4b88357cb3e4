// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 集成测试模块
///
/// 针对真实存储和完整组件交互的测试
pub mod outbox_repository_test;
pub mod rate_limiter_test;
