// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 服务实现模块
///
/// 领域服务接口的基础设施实现
pub mod distributed_rate_limiter;
