// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 消息总线模块
///
/// 真实的总线传输由部署环境接入，这里提供本地替身实现
pub mod log_message_bus;
