//! # Bootstrap Common
//!
//! DI 引导层各 crate 共用的错误类型。
//!
//! ## 错误分类
//!
//! - [`DependencyError`] - 注入器解析失败，原样传递给 `invoke` 的调用方
//! - [`DiscoveryError`] - 路径匹配或模块加载失败，中止整个 `discover` 调用
//! - [`ConfigError`] - 引导配置加载失败
//! - [`BootstrapError`] - 以上错误的汇总类型

pub mod errors;

pub use errors::*;
