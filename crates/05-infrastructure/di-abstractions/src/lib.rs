//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义定义模型和引导层协作方的核心接口。
//!
//! ## 核心接口
//!
//! - [`Definition`] - 带标签的定义（`type` / `factory` / `value`）
//! - [`ModuleSource`] - 模块加载器接口
//! - [`PathMatcher`] - 路径匹配器接口
//! - [`DefinitionResolver`] - 定义解析器接口

pub mod definition;
pub mod exports;
pub mod matcher;
pub mod resolver;

pub use definition::*;
pub use exports::*;
pub use matcher::*;
pub use resolver::*;
