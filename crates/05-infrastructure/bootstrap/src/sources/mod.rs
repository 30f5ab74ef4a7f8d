//! 模块加载器实现
//!
//! - [`ManifestModuleSource`] - 读取 JSON / TOML / YAML 清单文件
//! - [`LinkedModuleSource`] - 编译进程序的模块

pub mod linked;
pub mod manifest;

pub use linked::LinkedModuleSource;
pub use manifest::{toml_to_json, ManifestFormat, ManifestModuleSource, PREDICATE_TAG};
