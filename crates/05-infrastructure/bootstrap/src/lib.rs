//! # 依赖注入引导层
//!
//! 扫描模块文件，收集其中的命名定义并注册到注册表，
//! 再由注册表构建注入器、调用目标函数。
//!
//! ## 主要功能
//!
//! - **模式别名**: `common`、`lib`、`modules` 等简短名称展开为匹配模式
//! - **模块禁用**: 路径包含 `_diOff` 的模块不加载，模块也可以导出 `_diOff` 自行禁用
//! - **定义注册**: 同名定义先注册者胜出，冲突记录警告
//! - **注入器构建**: 注册表快照加覆盖定义，覆盖定义优先
//! - **目标调用**: 解析依赖并调用，可选地发布注入器到进程级槽位
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_bootstrap::{Bootstrapper, BuildOptions};
//! use di_abstractions::{Definitions, Invocation};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bootstrapper = Bootstrapper::new(
//!         json!({ "name": "demo" }),
//!         Definitions::new(),
//!         Vec::new(),
//!         BuildOptions::default(),
//!     )?;
//!
//!     // 发现 modules/**/*.di.* 下的清单模块
//!     let report = bootstrapper.discover("modules", None)?;
//!     println!("注册了 {} 个定义", report.registered_count());
//!
//!     let name = bootstrapper.invoke(
//!         Invocation::new(["config"], |deps| {
//!             deps.get::<serde_json::Value>(0).map(|config| config["name"].clone())
//!         }),
//!         None,
//!         Definitions::new(),
//!     )??;
//!     println!("应用名称: {}", name);
//!
//!     Ok(())
//! }
//! ```

pub mod aliases;
pub mod ambient;
pub mod bootstrapper;
pub mod builder;
pub mod catalog;
pub mod disable;
pub mod discovery;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod options;
pub mod registry;
pub mod settings;
pub mod sources;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use aliases::{PatternAlias, PatternAliasResolver, Patterns, ResolvedPatterns};
pub use ambient::{clear_published_injector, publish_injector, published_injector};
pub use bootstrapper::Bootstrapper;
pub use builder::{InjectorBuilder, Invoker};
pub use catalog::ProviderCatalog;
pub use disable::{DisableFlag, DisablePolicy, DISABLE_MARKER};
pub use discovery::{DiscoveryReport, DiscoveryRunner};
pub use loader::{ModuleLoader, ModuleOutcome};
pub use logging::{init_logging, LoggingConfig};
pub use matcher::GlobPathMatcher;
pub use options::{BuildOptions, DiscoveryOverrides, DEFAULT_GLOBAL_INJECTOR};
pub use registry::{Collision, DefinitionRegistry, DefinitionSource, Registration, CONFIG_DEFINITION};
pub use settings::BootstrapSettings;
pub use sources::{LinkedModuleSource, ManifestModuleSource};

// 重新导出依赖的核心类型
pub use bootstrap_common::{BootstrapError, BootstrapResult, ConfigError, DependencyError, DiscoveryError};
pub use di_impl::Injector;
