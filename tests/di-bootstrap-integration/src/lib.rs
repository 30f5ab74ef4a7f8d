//! 引导层集成测试的共享夹具

use bootstrap_common::DependencyError;
use di_abstractions::{Dependencies, Injectable};
use di_bootstrap::ProviderCatalog;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// 临时的模块目录
pub struct ModuleTree {
    dir: TempDir,
}

impl ModuleTree {
    /// 创建空目录
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("创建临时目录失败"),
        }
    }

    /// 写入文件，自动创建父目录
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("创建目录失败");
        }
        fs::write(&path, content).expect("写入文件失败");
        path
    }

    /// 根目录
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// 根目录字符串，用于 `config.cwd`
    pub fn root_str(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }
}

impl Default for ModuleTree {
    fn default() -> Self {
        Self::new()
    }
}

/// 测试用仓储
#[derive(Debug)]
pub struct UserRepository {
    /// 数据源名称
    pub source: String,
}

/// 测试用服务，依赖配置和仓储
#[derive(Debug)]
pub struct UserService {
    /// 应用名称
    pub app: String,
    /// 仓储
    pub repository: Arc<UserRepository>,
}

impl Injectable for UserService {
    const DEPENDENCIES: &'static [&'static str] = &["config", "repository"];

    fn construct(dependencies: &Dependencies) -> Result<Self, DependencyError> {
        let config = dependencies.get::<Value>(0)?;
        let app = config
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unnamed")
            .to_string();
        Ok(Self {
            app,
            repository: dependencies.get::<UserRepository>(1)?,
        })
    }
}

/// 清单模块引用的提供者目录
pub fn catalog() -> ProviderCatalog {
    ProviderCatalog::new()
        .with_factory("memory_repository", ["config"], |deps: &Dependencies| {
            let config = deps.get::<Value>(0)?;
            Ok(UserRepository {
                source: config
                    .get("database")
                    .and_then(Value::as_str)
                    .unwrap_or("memory")
                    .to_string(),
            })
        })
        .with_type::<UserService>("user_service")
        .with_predicate("always_disabled", || true)
        .with_predicate("never_disabled", || false)
}
