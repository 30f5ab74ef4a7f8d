//! 定义注册表
//!
//! 定义名称到定义的映射。发现阶段只追加：同名定义先注册者胜出，
//! 之后的注册尝试被忽略并记录警告。

use di_abstractions::{Definition, Definitions};
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 私有导出前缀，带此前缀的名称不会被注册
pub const PRIVATE_PREFIX: char = '_';

/// 配置对象的定义名称
pub const CONFIG_DEFINITION: &str = "config";

/// 名称是否为保留名称（私有前缀或空）
pub fn is_reserved_name(name: &str) -> bool {
    name.is_empty() || name.starts_with(PRIVATE_PREFIX)
}

/// 定义来源
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DefinitionSource {
    /// 会话构造时预置
    Seed,
    /// 从模块文件发现
    Module(PathBuf),
}

impl DefinitionSource {
    /// 来源模块路径
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Seed => None,
            Self::Module(path) => Some(path),
        }
    }
}

impl fmt::Display for DefinitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed => f.write_str("<seed>"),
            Self::Module(path) => write!(f, "{}", path.display()),
        }
    }
}

/// 注册结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// 已注册
    Accepted,
    /// 名称已存在，本次注册被忽略
    Duplicate,
    /// 保留名称，静默忽略
    Reserved,
}

impl Registration {
    /// 是否注册成功
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// 被忽略的重复定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// 定义名称
    pub name: String,
    /// 被忽略的定义来源
    pub rejected: DefinitionSource,
    /// 保留的定义来源
    pub kept: DefinitionSource,
}

/// 定义注册表
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: Definitions,
    sources: IndexMap<String, DefinitionSource>,
    collisions: Vec<Collision>,
}

impl DefinitionRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建预置了 `config` 值定义的注册表
    pub fn with_config(config: serde_json::Value) -> Self {
        let mut registry = Self::new();
        registry.seed(CONFIG_DEFINITION, Definition::value(config));
        registry
    }

    /// 预置定义
    ///
    /// 只在发现开始前使用，同名预置定义会被替换。
    pub fn seed(&mut self, name: impl Into<String>, definition: Definition) {
        let name = name.into();
        self.sources.insert(name.clone(), DefinitionSource::Seed);
        self.definitions.insert(name, definition);
    }

    /// 注册定义
    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: Definition,
        source: DefinitionSource,
    ) -> Registration {
        let name = name.into();
        if is_reserved_name(&name) {
            return Registration::Reserved;
        }

        if let Some(kept) = self.sources.get(&name) {
            warn!("{} 已定义，{} 中的定义将被忽略", name, source);
            self.collisions.push(Collision {
                name,
                rejected: source,
                kept: kept.clone(),
            });
            return Registration::Duplicate;
        }

        self.sources.insert(name.clone(), source);
        self.definitions.insert(name, definition);
        Registration::Accepted
    }

    /// 获取定义
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    /// 是否包含指定名称
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 定义来源
    pub fn source_of(&self, name: &str) -> Option<&DefinitionSource> {
        self.sources.get(name)
    }

    /// 按注册顺序返回定义名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 所有被忽略的重复定义，按发生顺序
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// 当前定义映射的副本
    pub fn snapshot(&self) -> Definitions {
        self.definitions.clone()
    }
}
