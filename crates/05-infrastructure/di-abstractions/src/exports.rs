//! 模块导出抽象接口
//!
//! 模块加载器把一个文件路径变成导出名称到导出值的映射。

use crate::definition::Definition;
use bootstrap_common::DiscoveryError;
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// 无参判定函数类型
pub type PredicateFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// 模块导出的单个值
#[derive(Clone)]
pub enum Export {
    /// 带标签的定义
    Definition(Definition),
    /// 可调用的无参判定函数
    Predicate(PredicateFn),
    /// 其他数据，例如辅助常量
    Value(serde_json::Value),
    /// 引用了加载器无法解析的提供者名称
    ///
    /// 只有在模块启用且导出名称公开时才算错误，由注册方决定如何报告。
    Unresolved {
        /// 引用的种类，例如 `factory`
        kind: &'static str,
        /// 引用的名称
        name: String,
    },
}

impl Export {
    /// 如果是定义则返回它
    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Self::Definition(definition) => Some(definition),
            _ => None,
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Definition(definition) => f.debug_tuple("Definition").field(definition).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<function>)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Unresolved { kind, name } => f
                .debug_struct("Unresolved")
                .field("kind", kind)
                .field("name", name)
                .finish(),
        }
    }
}

impl From<Definition> for Export {
    fn from(definition: Definition) -> Self {
        Self::Definition(definition)
    }
}

impl From<serde_json::Value> for Export {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// 模块的导出映射，保留导出顺序
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    exports: IndexMap<String, Export>,
}

impl ModuleExports {
    /// 创建空的导出映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加导出
    pub fn with(mut self, name: impl Into<String>, export: impl Into<Export>) -> Self {
        self.insert(name, export);
        self
    }

    /// 添加定义导出
    pub fn with_definition(self, name: impl Into<String>, definition: Definition) -> Self {
        self.with(name, Export::Definition(definition))
    }

    /// 添加判定函数导出
    pub fn with_predicate<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.with(name, Export::Predicate(Arc::new(predicate)))
    }

    /// 插入导出，同名导出会被替换
    pub fn insert(&mut self, name: impl Into<String>, export: impl Into<Export>) {
        self.exports.insert(name.into(), export.into());
    }

    /// 获取导出
    pub fn get(&self, name: &str) -> Option<&Export> {
        self.exports.get(name)
    }

    /// 按导出顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Export)> {
        self.exports.iter().map(|(name, export)| (name.as_str(), export))
    }

    /// 导出数量
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    /// 是否没有导出
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

impl<K: Into<String>, E: Into<Export>> FromIterator<(K, E)> for ModuleExports {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            exports: iter
                .into_iter()
                .map(|(name, export)| (name.into(), export.into()))
                .collect(),
        }
    }
}

/// 模块加载器 trait
///
/// 实现必须按路径缓存：同一路径重复加载返回同一个 `Arc`，
/// 模块的顶层代码最多执行一次。
pub trait ModuleSource: Send + Sync {
    /// 加载模块并返回其导出映射
    fn load(&self, path: &Path) -> Result<Arc<ModuleExports>, DiscoveryError>;

    /// 获取加载器名称
    fn name(&self) -> &str;
}

impl<T: ModuleSource + ?Sized> ModuleSource for Arc<T> {
    fn load(&self, path: &Path) -> Result<Arc<ModuleExports>, DiscoveryError> {
        (**self).load(path)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
