//! 提供者目录
//!
//! 清单模块只能携带数据，工厂、类型和判定函数需要预先以名称登记在目录中，
//! 清单通过名称引用它们。

use bootstrap_common::DependencyError;
use di_abstractions::{Dependencies, Injectable, PredicateFn, Provider};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 提供者目录
#[derive(Clone, Default)]
pub struct ProviderCatalog {
    factories: HashMap<String, Provider>,
    types: HashMap<String, Provider>,
    predicates: HashMap<String, PredicateFn>,
}

impl ProviderCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记工厂函数
    pub fn with_factory<I, S, F, T>(mut self, name: impl Into<String>, dependencies: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Dependencies) -> Result<T, DependencyError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        let name = name.into();
        self.factories
            .insert(name.clone(), Provider::new(name, dependencies, create));
        self
    }

    /// 登记可构造类型
    pub fn with_type<T: Injectable>(mut self, name: impl Into<String>) -> Self {
        self.types.insert(name.into(), Provider::of_type::<T>());
        self
    }

    /// 登记判定函数
    pub fn with_predicate<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// 查找工厂
    pub fn factory(&self, name: &str) -> Option<&Provider> {
        self.factories.get(name)
    }

    /// 查找类型
    pub fn type_provider(&self, name: &str) -> Option<&Provider> {
        self.types.get(name)
    }

    /// 查找判定函数
    pub fn predicate(&self, name: &str) -> Option<&PredicateFn> {
        self.predicates.get(name)
    }
}

impl std::fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}
