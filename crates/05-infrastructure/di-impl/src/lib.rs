//! # 依赖注入具体实现
//!
//! 提供由定义映射构建的注入器：按名称解析依赖，支持 `value`、`factory`、
//! `type` 三种定义，每个定义在同一注入器内只创建一次实例。

use di_abstractions::{Definition, DefinitionResolver, Definitions, Dependencies, Instance, Invocation};
use bootstrap_common::DependencyError;
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// 依赖注入器
pub struct Injector {
    /// 注入器标识
    id: Uuid,
    /// 定义映射
    definitions: Definitions,
    /// 已创建的实例
    instances: Mutex<HashMap<String, Instance>>,
}

impl Injector {
    /// 使用定义映射创建注入器
    pub fn new(definitions: Definitions) -> Self {
        let injector = Self {
            id: Uuid::new_v4(),
            definitions,
            instances: Mutex::new(HashMap::new()),
        };
        info!("创建注入器 {}，包含 {} 个定义", injector.id, injector.definitions.len());
        injector
    }

    /// 注入器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 注入器持有的定义
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// 检查是否存在指定名称的定义
    pub fn has(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 解析指定名称的实例
    pub fn get(&self, name: &str) -> Result<Instance, DependencyError> {
        self.resolve_in_chain(name, &mut Vec::new())
    }

    /// 解析并转换为具体类型
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        self.get(name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// 解析目标函数声明的依赖并调用
    pub fn invoke<R>(&self, invocation: Invocation<'_, R>) -> Result<R, DependencyError> {
        invocation.call_with(self)
    }

    fn resolve_in_chain(&self, name: &str, chain: &mut Vec<String>) -> Result<Instance, DependencyError> {
        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| DependencyError::not_registered(name))?;

        let provider = match definition {
            Definition::Value(instance) => return Ok(instance.clone()),
            Definition::Factory(provider) | Definition::Type(provider) => provider,
        };

        if let Some(instance) = self.instances.lock().get(name) {
            return Ok(instance.clone());
        }

        if chain.iter().any(|n| n == name) {
            chain.push(name.to_string());
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain.join(" -> "),
            });
        }

        chain.push(name.to_string());
        let instances = provider
            .dependencies()
            .iter()
            .map(|dependency| self.resolve_in_chain(dependency, chain))
            .collect::<Result<Vec<_>, _>>()?;
        chain.pop();

        // 创建实例时不持有锁，提供者内部可能再次访问注入器
        let dependencies = Dependencies::new(provider.dependencies().to_vec(), instances);
        let created = provider.create(&dependencies)?;
        debug!("创建实例: {} ({} {})", name, definition.kind(), provider.name());

        let mut cache = self.instances.lock();
        Ok(cache.entry(name.to_string()).or_insert(created).clone())
    }
}

impl DefinitionResolver for Injector {
    fn resolve(&self, name: &str) -> Result<Instance, DependencyError> {
        self.get(name)
    }

    fn can_resolve(&self, name: &str) -> bool {
        self.has(name)
    }

    fn definition_names(&self) -> Vec<String> {
        self.definitions.keys().cloned().collect()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("id", &self.id)
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .field("instances", &self.instances.lock().len())
            .finish()
    }
}
