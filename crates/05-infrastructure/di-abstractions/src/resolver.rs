//! 定义解析器抽象接口
//!
//! 提供按名称解析实例和调用目标函数的能力

use crate::definition::{Dependencies, Instance};
use bootstrap_common::DependencyError;
use std::any::{type_name, Any};
use std::sync::Arc;

/// 定义解析器 trait
///
/// 负责按名称解析依赖并创建实例
pub trait DefinitionResolver: Send + Sync {
    /// 解析指定名称的实例
    fn resolve(&self, name: &str) -> Result<Instance, DependencyError>;

    /// 检查是否可以解析指定名称
    fn can_resolve(&self, name: &str) -> bool;

    /// 获取所有可解析的名称
    fn definition_names(&self) -> Vec<String>;

    /// 按顺序解析一组依赖
    fn resolve_all(&self, names: &[String]) -> Result<Dependencies, DependencyError> {
        let instances = names
            .iter()
            .map(|name| self.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dependencies::new(names.to_vec(), instances))
    }
}

/// 解析并转换为具体类型
pub fn resolve_as<T: Any + Send + Sync>(
    resolver: &dyn DefinitionResolver,
    name: &str,
) -> Result<Arc<T>, DependencyError> {
    resolver
        .resolve(name)?
        .downcast::<T>()
        .map_err(|_| DependencyError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
        })
}

/// 待调用的目标函数
///
/// 声明依赖名称，由解析器解析后按顺序传入。
pub struct Invocation<'a, R> {
    dependencies: Vec<String>,
    target: Box<dyn FnOnce(&Dependencies) -> R + 'a>,
}

impl<'a, R> Invocation<'a, R> {
    /// 创建新的调用
    pub fn new<I, S, F>(dependencies: I, target: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(&Dependencies) -> R + 'a,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            target: Box::new(target),
        }
    }

    /// 声明的依赖名称
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// 解析依赖并调用目标函数，解析错误原样返回
    pub fn call_with(self, resolver: &dyn DefinitionResolver) -> Result<R, DependencyError> {
        let dependencies = resolver.resolve_all(&self.dependencies)?;
        Ok((self.target)(&dependencies))
    }
}

impl<R> std::fmt::Debug for Invocation<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("dependencies", &self.dependencies)
            .field("target", &"<function>")
            .finish()
    }
}
