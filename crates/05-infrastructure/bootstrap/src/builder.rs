//! 注入器构建与调用

use crate::ambient::publish_injector;
use crate::options::BuildOptions;
use crate::registry::DefinitionRegistry;
use bootstrap_common::DependencyError;
use di_abstractions::{Definitions, Invocation};
use di_impl::Injector;
use std::sync::Arc;
use tracing::debug;

/// 注入器构建器
///
/// 以注册表的快照加上覆盖定义构建注入器。覆盖定义同名时替换注册表中的定义，
/// 只作用于本次构建，注册表本身不变。
pub struct InjectorBuilder<'a> {
    registry: &'a DefinitionRegistry,
}

impl<'a> InjectorBuilder<'a> {
    /// 创建构建器
    pub fn new(registry: &'a DefinitionRegistry) -> Self {
        Self { registry }
    }

    /// 构建注入器
    pub fn build(&self, overrides: Definitions) -> Injector {
        let mut definitions = self.registry.snapshot();
        for (name, definition) in overrides {
            if definitions.insert(name.clone(), definition).is_some() {
                debug!("覆盖定义: {}", name);
            }
        }
        Injector::new(definitions)
    }
}

/// 目标函数调用器
pub struct Invoker<'a> {
    registry: &'a DefinitionRegistry,
    options: &'a BuildOptions,
}

impl<'a> Invoker<'a> {
    /// 创建调用器
    pub fn new(registry: &'a DefinitionRegistry, options: &'a BuildOptions) -> Self {
        Self { registry, options }
    }

    /// 调用目标函数
    ///
    /// 未提供注入器时用注册表和 `overrides` 构建一个新的；提供了注入器时
    /// `overrides` 不起作用。配置了发布槽位时，在解析依赖之前把所用注入器
    /// 发布到槽位。
    pub fn invoke<R>(
        &self,
        target: Invocation<'_, R>,
        injector: Option<Arc<Injector>>,
        overrides: Definitions,
    ) -> Result<R, DependencyError> {
        let injector = match injector {
            Some(injector) => injector,
            None => Arc::new(InjectorBuilder::new(self.registry).build(overrides)),
        };

        if let Some(slot) = self.options.publish_slot() {
            publish_injector(slot, injector.clone());
        }

        injector.invoke(target)
    }
}
