//! 单个模块的加载与注册

use crate::disable::DisablePolicy;
use crate::registry::{is_reserved_name, DefinitionRegistry, DefinitionSource, Registration};
use bootstrap_common::DiscoveryError;
use di_abstractions::{Export, ModuleSource};
use std::path::Path;
use tracing::debug;

/// 单个模块的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// 路径包含禁用标记，未加载
    SkippedByPath,
    /// 已加载，但模块自行禁用
    Disabled,
    /// 已加载并注册
    Loaded {
        /// 注册成功的定义名称
        registered: Vec<String>,
        /// 因重名被忽略的定义名称
        duplicates: Vec<String>,
    },
}

impl ModuleOutcome {
    /// 注册成功的定义名称
    pub fn registered(&self) -> &[String] {
        match self {
            Self::Loaded { registered, .. } => registered,
            _ => &[],
        }
    }

    /// 因重名被忽略的定义名称
    pub fn duplicates(&self) -> &[String] {
        match self {
            Self::Loaded { duplicates, .. } => duplicates,
            _ => &[],
        }
    }

    /// 模块是否被跳过（路径标记或自行禁用）
    pub fn is_skipped(&self) -> bool {
        !matches!(self, Self::Loaded { .. })
    }
}

/// 模块加载器
///
/// 加载一个模块，提取其中的定义并写入注册表。格式不对的导出不是错误，
/// 会被静默跳过；只有加载器本身的失败会向上传递。启用模块的公开导出
/// 引用了未知提供者时报告 [`DiscoveryError::UnknownProvider`]。
pub struct ModuleLoader<'a> {
    source: &'a dyn ModuleSource,
    policy: &'a DisablePolicy,
}

impl<'a> ModuleLoader<'a> {
    /// 创建模块加载器
    pub fn new(source: &'a dyn ModuleSource, policy: &'a DisablePolicy) -> Self {
        Self { source, policy }
    }

    /// 加载模块并注册定义
    pub fn load(&self, registry: &mut DefinitionRegistry, path: &Path) -> Result<ModuleOutcome, DiscoveryError> {
        if self.policy.skips_path(path) {
            debug!("路径包含禁用标记，跳过模块: {}", path.display());
            return Ok(ModuleOutcome::SkippedByPath);
        }

        let exports = self.source.load(path)?;

        if let Some(Export::Unresolved { kind, name }) = exports.get(self.policy.marker()) {
            return Err(unresolved(path, *kind, name));
        }
        if self.policy.is_disabled(&exports) {
            debug!("模块已禁用: {}", path.display());
            return Ok(ModuleOutcome::Disabled);
        }

        let public = || exports.iter().filter(|(name, _)| !is_reserved_name(name));
        if let Some((_, Export::Unresolved { kind, name })) =
            public().find(|(_, export)| matches!(export, Export::Unresolved { .. }))
        {
            return Err(unresolved(path, *kind, name));
        }

        let mut registered = Vec::new();
        let mut duplicates = Vec::new();

        for (name, export) in public() {
            let Export::Definition(definition) = export else {
                continue;
            };

            let source = DefinitionSource::Module(path.to_path_buf());
            match registry.register(name, definition.clone(), source) {
                Registration::Accepted => registered.push(name.to_string()),
                Registration::Duplicate => duplicates.push(name.to_string()),
                Registration::Reserved => {}
            }
        }

        debug!(
            "加载模块 {}: 注册 {} 个定义，忽略 {} 个重复定义",
            path.display(),
            registered.len(),
            duplicates.len()
        );
        Ok(ModuleOutcome::Loaded { registered, duplicates })
    }
}

fn unresolved(path: &Path, kind: &'static str, name: &str) -> DiscoveryError {
    DiscoveryError::UnknownProvider {
        path: path.to_path_buf(),
        kind,
        name: name.to_string(),
    }
}
