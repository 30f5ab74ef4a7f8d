//! 清单模块加载器
//!
//! 清单文件的顶层是一个表，每个键是一个导出。形如 `[kind, ...]` 的数组
//! 是定义或判定函数：
//!
//! ```toml
//! greeting = ["value", "hello"]
//! clock = ["factory", "system_clock"]
//! service = ["type", "user_service"]
//! _diOff = ["predicate", "legacy_disabled"]
//! ```
//!
//! 少于两个元素的数组和其余的值作为普通数据导出，不会被注册。目录中
//! 找不到的提供者名称先记为未解析导出，由模块加载器在禁用检查之后报告。

use crate::catalog::ProviderCatalog;
use bootstrap_common::DiscoveryError;
use dashmap::DashMap;
use di_abstractions::{Definition, DefinitionKind, Export, ModuleExports, ModuleSource};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 判定函数导出的标签
pub const PREDICATE_TAG: &str = "predicate";

/// 清单文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// JSON
    Json,
    /// TOML
    Toml,
    /// YAML
    Yaml,
}

impl ManifestFormat {
    /// 按扩展名识别格式
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// 解析为 JSON 值
    pub fn parse(&self, path: &Path, content: &str) -> Result<Value, DiscoveryError> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| DiscoveryError::parse(path, e.to_string())),
            Self::Toml => toml::from_str::<toml::Value>(content)
                .map(|value| toml_to_json(&value))
                .map_err(|e| DiscoveryError::parse(path, e.to_string())),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| DiscoveryError::parse(path, e.to_string())),
        }
    }
}

/// 把 TOML 值转换为 JSON 值
pub fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

/// 清单模块加载器
///
/// 按路径缓存加载结果，同一文件只读取和解析一次。
#[derive(Debug, Default)]
pub struct ManifestModuleSource {
    catalog: ProviderCatalog,
    cache: DashMap<PathBuf, Arc<ModuleExports>>,
}

impl ManifestModuleSource {
    /// 使用提供者目录创建加载器
    pub fn new(catalog: ProviderCatalog) -> Self {
        Self {
            catalog,
            cache: DashMap::new(),
        }
    }

    /// 提供者目录
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// 已缓存的模块数量
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn read(&self, path: &Path) -> Result<ModuleExports, DiscoveryError> {
        let format = ManifestFormat::from_path(path).ok_or_else(|| DiscoveryError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => DiscoveryError::ModuleNotFound {
                path: path.to_path_buf(),
            },
            _ => DiscoveryError::ModuleRead {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let Value::Object(table) = format.parse(path, &content)? else {
            return Err(DiscoveryError::InvalidExports {
                path: path.to_path_buf(),
                message: "顶层必须是表".to_string(),
            });
        };

        Ok(table
            .into_iter()
            .map(|(name, value)| (name, self.export(value)))
            .collect())
    }

    fn export(&self, value: Value) -> Export {
        let Some((tag, reference)) = tagged(&value) else {
            return Export::Value(value);
        };

        if tag == PREDICATE_TAG {
            let name = provider_name(reference);
            return match self.catalog.predicate(&name) {
                Some(predicate) => Export::Predicate(predicate.clone()),
                None => Export::Unresolved { kind: PREDICATE_TAG, name },
            };
        }

        let Ok(kind) = tag.parse::<DefinitionKind>() else {
            return Export::Value(value);
        };

        let provider = match kind {
            DefinitionKind::Value => return Export::Definition(Definition::value(reference.clone())),
            DefinitionKind::Factory => self.catalog.factory(&provider_name(reference)).cloned().map(Definition::Factory),
            DefinitionKind::Type => self
                .catalog
                .type_provider(&provider_name(reference))
                .cloned()
                .map(Definition::Type),
        };
        match provider {
            Some(definition) => Export::Definition(definition),
            None => Export::Unresolved {
                kind: kind.as_str(),
                name: provider_name(reference),
            },
        }
    }
}

/// 两个及以上元素、首元素为字符串的数组视为带标签的导出
fn tagged(value: &Value) -> Option<(&str, &Value)> {
    match value.as_array()?.as_slice() {
        [Value::String(tag), reference, ..] => Some((tag.as_str(), reference)),
        _ => None,
    }
}

fn provider_name(reference: &Value) -> String {
    match reference {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

impl ModuleSource for ManifestModuleSource {
    fn load(&self, path: &Path) -> Result<Arc<ModuleExports>, DiscoveryError> {
        if let Some(exports) = self.cache.get(path) {
            return Ok(exports.value().clone());
        }

        let exports = self
            .cache
            .entry(path.to_path_buf())
            .or_try_insert_with(|| {
                let exports = self.read(path)?;
                debug!("读取清单模块 {}: {} 个导出", path.display(), exports.len());
                Ok::<_, DiscoveryError>(Arc::new(exports))
            })?
            .value()
            .clone();
        Ok(exports)
    }

    fn name(&self) -> &str {
        "manifest"
    }
}
