//! 模块禁用策略
//!
//! 两个独立的退出通道：
//!
//! - 路径中包含禁用标记的模块根本不会被加载
//! - 已加载模块可以通过保留导出键在加载时自行决定是否禁用

use di_abstractions::{Export, ModuleExports, PredicateFn};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// 禁用标记，同时用作路径子串和保留导出键
pub const DISABLE_MARKER: &str = "_diOff";

/// 模块的禁用标志
#[derive(Clone)]
pub enum DisableFlag {
    /// 固定值
    Always(bool),
    /// 加载时计算
    Computed(PredicateFn),
}

impl DisableFlag {
    /// 从保留导出键的值得到禁用标志
    pub fn from_export(export: &Export) -> Self {
        match export {
            Export::Predicate(predicate) => Self::Computed(predicate.clone()),
            Export::Value(value) => Self::Always(is_truthy(value)),
            Export::Definition(_) | Export::Unresolved { .. } => Self::Always(true),
        }
    }

    /// 是否禁用
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Always(disabled) => *disabled,
            Self::Computed(predicate) => predicate(),
        }
    }
}

impl fmt::Debug for DisableFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always(disabled) => f.debug_tuple("Always").field(disabled).finish(),
            Self::Computed(_) => f.write_str("Computed(<function>)"),
        }
    }
}

/// 宽松真值判断：`null`、`false`、`0`、`NaN` 和空字符串为假，其余为真
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 模块禁用策略
#[derive(Debug, Clone)]
pub struct DisablePolicy {
    marker: String,
}

impl DisablePolicy {
    /// 使用自定义标记创建策略
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }

    /// 禁用标记
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// 路径是否包含禁用标记
    pub fn skips_path(&self, path: &Path) -> bool {
        path.to_string_lossy().contains(self.marker.as_str())
    }

    /// 读取模块的禁用标志，未导出保留键时为 `None`
    pub fn flag(&self, exports: &ModuleExports) -> Option<DisableFlag> {
        exports.get(&self.marker).map(DisableFlag::from_export)
    }

    /// 模块是否自行禁用
    pub fn is_disabled(&self, exports: &ModuleExports) -> bool {
        self.flag(exports).map_or(false, |flag| flag.is_disabled())
    }
}

impl Default for DisablePolicy {
    fn default() -> Self {
        Self::new(DISABLE_MARKER)
    }
}
