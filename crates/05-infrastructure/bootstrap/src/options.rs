//! 构建选项
//!
//! 组合路径匹配的默认值和注入器发布槽位名称。

use bootstrap_common::ConfigError;
use di_abstractions::DiscoveryOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认的注入器发布槽位
pub const DEFAULT_GLOBAL_INJECTOR: &str = "$injector";

/// 路径匹配选项的部分覆盖
///
/// 未设置的字段沿用下层默认值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOverrides {
    /// 基准目录，相对路径基于下层的基准目录
    pub cwd: Option<PathBuf>,
    /// 是否解析为真实路径
    pub realpath: Option<bool>,
    /// 是否区分大小写
    pub case_sensitive: Option<bool>,
    /// 是否匹配以 `.` 开头的文件
    pub dot: Option<bool>,
    /// 排除的模式
    pub ignore: Option<Vec<String>>,
}

impl DiscoveryOverrides {
    /// 创建空覆盖
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置基准目录
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// 设置是否解析真实路径
    pub fn realpath(mut self, realpath: bool) -> Self {
        self.realpath = Some(realpath);
        self
    }

    /// 设置是否区分大小写
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    /// 设置是否匹配隐藏文件
    pub fn dot(mut self, dot: bool) -> Self {
        self.dot = Some(dot);
        self
    }

    /// 设置排除模式
    pub fn ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// 是否没有任何覆盖
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// 把覆盖应用到已确定的选项上
    pub fn apply_to(&self, base: &DiscoveryOptions) -> DiscoveryOptions {
        DiscoveryOptions {
            cwd: self
                .cwd
                .as_ref()
                .map(|cwd| base.cwd.join(cwd))
                .unwrap_or_else(|| base.cwd.clone()),
            realpath: self.realpath.unwrap_or(base.realpath),
            case_sensitive: self.case_sensitive.unwrap_or(base.case_sensitive),
            dot: self.dot.unwrap_or(base.dot),
            ignore: self.ignore.clone().unwrap_or_else(|| base.ignore.clone()),
        }
    }
}

/// 构建选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// 注入器发布槽位，`None` 或空字符串表示不发布
    pub global_injector: Option<String>,
    /// 路径匹配默认值
    pub glob: DiscoveryOverrides,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            global_injector: Some(DEFAULT_GLOBAL_INJECTOR.to_string()),
            glob: DiscoveryOverrides::default(),
        }
    }
}

impl BuildOptions {
    /// 设置发布槽位
    pub fn with_global_injector(mut self, slot: impl Into<String>) -> Self {
        self.global_injector = Some(slot.into());
        self
    }

    /// 不发布注入器
    pub fn without_global_injector(mut self) -> Self {
        self.global_injector = None;
        self
    }

    /// 设置路径匹配默认值
    pub fn with_glob(mut self, glob: DiscoveryOverrides) -> Self {
        self.glob = glob;
        self
    }

    /// 生效的发布槽位
    pub fn publish_slot(&self) -> Option<&str> {
        self.global_injector.as_deref().filter(|slot| !slot.is_empty())
    }

    /// 计算会话的路径匹配默认值
    ///
    /// 基准目录依次取 `glob.cwd`、配置对象的 `cwd` 字段、进程当前目录；
    /// 默认解析真实路径。
    pub fn discovery_defaults(&self, config: &serde_json::Value) -> Result<DiscoveryOptions, ConfigError> {
        let cwd = match config.get("cwd") {
            Some(serde_json::Value::String(cwd)) => PathBuf::from(cwd),
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "config.cwd".to_string(),
                    message: format!("期望字符串，实际为 {}", other),
                })
            }
            None => std::env::current_dir()?,
        };
        Ok(self.glob.apply_to(&DiscoveryOptions::new(cwd)))
    }
}
