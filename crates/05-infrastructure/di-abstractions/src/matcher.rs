//! 路径匹配抽象接口

use bootstrap_common::DiscoveryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// 路径匹配选项
///
/// 所有字段都已确定；部分覆盖见引导层的 `DiscoveryOverrides`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    /// 相对模式的基准目录
    pub cwd: PathBuf,
    /// 是否把匹配结果解析为真实路径（跟随符号链接）
    pub realpath: bool,
    /// 是否区分大小写
    pub case_sensitive: bool,
    /// 通配符是否匹配以 `.` 开头的文件和目录
    pub dot: bool,
    /// 排除的模式，相对于 `cwd`
    pub ignore: Vec<String>,
}

impl DiscoveryOptions {
    /// 以指定目录为基准创建默认选项
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            realpath: true,
            case_sensitive: true,
            dot: false,
            ignore: Vec::new(),
        }
    }
}

/// 路径匹配器 trait
///
/// 把一个模式展开为有序的文件路径列表。返回顺序决定了同名定义冲突时
/// 哪个模块胜出，实现必须保证顺序稳定。
pub trait PathMatcher: Send + Sync {
    /// 匹配文件路径
    fn match_paths(&self, pattern: &str, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError>;

    /// 获取匹配器名称
    fn name(&self) -> &str;
}

impl<T: PathMatcher + ?Sized> PathMatcher for Arc<T> {
    fn match_paths(&self, pattern: &str, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
        (**self).match_paths(pattern, options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
