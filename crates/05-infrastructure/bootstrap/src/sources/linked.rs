//! 链接模块
//!
//! 编译进程序的模块：以虚拟路径登记一个构造导出的闭包，
//! 首次加载时执行，之后返回缓存的导出。

use bootstrap_common::DiscoveryError;
use dashmap::DashMap;
use di_abstractions::{DiscoveryOptions, ModuleExports, ModuleSource, PathMatcher};
use glob::{MatchOptions, Pattern};
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

type ModuleFn = Arc<dyn Fn() -> ModuleExports + Send + Sync>;

/// 链接模块加载器
///
/// 同时实现 [`PathMatcher`]：模式只在已登记的虚拟路径中匹配，
/// 结果按登记顺序返回，`cwd` 不参与匹配。
#[derive(Default)]
pub struct LinkedModuleSource {
    modules: IndexMap<PathBuf, ModuleFn>,
    cache: DashMap<PathBuf, Arc<ModuleExports>>,
    loads: DashMap<PathBuf, usize>,
}

impl LinkedModuleSource {
    /// 创建空的链接模块集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记模块
    pub fn with_module<F>(mut self, path: impl Into<PathBuf>, module: F) -> Self
    where
        F: Fn() -> ModuleExports + Send + Sync + 'static,
    {
        self.register(path, module);
        self
    }

    /// 登记模块，同一路径再次登记会替换之前的模块
    pub fn register<F>(&mut self, path: impl Into<PathBuf>, module: F)
    where
        F: Fn() -> ModuleExports + Send + Sync + 'static,
    {
        let path = path.into();
        self.cache.remove(&path);
        self.modules.insert(path, Arc::new(module));
    }

    /// 已登记的虚拟路径
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.modules.keys().map(PathBuf::as_path)
    }

    /// 模块闭包被执行的次数
    pub fn load_count(&self, path: impl AsRef<Path>) -> usize {
        self.loads.get(path.as_ref()).map_or(0, |count| *count)
    }
}

impl ModuleSource for LinkedModuleSource {
    fn load(&self, path: &Path) -> Result<Arc<ModuleExports>, DiscoveryError> {
        if let Some(exports) = self.cache.get(path) {
            return Ok(exports.value().clone());
        }

        let module = self.modules.get(path).ok_or_else(|| DiscoveryError::ModuleNotFound {
            path: path.to_path_buf(),
        })?;

        let exports = self
            .cache
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                *self.loads.entry(path.to_path_buf()).or_insert(0) += 1;
                debug!("执行链接模块: {}", path.display());
                Arc::new(module())
            })
            .value()
            .clone();
        Ok(exports)
    }

    fn name(&self) -> &str {
        "linked"
    }
}

impl PathMatcher for LinkedModuleSource {
    fn match_paths(&self, pattern: &str, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
        let compile = |pattern: &str| {
            Pattern::new(pattern).map_err(|e| DiscoveryError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.msg.to_string(),
            })
        };
        let matcher = compile(pattern)?;
        let ignore = options
            .ignore
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        let match_options = MatchOptions {
            case_sensitive: options.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: !options.dot,
        };

        Ok(self
            .paths()
            .filter(|path| matcher.matches_path_with(path, match_options))
            .filter(|path| !ignore.iter().any(|p| p.matches_path_with(path, match_options)))
            .map(Path::to_path_buf)
            .collect())
    }

    fn name(&self) -> &str {
        "linked"
    }
}

impl fmt::Debug for LinkedModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedModuleSource")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("cached", &self.cache.len())
            .finish()
    }
}
