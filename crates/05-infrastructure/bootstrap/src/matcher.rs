//! 基于 `glob` 的文件系统路径匹配器

use bootstrap_common::DiscoveryError;
use di_abstractions::{DiscoveryOptions, PathMatcher};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::trace;

/// 文件系统路径匹配器
///
/// 相对模式基于 `cwd` 展开，结果按路径字典序返回，只包含普通文件。
#[derive(Debug, Clone, Default)]
pub struct GlobPathMatcher;

impl GlobPathMatcher {
    /// 创建匹配器
    pub fn new() -> Self {
        Self
    }

    fn match_options(options: &DiscoveryOptions) -> MatchOptions {
        MatchOptions {
            case_sensitive: options.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: !options.dot,
        }
    }

    fn anchored(pattern: &str, cwd: &Path) -> String {
        if Path::new(pattern).is_absolute() {
            return pattern.to_string();
        }
        let base = Pattern::escape(&cwd.to_string_lossy());
        let relative = pattern.trim_start_matches("./");
        format!("{}/{}", base.trim_end_matches('/'), relative)
    }

    fn ignore_patterns(options: &DiscoveryOptions) -> Result<Vec<Pattern>, DiscoveryError> {
        options
            .ignore
            .iter()
            .map(|pattern| {
                Pattern::new(&Self::anchored(pattern, &options.cwd)).map_err(|e| DiscoveryError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.msg.to_string(),
                })
            })
            .collect()
    }
}

impl PathMatcher for GlobPathMatcher {
    fn match_paths(&self, pattern: &str, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
        let anchored = Self::anchored(pattern, &options.cwd);
        let match_options = Self::match_options(options);
        let ignore = Self::ignore_patterns(options)?;

        let entries = glob::glob_with(&anchored, match_options).map_err(|e| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DiscoveryError::MatchFailed {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;

            if !path.is_file() {
                continue;
            }
            if ignore.iter().any(|p| p.matches_path_with(&path, match_options)) {
                trace!("忽略匹配的文件: {}", path.display());
                continue;
            }

            let path = if options.realpath {
                path.canonicalize()
                    .map_err(|source| DiscoveryError::MatchFailed { path, source })?
            } else {
                path
            };
            paths.push(path);
        }

        Ok(paths)
    }

    fn name(&self) -> &str {
        "glob"
    }
}
