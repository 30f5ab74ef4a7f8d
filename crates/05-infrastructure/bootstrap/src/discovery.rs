//! 模块发现
//!
//! 把模式或别名展开为文件路径，并按匹配顺序逐个加载模块。

use crate::aliases::{PatternAliasResolver, Patterns};
use crate::loader::{ModuleLoader, ModuleOutcome};
use crate::options::DiscoveryOverrides;
use crate::registry::DefinitionRegistry;
use bootstrap_common::DiscoveryError;
use di_abstractions::{DiscoveryOptions, PathMatcher};
use std::path::PathBuf;
use tracing::{debug, info};

/// 一次发现调用的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// 展开后的模式
    pub patterns: Vec<String>,
    /// 按处理顺序排列的模块及其结果
    pub modules: Vec<(PathBuf, ModuleOutcome)>,
}

impl DiscoveryReport {
    /// 处理过的模块路径
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.modules.iter().map(|(path, _)| path)
    }

    /// 注册成功的定义数量
    pub fn registered_count(&self) -> usize {
        self.modules.iter().map(|(_, outcome)| outcome.registered().len()).sum()
    }

    /// 因重名被忽略的定义数量
    pub fn duplicate_count(&self) -> usize {
        self.modules.iter().map(|(_, outcome)| outcome.duplicates().len()).sum()
    }

    /// 被跳过的模块数量
    pub fn skipped_count(&self) -> usize {
        self.modules.iter().filter(|(_, outcome)| outcome.is_skipped()).count()
    }
}

/// 模块发现执行器
pub struct DiscoveryRunner<'a> {
    aliases: &'a PatternAliasResolver,
    matcher: &'a dyn PathMatcher,
    loader: ModuleLoader<'a>,
    defaults: &'a DiscoveryOptions,
}

impl<'a> DiscoveryRunner<'a> {
    /// 创建发现执行器
    pub fn new(
        aliases: &'a PatternAliasResolver,
        matcher: &'a dyn PathMatcher,
        loader: ModuleLoader<'a>,
        defaults: &'a DiscoveryOptions,
    ) -> Self {
        Self {
            aliases,
            matcher,
            loader,
            defaults,
        }
    }

    /// 执行发现
    ///
    /// 模式按给定顺序处理，每个模式内按匹配器返回的顺序加载；
    /// 这一顺序决定同名定义冲突时哪个模块胜出。不同模式匹配到的
    /// 重复路径不会去重。任何匹配或加载失败都会中止本次调用。
    pub fn run(
        &self,
        registry: &mut DefinitionRegistry,
        input: Patterns,
        options: Option<DiscoveryOverrides>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let resolved = self.aliases.resolve(input, options);
        let options = resolved
            .options
            .as_ref()
            .map(|overrides| overrides.apply_to(self.defaults))
            .unwrap_or_else(|| self.defaults.clone());

        let mut report = DiscoveryReport {
            patterns: resolved.patterns.clone(),
            modules: Vec::new(),
        };

        for pattern in &resolved.patterns {
            let paths = self.matcher.match_paths(pattern, &options)?;
            debug!("模式 {} 匹配到 {} 个文件", pattern, paths.len());

            for path in paths {
                let outcome = self.loader.load(registry, &path)?;
                report.modules.push((path, outcome));
            }
        }

        info!(
            "发现完成 {:?}: 处理 {} 个模块，注册 {} 个定义，忽略 {} 个重复定义",
            report.patterns,
            report.modules.len(),
            report.registered_count(),
            report.duplicate_count()
        );
        Ok(report)
    }
}
