//! 引导会话
//!
//! 持有注册表、别名、构建选项和协作者，对外提供
//! `load_module`、`discover`、`create_injector`、`invoke`。

use crate::aliases::{PatternAlias, PatternAliasResolver, Patterns};
use crate::builder::{InjectorBuilder, Invoker};
use crate::catalog::ProviderCatalog;
use crate::disable::DisablePolicy;
use crate::discovery::{DiscoveryReport, DiscoveryRunner};
use crate::loader::{ModuleLoader, ModuleOutcome};
use crate::matcher::GlobPathMatcher;
use crate::options::{BuildOptions, DiscoveryOverrides};
use crate::registry::DefinitionRegistry;
use crate::settings::BootstrapSettings;
use crate::sources::{LinkedModuleSource, ManifestModuleSource};
use bootstrap_common::{ConfigResult, DependencyResult, DiscoveryResult};
use di_abstractions::{Definitions, DiscoveryOptions, Invocation, ModuleSource, PathMatcher};
use di_impl::Injector;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 引导会话
pub struct Bootstrapper {
    registry: DefinitionRegistry,
    aliases: PatternAliasResolver,
    options: BuildOptions,
    defaults: DiscoveryOptions,
    policy: DisablePolicy,
    source: Arc<dyn ModuleSource>,
    matcher: Arc<dyn PathMatcher>,
    startup: Vec<Patterns>,
}

impl Bootstrapper {
    /// 创建引导会话
    ///
    /// `config` 以 `config` 名称预置；`definitions` 在其后预置，
    /// 同名时替换 `config`。`aliases` 添加到内置别名之上。
    /// 默认使用文件系统匹配器和空目录的清单加载器。
    pub fn new(
        config: serde_json::Value,
        definitions: Definitions,
        aliases: impl IntoIterator<Item = (String, PatternAlias)>,
        options: BuildOptions,
    ) -> ConfigResult<Self> {
        let defaults = options.discovery_defaults(&config)?;

        let mut registry = DefinitionRegistry::with_config(config);
        for (name, definition) in definitions {
            registry.seed(name, definition);
        }

        let aliases = PatternAliasResolver::builtin().with_aliases(aliases);
        info!(
            "创建引导会话: 基准目录 {}，预置 {} 个定义",
            defaults.cwd.display(),
            registry.len()
        );

        Ok(Self {
            registry,
            aliases,
            options,
            defaults,
            policy: DisablePolicy::default(),
            source: Arc::new(ManifestModuleSource::default()),
            matcher: Arc::new(GlobPathMatcher::new()),
            startup: Vec::new(),
        })
    }

    /// 从引导配置创建会话
    ///
    /// 配置中的启动发现模式不会立即执行，见 [`Bootstrapper::run_startup_discovery`]。
    pub fn from_settings(settings: BootstrapSettings) -> ConfigResult<Self> {
        let mut bootstrapper = Self::new(settings.config, Definitions::new(), settings.aliases, settings.options)?;
        bootstrapper.startup = settings.discover;
        Ok(bootstrapper)
    }

    /// 使用指定的模块加载器
    pub fn with_module_source(mut self, source: impl ModuleSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// 使用带提供者目录的清单加载器
    pub fn with_catalog(self, catalog: ProviderCatalog) -> Self {
        self.with_module_source(ManifestModuleSource::new(catalog))
    }

    /// 使用指定的路径匹配器
    pub fn with_path_matcher(mut self, matcher: impl PathMatcher + 'static) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    /// 同时以链接模块作为加载器和匹配器
    pub fn with_linked_modules(mut self, modules: LinkedModuleSource) -> Self {
        let modules = Arc::new(modules);
        self.source = modules.clone();
        self.matcher = modules;
        self
    }

    /// 使用指定的禁用策略
    pub fn with_disable_policy(mut self, policy: DisablePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 定义注册表
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// 模式别名
    pub fn aliases(&self) -> &PatternAliasResolver {
        &self.aliases
    }

    /// 构建选项
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// 会话的路径匹配默认值
    pub fn discovery_defaults(&self) -> &DiscoveryOptions {
        &self.defaults
    }

    /// 加载单个模块
    ///
    /// 路径原样交给模块加载器，不基于 `cwd` 展开。
    pub fn load_module(&mut self, path: impl AsRef<Path>) -> DiscoveryResult<ModuleOutcome> {
        ModuleLoader::new(&*self.source, &self.policy).load(&mut self.registry, path.as_ref())
    }

    /// 按模式或别名发现并加载模块
    pub fn discover(
        &mut self,
        patterns: impl Into<Patterns>,
        options: Option<DiscoveryOverrides>,
    ) -> DiscoveryResult<DiscoveryReport> {
        let loader = ModuleLoader::new(&*self.source, &self.policy);
        DiscoveryRunner::new(&self.aliases, &*self.matcher, loader, &self.defaults).run(
            &mut self.registry,
            patterns.into(),
            options,
        )
    }

    /// 依次执行配置中的启动发现
    pub fn run_startup_discovery(&mut self) -> DiscoveryResult<Vec<DiscoveryReport>> {
        let startup = std::mem::take(&mut self.startup);
        startup
            .into_iter()
            .map(|patterns| self.discover(patterns, None))
            .collect()
    }

    /// 构建注入器，`overrides` 同名时替换已注册的定义
    pub fn create_injector(&self, overrides: Definitions) -> Injector {
        InjectorBuilder::new(&self.registry).build(overrides)
    }

    /// 调用目标函数
    ///
    /// 未提供注入器时以 `overrides` 构建一个新的；配置了发布槽位时先发布注入器。
    pub fn invoke<R>(
        &self,
        target: Invocation<'_, R>,
        injector: Option<Arc<Injector>>,
        overrides: Definitions,
    ) -> DependencyResult<R> {
        Invoker::new(&self.registry, &self.options).invoke(target, injector, overrides)
    }
}

impl fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("registry", &self.registry)
            .field("aliases", &self.aliases)
            .field("options", &self.options)
            .field("defaults", &self.defaults)
            .field("policy", &self.policy)
            .field("source", &self.source.name())
            .field("matcher", &self.matcher.name())
            .finish()
    }
}
