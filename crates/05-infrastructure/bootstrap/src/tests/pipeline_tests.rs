//! 发现、注册、构建、调用的完整流程测试

use crate::ambient::published_injector;
use crate::aliases::PatternAlias;
use crate::bootstrapper::Bootstrapper;
use crate::disable::DISABLE_MARKER;
use crate::loader::ModuleOutcome;
use crate::options::BuildOptions;
use crate::registry::{DefinitionSource, CONFIG_DEFINITION};
use crate::settings::BootstrapSettings;
use crate::sources::LinkedModuleSource;
use bootstrap_common::{DependencyError, DiscoveryError};
use di_abstractions::{Definition, Definitions, DiscoveryOptions, Invocation, ModuleExports, PathMatcher};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn session(modules: LinkedModuleSource) -> Bootstrapper {
    Bootstrapper::new(
        json!({ "name": "pipeline" }),
        Definitions::new(),
        Vec::new(),
        BuildOptions::default().without_global_injector(),
    )
    .unwrap()
    .with_linked_modules(modules)
}

fn widget_modules() -> LinkedModuleSource {
    LinkedModuleSource::new()
        .with_module("modules/a.di.rs", || {
            ModuleExports::new().with_definition("widget", Definition::value(1_i32))
        })
        .with_module("modules/b.di.rs", || {
            ModuleExports::new().with_definition("widget", Definition::value(2_i32))
        })
}

/// 测试同名定义先发现者胜出，冲突记录后来的模块
#[test]
fn test_first_discovered_widget_wins() {
    let mut bootstrapper = session(widget_modules());

    let report = bootstrapper.discover("modules", None).unwrap();

    assert_eq!(report.patterns, ["modules/**/*.di.*"]);
    assert_eq!(report.registered_count(), 1);
    assert_eq!(report.duplicate_count(), 1);

    let injector = bootstrapper.create_injector(Definitions::new());
    assert_eq!(*injector.get_as::<i32>("widget").unwrap(), 1);

    let collision = &bootstrapper.registry().collisions()[0];
    assert_eq!(collision.name, "widget");
    assert_eq!(collision.rejected, DefinitionSource::Module(PathBuf::from("modules/b.di.rs")));
    assert_eq!(collision.kept, DefinitionSource::Module(PathBuf::from("modules/a.di.rs")));
}

/// 测试路径包含禁用标记的模块不会被执行
#[test]
fn test_disabled_path_is_never_loaded() {
    let executed = Arc::new(AtomicUsize::new(0));
    let counter = executed.clone();
    let modules = widget_modules().with_module("modules/thing._diOff.di.rs", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        ModuleExports::new().with_definition("thing", Definition::value("thing"))
    });
    let mut bootstrapper = session(modules);

    let report = bootstrapper.discover("modules", None).unwrap();

    assert_eq!(executed.load(Ordering::SeqCst), 0);
    assert!(!bootstrapper.registry().contains("thing"));
    assert_eq!(report.skipped_count(), 1);
    assert!(report
        .modules
        .iter()
        .any(|(path, outcome)| path.ends_with("thing._diOff.di.rs") && *outcome == ModuleOutcome::SkippedByPath));
}

/// 测试模块通过导出禁用标记自行禁用
#[test]
fn test_disable_flag_variants() {
    let modules = LinkedModuleSource::new()
        .with_module("lib/on.di.rs", || {
            ModuleExports::new()
                .with_definition("on", Definition::value(1_i32))
                .with(DISABLE_MARKER, json!(true))
        })
        .with_module("lib/computed.di.rs", || {
            ModuleExports::new()
                .with_definition("computed", Definition::value(1_i32))
                .with_predicate(DISABLE_MARKER, || true)
        })
        .with_module("lib/off.di.rs", || {
            ModuleExports::new()
                .with_definition("off", Definition::value(1_i32))
                .with(DISABLE_MARKER, json!(false))
        })
        .with_module("lib/plain.di.rs", || {
            ModuleExports::new().with_definition("plain", Definition::value(1_i32))
        });
    let mut bootstrapper = session(modules);

    bootstrapper.discover("lib", None).unwrap();

    assert!(!bootstrapper.registry().contains("on"));
    assert!(!bootstrapper.registry().contains("computed"));
    assert!(bootstrapper.registry().contains("off"));
    assert!(bootstrapper.registry().contains("plain"));
    assert!(!bootstrapper.registry().contains(DISABLE_MARKER));
}

/// 测试私有导出和非定义导出不会被注册
#[test]
fn test_private_and_plain_exports_are_ignored() {
    let modules = LinkedModuleSource::new().with_module("modules/mixed.di.rs", || {
        ModuleExports::new()
            .with_definition("_secret", Definition::value(1_i32))
            .with("constant", json!(["widget", 1]))
            .with("public", Definition::value(2_i32))
    });
    let mut bootstrapper = session(modules);

    let outcome = bootstrapper.load_module("modules/mixed.di.rs").unwrap();

    assert_eq!(outcome.registered(), ["public".to_string()]);
    let names: Vec<&str> = bootstrapper.registry().names().collect();
    assert_eq!(names, [CONFIG_DEFINITION, "public"]);
}

/// 测试覆盖定义优先于已发现的定义
#[test]
fn test_override_precedence() {
    let mut bootstrapper = session(widget_modules());
    bootstrapper.discover("modules", None).unwrap();

    let mut overrides = Definitions::new();
    overrides.insert("widget".to_string(), Definition::value(42_i32));
    let injector = bootstrapper.create_injector(overrides);

    assert_eq!(*injector.get_as::<i32>("widget").unwrap(), 42);
    assert_eq!(
        *bootstrapper.create_injector(Definitions::new()).get_as::<i32>("widget").unwrap(),
        1
    );
}

/// 测试配置对象可以在任意注入器中按名称解析
#[test]
fn test_config_is_resolvable() {
    let mut bootstrapper = session(widget_modules());
    bootstrapper.discover("modules", None).unwrap();

    for _ in 0..2 {
        let injector = bootstrapper.create_injector(Definitions::new());
        let config = injector.get_as::<serde_json::Value>(CONFIG_DEFINITION).unwrap();
        assert_eq!(config["name"], json!("pipeline"));
    }
}

/// 测试预置定义可以替换配置对象，并阻止同名发现定义
#[test]
fn test_seed_definitions() {
    let mut seeds = Definitions::new();
    seeds.insert(CONFIG_DEFINITION.to_string(), Definition::value("replaced"));
    seeds.insert("widget".to_string(), Definition::value(0_i32));

    let mut bootstrapper = Bootstrapper::new(
        json!({ "name": "ignored" }),
        seeds,
        Vec::new(),
        BuildOptions::default().without_global_injector(),
    )
    .unwrap()
    .with_linked_modules(widget_modules());
    bootstrapper.discover("modules", None).unwrap();

    let injector = bootstrapper.create_injector(Definitions::new());
    assert_eq!(*injector.get_as::<&str>(CONFIG_DEFINITION).unwrap(), "replaced");
    assert_eq!(*injector.get_as::<i32>("widget").unwrap(), 0);
    assert_eq!(bootstrapper.registry().collisions().len(), 2);
}

/// 测试模式顺序决定冲突胜出者
#[test]
fn test_pattern_order_decides_winner() {
    let modules = || {
        LinkedModuleSource::new()
            .with_module("modules/a.di.rs", || {
                ModuleExports::new().with_definition("widget", Definition::value("modules"))
            })
            .with_module("lib/a.di.rs", || {
                ModuleExports::new().with_definition("widget", Definition::value("lib"))
            })
    };

    let mut first = session(modules());
    first.discover(["lib/*.di.rs", "modules/*.di.rs"], None).unwrap();
    let mut second = session(modules());
    second.discover(["modules/*.di.rs", "lib/*.di.rs"], None).unwrap();

    let winner = |bootstrapper: &Bootstrapper| {
        *bootstrapper
            .create_injector(Definitions::new())
            .get_as::<&str>("widget")
            .unwrap()
    };
    assert_eq!(winner(&first), "lib");
    assert_eq!(winner(&second), "modules");
}

/// 测试自定义别名
#[test]
fn test_custom_alias() {
    let modules = LinkedModuleSource::new().with_module("plugins/p.rs", || {
        ModuleExports::new().with_definition("plugin", Definition::value(true))
    });
    let mut bootstrapper = Bootstrapper::new(
        json!({}),
        Definitions::new(),
        [("plugins".to_string(), PatternAlias::new("plugins/*.rs"))],
        BuildOptions::default().without_global_injector(),
    )
    .unwrap()
    .with_linked_modules(modules);

    let report = bootstrapper.discover("plugins", None).unwrap();

    assert_eq!(report.patterns, ["plugins/*.rs"]);
    assert!(bootstrapper.registry().contains("plugin"));
}

/// 测试调用时发布注入器到指定槽位
#[test]
fn test_invoke_publishes_injector() {
    let slot = "pipeline::test_invoke_publishes_injector";
    let mut bootstrapper = Bootstrapper::new(
        json!({ "name": "published" }),
        Definitions::new(),
        Vec::new(),
        BuildOptions::default().with_global_injector(slot),
    )
    .unwrap()
    .with_linked_modules(widget_modules());
    bootstrapper.discover("modules", None).unwrap();

    let seen = bootstrapper
        .invoke(
            Invocation::new(["widget"], |deps| {
                let published = published_injector(slot).map(|injector| injector.has("widget"));
                (deps.get::<i32>(0).map(|w| *w).ok(), published)
            }),
            None,
            Definitions::new(),
        )
        .unwrap();

    assert_eq!(seen, (Some(1), Some(true)));
}

/// 测试解析错误原样返回
#[test]
fn test_invoke_propagates_resolution_error() {
    let bootstrapper = session(widget_modules());

    let error = bootstrapper
        .invoke(Invocation::new(["widget"], |_| ()), None, Definitions::new())
        .unwrap_err();

    assert!(matches!(error, DependencyError::NotRegistered { ref name } if name == "widget"));
}

struct FixedMatcher(Vec<PathBuf>);

impl PathMatcher for FixedMatcher {
    fn match_paths(&self, _pattern: &str, _options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// 测试加载失败中止发现，已注册的定义保留
#[test]
fn test_load_failure_aborts_without_rollback() {
    let mut bootstrapper = session(widget_modules()).with_path_matcher(FixedMatcher(vec![
        PathBuf::from("modules/a.di.rs"),
        PathBuf::from("modules/missing.di.rs"),
        PathBuf::from("modules/b.di.rs"),
    ]));

    let error = bootstrapper.discover("anything", None).unwrap_err();

    assert!(matches!(error, DiscoveryError::ModuleNotFound { .. }));
    assert!(bootstrapper.registry().contains("widget"));
    assert!(bootstrapper.registry().collisions().is_empty());
}

/// 测试从配置创建会话并执行启动发现
#[test]
fn test_startup_discovery_from_settings() {
    let settings = BootstrapSettings {
        config: json!({ "name": "settings" }),
        discover: vec!["modules".into(), "lib/*.di.rs".into()],
        options: BuildOptions::default().without_global_injector(),
        ..BootstrapSettings::default()
    };
    let modules = widget_modules().with_module("lib/c.di.rs", || {
        ModuleExports::new().with_definition("gadget", Definition::value(3_i32))
    });

    let mut bootstrapper = Bootstrapper::from_settings(settings).unwrap().with_linked_modules(modules);
    let reports = bootstrapper.run_startup_discovery().unwrap();

    assert_eq!(reports.len(), 2);
    assert!(bootstrapper.registry().contains("widget"));
    assert!(bootstrapper.registry().contains("gadget"));
    assert!(bootstrapper.run_startup_discovery().unwrap().is_empty());
}
