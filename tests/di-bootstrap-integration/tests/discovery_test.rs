//! 引导层集成测试：清单文件发现、注册、构建与调用

use di_abstractions::{Definition, Definitions, Invocation};
use di_bootstrap::{
    BootstrapSettings, Bootstrapper, BuildOptions, DefinitionSource, DiscoveryError, DiscoveryOverrides,
    ModuleOutcome, PatternAlias,
};
use di_bootstrap_integration_tests::{catalog, ModuleTree, UserRepository, UserService};
use serde_json::{json, Value};

fn module_tree() -> ModuleTree {
    let tree = ModuleTree::new();
    tree.write(
        "modules/a.di.json",
        r#"{
            "widget": ["value", 1],
            "repository": ["factory", "memory_repository"],
            "_helper": ["value", "hidden"],
            "limits": { "max": 3 }
        }"#,
    );
    tree.write(
        "modules/b.di.toml",
        r#"
widget = ["value", 2]
service = ["type", "user_service"]
"#,
    );
    tree.write("modules/thing._diOff.di.json", r#"{ "thing": ["value", "never"] }"#);
    tree.write(
        "modules/legacy.di.yaml",
        "_diOff:\n  - predicate\n  - always_disabled\nlegacy:\n  - value\n  - true\n",
    );
    tree.write("modules/notes.md", "# not a module");
    tree.write("lib/extra.di.yaml", "extra:\n  - value\n  - lib\n_diOff: false\n");
    tree
}

fn session(tree: &ModuleTree, options: BuildOptions) -> Bootstrapper {
    Bootstrapper::new(
        json!({ "name": "integration", "database": "postgres", "cwd": tree.root_str() }),
        Definitions::new(),
        Vec::new(),
        options,
    )
    .unwrap()
    .with_catalog(catalog())
}

/// 测试按别名发现清单模块
#[test]
fn test_discover_manifest_modules() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let report = bootstrapper.discover("modules", None).unwrap();

    let mut names: Vec<&str> = bootstrapper.registry().names().collect();
    names.sort_unstable();
    assert_eq!(names, ["config", "repository", "service", "widget"]);
    assert_eq!(report.duplicate_count(), 1);
    assert_eq!(report.skipped_count(), 2);
    assert!(report
        .modules
        .iter()
        .all(|(path, _)| path.extension().map_or(false, |ext| ext != "md")));
}

/// 测试先匹配到的文件胜出，冲突指向后来的文件
#[test]
fn test_collision_keeps_first_file() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());
    bootstrapper.discover("modules", None).unwrap();

    let injector = bootstrapper.create_injector(Definitions::new());
    assert_eq!(*injector.get_as::<Value>("widget").unwrap(), json!(1));

    let collision = &bootstrapper.registry().collisions()[0];
    assert_eq!(collision.name, "widget");
    assert!(collision.rejected.path().unwrap().ends_with("modules/b.di.toml"));
    assert!(collision.kept.path().unwrap().ends_with("modules/a.di.json"));
}

/// 测试禁用的模块不贡献任何定义
#[test]
fn test_disabled_modules_contribute_nothing() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let report = bootstrapper.discover("modules", None).unwrap();

    assert!(!bootstrapper.registry().contains("thing"));
    assert!(!bootstrapper.registry().contains("legacy"));
    let outcomes: Vec<&ModuleOutcome> = report
        .modules
        .iter()
        .filter(|(path, _)| {
            let name = path.file_name().unwrap().to_string_lossy();
            name.starts_with("thing") || name.starts_with("legacy")
        })
        .map(|(_, outcome)| outcome)
        .collect();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.contains(&&ModuleOutcome::SkippedByPath));
    assert!(outcomes.contains(&&ModuleOutcome::Disabled));
}

/// 测试类型和工厂定义通过注入器解析
#[test]
fn test_resolve_type_and_factory() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());
    bootstrapper.discover("modules", None).unwrap();

    let injector = bootstrapper.create_injector(Definitions::new());
    let service = injector.get_as::<UserService>("service").unwrap();
    let repository = injector.get_as::<UserRepository>("repository").unwrap();

    assert_eq!(service.app, "integration");
    assert_eq!(service.repository.source, "postgres");
    assert!(std::sync::Arc::ptr_eq(&service.repository, &repository));
}

/// 测试多个模式按顺序发现
#[test]
fn test_multiple_patterns() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let report = bootstrapper
        .discover(vec!["lib/**/*.di.*", "modules/*.di.json"], None)
        .unwrap();

    assert_eq!(report.patterns, ["lib/**/*.di.*", "modules/*.di.json"]);
    assert!(bootstrapper.registry().contains("extra"));
    assert!(bootstrapper.registry().contains("widget"));
    assert!(!bootstrapper.registry().contains("service"));
}

/// 测试调用方提供的匹配选项
#[test]
fn test_caller_overrides_cwd() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let report = bootstrapper
        .discover("*.di.yaml", Some(DiscoveryOverrides::new().cwd("lib")))
        .unwrap();

    assert_eq!(report.modules.len(), 1);
    assert!(bootstrapper.registry().contains("extra"));
}

/// 测试别名自带的匹配选项
#[test]
fn test_alias_options() {
    let tree = module_tree();
    tree.write("plugins/.hidden.di.json", r#"{ "hidden": ["value", 1] }"#);

    let mut bootstrapper = Bootstrapper::new(
        json!({ "cwd": tree.root_str() }),
        Definitions::new(),
        [(
            "plugins".to_string(),
            PatternAlias::new("plugins/*.di.json").with_options(DiscoveryOverrides::new().dot(true)),
        )],
        BuildOptions::default().without_global_injector(),
    )
    .unwrap();

    bootstrapper.discover("plugins", None).unwrap();
    assert!(bootstrapper.registry().contains("hidden"));
}

/// 测试未知提供者导致发现失败
#[test]
fn test_unknown_provider_aborts_discovery() {
    let tree = module_tree();
    tree.write("broken/a.di.json", r#"{ "clock": ["factory", "system_clock"] }"#);
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let error = bootstrapper.discover("broken/*.di.json", None).unwrap_err();
    assert!(matches!(error, DiscoveryError::UnknownProvider { ref name, .. } if name == "system_clock"));
}

/// 测试被跳过的导出中引用的未知提供者不会中止发现
#[test]
fn test_unknown_providers_in_skipped_exports() {
    let tree = ModuleTree::new();
    tree.write(
        "modules/off.di.json",
        r#"{ "_diOff": true, "clock": ["factory", "not_in_this_build"] }"#,
    );
    tree.write(
        "modules/gated.di.yaml",
        "_diOff:\n  - predicate\n  - always_disabled\nservice:\n  - type\n  - missing_type\n",
    );
    tree.write(
        "modules/private.di.json",
        r#"{ "_internal": ["factory", "nope"], "ok": ["value", 1] }"#,
    );
    tree.write(
        "modules/short.di.toml",
        "lonely = [\"value\"]\nbare = [\"factory\"]\nkept = [\"value\", 2]\n",
    );
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let report = bootstrapper.discover("modules", None).unwrap();

    let mut names: Vec<&str> = bootstrapper.registry().names().collect();
    names.sort_unstable();
    assert_eq!(names, ["config", "kept", "ok"]);
    assert_eq!(report.skipped_count(), 2);
}

/// 测试禁用判定函数未知时发现失败
#[test]
fn test_unknown_disable_predicate_aborts_discovery() {
    let tree = ModuleTree::new();
    tree.write(
        "modules/a.di.json",
        r#"{ "_diOff": ["predicate", "feature_gate"], "widget": ["value", 1] }"#,
    );
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());

    let error = bootstrapper.discover("modules", None).unwrap_err();
    assert!(matches!(
        error,
        DiscoveryError::UnknownProvider { kind: "predicate", ref name, .. } if name == "feature_gate"
    ));
    assert!(!bootstrapper.registry().contains("widget"));
}

/// 测试从配置文件启动并调用目标函数
#[test]
fn test_settings_file_end_to_end() -> anyhow::Result<()> {
    let tree = module_tree();
    let settings_path = tree.write(
        "bootstrap.json",
        &json!({
            "config": { "name": "from-settings", "cwd": tree.root_str() },
            "options": { "global_injector": "integration::test_settings_file_end_to_end" },
            "discover": ["modules"]
        })
        .to_string(),
    );

    let settings = BootstrapSettings::load_with_prefix(Some(&settings_path), "DI_BOOTSTRAP_INTEGRATION_UNUSED")?;
    let mut bootstrapper = Bootstrapper::from_settings(settings)?.with_catalog(catalog());
    bootstrapper.run_startup_discovery()?;

    let mut overrides = Definitions::new();
    overrides.insert("widget".to_string(), Definition::value(json!(99)));
    let (app, widget) = bootstrapper.invoke(
        Invocation::new(["service", "widget"], |deps| {
            let service = deps.get::<UserService>(0)?;
            let widget = deps.get::<Value>(1)?;
            Ok::<_, di_bootstrap::DependencyError>((service.app.clone(), (*widget).clone()))
        }),
        None,
        overrides,
    )??;

    assert_eq!(app, "from-settings");
    assert_eq!(widget, json!(99));

    let published = di_bootstrap::published_injector("integration::test_settings_file_end_to_end")
        .expect("注入器应已发布");
    assert!(published.has("service"));
    Ok(())
}

/// 测试定义来源
#[test]
fn test_definition_sources() {
    let tree = module_tree();
    let mut bootstrapper = session(&tree, BuildOptions::default().without_global_injector());
    bootstrapper.discover("modules", None).unwrap();

    assert_eq!(bootstrapper.registry().source_of("config"), Some(&DefinitionSource::Seed));
    let source = bootstrapper.registry().source_of("service").unwrap();
    assert!(source.path().unwrap().ends_with("modules/b.di.toml"));
}
