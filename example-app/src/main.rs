//! # 示例应用程序
//!
//! 演示引导层的完整流程：加载引导配置、发现模块、列出定义、调用目标函数。

use anyhow::Context;
use clap::Parser;
use di_abstractions::{Definitions, Dependencies, Invocation};
use di_bootstrap::{init_logging, BootstrapSettings, Bootstrapper, LoggingConfig, ProviderCatalog};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn DI 引导层示例应用")]
struct Args {
    /// 引导配置文件路径
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// 额外发现的模式或别名，按顺序执行
    patterns: Vec<String>,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 使用开发环境日志配置
    #[arg(long)]
    dev: bool,
}

/// 示例问候服务
#[derive(Debug)]
struct Greeter {
    app: String,
    greeting: String,
}

impl Greeter {
    fn greet(&self, who: &str) -> String {
        format!("[{}] {}, {}!", self.app, self.greeting, who)
    }
}

/// 示例模块引用的提供者
fn catalog() -> ProviderCatalog {
    ProviderCatalog::new()
        .with_factory("greeter", ["config", "greeting"], |deps: &Dependencies| {
            let config = deps.get::<Value>(0)?;
            let greeting = deps.get::<Value>(1)?;
            Ok(Greeter {
                app: config
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("example-app")
                    .to_string(),
                greeting: greeting.as_str().unwrap_or("Hello").to_string(),
            })
        })
        .with_predicate("experimental_disabled", || std::env::var_os("EXAMPLE_EXPERIMENTAL").is_none())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = BootstrapSettings::load(args.settings.as_deref()).context("加载引导配置失败")?;

    let mut logging = if args.dev {
        LoggingConfig::development()
    } else {
        settings.logging.clone()
    };
    if let Some(level) = &args.log_level {
        logging = logging.with_level(level.as_str());
    }
    init_logging(&logging)?;

    info!("启动 Lorn DI 引导层示例应用");

    let mut bootstrapper = Bootstrapper::from_settings(settings)?.with_catalog(catalog());

    for report in bootstrapper.run_startup_discovery()? {
        info!("启动发现 {:?}: 注册 {} 个定义", report.patterns, report.registered_count());
    }
    for pattern in &args.patterns {
        let report = bootstrapper
            .discover(pattern.as_str(), None)
            .with_context(|| format!("发现失败: {}", pattern))?;
        info!("发现 {:?}: 注册 {} 个定义", report.patterns, report.registered_count());
    }

    list_definitions(&bootstrapper);

    if bootstrapper.registry().contains("greeter") {
        let message = bootstrapper.invoke(
            Invocation::new(["greeter"], |deps| {
                deps.get::<Greeter>(0).map(|greeter| greeter.greet("world"))
            }),
            None,
            Definitions::new(),
        )??;
        println!("{}", message);
    } else {
        warn!("未发现 greeter 定义，跳过调用");
    }

    let name = bootstrapper.invoke(
        Invocation::new(["config"], |deps| {
            deps.get::<Value>(0)
                .map(|config| config.get("name").cloned().unwrap_or(Value::Null))
        }),
        None,
        Definitions::new(),
    )??;
    info!("应用名称: {}", name);

    Ok(())
}

/// 列出已注册的定义及其来源
fn list_definitions(bootstrapper: &Bootstrapper) {
    let registry = bootstrapper.registry();
    println!("已注册 {} 个定义:", registry.len());
    for name in registry.names() {
        let kind = registry
            .get(name)
            .map(|definition| definition.kind().to_string())
            .unwrap_or_default();
        let source = registry
            .source_of(name)
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("  {:<16} {:<8} {}", name, kind, source);
    }

    for collision in registry.collisions() {
        println!("  冲突: {} 已定义于 {}，忽略 {}", collision.name, collision.kept, collision.rejected);
    }
}
