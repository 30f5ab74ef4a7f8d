//! 引导配置
//!
//! 从可选的配置文件和环境变量加载引导层配置。环境变量使用
//! `DI_BOOTSTRAP_` 前缀，层级之间用 `__` 分隔，例如
//! `DI_BOOTSTRAP_OPTIONS__GLOBAL_INJECTOR=app`。
//!
//! 注意：`config` crate 会把所有键转换为小写。

use crate::aliases::{PatternAlias, Patterns};
use crate::logging::LoggingConfig;
use crate::options::BuildOptions;
use bootstrap_common::{ConfigError, ConfigResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DI_BOOTSTRAP";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// 引导层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    /// 以 `config` 名称预置的配置对象
    pub config: serde_json::Value,
    /// 附加的模式别名
    pub aliases: IndexMap<String, PatternAlias>,
    /// 构建选项
    pub options: BuildOptions,
    /// 启动时依次执行发现的模式或别名
    pub discover: Vec<Patterns>,
    /// 日志配置
    pub logging: LoggingConfig,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            config: empty_config(),
            aliases: IndexMap::new(),
            options: BuildOptions::default(),
            discover: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BootstrapSettings {
    /// 从配置文件和 `DI_BOOTSTRAP_` 环境变量加载
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    /// 使用指定的环境变量前缀加载
    ///
    /// 文件格式按扩展名识别（TOML / JSON / YAML）。指定的文件必须存在。
    pub fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            debug!("加载引导配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;

        let mut settings: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;

        if settings.config.is_null() {
            settings.config = empty_config();
        }
        Ok(settings)
    }
}
