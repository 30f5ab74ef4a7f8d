//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("定义未注册: {name}")]
    NotRegistered { name: String },

    #[error("实例创建失败: {name}, 原因: {source}")]
    CreationFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("类型不匹配: {name}, 期望类型 {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("依赖参数缺失: 索引 {index} 超出 {len} 个已解析依赖")]
    MissingArgument { index: usize, len: usize },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered(name: impl Into<String>) -> Self {
        Self::NotRegistered { name: name.into() }
    }

    /// 包装实例创建过程中产生的错误
    pub fn creation_failed(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::CreationFailed {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// 模块发现错误类型
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("无效的匹配模式: {pattern}, 原因: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("路径匹配失败: {}, 原因: {source}", .path.display())]
    MatchFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("模块读取失败: {}, 原因: {source}", .path.display())]
    ModuleRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("模块解析失败: {}, 原因: {message}", .path.display())]
    ModuleParse { path: PathBuf, message: String },

    #[error("不支持的模块格式: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("模块 {} 引用了未知的{kind}: {name}", .path.display())]
    UnknownProvider {
        path: PathBuf,
        kind: &'static str,
        name: String,
    },

    #[error("模块导出无效: {}, 原因: {message}", .path.display())]
    InvalidExports { path: PathBuf, message: String },

    #[error("模块未找到: {}", .path.display())]
    ModuleNotFound { path: PathBuf },
}

impl DiscoveryError {
    /// 创建模块解析错误
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ModuleParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// 出错模块的路径（匹配模式错误时为空）
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::InvalidPattern { .. } => None,
            Self::MatchFailed { path, .. }
            | Self::ModuleRead { path, .. }
            | Self::ModuleParse { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::UnknownProvider { path, .. }
            | Self::InvalidExports { path, .. }
            | Self::ModuleNotFound { path } => Some(path),
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置值无效: {key}, 原因: {message}")]
    InvalidValue { key: String, message: String },

    #[error("无法确定工作目录: {source}")]
    WorkingDirectory {
        #[from]
        source: std::io::Error,
    },
}

/// 引导层错误类型
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("模块发现错误: {source}")]
    Discovery {
        #[from]
        source: DiscoveryError,
    },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    #[error("日志初始化失败: {message}")]
    Logging { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type BootstrapResult<T> = Result<T, BootstrapError>;
