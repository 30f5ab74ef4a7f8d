//! 模式别名
//!
//! 把简短的别名映射为具体的发现模式和选项。

use crate::options::DiscoveryOverrides;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 一个或多个发现模式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    /// 单个模式或别名
    One(String),
    /// 模式序列
    Many(Vec<String>),
}

impl Patterns {
    /// 转换为模式序列
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        }
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Self::One(pattern.to_string())
    }
}

impl From<String> for Patterns {
    fn from(pattern: String) -> Self {
        Self::One(pattern)
    }
}

impl From<Vec<String>> for Patterns {
    fn from(patterns: Vec<String>) -> Self {
        Self::Many(patterns)
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(patterns: Vec<&str>) -> Self {
        Self::Many(patterns.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Patterns {
    fn from(patterns: [&str; N]) -> Self {
        Self::Many(patterns.into_iter().map(str::to_string).collect())
    }
}

/// 模式别名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternAlias {
    /// 别名对应的模式
    pub patterns: Patterns,
    /// 别名自带的匹配选项
    #[serde(default)]
    pub options: Option<DiscoveryOverrides>,
}

impl PatternAlias {
    /// 创建别名
    pub fn new(patterns: impl Into<Patterns>) -> Self {
        Self {
            patterns: patterns.into(),
            options: None,
        }
    }

    /// 设置别名自带的选项
    pub fn with_options(mut self, options: DiscoveryOverrides) -> Self {
        self.options = Some(options);
        self
    }
}

/// 别名解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPatterns {
    /// 展开后的模式序列
    pub patterns: Vec<String>,
    /// 生效的覆盖选项
    pub options: Option<DiscoveryOverrides>,
    /// 命中的别名
    pub alias: Option<String>,
}

/// 模式别名解析器
///
/// 只有单个字符串输入才会尝试别名查找，且只查一层（别名不会再指向别名）。
///
/// **未知的字符串不是错误**：查找失败时原样作为字面模式使用。
/// 因此别名拼写错误不会报错，只会匹配到（通常为空的）字面路径；
/// 查找未命中会在 `debug` 级别记录，便于排查。
#[derive(Debug, Clone)]
pub struct PatternAliasResolver {
    aliases: IndexMap<String, PatternAlias>,
}

impl PatternAliasResolver {
    /// 内置别名：`common`、`lib`、`modules`
    pub fn builtin() -> Self {
        let aliases = [
            ("common", "**/*.di.*"),
            ("lib", "lib/**/*.di.*"),
            ("modules", "modules/**/*.di.*"),
        ]
        .into_iter()
        .map(|(name, pattern)| (name.to_string(), PatternAlias::new(pattern)))
        .collect();

        Self { aliases }
    }

    /// 在内置别名上添加或覆盖别名
    pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = (String, PatternAlias)>) -> Self {
        for (name, alias) in aliases {
            self.insert(name, alias);
        }
        self
    }

    /// 添加或覆盖别名
    pub fn insert(&mut self, name: impl Into<String>, alias: PatternAlias) {
        self.aliases.insert(name.into(), alias);
    }

    /// 获取别名
    pub fn get(&self, name: &str) -> Option<&PatternAlias> {
        self.aliases.get(name)
    }

    /// 所有别名名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    /// 解析模式或别名
    ///
    /// 命中别名时使用别名的模式；调用方没有提供选项时才使用别名自带的选项。
    pub fn resolve(&self, input: Patterns, options: Option<DiscoveryOverrides>) -> ResolvedPatterns {
        if let Patterns::One(name) = &input {
            match self.aliases.get(name) {
                Some(alias) => {
                    debug!("模式别名 {} 展开为 {:?}", name, alias.patterns);
                    return ResolvedPatterns {
                        patterns: alias.patterns.clone().into_vec(),
                        options: options.or_else(|| alias.options.clone()),
                        alias: Some(name.clone()),
                    };
                }
                None => debug!("{} 不是已知别名，按字面模式处理", name),
            }
        }

        ResolvedPatterns {
            patterns: input.into_vec(),
            options,
            alias: None,
        }
    }
}

impl Default for PatternAliasResolver {
    fn default() -> Self {
        Self::builtin()
    }
}
