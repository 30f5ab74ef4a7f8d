//! 定义（Definition）数据模型
//!
//! 一个定义是带标签的记录 `(kind, payload)`，描述如何得到一个可注入的实例：
//! 直接使用值、调用工厂函数，或构造一个类型。

use bootstrap_common::DependencyError;
use std::any::{type_name, Any};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 已解析的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 定义名称到定义的映射，保留注册顺序
pub type Definitions = indexmap::IndexMap<String, Definition>;

/// 提供者构造函数类型
pub type ProviderFn = Arc<dyn Fn(&Dependencies) -> Result<Instance, DependencyError> + Send + Sync>;

/// 定义种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// 可构造的类型，依赖在构造时注入
    Type,
    /// 工厂函数，声明的参数名作为依赖解析
    Factory,
    /// 原样使用的值
    Value,
}

impl DefinitionKind {
    /// 全部可识别的种类
    pub const ALL: [DefinitionKind; 3] = [Self::Type, Self::Factory, Self::Value];

    /// 种类标签
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Factory => "factory",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// 不可识别的定义种类标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知的定义种类: {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// 工厂或类型的提供者
///
/// 携带名称、声明的依赖名称列表和构造函数。
#[derive(Clone)]
pub struct Provider {
    name: String,
    dependencies: Vec<String>,
    create: ProviderFn,
}

impl Provider {
    /// 创建新的提供者
    pub fn new<I, S, F, T>(name: impl Into<String>, dependencies: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Dependencies) -> Result<T, DependencyError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            create: Arc::new(move |deps: &Dependencies| create(deps).map(|value| Arc::new(value) as Instance)),
        }
    }

    /// 从实现了 [`Injectable`] 的类型创建提供者
    pub fn of_type<T: Injectable>() -> Self {
        Self::new(type_name::<T>(), T::DEPENDENCIES.iter().copied(), T::construct)
    }

    /// 提供者名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明的依赖名称
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// 使用已解析的依赖创建实例
    pub fn create(&self, dependencies: &Dependencies) -> Result<Instance, DependencyError> {
        (self.create)(dependencies)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("create", &"<function>")
            .finish()
    }
}

/// 可注入类型 trait
///
/// 对应 `type` 定义：声明依赖名称，并由注入器在构造时传入。
pub trait Injectable: Any + Send + Sync + Sized {
    /// 依赖名称，顺序与 [`Dependencies`] 中的索引一致
    const DEPENDENCIES: &'static [&'static str];

    /// 使用已解析的依赖构造实例
    fn construct(dependencies: &Dependencies) -> Result<Self, DependencyError>;
}

/// 定义
#[derive(Clone)]
pub enum Definition {
    /// 原样使用的值
    Value(Instance),
    /// 工厂函数
    Factory(Provider),
    /// 可构造类型
    Type(Provider),
}

impl Definition {
    /// 创建值定义
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }

    /// 使用已有实例创建值定义
    pub fn instance(instance: Instance) -> Self {
        Self::Value(instance)
    }

    /// 创建工厂定义
    pub fn factory<I, S, F, T>(name: impl Into<String>, dependencies: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Dependencies) -> Result<T, DependencyError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::Factory(Provider::new(name, dependencies, create))
    }

    /// 创建类型定义
    pub fn of_type<T: Injectable>() -> Self {
        Self::Type(Provider::of_type::<T>())
    }

    /// 定义种类
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Value(_) => DefinitionKind::Value,
            Self::Factory(_) => DefinitionKind::Factory,
            Self::Type(_) => DefinitionKind::Type,
        }
    }

    /// 声明的依赖名称，值定义没有依赖
    pub fn dependencies(&self) -> &[String] {
        match self {
            Self::Value(_) => &[],
            Self::Factory(provider) | Self::Type(provider) => provider.dependencies(),
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Value(<instance>)"),
            Self::Factory(provider) => f.debug_tuple("Factory").field(provider).finish(),
            Self::Type(provider) => f.debug_tuple("Type").field(provider).finish(),
        }
    }
}

/// 按声明顺序解析好的依赖
#[derive(Clone, Default)]
pub struct Dependencies {
    names: Vec<String>,
    instances: Vec<Instance>,
}

impl Dependencies {
    /// 创建依赖列表
    pub fn new(names: Vec<String>, instances: Vec<Instance>) -> Self {
        debug_assert_eq!(names.len(), instances.len());
        Self { names, instances }
    }

    /// 依赖数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 是否没有依赖
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// 按索引获取原始实例
    pub fn instance(&self, index: usize) -> Result<&Instance, DependencyError> {
        self.instances.get(index).ok_or(DependencyError::MissingArgument {
            index,
            len: self.instances.len(),
        })
    }

    /// 按索引获取并转换为具体类型
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, DependencyError> {
        let instance = self.instance(index)?.clone();
        instance
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: self.names.get(index).cloned().unwrap_or_default(),
                expected: type_name::<T>(),
            })
    }

    /// 按名称获取并转换为具体类型
    pub fn by_name<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        let index = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DependencyError::not_registered(name))?;
        self.get(index)
    }

    /// 依赖名称
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
