//! 进程级注入器发布槽位
//!
//! `invoke` 在配置了槽位名称时把所用的注入器发布到这里，
//! 供无法显式传递注入器的代码取用。槽位按名称隔离，后发布者覆盖先发布者。

use di_impl::Injector;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

static PUBLISHED_INJECTORS: Lazy<RwLock<HashMap<String, Arc<Injector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 发布注入器，返回槽位中原有的注入器
pub fn publish_injector(slot: &str, injector: Arc<Injector>) -> Option<Arc<Injector>> {
    debug!("发布注入器 {} 到槽位 {}", injector.id(), slot);
    PUBLISHED_INJECTORS.write().insert(slot.to_string(), injector)
}

/// 获取已发布的注入器
pub fn published_injector(slot: &str) -> Option<Arc<Injector>> {
    PUBLISHED_INJECTORS.read().get(slot).cloned()
}

/// 清除槽位，返回被清除的注入器
pub fn clear_published_injector(slot: &str) -> Option<Arc<Injector>> {
    PUBLISHED_INJECTORS.write().remove(slot)
}
