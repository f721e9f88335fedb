//! 缓存后端注册表
//!
//! 各后端通过 `declare_object_cache_plugin!` 在加载期写入，启动时按名称取出构造器。

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::cache::traits::ObjectCache;
use crate::errors::Result;

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

/// 按名称排序，便于日志输出稳定
static BACKENDS: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    // 注册发生在 ctor 中，锁中毒时沿用内部数据
    BACKENDS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&name.to_ascii_lowercase())
        .cloned()
}

pub fn registered_backends() -> Vec<String> {
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

pub fn debug_object_cache_registry() {
    let names = registered_backends();
    if names.is_empty() {
        tracing::debug!("No cache backends registered");
    } else {
        tracing::debug!("Cache backends available: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_are_registered() {
        let names = registered_backends();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert!(get_object_cache_plugin("Moka").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
