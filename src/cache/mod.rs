//! 缓存层
//!
//! 后端以插件形式在加载期注册（见 `declare_object_cache_plugin!`），
//! 启动时按 `cache.type` 选择，失败时回退到 moka。

pub mod object_cache {
    pub mod moka;
    pub mod redis;
}
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 已认证用户的缓存键
pub fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}

/// 声明缓存插件，进程加载时自动注册到全局表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[::ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                ::std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::EducafricError::cache_connection)?;
                        let boxed: Box<dyn $crate::cache::ObjectCache> = Box::new(cache);
                        Ok::<_, $crate::errors::EducafricError>(boxed)
                    })
                }),
            );
        }
    };
}
