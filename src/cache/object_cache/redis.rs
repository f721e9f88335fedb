//! Redis 缓存后端，供多实例部署共享

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tracing::{debug, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis = &config.cache.redis;
        let client = redis::Client::open(redis.url.as_str())
            .map_err(|e| format!("invalid redis url {}: {e}", redis.url))?;

        // 启动时探测一次，不可用则让调用方回退到内存缓存
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("redis unreachable at {}: {e}", redis.url))?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| format!("redis ping failed: {e}"))?;

        debug!(
            "Redis cache ready (prefix '{}', ttl {}s)",
            redis.key_prefix, config.cache.default_ttl
        );
        Ok(Self {
            client,
            key_prefix: redis.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Redis connection unavailable: {}", e);
                None
            }
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };
        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                warn!("Redis GET {} failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn.set_ex::<_, _, ()>(self.key(&key), value, ttl).await {
            warn!("Redis SETEX {} failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, i64>(self.key(key)).await {
            warn!("Redis DEL {} failed: {}", key, e);
        }
    }

    /// 只清理本应用前缀下的键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Redis KEYS {} failed: {}", pattern, e);
                return;
            }
        };
        if keys.is_empty() {
            return;
        }
        match conn.del::<_, i64>(keys).await {
            Ok(count) => debug!("Invalidated {} cached keys", count),
            Err(e) => warn!("Redis cache invalidation failed: {}", e),
        }
    }
}
