use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{EducafricError, Result};
use crate::models::users::{CreateUserRequest, UserRole};
use crate::services::sandbox::seed_sandbox;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::password::hash_password;

const DEFAULT_ADMIN_EMAIL: &str = "admin@educafric.com";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例；配置的后端不可用时回退到进程内 Moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to in-memory cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(EducafricError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 从数据库加载动态配置，失败时回退到静态配置
async fn init_dynamic_config(storage: &Arc<dyn Storage>) {
    match storage.list_all_settings().await {
        Ok(settings) => {
            DynamicConfig::init(settings.into_iter().map(|s| (s.key, s.value)).collect()).await;
        }
        Err(e) => {
            warn!(
                "Failed to load dynamic config from database: {}, using defaults",
                e
            );
            DynamicConfig::init(vec![]).await;
        }
    }
}

/// 数据库中没有平台管理员时创建一个 SiteAdmin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let counts = storage.count_users_by_role(None).await?;
    let admins: u64 = counts
        .iter()
        .filter(|c| {
            c.role == UserRole::SiteAdmin.as_str() || c.role == UserRole::Admin.as_str()
        })
        .map(|c| c.count)
        .sum();
    if admins > 0 {
        debug!("{} platform admin(s) found, skipping admin seed", admins);
        return Ok(());
    }

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    if storage.get_user_by_email(&email).await?.is_some() {
        warn!("{} already exists with another role, skipping admin seed", email);
        return Ok(());
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let user = storage
        .create_user(CreateUserRequest {
            email,
            password_hash: hash_password(&password)?,
            first_name: "Site".to_string(),
            last_name: "Administrator".to_string(),
            role: UserRole::SiteAdmin,
            secondary_roles: vec![],
            school_id: None,
            phone: None,
            whatsapp_number: None,
            preferred_language: "fr".to_string(),
            is_test_account: false,
        })
        .await?;
    info!(
        "Default admin account created (ID: {}, email: {})",
        user.id, user.email
    );
    Ok(())
}

/// 准备服务器启动所需的存储、缓存与初始数据
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，保留已有的 provider 即可
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    init_dynamic_config(&storage).await;

    if let Err(e) = seed_admin(&storage).await {
        warn!("Failed to seed admin account: {}", e);
    }

    if AppConfig::get().sandbox.enabled {
        match seed_sandbox(&storage).await {
            Ok(()) => warn!("Sandbox mode enabled"),
            Err(e) => warn!("Failed to seed sandbox data: {}", e),
        }
    }

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.chars().count(), 16);
        assert!(!pwd.contains('0') && !pwd.contains('O') && !pwd.contains('l'));
    }
}
