use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 占位密钥，生产环境必须替换
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-in-production", "change-me-bulletin-secret"];

/// 部署平台习惯使用的环境变量 → 配置键
const ENV_ALIASES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("STRIPE_SECRET_KEY", "stripe.secret_key"),
    ("STRIPE_WEBHOOK_SECRET", "stripe.webhook_secret"),
    ("VONAGE_API_KEY", "notifications.sms.api_key"),
    ("VONAGE_API_SECRET", "notifications.sms.api_secret"),
    ("WHATSAPP_ACCESS_TOKEN", "notifications.whatsapp.access_token"),
    ("SANDBOX_ENABLED", "sandbox.enabled"),
    ("BULLETIN_SIGNING_SECRET", "bulletin.signing_secret"),
];

impl AppConfig {
    /// 依次叠加 `config.toml`、`config.{APP_ENV}.toml`、`EDUCAFRIC_*` 与 [`ENV_ALIASES`]
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("EDUCAFRIC")
                    .separator("_")
                    .try_parsing(true),
            );
        for (var, key) in ENV_ALIASES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.normalize();
        app_config.check()?;
        Ok(app_config)
    }

    fn normalize(&mut self) {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers);
        }
        self.notifications.max_concurrency = self.notifications.max_concurrency.max(1);
        self.bulletin.batch_size = self.bulletin.batch_size.max(1);
    }

    /// 生产环境拒绝占位密钥启动
    fn check(&self) -> Result<(), ConfigError> {
        if !self.is_production() {
            return Ok(());
        }
        for (name, value) in [
            ("jwt.secret", &self.jwt.secret),
            ("bulletin.signing_secret", &self.bulletin.signing_secret),
        ] {
            if value.is_empty() || PLACEHOLDER_SECRETS.contains(&value.as_str()) {
                return Err(ConfigError::Message(format!(
                    "{name} must be set to a real secret in production"
                )));
            }
        }
        Ok(())
    }

    /// 未调用 [`AppConfig::init`] 时按需加载，失败直接退出进程
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    pub fn init() -> Result<(), ConfigError> {
        APP_CONFIG
            .set(Self::load()?)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config_loads() {
        let config = AppConfig::get();
        assert!(config.server.workers >= 1);
        assert!(config.bulletin.batch_size >= 1);
        assert_eq!(config.sandbox.email_domain, "test.educafric.com");
    }

    #[test]
    fn test_production_rejects_placeholder_secrets() {
        let mut config = AppConfig::get().clone();
        config.app.environment = "production".to_string();
        config.jwt.secret = "change-me-in-production".to_string();
        assert!(config.check().is_err());

        config.jwt.secret = "a-real-jwt-secret".to_string();
        config.bulletin.signing_secret = "a-real-bulletin-secret".to_string();
        assert!(config.check().is_ok());
    }
}
