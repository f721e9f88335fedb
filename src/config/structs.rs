use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub argon2: Argon2Config,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub sandbox: SandboxConfig,
    pub notifications: NotificationsConfig,
    pub stripe: StripeConfig,
    pub geolocation: GeolocationConfig,
    pub bulletin: BulletinConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub refresh_token_remember_me_expiry: i64,
}

/// Argon2 密码哈希参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32, // KiB
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,                // 上传目录
    pub max_size: usize,            // 单文件最大字节数
    pub allowed_types: Vec<String>, // 允许的扩展名
}

/// 沙盒（演示）模式配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    pub enabled: bool,
    pub school_name: String,
    pub email_domain: String,
}

/// 通知通道配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub max_concurrency: usize,
    pub request_timeout: u64, // 秒
    pub sms: SmsConfig,
    pub whatsapp: WhatsAppConfig,
    pub email: EmailConfig,
}

/// 短信（Vonage）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub enabled: bool,
    pub api_url: String,
    #[serde(skip_serializing, default)]
    pub api_key: String,
    #[serde(skip_serializing, default)]
    pub api_secret: String,
    pub sender: String,
}

/// WhatsApp Cloud API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    pub enabled: bool,
    pub api_url: String,
    pub phone_number_id: String,
    #[serde(skip_serializing, default)]
    pub access_token: String,
}

/// 邮件配置（仅记录投递）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub from: String,
}

/// Stripe 支付配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub api_url: String,
    #[serde(skip_serializing, default)]
    pub secret_key: String,
    #[serde(skip_serializing, default)]
    pub webhook_secret: String,
    pub currency: String,
    pub webhook_tolerance: i64, // 秒
    pub request_timeout: u64,   // 秒
}

/// 地理定位配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    pub speed_limit_kmh: f64,
    pub low_battery_threshold: i32,
}

/// 成绩单配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletinConfig {
    #[serde(skip_serializing, default)]
    pub signing_secret: String,
    pub batch_size: usize,
    pub verification_base_url: String,
}
