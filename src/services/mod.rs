//! 业务服务层
//!
//! 每个服务以懒加载单例的形式挂在路由模块中，
//! 存储与缓存实例在请求时从 `app_data` 取得。

pub mod admin;
pub mod auth;
pub mod bulletins;
pub(crate) mod common;
pub mod commercial;
pub mod director;
pub mod files;
pub mod geolocation;
pub mod messages;
pub mod notifications;
pub mod parent;
pub mod payments;
pub mod sandbox;
pub mod student;
pub mod system;
pub mod teacher;

pub use admin::AdminService;
pub use auth::AuthService;
pub use bulletins::BulletinService;
pub use commercial::CommercialService;
pub use director::DirectorService;
pub use files::FileService;
pub use geolocation::GeolocationService;
pub use messages::MessageService;
pub use notifications::NotificationService;
pub use parent::ParentService;
pub use payments::PaymentService;
pub use sandbox::SandboxService;
pub use student::StudentService;
pub use system::SystemService;
pub use teacher::TeacherService;
