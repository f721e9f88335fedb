pub mod admin;
pub mod auth;
pub mod bulletins;
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

use actix_web::web;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use bulletins::configure_bulletin_routes;
pub use commercial::configure_commercial_routes;
pub use director::configure_director_routes;
pub use files::configure_file_routes;
pub use geolocation::configure_geolocation_routes;
pub use messages::configure_message_routes;
pub use notifications::configure_notification_routes;
pub use parent::configure_parent_routes;
pub use payments::configure_payment_routes;
pub use sandbox::configure_sandbox_routes;
pub use student::configure_student_routes;
pub use system::configure_system_routes;
pub use teacher::configure_teacher_routes;

/// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_admin_routes(cfg);
    configure_director_routes(cfg);
    configure_teacher_routes(cfg);
    configure_student_routes(cfg);
    configure_parent_routes(cfg);
    configure_bulletin_routes(cfg);
    configure_message_routes(cfg);
    configure_notification_routes(cfg);
    configure_geolocation_routes(cfg);
    configure_payment_routes(cfg);
    configure_commercial_routes(cfg);
    configure_sandbox_routes(cfg);
    configure_file_routes(cfg);
    configure_system_routes(cfg);
}
