//! EDUCAFRIC 学校管理平台后端
//!
//! 一个进程服务多所学校：每个请求经 JWT 认证后携带活动角色与所属学校，
//! 业务层据此限定可见数据。学校、班级、成绩、考勤与成绩单流转在
//! `services` 中实现，持久化统一走 `storage::Storage`（SeaORM），
//! 短信、WhatsApp 与 Stripe 等外部服务只在 `services` 内部调用。
//!
//! 请求路径：`routes` → `middlewares`（认证、角色、限流）→ `services` → `storage`。

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
