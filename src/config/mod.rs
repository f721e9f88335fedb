//! 配置管理
//!
//! 静态配置来自 config.toml、环境特定文件和环境变量；
//! 运行时可变的配置见 `services::system::DynamicConfig`。

mod r#impl;
mod structs;

pub use structs::*;
