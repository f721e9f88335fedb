//! 业务层错误
//!
//! 每个变体带一个稳定的错误代码（`E0xx`，写入日志便于检索）和一条详情。
//! 转换为 HTTP 响应的规则在 `services::common`。

use std::fmt;

/// 生成枚举、`code()`/`error_type()`/`message()` 以及 snake_case 构造函数
macro_rules! define_educafric_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EducafricError {
            $($variant(String),)*
        }

        impl EducafricError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(EducafricError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EducafricError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(EducafricError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl EducafricError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EducafricError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_educafric_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Resource Conflict"),
    InvalidTransition("E014", "Invalid State Transition"),
    ExternalService("E015", "External Service Error"),
}

impl EducafricError {
    /// 开发环境终端日志
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EducafricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EducafricError {}

impl From<sea_orm::DbErr> for EducafricError {
    fn from(err: sea_orm::DbErr) -> Self {
        EducafricError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EducafricError {
    fn from(err: std::io::Error) -> Self {
        EducafricError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EducafricError {
    fn from(err: serde_json::Error) -> Self {
        EducafricError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EducafricError {
    fn from(err: chrono::ParseError) -> Self {
        EducafricError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for EducafricError {
    fn from(err: reqwest::Error) -> Self {
        EducafricError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EducafricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EducafricError::cache_connection("test").code(), "E001");
        assert_eq!(EducafricError::database_config("test").code(), "E003");
        assert_eq!(EducafricError::validation("test").code(), "E007");
        assert_eq!(EducafricError::authentication("test").code(), "E011");
        assert_eq!(EducafricError::conflict("test").code(), "E013");
        assert_eq!(EducafricError::external_service("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EducafricError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            EducafricError::validation("test").error_type(),
            "Validation Error"
        );
        assert_eq!(
            EducafricError::conflict("test").error_type(),
            "Resource Conflict"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EducafricError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = EducafricError::invalid_transition("draft -> published");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid State Transition"));
        assert!(formatted.contains("draft -> published"));
    }

    #[test]
    fn test_db_error_conversion() {
        let err: EducafricError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }
}
