//! 输入校验，错误信息直接作为 API 返回的 message

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

/// E.164 数字部分 8-15 位
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("Invalid phone regex"));

/// 喀麦隆本地号码不带区号
const DEFAULT_COUNTRY_CODE: &str = "237";

const MAX_NAME_CHARS: usize = 100;
const MIN_PASSWORD_LEN: usize = 8;

/// 大小写不敏感比较
const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "qwerty123",
    "admin123",
    "abcd1234",
    "azerty123",
    "educafric1",
    "motdepasse1",
    "cameroun1",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err("Email format is invalid")
    }
}

fn compact(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect()
}

/// 允许空格、短横线与点作为分隔符
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if PHONE_RE.is_match(&compact(phone)) {
        Ok(())
    } else {
        Err("Phone number format is invalid")
    }
}

/// 规范化为 E.164；9 位及以下的本地号码补 +237，`00` 前缀换成 `+`
pub fn normalize_phone(phone: &str) -> String {
    let digits = compact(phone);
    if digits.starts_with('+') {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        format!("+{rest}")
    } else if digits.len() <= 9 {
        format!("+{DEFAULT_COUNTRY_CODE}{digits}")
    } else {
        format!("+{digits}")
    }
}

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let length = name.trim().chars().count();
    if (1..=MAX_NAME_CHARS).contains(&length) {
        Ok(())
    } else {
        Err("Name must be between 1 and 100 characters")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    TooCommon,
}

impl PasswordIssue {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooShort => "Password must be at least 8 characters long",
            Self::MissingUppercase => "Password must contain at least one uppercase letter",
            Self::MissingLowercase => "Password must contain at least one lowercase letter",
            Self::MissingDigit => "Password must contain at least one digit",
            Self::TooCommon => "Password is too common, please choose a stronger password",
        }
    }
}

/// 列出密码不满足的全部规则，空表示通过
pub fn password_issues(password: &str) -> Vec<PasswordIssue> {
    let checks = [
        (
            password.chars().count() < MIN_PASSWORD_LEN,
            PasswordIssue::TooShort,
        ),
        (
            !password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordIssue::MissingUppercase,
        ),
        (
            !password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordIssue::MissingLowercase,
        ),
        (
            !password.chars().any(|c| c.is_ascii_digit()),
            PasswordIssue::MissingDigit,
        ),
        (
            COMMON_PASSWORDS
                .iter()
                .any(|weak| password.eq_ignore_ascii_case(weak)),
            PasswordIssue::TooCommon,
        ),
    ];
    checks
        .into_iter()
        .filter_map(|(failed, issue)| failed.then_some(issue))
        .collect()
}

/// 不满足时返回以 `; ` 连接的全部原因
pub fn validate_password(password: &str) -> Result<(), String> {
    let issues = password_issues(password);
    if issues.is_empty() {
        return Ok(());
    }
    Err(issues
        .iter()
        .map(PasswordIssue::message)
        .collect::<Vec<_>>()
        .join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("parent@educafric.com").is_ok());
        assert!(validate_email("a.b+c@mail.school.cm").is_ok());
        assert!(validate_email("parent@educafric").is_err());
        assert!(validate_email("parent@edu|cafric.com").is_err());
    }

    #[test]
    fn test_phone_formats() {
        assert!(validate_phone("+237 677 12 34 56").is_ok());
        assert!(validate_phone("677-12-34-56").is_ok());
        assert!(validate_phone("abc").is_err());
        assert_eq!(normalize_phone("677 12 34 56"), "+237677123456");
        assert_eq!(normalize_phone("00237677123456"), "+237677123456");
        assert_eq!(normalize_phone("+33 6 12 34 56 78"), "+33612345678");
    }

    #[test]
    fn test_names() {
        assert!(validate_name("Ngo Bassa").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"é".repeat(101)).is_err());
    }

    #[test]
    fn test_strong_passwords() {
        assert!(validate_password("SecureP@ss1").is_ok());
        assert!(validate_password("Yaounde2025").is_ok());
    }

    #[test]
    fn test_each_rule_is_reported() {
        assert_eq!(
            password_issues("ab1"),
            vec![PasswordIssue::TooShort, PasswordIssue::MissingUppercase]
        );
        assert_eq!(password_issues("ABCD1234"), vec![PasswordIssue::MissingLowercase]);
        assert_eq!(password_issues("AbcdEfgh"), vec![PasswordIssue::MissingDigit]);
        assert_eq!(password_issues("Cameroun1"), vec![PasswordIssue::TooCommon]);
    }

    #[test]
    fn test_message_joins_reasons() {
        let message = validate_password("abcdefgh").unwrap_err();
        assert!(message.contains("uppercase"));
        assert!(message.contains("; "));
    }
}
