//! 访问令牌与刷新令牌
//!
//! 令牌绑定签发时的活动角色与所属学校；角色在每次请求时仍会对照数据库复核。

use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

const ISSUER: &str = "educafric";
const REFRESH_COOKIE: &str = "educafric_refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// 活动角色
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<i64>,
    pub kind: TokenKind,
    pub iss: String,
    pub exp: u64,
    pub iat: u64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::from(ErrorKind::InvalidSubject))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static [u8] {
        AppConfig::get().jwt.secret.as_bytes()
    }

    fn default_refresh_lifetime() -> chrono::Duration {
        chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
    }

    fn sign(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
        kind: TokenKind,
        lifetime: chrono::Duration,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            school_id,
            kind,
            iss: ISSUER.to_string(),
            exp: (now + lifetime).timestamp().max(0) as u64,
            iat: now.timestamp().max(0) as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret()),
        )
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
    ) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::sign(
            user_id,
            role,
            school_id,
            TokenKind::Access,
            chrono::Duration::minutes(minutes),
        )
    }

    /// 生成令牌对；`refresh_lifetime` 为空时使用默认有效期（"记住我" 时更长）
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
        refresh_lifetime: Option<chrono::Duration>,
    ) -> Result<TokenPair, JwtError> {
        let refresh_lifetime = refresh_lifetime.unwrap_or_else(Self::default_refresh_lifetime);
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role, school_id)?,
            refresh_token: Self::sign(
                user_id,
                role,
                school_id,
                TokenKind::Refresh,
                refresh_lifetime,
            )?,
        })
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        let claims = decode::<Claims>(token, &DecodingKey::from_secret(Self::secret()), &validation)?
            .claims;
        if claims.kind != expected {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// 用刷新令牌换取新的访问令牌，角色与学校沿用刷新令牌中的值
    pub fn refresh_access_token(refresh_token: &str) -> Result<String, JwtError> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        Self::generate_access_token(claims.user_id()?, &claims.role, claims.school_id)
    }

    fn cookie(value: String, max_age: actix_web::cookie::time::Duration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/api/auth")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        lifetime: Option<chrono::Duration>,
    ) -> Cookie<'static> {
        let lifetime = lifetime.unwrap_or_else(Self::default_refresh_lifetime);
        Self::cookie(
            refresh_token.to_string(),
            actix_web::cookie::time::Duration::seconds(lifetime.num_seconds()),
        )
    }

    /// 注销或刷新失败时下发的过期 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::cookie(String::new(), actix_web::cookie::time::Duration::ZERO)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_carries_role_and_school() {
        let pair = JwtUtils::generate_token_pair(42, "director", Some(3), None).unwrap();
        let access = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(access.user_id().unwrap(), 42);
        assert_eq!(access.role, "director");
        assert_eq!(access.school_id, Some(3));
        assert_eq!(access.iss, ISSUER);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let pair = JwtUtils::generate_token_pair(1, "parent", None, None).unwrap();
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_refresh_keeps_claims() {
        let pair = JwtUtils::generate_token_pair(9, "teacher", Some(5), None).unwrap();
        let access = JwtUtils::refresh_access_token(&pair.refresh_token).unwrap();
        let claims = JwtUtils::verify_access_token(&access).unwrap();
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.school_id, Some(5));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::sign(
            1,
            "student",
            None,
            TokenKind::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }
}
