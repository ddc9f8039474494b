//! Session tokens, password hashing and the authenticated-user extractor.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::types::{Role, TypeConstraintError, UserId};
use crate::domain::user::User;

/// Name of the http-only cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// Claims carried by a session token and extracted from each request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub exp: i64,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let id = self
            .sub
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("user id: {}", self.sub)))?;
        UserId::new(id)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `user` valid for the configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let claims = AuthenticatedUser {
            sub: user.id.get().to_string(),
            email: user.email.as_str().to_string(),
            name: user.username.as_str().to_string(),
            phone: user.phone.as_str().to_string(),
            role: user.role,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<AuthenticatedUser>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Rejection returned by the [`AuthenticatedUser`] extractor.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
}

impl ResponseError for AuthRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthRejection> {
    let token = token_from_request(req).ok_or(AuthRejection::MissingToken)?;

    let Some(issuer) = req.app_data::<web::Data<TokenIssuer>>() else {
        log::error!("Token issuer is not registered as app data");
        return Err(AuthRejection::InvalidToken);
    };

    issuer.verify(&token).map_err(|e| {
        log::debug!("Rejected session token: {e}");
        AuthRejection::InvalidToken
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthRejection;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Session cookie holding `token`.
pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(ttl.num_seconds()))
        .finish()
}

/// Cookie that instructs the browser to drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

/// Random hex token suitable for emailed links.
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hex SHA-256 of a token; only the digest is persisted.
pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Email, PhoneNumber, UserName};
    use actix_web::test::TestRequest;
    use chrono::DateTime;

    fn sample_user() -> User {
        User {
            id: UserId::new(7).unwrap(),
            username: UserName::new("Reader").unwrap(),
            email: Email::new("reader@example.com").unwrap(),
            password_hash: String::new(),
            phone: PhoneNumber::new("555-0100").unwrap(),
            role: Role::User,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new("secret", 1);
        let token = issuer.issue(&sample_user()).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap().get(), 7);
        assert_eq!(claims.email, "reader@example.com");
        assert!(!claims.is_admin());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenIssuer::new("secret", 1).issue(&sample_user()).unwrap();
        assert!(TokenIssuer::new("other", 1).verify(&token).is_err());
    }

    #[test]
    fn passwords_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn extractor_reads_bearer_header() {
        let issuer = TokenIssuer::new("secret", 1);
        let token = issuer.issue(&sample_user()).unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(issuer))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();
        assert_eq!(authenticate(&req).unwrap().name, "Reader");
    }

    #[test]
    fn extractor_rejects_missing_token() {
        let req = TestRequest::default()
            .app_data(web::Data::new(TokenIssuer::new("secret", 1)))
            .to_http_request();
        assert!(matches!(authenticate(&req), Err(AuthRejection::MissingToken)));
    }
}
