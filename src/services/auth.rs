use chrono::Duration;
use serde::Serialize;

use crate::auth::{AuthenticatedUser, TokenIssuer, hash_password, random_token, sha256_hex, verify_password};
use crate::domain::types::{Email, Role};
use crate::domain::user::{NewUser, User};
use crate::forms::auth::{
    BulkUserForm, BulkUserPayload, LoginPayload, ResetPasswordPayload, SignupPayload,
};
use crate::mail::{EmailMessage, Mailer};
use crate::repository::{RepositoryError, UserReader, UserWriter};

use super::{BulkReport, ServiceError, ServiceResult, ensure_admin, now};

/// Reset links stay valid for this many minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Which accounts a login endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginScope {
    /// Storefront customers only.
    User,
    /// Back-office administrators only.
    Admin,
    /// Any account.
    Any,
}

impl LoginScope {
    fn admits(self, role: Role) -> bool {
        match self {
            LoginScope::User => role == Role::User,
            LoginScope::Admin => role == Role::Admin,
            LoginScope::Any => true,
        }
    }

    fn not_found_message(self) -> &'static str {
        match self {
            LoginScope::Admin => "Admin not found",
            LoginScope::User | LoginScope::Any => "User not found",
        }
    }
}

/// Successful login: the signed token and the account it was issued for.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

fn hash(password: &str) -> ServiceResult<String> {
    hash_password(password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })
}

pub fn signup<R>(payload: SignupPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    match repo.get_user_by_email(&payload.email) {
        Ok(Some(_)) => return Err(ServiceError::bad_request("Email already exists")),
        Ok(None) => {}
        Err(e) => return Err(ServiceError::internal("look up user", e)),
    }

    let timestamp = now();
    let user = NewUser {
        username: payload.username,
        email: payload.email,
        password_hash: hash(&payload.password)?,
        phone: payload.phone,
        role: Role::User,
        created_at: timestamp,
        updated_at: timestamp,
    };

    match repo.create_user(&user) {
        Ok(created) => {
            log::info!("Registered user {}", created.email);
            Ok(created)
        }
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::bad_request("Email already exists")),
        Err(e) => Err(ServiceError::internal("create user", e)),
    }
}

pub fn login<R>(
    payload: LoginPayload,
    scope: LoginScope,
    issuer: &TokenIssuer,
    repo: &R,
) -> ServiceResult<LoginOutcome>
where
    R: UserReader,
{
    let user = match repo.get_user_by_email(&payload.email) {
        Ok(Some(user)) if scope.admits(user.role) => user,
        Ok(_) => return Err(ServiceError::not_found(scope.not_found_message())),
        Err(e) => return Err(ServiceError::internal("look up user", e)),
    };

    if !verify_password(&payload.password, &user.password_hash) {
        log::warn!("Failed login for {}", user.email);
        return Err(ServiceError::unauthorized("Invalid credentials"));
    }

    let token = issuer.issue(&user).map_err(|e| {
        log::error!("Failed to issue session token: {e}");
        ServiceError::Internal
    })?;
    Ok(LoginOutcome { token, user })
}

/// Store a fresh reset token for `email` and mail the reset link.
pub async fn forgot_password<R>(
    email: Email,
    app_base_url: &str,
    repo: &R,
    mailer: &dyn Mailer,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    let user = match repo.get_user_by_email(&email) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::not_found("User not found")),
        Err(e) => return Err(ServiceError::internal("look up user", e)),
    };

    let token = random_token();
    let expires_at = now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    repo.set_reset_token(user.id, &sha256_hex(&token), expires_at)
        .map_err(|e| ServiceError::internal("store reset token", e))?;

    let link = format!(
        "{}/reset-password/{token}",
        app_base_url.trim_end_matches('/')
    );
    let message = EmailMessage::text(
        user.email.as_str(),
        "Password Reset Request",
        format!(
            "Hello {},\n\nUse the link below to reset your password. It expires in {RESET_TOKEN_TTL_MINUTES} minutes.\n\n{link}\n",
            user.username
        ),
    );

    mailer.send(message).await.map_err(|e| {
        log::error!("Failed to send reset email to {}: {e}", user.email);
        ServiceError::Upstream("Failed to send reset email".into())
    })
}

pub fn reset_password<R>(payload: ResetPasswordPayload, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    let user = match repo.get_user_by_reset_token(&sha256_hex(&payload.token), now()) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::bad_request("Invalid or expired reset token")),
        Err(e) => return Err(ServiceError::internal("look up reset token", e)),
    };

    repo.update_password(user.id, &hash(&payload.password)?)
        .map_err(|e| ServiceError::internal("update password", e))?;
    log::info!("Password reset for {}", user.email);
    Ok(())
}

pub fn list_users<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<User>>
where
    R: UserReader,
{
    ensure_admin(user)?;
    repo.list_users()
        .map_err(|e| ServiceError::internal("list users", e))
}

/// Create many accounts at once. Rows without a password get a random one;
/// invalid rows and taken emails are reported and skipped.
pub fn import_users<R>(
    rows: Vec<BulkUserForm>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<BulkReport<User>>
where
    R: UserReader + UserWriter,
{
    ensure_admin(user)?;

    if rows.is_empty() {
        return Err(ServiceError::bad_request(
            "Users array is required and cannot be empty.",
        ));
    }

    let mut report = BulkReport::default();
    for (index, row) in rows.into_iter().enumerate() {
        let payload = match BulkUserPayload::try_from(row) {
            Ok(payload) => payload,
            Err(e) => {
                report.skip(index, e.to_string());
                continue;
            }
        };

        match repo.get_user_by_email(&payload.email) {
            Ok(Some(_)) => {
                report.skip(index, format!("Email {} already exists", payload.email));
                continue;
            }
            Ok(None) => {}
            Err(e) => return Err(ServiceError::internal("look up user", e)),
        }

        let password = payload.password.unwrap_or_else(random_token);
        let timestamp = now();
        let account = NewUser {
            username: payload.username,
            email: payload.email,
            password_hash: hash(&password)?,
            phone: payload.phone,
            role: payload.role,
            created_at: timestamp,
            updated_at: timestamp,
        };

        match repo.create_user(&account) {
            Ok(created) => report.created.push(created),
            Err(RepositoryError::Conflict(_)) => {
                report.skip(index, format!("Email {} already exists", account.email));
            }
            Err(e) => return Err(ServiceError::internal("import user", e)),
        }
    }

    if report.created.is_empty() {
        return Err(ServiceError::bad_request("No valid users provided."));
    }
    log::info!(
        "Imported {} users, skipped {}",
        report.created.len(),
        report.skipped.len()
    );
    Ok(report)
}
