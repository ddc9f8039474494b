use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::{AuthenticatedUser, TokenIssuer, removal_cookie, session_cookie};
use crate::domain::types::Email;
use crate::forms::auth::{
    BulkUsersForm, ForgotPasswordForm, LoginForm, LoginPayload, ResetPasswordForm,
    ResetPasswordPayload, SignupForm, SignupPayload,
};
use crate::forms::otp::{SendOtpForm, SendOtpPayload, VerifyOtpForm, VerifyOtpPayload};
use crate::mail::Mailer;
use crate::models::config::ServerConfig;
use crate::otp::OtpStore;
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond, success};
use crate::services::ServiceError;
use crate::services::auth::{
    LoginScope, forgot_password as forgot_password_service, import_users as import_users_service,
    list_users as list_users_service, login as login_service,
    reset_password as reset_password_service, signup as signup_service,
};
use crate::services::otp::{send_otp as send_otp_service, verify_otp as verify_otp_service};

#[post("/auth/signup")]
pub async fn signup(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SignupForm>,
) -> impl Responder {
    let payload: SignupPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(StatusCode::CREATED, signup_service(payload, repo.get_ref()))
}

fn login_response(
    form: LoginForm,
    scope: LoginScope,
    with_cookie: bool,
    issuer: &TokenIssuer,
    config: &ServerConfig,
    repo: &DieselRepository,
) -> HttpResponse {
    let payload: LoginPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match login_service(payload, scope, issuer, repo) {
        Ok(outcome) => {
            let mut response = success(StatusCode::OK, &outcome);
            if with_cookie {
                let cookie =
                    session_cookie(outcome.token, issuer.ttl(), config.secure_cookies);
                if let Err(e) = response.add_cookie(&cookie) {
                    log::error!("Failed to set session cookie: {e}");
                    return error_response(ServiceError::Internal);
                }
            }
            response
        }
        Err(err) => error_response(err),
    }
}

#[post("/auth/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    issuer: web::Data<TokenIssuer>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    login_response(form, LoginScope::User, true, &issuer, &config, repo.get_ref())
}

#[post("/auth/admin/login")]
pub async fn admin_login(
    repo: web::Data<DieselRepository>,
    issuer: web::Data<TokenIssuer>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    login_response(form, LoginScope::Admin, true, &issuer, &config, repo.get_ref())
}

/// Storefront login: any role, token returned in the body only.
#[post("/login")]
pub async fn storefront_login(
    repo: web::Data<DieselRepository>,
    issuer: web::Data<TokenIssuer>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    login_response(form, LoginScope::Any, false, &issuer, &config, repo.get_ref())
}

#[post("/auth/logout")]
pub async fn logout() -> impl Responder {
    let mut response = message(StatusCode::OK, "Logged out");
    if let Err(e) = response.add_cookie(&removal_cookie()) {
        log::error!("Failed to clear session cookie: {e}");
    }
    response
}

#[post("/auth/forgot-password")]
pub async fn forgot_password(
    repo: web::Data<DieselRepository>,
    mailer: web::Data<Arc<dyn Mailer>>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ForgotPasswordForm>,
) -> impl Responder {
    let email: Email = match form.try_into() {
        Ok(email) => email,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match forgot_password_service(
        email,
        &config.app_base_url,
        repo.get_ref(),
        mailer.get_ref().as_ref(),
    )
    .await
    {
        Ok(()) => message(StatusCode::OK, "Password reset link sent"),
        Err(err) => error_response(err),
    }
}

#[post("/auth/reset-password/{token}")]
pub async fn reset_password(
    token: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ResetPasswordForm>,
) -> impl Responder {
    let payload = match ResetPasswordPayload::new(token.into_inner(), form) {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match reset_password_service(payload, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Password has been reset"),
        Err(err) => error_response(err),
    }
}

#[post("/auth/reset-password")]
pub async fn reset_password_with_body_token(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ResetPasswordForm>,
) -> impl Responder {
    let payload: ResetPasswordPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match reset_password_service(payload, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Password has been reset"),
        Err(err) => error_response(err),
    }
}

#[get("/profile")]
pub async fn profile(user: AuthenticatedUser) -> impl Responder {
    success(StatusCode::OK, user)
}

#[get("/users")]
pub async fn list_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, list_users_service(&user, repo.get_ref()))
}

#[post("/users/bulk")]
pub async fn import_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkUsersForm>,
) -> impl Responder {
    respond(
        StatusCode::CREATED,
        import_users_service(form.users, &user, repo.get_ref()),
    )
}

#[post("/send-otp")]
pub async fn send_otp(
    store: web::Data<OtpStore>,
    mailer: web::Data<Arc<dyn Mailer>>,
    web::Json(form): web::Json<SendOtpForm>,
) -> impl Responder {
    let payload: SendOtpPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match send_otp_service(payload, store.get_ref(), mailer.get_ref().as_ref()).await {
        Ok(()) => message(StatusCode::OK, "OTP sent successfully"),
        Err(err) => error_response(err),
    }
}

#[post("/verify-otp")]
pub async fn verify_otp(
    store: web::Data<OtpStore>,
    web::Json(form): web::Json<VerifyOtpForm>,
) -> impl Responder {
    let payload: VerifyOtpPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match verify_otp_service(payload, store.get_ref()) {
        Ok(()) => message(StatusCode::OK, "OTP verified successfully"),
        Err(err) => error_response(err),
    }
}
