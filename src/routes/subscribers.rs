use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{SubscriberId, SubscriberStatus};
use crate::forms::subscribers::{
    BulkEmailForm, BulkEmailPayload, NotificationsForm, SubscriberForm, SubscriberMailForm,
    SubscriberMailPayload, SubscriberPayload, SubscriberStatusForm,
};
use crate::mail::Mailer;
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond, success};
use crate::services::ServiceError;
use crate::services::subscribers::{
    add_subscriber as add_subscriber_service, delete_subscriber as delete_subscriber_service,
    email_logs as email_logs_service, list_subscribers as list_subscribers_service,
    send_bulk_email as send_bulk_email_service, send_to_subscriber as send_to_subscriber_service,
    update_notifications as update_notifications_service, update_status as update_status_service,
};

fn subscriber_id(raw: i32) -> Result<SubscriberId, ServiceError> {
    Ok(SubscriberId::new(raw)?)
}

#[post("/subscribers/send")]
pub async fn send_to_subscriber(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<Arc<dyn Mailer>>,
    web::Json(form): web::Json<SubscriberMailForm>,
) -> impl Responder {
    let payload: SubscriberMailPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    let result =
        send_to_subscriber_service(payload, &user, repo.get_ref(), mailer.get_ref().as_ref())
            .await;
    respond(StatusCode::OK, result)
}

#[post("/subscribers")]
pub async fn add_subscriber(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SubscriberForm>,
) -> impl Responder {
    let payload: SubscriberPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        add_subscriber_service(payload, repo.get_ref()),
    )
}

#[get("/subscribers")]
pub async fn list_subscribers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        StatusCode::OK,
        list_subscribers_service(&user, repo.get_ref()),
    )
}

#[put("/subscribers/{id}/status")]
pub async fn update_status(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SubscriberStatusForm>,
) -> impl Responder {
    let id = match subscriber_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };
    let status: SubscriberStatus = match form.try_into() {
        Ok(status) => status,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_status_service(id, status, &user, repo.get_ref()),
    )
}

#[put("/subscribers/{id}/notifications")]
pub async fn update_notifications(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<NotificationsForm>,
) -> impl Responder {
    let id = match subscriber_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };

    respond(
        StatusCode::OK,
        update_notifications_service(id, form, &user, repo.get_ref()),
    )
}

#[delete("/subscribers/{id}")]
pub async fn delete_subscriber(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match subscriber_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };

    match delete_subscriber_service(id, &user, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Subscriber deleted"),
        Err(err) => error_response(err),
    }
}

/// Partial delivery answers 502 but still carries the per-recipient results.
#[post("/send-email")]
pub async fn send_bulk_email(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<Arc<dyn Mailer>>,
    web::Json(form): web::Json<BulkEmailForm>,
) -> impl Responder {
    let payload: BulkEmailPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match send_bulk_email_service(payload, &user, repo.get_ref(), mailer.get_ref().as_ref())
        .await
    {
        Ok(report) if report.failed() > 0 => HttpResponse::BadGateway().json(json!({
            "success": false,
            "message": format!("Failed to send {} of {} emails", report.failed(), report.results.len()),
            "data": report,
        })),
        Ok(report) => success(StatusCode::OK, report),
        Err(err) => error_response(err),
    }
}

#[get("/email-logs")]
pub async fn email_logs(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, email_logs_service(&user, repo.get_ref()))
}
