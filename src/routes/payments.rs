use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::payments::{
    CreatePaymentOrderForm, CreatePaymentOrderPayload, PaymentCallbackForm, VerifyPaymentForm,
    VerifyPaymentPayload,
};
use crate::models::config::ServerConfig;
use crate::payments::PaymentGateway;
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond, success};
use crate::services::ServiceError;
use crate::services::payments::{
    WebhookOutcome, callback_page, create_checkout as create_checkout_service, handle_webhook,
    payment_status as payment_status_service, verify_payment as verify_payment_service,
};

/// Header carrying the webhook body signature.
pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[post("/order")]
pub async fn create_checkout(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CreatePaymentOrderForm>,
) -> impl Responder {
    let payload: CreatePaymentOrderPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    let result = create_checkout_service(
        payload,
        &user,
        &config.app_base_url,
        gateway.get_ref().as_ref(),
        repo.get_ref(),
    )
    .await;
    respond(StatusCode::OK, result)
}

#[post("/verify")]
pub async fn verify_payment(
    repo: web::Data<DieselRepository>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    web::Json(form): web::Json<VerifyPaymentForm>,
) -> impl Responder {
    let payload: VerifyPaymentPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        verify_payment_service(payload, gateway.get_ref().as_ref(), repo.get_ref()),
    )
}

#[post("/callback")]
pub async fn callback(web::Form(form): web::Form<PaymentCallbackForm>) -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(callback_page(&form))
}

#[post("/webhook")]
pub async fn webhook(
    req: HttpRequest,
    body: web::Bytes,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
) -> impl Responder {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match handle_webhook(&body, signature, gateway.get_ref().as_ref(), repo.get_ref()) {
        Ok(WebhookOutcome::Applied(order)) => success(StatusCode::OK, order),
        Ok(WebhookOutcome::Ignored) => message(StatusCode::OK, "Event ignored"),
        Err(err) => error_response(err),
    }
}

#[get("/order/{order_id}")]
pub async fn payment_status(
    order_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        StatusCode::OK,
        payment_status_service(&order_id, repo.get_ref()),
    )
}
