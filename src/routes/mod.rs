//! HTTP handlers. Every route answers JSON of the shape
//! `{"success": bool, "data" | "message": ...}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, error, get, web};
use serde::Serialize;
use serde_json::json;

use crate::API_PREFIX;
use crate::services::{ServiceError, ServiceResult};

pub mod auth;
pub mod book_requests;
pub mod books;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod settings;
pub mod subscribers;

/// Map a service failure to its HTTP status and JSON body.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let status = match &err {
        ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) | ServiceError::BadRequest(_) => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        ServiceError::Internal => "Internal server error".to_string(),
        other => other.to_string(),
    };
    HttpResponse::build(status).json(json!({ "success": false, "message": message }))
}

pub fn success<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "success": true, "data": data }))
}

pub fn message(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "success": true, "message": message }))
}

/// Render a service result, using `status` on success.
pub fn respond<T: Serialize>(status: StatusCode, result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(data) => success(status, data),
        Err(err) => error_response(err),
    }
}

fn bad_request_body(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "success": false, "message": message }))
}

/// Extractor settings that turn malformed bodies, queries and paths into the
/// usual JSON error shape.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request_body(err.to_string());
        error::InternalError::from_response(err, response).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request_body(err.to_string());
        error::InternalError::from_response(err, response).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let response = bad_request_body(err.to_string());
        error::InternalError::from_response(err, response).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        let response = bad_request_body(err.to_string());
        error::InternalError::from_response(err, response).into()
    }));
}

#[get("/test")]
pub async fn liveness() -> impl Responder {
    message(StatusCode::OK, "Bookstore API is running")
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": format!("Route {} not found", req.path()),
    }))
}

/// Register every handler under [`API_PREFIX`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);
    cfg.service(
        web::scope(API_PREFIX)
            .service(liveness)
            // auth
            .service(auth::signup)
            .service(auth::login)
            .service(auth::admin_login)
            .service(auth::storefront_login)
            .service(auth::logout)
            .service(auth::forgot_password)
            .service(auth::reset_password)
            .service(auth::reset_password_with_body_token)
            .service(auth::profile)
            .service(auth::list_users)
            .service(auth::import_users)
            .service(auth::send_otp)
            .service(auth::verify_otp)
            // categories: tag routes first so `{path}` does not swallow them
            .service(categories::add_tag)
            .service(categories::remove_tag)
            .service(categories::create_category)
            .service(categories::category_tree)
            .service(categories::delete_all_categories)
            .service(categories::get_category)
            .service(categories::update_category)
            .service(categories::delete_category)
            // books: fixed segments, then numeric `{id}`, then category paths
            .service(books::search_books)
            .service(books::books_in_category_alias)
            .service(books::best_sellers)
            .service(books::new_arrivals)
            .service(books::import_books)
            .service(books::list_books)
            .service(books::delete_all_books)
            .service(books::get_book)
            .service(books::delete_book)
            .service(books::books_in_category)
            .service(books::update_book)
            .service(books::create_book)
            // cart
            .service(cart::get_cart)
            .service(cart::add_to_cart)
            .service(cart::update_cart)
            .service(cart::remove_item)
            .service(cart::clear_cart)
            // orders
            .service(orders::cancel_reasons)
            .service(orders::place_order)
            .service(orders::my_orders)
            .service(orders::list_orders)
            .service(orders::update_order_status)
            .service(orders::delete_order)
            .service(orders::cancel_order)
            // payments
            .service(payments::create_checkout)
            .service(payments::verify_payment)
            .service(payments::callback)
            .service(payments::webhook)
            .service(payments::payment_status)
            // reviews
            .service(reviews::create_review)
            .service(reviews::list_reviews)
            .service(reviews::approved_reviews)
            .service(reviews::get_review)
            .service(reviews::update_review)
            .service(reviews::delete_review)
            // book requests
            .service(book_requests::create_book_request)
            .service(book_requests::my_book_requests)
            .service(book_requests::list_book_requests)
            // subscribers
            .service(subscribers::send_to_subscriber)
            .service(subscribers::add_subscriber)
            .service(subscribers::list_subscribers)
            .service(subscribers::update_status)
            .service(subscribers::update_notifications)
            .service(subscribers::delete_subscriber)
            .service(subscribers::send_bulk_email)
            .service(subscribers::email_logs)
            // settings
            .service(settings::create_settings)
            .service(settings::get_settings)
            .service(settings::update_settings)
            .service(settings::delete_settings),
    )
    .default_service(web::to(not_found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (ServiceError::forbidden("x"), StatusCode::FORBIDDEN),
            (ServiceError::not_found("x"), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Form("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(err).status(), status);
        }
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let body = body_json(error_response(ServiceError::Internal)).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Internal server error");
    }
}
