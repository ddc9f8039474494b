use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::types::{OrderId, OrderStatus};
use crate::forms::orders::{CancelOrderForm, PlaceOrderForm, PlaceOrderPayload, UpdateOrderStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond, success};
use crate::services::ServiceError;
use crate::services::orders::{
    cancel_order as cancel_order_service, cancel_reasons as cancel_reasons_service,
    delete_order as delete_order_service, list_orders as list_orders_service,
    my_orders as my_orders_service, place_order as place_order_service,
    update_order_status as update_order_status_service,
};

fn order_id(raw: i32) -> Result<OrderId, ServiceError> {
    Ok(OrderId::new(raw)?)
}

#[get("/cancel-reasons")]
pub async fn cancel_reasons() -> impl Responder {
    success(StatusCode::OK, cancel_reasons_service())
}

#[post("/orders")]
pub async fn place_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PlaceOrderForm>,
) -> impl Responder {
    let payload: PlaceOrderPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        place_order_service(payload, &user, repo.get_ref()),
    )
}

#[get("/my-orders")]
pub async fn my_orders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, my_orders_service(&user, repo.get_ref()))
}

#[get("/orders")]
pub async fn list_orders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, list_orders_service(&user, repo.get_ref()))
}

#[put("/orders/{id}")]
pub async fn update_order_status(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateOrderStatusForm>,
) -> impl Responder {
    let id = match order_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };
    let status: OrderStatus = match form.try_into() {
        Ok(status) => status,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_order_status_service(id, status, &user, repo.get_ref()),
    )
}

#[delete("/orders/{id}")]
pub async fn delete_order(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match order_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };

    match delete_order_service(id, &user, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Order deleted"),
        Err(err) => error_response(err),
    }
}

#[post("/orders/{id}/cancel")]
pub async fn cancel_order(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CancelOrderForm>,
) -> impl Responder {
    let id = match order_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };
    let reason = match form.reason() {
        Ok(reason) => reason,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        cancel_order_service(id, reason, &user, repo.get_ref()),
    )
}
