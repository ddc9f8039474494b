use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::types::BookId;
use crate::forms::cart::{CartItemForm, CartItemPayload, RemoveItemQuery};
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::ServiceError;
use crate::services::cart::{
    add_to_cart as add_to_cart_service, clear_cart as clear_cart_service,
    get_cart as get_cart_service, remove_from_cart, update_cart as update_cart_service,
};

#[get("/getCart")]
pub async fn get_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, get_cart_service(&user, repo.get_ref()))
}

#[post("/addCart")]
pub async fn add_to_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartItemForm>,
) -> impl Responder {
    let payload: CartItemPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        add_to_cart_service(payload, &user, repo.get_ref()),
    )
}

#[put("/updateCart")]
pub async fn update_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CartItemForm>,
) -> impl Responder {
    let payload: CartItemPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_cart_service(payload, &user, repo.get_ref()),
    )
}

#[delete("/removeItem/{book_id}")]
pub async fn remove_item(
    book_id: web::Path<i32>,
    query: web::Query<RemoveItemQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let book_id = match BookId::new(book_id.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };
    let condition = match query.into_inner().condition() {
        Ok(condition) => condition,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        remove_from_cart(book_id, condition, &user, repo.get_ref()),
    )
}

#[delete("/clearCart")]
pub async fn clear_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, clear_cart_service(&user, repo.get_ref()))
}
