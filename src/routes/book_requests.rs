use actix_web::http::StatusCode;
use actix_web::{Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::book_requests::{BookRequestForm, BookRequestPayload};
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::ServiceError;
use crate::services::book_requests::{
    create_book_request as create_book_request_service,
    list_book_requests as list_book_requests_service,
    my_book_requests as my_book_requests_service,
};

#[post("/book-requests")]
pub async fn create_book_request(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BookRequestForm>,
) -> impl Responder {
    let payload: BookRequestPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        create_book_request_service(payload, &user, repo.get_ref()),
    )
}

#[get("/my-book-requests")]
pub async fn my_book_requests(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        StatusCode::OK,
        my_book_requests_service(&user, repo.get_ref()),
    )
}

#[get("/book-requests")]
pub async fn list_book_requests(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        StatusCode::OK,
        list_book_requests_service(&user, repo.get_ref()),
    )
}
