use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::review::ReviewUpdate;
use crate::domain::types::{BookId, ReviewId};
use crate::forms::reviews::{CreateReviewForm, CreateReviewPayload, UpdateReviewForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond};
use crate::services::ServiceError;
use crate::services::reviews::{
    approved_reviews as approved_reviews_service, create_review as create_review_service,
    delete_review as delete_review_service, get_review as get_review_service,
    list_reviews as list_reviews_service, update_review as update_review_service,
};

fn review_id(raw: i32) -> Result<ReviewId, ServiceError> {
    Ok(ReviewId::new(raw)?)
}

#[post("/reviews")]
pub async fn create_review(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateReviewForm>,
) -> impl Responder {
    let payload: CreateReviewPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        create_review_service(payload, &user, repo.get_ref()),
    )
}

#[get("/reviews")]
pub async fn list_reviews(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, list_reviews_service(&user, repo.get_ref()))
}

#[get("/reviews/book/{book_id}")]
pub async fn approved_reviews(
    book_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let book_id = match BookId::new(book_id.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    respond(
        StatusCode::OK,
        approved_reviews_service(book_id, repo.get_ref()),
    )
}

#[get("/reviews/{id}")]
pub async fn get_review(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match review_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };

    respond(StatusCode::OK, get_review_service(id, &user, repo.get_ref()))
}

#[put("/reviews/{id}")]
pub async fn update_review(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateReviewForm>,
) -> impl Responder {
    let id = match review_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };
    let update: ReviewUpdate = match form.try_into() {
        Ok(update) => update,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_review_service(id, update, &user, repo.get_ref()),
    )
}

#[delete("/reviews/{id}")]
pub async fn delete_review(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match review_id(id.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };

    match delete_review_service(id, &user, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Review deleted"),
        Err(err) => error_response(err),
    }
}
