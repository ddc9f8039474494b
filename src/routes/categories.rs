use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::types::CategoryPath;
use crate::forms::categories::{
    AddTagForm, AddTagPayload, CreateCategoryForm, CreateCategoryPayload, UpdateCategoryForm,
    UpdateCategoryPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::ServiceError;
use crate::services::categories::{
    add_tag as add_tag_service, category_tree as category_tree_service,
    create_category as create_category_service,
    delete_all_categories as delete_all_categories_service,
    delete_category as delete_category_service, get_category as get_category_service,
    remove_tag as remove_tag_service, update_category as update_category_service,
};

#[post("/book-categories/{path:.*}/tags")]
pub async fn add_tag(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddTagForm>,
) -> impl Responder {
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };
    let payload: AddTagPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        add_tag_service(&path, payload, &user, repo.get_ref()),
    )
}

#[delete("/book-categories/{path:.*}/tags/{tag}")]
pub async fn remove_tag(
    params: web::Path<(String, String)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (path, tag) = params.into_inner();
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };

    respond(
        StatusCode::OK,
        remove_tag_service(&path, &tag, &user, repo.get_ref()),
    )
}

#[post("/book-categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateCategoryForm>,
) -> impl Responder {
    let payload: CreateCategoryPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        create_category_service(payload, &user, repo.get_ref()),
    )
}

#[get("/book-categories")]
pub async fn category_tree(repo: web::Data<DieselRepository>) -> impl Responder {
    respond(StatusCode::OK, category_tree_service(repo.get_ref()))
}

#[delete("/book-categories")]
pub async fn delete_all_categories(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        StatusCode::OK,
        delete_all_categories_service(&user, repo.get_ref()),
    )
}

#[get("/book-categories/{path:.*}")]
pub async fn get_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };

    respond(StatusCode::OK, get_category_service(&path, repo.get_ref()))
}

#[put("/book-categories/{path:.*}")]
pub async fn update_category(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateCategoryForm>,
) -> impl Responder {
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };
    let payload: UpdateCategoryPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_category_service(&path, payload, &user, repo.get_ref()),
    )
}

#[delete("/book-categories/{path:.*}")]
pub async fn delete_category(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };

    respond(
        StatusCode::OK,
        delete_category_service(&path, &user, repo.get_ref()),
    )
}
