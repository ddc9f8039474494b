use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::domain::settings::SiteSettingsUpdate;
use crate::forms::settings::{CreateSettingsForm, CreateSettingsPayload, UpdateSettingsForm};
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond};
use crate::services::ServiceError;
use crate::services::settings::{
    create_settings as create_settings_service, delete_settings as delete_settings_service,
    get_settings as get_settings_service, update_settings as update_settings_service,
};

#[post("/settings")]
pub async fn create_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateSettingsForm>,
) -> impl Responder {
    let payload: CreateSettingsPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        create_settings_service(payload, &user, repo.get_ref()),
    )
}

/// Public; `data` is `null` until settings are first created.
#[get("/settings")]
pub async fn get_settings(repo: web::Data<DieselRepository>) -> impl Responder {
    respond(StatusCode::OK, get_settings_service(repo.get_ref()))
}

#[put("/settings")]
pub async fn update_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateSettingsForm>,
) -> impl Responder {
    let update: SiteSettingsUpdate = match form.try_into() {
        Ok(update) => update,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_settings_service(update, &user, repo.get_ref()),
    )
}

#[delete("/settings")]
pub async fn delete_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_settings_service(&user, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Settings deleted"),
        Err(err) => error_response(err),
    }
}
