use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{BookId, CategoryPath};
use crate::forms::books::{BookForm, BookPayload, BulkBooksForm, SearchBooksQuery};
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond, success};
use crate::services::ServiceError;
use crate::services::books::{
    best_sellers as best_sellers_service, books_in_category as books_in_category_service,
    create_book as create_book_service, delete_all_books as delete_all_books_service,
    delete_book as delete_book_service, get_book as get_book_service,
    import_books as import_books_service, list_books as list_books_service,
    new_arrivals as new_arrivals_service, search_books as search_books_service,
    update_book as update_book_service,
};

#[get("/books/search")]
pub async fn search_books(
    query: web::Query<SearchBooksQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(
        StatusCode::OK,
        search_books_service(&query.book_name, repo.get_ref()),
    )
}

fn books_under(raw: &str, repo: &DieselRepository) -> HttpResponse {
    let path = match CategoryPath::new(raw) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };

    respond(StatusCode::OK, books_in_category_service(&path, repo))
}

/// Books filed at or below a category. Registered after the numeric id
/// routes so `/books/{id}` keeps precedence.
#[get("/books/{path:.*}")]
pub async fn books_in_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    books_under(&path, repo.get_ref())
}

#[get("/books/category/{path:.*}")]
pub async fn books_in_category_alias(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    books_under(&path, repo.get_ref())
}

#[get("/bestsellers")]
pub async fn best_sellers(repo: web::Data<DieselRepository>) -> impl Responder {
    respond(StatusCode::OK, best_sellers_service(repo.get_ref()))
}

#[get("/newarrivals")]
pub async fn new_arrivals(repo: web::Data<DieselRepository>) -> impl Responder {
    respond(StatusCode::OK, new_arrivals_service(repo.get_ref()))
}

#[post("/bulk/books")]
pub async fn import_books(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkBooksForm>,
) -> impl Responder {
    respond(
        StatusCode::CREATED,
        import_books_service(form.books, &user, repo.get_ref()),
    )
}

#[get("/books")]
pub async fn list_books(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(StatusCode::OK, list_books_service(&user, repo.get_ref()))
}

#[delete("/books")]
pub async fn delete_all_books(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_all_books_service(&user, repo.get_ref()) {
        Ok(deleted) => success(StatusCode::OK, json!({ "deleted": deleted })),
        Err(err) => error_response(err),
    }
}

#[get("/books/{id:\\d+}")]
pub async fn get_book(id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    let id = match BookId::new(id.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    respond(StatusCode::OK, get_book_service(id, repo.get_ref()))
}

#[delete("/books/{id:\\d+}")]
pub async fn delete_book(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match BookId::new(id.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match delete_book_service(id, &user, repo.get_ref()) {
        Ok(()) => message(StatusCode::OK, "Book deleted"),
        Err(err) => error_response(err),
    }
}

#[put("/books/{path:.*}/{id:\\d+}")]
pub async fn update_book(
    params: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BookForm>,
) -> impl Responder {
    let (path, id) = params.into_inner();
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };
    let id = match BookId::new(id) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };
    let payload: BookPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::OK,
        update_book_service(&path, id, payload, &user, repo.get_ref()),
    )
}

#[post("/books/{path:.*}")]
pub async fn create_book(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BookForm>,
) -> impl Responder {
    let path = match CategoryPath::new(&path) {
        Ok(path) => path,
        Err(e) => return error_response(e.into()),
    };
    let payload: BookPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    respond(
        StatusCode::CREATED,
        create_book_service(&path, payload, &user, repo.get_ref()),
    )
}
