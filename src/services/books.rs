use std::collections::HashSet;

use crate::auth::AuthenticatedUser;
use crate::domain::book::{Book, NewBook};
use crate::domain::pricing::{DiscountTable, PricedBook};
use crate::domain::types::{BookId, CategoryPath, DiscountPercent, StockQuantity};
use crate::forms::books::{BookForm, BookPayload};
use crate::repository::{BookListQuery, BookReader, BookWriter, CategoryReader};

use super::{BulkReport, ServiceError, ServiceResult, ensure_admin, now};

/// Search results are capped at this many books.
pub const SEARCH_LIMIT: usize = 11;

fn book_not_found() -> ServiceError {
    ServiceError::not_found("Book not found")
}

fn discount_table<R>(repo: &R) -> ServiceResult<DiscountTable>
where
    R: CategoryReader,
{
    let categories = repo
        .list_categories()
        .map_err(|e| ServiceError::internal("list categories", e))?;
    Ok(DiscountTable::from_categories(&categories))
}

/// Attach the effective discount and discounted price to every book.
pub fn price_books<R>(books: Vec<Book>, repo: &R) -> ServiceResult<Vec<PricedBook>>
where
    R: CategoryReader,
{
    let table = discount_table(repo)?;
    Ok(books
        .into_iter()
        .map(|book| PricedBook::new(book, &table))
        .collect())
}

fn price_book<R>(book: Book, repo: &R) -> ServiceResult<PricedBook>
where
    R: CategoryReader,
{
    Ok(PricedBook::new(book, &discount_table(repo)?))
}

/// Category the book will be filed under: the body's path, falling back to
/// the route path. Either way it must lie within the route path and exist.
fn target_category<R>(
    route_path: &CategoryPath,
    requested: Option<CategoryPath>,
    repo: &R,
) -> ServiceResult<CategoryPath>
where
    R: CategoryReader,
{
    let target = requested.unwrap_or_else(|| route_path.clone());
    if !target.is_within(route_path) {
        return Err(ServiceError::bad_request(format!(
            "Category path '{target}' is not within '{route_path}'"
        )));
    }

    match repo.get_category_by_path(&target) {
        Ok(Some(_)) => Ok(target),
        Ok(None) => Err(ServiceError::not_found(format!(
            "Category '{target}' not found"
        ))),
        Err(e) => Err(ServiceError::internal("get category", e)),
    }
}

fn new_book(payload: BookPayload, category_path: CategoryPath) -> ServiceResult<NewBook> {
    let Some(title) = payload.title else {
        return Err(ServiceError::bad_request("Book title is required"));
    };
    let timestamp = now();
    Ok(NewBook {
        title,
        category_path,
        tags: payload.tags.unwrap_or_default(),
        seo_title: payload.seo_title,
        seo_description: payload.seo_description,
        price: payload.price,
        description: payload.description,
        estimated_delivery: payload.estimated_delivery,
        condition: payload.condition.unwrap_or_default(),
        author: payload.author,
        publisher: payload.publisher,
        image_url: payload.image_url,
        quantity_new: payload.quantity_new.unwrap_or(StockQuantity::ZERO),
        quantity_old: payload.quantity_old.unwrap_or(StockQuantity::ZERO),
        discount_new: payload.discount_new.unwrap_or(DiscountPercent::ZERO),
        discount_old: payload.discount_old.unwrap_or(DiscountPercent::ZERO),
        is_best_seller: payload.is_best_seller.unwrap_or(false),
        is_new_arrival: payload.is_new_arrival.unwrap_or(false),
        created_at: timestamp,
        updated_at: timestamp,
    })
}

pub fn create_book<R>(
    path: &CategoryPath,
    mut payload: BookPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PricedBook>
where
    R: CategoryReader + BookWriter,
{
    ensure_admin(user)?;

    let category_path = target_category(path, payload.category_path.take(), repo)?;
    let book = new_book(payload, category_path)?;

    let created = repo
        .create_book(&book)
        .map_err(|e| ServiceError::internal("create book", e))?;
    price_book(created, repo)
}

pub fn update_book<R>(
    path: &CategoryPath,
    id: BookId,
    mut payload: BookPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PricedBook>
where
    R: CategoryReader + BookReader + BookWriter,
{
    ensure_admin(user)?;

    let mut book = match repo.get_book_by_id(id) {
        Ok(Some(book)) => book,
        Ok(None) => return Err(book_not_found()),
        Err(e) => return Err(ServiceError::internal("get book", e)),
    };
    book.category_path = target_category(path, payload.category_path.take(), repo)?;

    if let Some(title) = payload.title {
        book.title = title;
    }
    if let Some(tags) = payload.tags {
        book.tags = tags;
    }
    if payload.seo_title.is_some() {
        book.seo_title = payload.seo_title;
    }
    if payload.seo_description.is_some() {
        book.seo_description = payload.seo_description;
    }
    if payload.price.is_some() {
        book.price = payload.price;
    }
    if payload.description.is_some() {
        book.description = payload.description;
    }
    if payload.estimated_delivery.is_some() {
        book.estimated_delivery = payload.estimated_delivery;
    }
    if let Some(condition) = payload.condition {
        book.condition = condition;
    }
    if payload.author.is_some() {
        book.author = payload.author;
    }
    if payload.publisher.is_some() {
        book.publisher = payload.publisher;
    }
    if payload.image_url.is_some() {
        book.image_url = payload.image_url;
    }
    if let Some(quantity) = payload.quantity_new {
        book.quantity_new = quantity;
    }
    if let Some(quantity) = payload.quantity_old {
        book.quantity_old = quantity;
    }
    if let Some(discount) = payload.discount_new {
        book.discount_new = discount;
    }
    if let Some(discount) = payload.discount_old {
        book.discount_old = discount;
    }
    if let Some(flag) = payload.is_best_seller {
        book.is_best_seller = flag;
    }
    if let Some(flag) = payload.is_new_arrival {
        book.is_new_arrival = flag;
    }
    book.updated_at = now();

    let updated = repo
        .update_book(&book)
        .map_err(|e| ServiceError::internal("update book", e))?;
    price_book(updated, repo)
}

pub fn get_book<R>(id: BookId, repo: &R) -> ServiceResult<PricedBook>
where
    R: CategoryReader + BookReader,
{
    match repo.get_book_by_id(id) {
        Ok(Some(book)) => price_book(book, repo),
        Ok(None) => Err(book_not_found()),
        Err(e) => Err(ServiceError::internal("get book", e)),
    }
}

pub fn delete_book<R>(id: BookId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: BookWriter,
{
    ensure_admin(user)?;

    match repo.delete_book(id) {
        Ok(0) => Err(book_not_found()),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::internal("delete book", e)),
    }
}

pub fn delete_all_books<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<usize>
where
    R: BookWriter,
{
    ensure_admin(user)?;

    let deleted = repo
        .delete_all_books()
        .map_err(|e| ServiceError::internal("delete all books", e))?;
    log::warn!("Deleted all {deleted} books");
    Ok(deleted)
}

/// Every book in the catalog, for the admin console.
pub fn list_books<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<PricedBook>>
where
    R: CategoryReader + BookReader,
{
    ensure_admin(user)?;

    let books = repo
        .list_books(BookListQuery::new())
        .map_err(|e| ServiceError::internal("list books", e))?;
    price_books(books, repo)
}

/// Books filed at `path` or anywhere below it.
pub fn books_in_category<R>(path: &CategoryPath, repo: &R) -> ServiceResult<Vec<PricedBook>>
where
    R: CategoryReader + BookReader,
{
    let books = repo
        .list_books(BookListQuery::new().under(path.clone()))
        .map_err(|e| ServiceError::internal("list books", e))?;
    if books.is_empty() {
        return Err(ServiceError::not_found("No books found"));
    }
    price_books(books, repo)
}

pub fn search_books<R>(term: &str, repo: &R) -> ServiceResult<Vec<PricedBook>>
where
    R: CategoryReader + BookReader,
{
    let term = term.trim();
    if term.is_empty() {
        return Err(ServiceError::bad_request(
            "bookName query parameter is required",
        ));
    }

    let books = repo
        .list_books(BookListQuery::new().title(term).limit(SEARCH_LIMIT))
        .map_err(|e| ServiceError::internal("search books", e))?;
    if books.is_empty() {
        return Err(ServiceError::not_found("No books found"));
    }
    price_books(books, repo)
}

pub fn best_sellers<R>(repo: &R) -> ServiceResult<Vec<PricedBook>>
where
    R: CategoryReader + BookReader,
{
    let books = repo
        .list_books(BookListQuery::new().best_sellers())
        .map_err(|e| ServiceError::internal("list best sellers", e))?;
    price_books(books, repo)
}

pub fn new_arrivals<R>(repo: &R) -> ServiceResult<Vec<PricedBook>>
where
    R: CategoryReader + BookReader,
{
    let books = repo
        .list_books(BookListQuery::new().new_arrivals())
        .map_err(|e| ServiceError::internal("list new arrivals", e))?;
    price_books(books, repo)
}

/// Import many books at once. Each row needs a title and the path of an
/// existing category; rows that fail are reported and the rest are stored.
pub fn import_books<R>(
    rows: Vec<BookForm>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<BulkReport<PricedBook>>
where
    R: CategoryReader + BookWriter,
{
    ensure_admin(user)?;

    if rows.is_empty() {
        return Err(ServiceError::bad_request("Books array is required"));
    }

    let table = discount_table(repo)?;
    let known: HashSet<CategoryPath> = repo
        .list_categories()
        .map_err(|e| ServiceError::internal("list categories", e))?
        .into_iter()
        .map(|category| category.path)
        .collect();

    let mut report = BulkReport::default();
    for (index, row) in rows.into_iter().enumerate() {
        let mut payload = match BookPayload::try_from(row) {
            Ok(payload) => payload,
            Err(e) => {
                report.skip(index, e.to_string());
                continue;
            }
        };
        let Some(path) = payload.category_path.take() else {
            report.skip(index, "categoryPath is required");
            continue;
        };
        if !known.contains(&path) {
            report.skip(index, format!("Category '{path}' not found"));
            continue;
        }
        let book = match new_book(payload, path) {
            Ok(book) => book,
            Err(e) => {
                report.skip(index, e.to_string());
                continue;
            }
        };

        match repo.create_book(&book) {
            Ok(created) => report.created.push(PricedBook::new(created, &table)),
            Err(e) => return Err(ServiceError::internal("import book", e)),
        }
    }

    log::info!(
        "Imported {} books, skipped {}",
        report.created.len(),
        report.skipped.len()
    );
    Ok(report)
}
