use std::collections::HashMap;

use crate::auth::AuthenticatedUser;
use crate::domain::book::Book;
use crate::domain::review::{NewReview, Review, ReviewUpdate};
use crate::domain::types::{BookId, ReviewId, ReviewStatus};
use crate::dto::views::ReviewView;
use crate::forms::reviews::CreateReviewPayload;
use crate::repository::{BookReader, ReviewListQuery, ReviewReader, ReviewWriter};

use super::{ServiceError, ServiceResult, ensure_admin, now};

fn review_not_found() -> ServiceError {
    ServiceError::not_found("Review not found")
}

fn review_views<R>(reviews: Vec<Review>, repo: &R) -> ServiceResult<Vec<ReviewView>>
where
    R: BookReader,
{
    let mut books: HashMap<BookId, Option<Book>> = HashMap::new();
    let mut views = Vec::with_capacity(reviews.len());
    for review in reviews {
        if !books.contains_key(&review.book_id) {
            let book = repo
                .get_book_by_id(review.book_id)
                .map_err(|e| ServiceError::internal("get book", e))?;
            books.insert(review.book_id, book);
        }
        let book = books.get(&review.book_id).and_then(Option::as_ref);
        views.push(ReviewView::new(review, book));
    }
    Ok(views)
}

fn load_review<R>(id: ReviewId, repo: &R) -> ServiceResult<Review>
where
    R: ReviewReader,
{
    match repo.get_review_by_id(id) {
        Ok(Some(review)) => Ok(review),
        Ok(None) => Err(review_not_found()),
        Err(e) => Err(ServiceError::internal("get review", e)),
    }
}

/// Submit a review; it stays hidden until a moderator approves it.
pub fn create_review<R>(
    payload: CreateReviewPayload,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Review>
where
    R: BookReader + ReviewWriter,
{
    match repo.get_book_by_id(payload.book_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::not_found("Book not found")),
        Err(e) => return Err(ServiceError::internal("get book", e)),
    }

    let timestamp = now();
    let review = NewReview {
        book_id: payload.book_id,
        category_name: payload.category_name,
        name: payload.name,
        email: payload.email,
        rating: payload.rating,
        comment: payload.comment,
        status: ReviewStatus::Pending,
        created_at: timestamp,
        updated_at: timestamp,
    };
    repo.create_review(&review)
        .map_err(|e| ServiceError::internal("create review", e))
}

pub fn list_reviews<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<ReviewView>>
where
    R: ReviewReader + BookReader,
{
    ensure_admin(user)?;
    let reviews = repo
        .list_reviews(ReviewListQuery::new())
        .map_err(|e| ServiceError::internal("list reviews", e))?;
    review_views(reviews, repo)
}

/// Approved reviews of one book, for the storefront.
pub fn approved_reviews<R>(book_id: BookId, repo: &R) -> ServiceResult<Vec<ReviewView>>
where
    R: ReviewReader + BookReader,
{
    let reviews = repo
        .list_reviews(
            ReviewListQuery::new()
                .book(book_id)
                .status(ReviewStatus::Approved),
        )
        .map_err(|e| ServiceError::internal("list reviews", e))?;
    review_views(reviews, repo)
}

pub fn get_review<R>(id: ReviewId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<ReviewView>
where
    R: ReviewReader + BookReader,
{
    ensure_admin(user)?;
    let review = load_review(id, repo)?;
    let mut views = review_views(vec![review], repo)?;
    views.pop().ok_or(ServiceError::Internal)
}

pub fn update_review<R>(
    id: ReviewId,
    update: ReviewUpdate,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Review>
where
    R: ReviewReader + ReviewWriter,
{
    ensure_admin(user)?;

    let mut review = load_review(id, repo)?;
    if let Some(rating) = update.rating {
        review.rating = rating;
    }
    if let Some(comment) = update.comment {
        review.comment = comment;
    }
    if let Some(status) = update.status {
        review.status = status;
    }
    review.updated_at = now();

    match repo.update_review(&review) {
        Ok(0) => Err(review_not_found()),
        Ok(_) => Ok(review),
        Err(e) => Err(ServiceError::internal("update review", e)),
    }
}

pub fn delete_review<R>(id: ReviewId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ReviewWriter,
{
    ensure_admin(user)?;

    match repo.delete_review(id) {
        Ok(0) => Err(review_not_found()),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::internal("delete review", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{PersonName, Rating, ReviewComment};
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{sample_admin, sample_book, sample_user};

    fn review_payload(book_id: i32) -> CreateReviewPayload {
        CreateReviewPayload {
            book_id: BookId::new(book_id).unwrap(),
            category_name: "Fiction".into(),
            name: PersonName::new("Reader").unwrap(),
            email: None,
            rating: Rating::new(4).unwrap(),
            comment: ReviewComment::new("Loved it").unwrap(),
        }
    }

    #[test]
    fn new_reviews_wait_for_approval() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let review = create_review(review_payload(1), &sample_user(), &repo).unwrap();
        assert_eq!(review.status, ReviewStatus::Pending);
        assert!(approved_reviews(BookId::new(1).unwrap(), &repo).unwrap().is_empty());

        let approve = ReviewUpdate {
            status: Some(ReviewStatus::Approved),
            ..Default::default()
        };
        update_review(review.id, approve, &sample_admin(), &repo).unwrap();

        let approved = approved_reviews(BookId::new(1).unwrap(), &repo).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].book.as_ref().unwrap().title, "Book 1");
    }

    #[test]
    fn review_for_unknown_book_is_rejected() {
        let repo = TestRepository::new();
        assert_eq!(
            create_review(review_payload(9), &sample_user(), &repo),
            Err(ServiceError::not_found("Book not found"))
        );
    }

    #[test]
    fn moderation_requires_admin_and_existing_review() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let review = create_review(review_payload(1), &sample_user(), &repo).unwrap();

        assert!(matches!(
            list_reviews(&sample_user(), &repo),
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(list_reviews(&sample_admin(), &repo).unwrap().len(), 1);

        delete_review(review.id, &sample_admin(), &repo).unwrap();
        assert_eq!(
            get_review(review.id, &sample_admin(), &repo),
            Err(review_not_found())
        );
        assert_eq!(
            delete_review(review.id, &sample_admin(), &repo),
            Err(review_not_found())
        );
    }
}
