use crate::auth::AuthenticatedUser;
use crate::domain::book_request::{BookRequest, NewBookRequest};
use crate::forms::book_requests::BookRequestPayload;
use crate::repository::{BookRequestReader, BookRequestWriter, CategoryReader};

use super::{ServiceError, ServiceResult, ensure_admin, now, session_user_id};

/// File a request for a missing title. `class_level` must name an existing
/// category.
pub fn create_book_request<R>(
    payload: BookRequestPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<BookRequest>
where
    R: CategoryReader + BookRequestWriter,
{
    let user_id = session_user_id(user)?;

    match repo.get_category_by_name(&payload.class_level) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(ServiceError::not_found(format!(
                "Category '{}' not found",
                payload.class_level
            )));
        }
        Err(e) => return Err(ServiceError::internal("get category", e)),
    }

    let request = NewBookRequest {
        user_id,
        name: payload.name,
        email: payload.email,
        mobile: payload.mobile,
        book_title: payload.book_title,
        publisher: payload.publisher,
        author: payload.author,
        class_level: payload.class_level,
        message: payload.message,
        created_at: now(),
    };
    let created = repo
        .create_book_request(&request)
        .map_err(|e| ServiceError::internal("create book request", e))?;
    log::info!("Book request {} filed for '{}'", created.id, created.book_title);
    Ok(created)
}

pub fn my_book_requests<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<BookRequest>>
where
    R: BookRequestReader,
{
    let user_id = session_user_id(user)?;
    let requests = repo
        .list_book_requests(Some(user_id))
        .map_err(|e| ServiceError::internal("list book requests", e))?;
    if requests.is_empty() {
        return Err(ServiceError::not_found(
            "No book requests found for this user",
        ));
    }
    Ok(requests)
}

pub fn list_book_requests<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<BookRequest>>
where
    R: BookRequestReader,
{
    ensure_admin(user)?;
    let requests = repo
        .list_book_requests(None)
        .map_err(|e| ServiceError::internal("list book requests", e))?;
    if requests.is_empty() {
        return Err(ServiceError::not_found("No book requests found"));
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Email, PersonName, PhoneNumber};
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{sample_admin, sample_category, sample_user};

    fn request(class_level: &str) -> BookRequestPayload {
        BookRequestPayload {
            name: PersonName::new("Reader").unwrap(),
            email: Email::new("reader@example.com").unwrap(),
            mobile: PhoneNumber::new("555-0100").unwrap(),
            book_title: "Organic Chemistry".into(),
            publisher: "Acme".into(),
            author: "A. Author".into(),
            class_level: class_level.into(),
            message: "Please stock this".into(),
        }
    }

    #[test]
    fn request_must_name_existing_category() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1, "class-12", 0.0)]);
        assert_eq!(
            create_book_request(request("Class 13"), &sample_user(), &repo),
            Err(ServiceError::not_found("Category 'Class 13' not found"))
        );

        let created = create_book_request(request("CLASS-12"), &sample_user(), &repo).unwrap();
        assert_eq!(created.user_id.get(), 1);
    }

    #[test]
    fn listings_report_empty_results() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1, "class-12", 0.0)]);
        assert!(matches!(
            my_book_requests(&sample_user(), &repo),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            list_book_requests(&sample_admin(), &repo),
            Err(ServiceError::NotFound(_))
        ));

        create_book_request(request("class-12"), &sample_user(), &repo).unwrap();
        assert_eq!(my_book_requests(&sample_user(), &repo).unwrap().len(), 1);
        assert!(my_book_requests(&sample_admin(), &repo).is_err());
        assert_eq!(list_book_requests(&sample_admin(), &repo).unwrap().len(), 1);
    }
}
