use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::category::{
    Category, NewCategory, PathRewrite, SubtreeDeletion, discount_for_path,
};
use crate::domain::types::{CategoryPath, Tag};
use crate::dto::categories::{CategoryNode, CategoryTree};
use crate::forms::categories::{AddTagPayload, CreateCategoryPayload, UpdateCategoryPayload};
use crate::repository::{
    BookListQuery, BookReader, CategoryReader, CategoryWriter, RepositoryError,
};

use super::{ServiceError, ServiceResult, ensure_admin, now};

/// Category after an edit, with the number of rows the rename cascade moved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub category: Category,
    pub moved: PathRewrite,
}

fn category_not_found(path: &CategoryPath) -> ServiceError {
    ServiceError::not_found(format!("Category '{path}' not found"))
}

fn load_category<R>(path: &CategoryPath, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match repo.get_category_by_path(path) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(category_not_found(path)),
        Err(e) => Err(ServiceError::internal("get category", e)),
    }
}

pub fn create_category<R>(
    payload: CreateCategoryPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;

    let path = payload.path();

    let parent_id = match &payload.parent_path {
        Some(parent_path) => match repo.get_category_by_path(parent_path) {
            Ok(Some(parent)) => Some(parent.id),
            Ok(None) => {
                return Err(ServiceError::not_found(format!(
                    "Parent category '{parent_path}' not found"
                )));
            }
            Err(e) => return Err(ServiceError::internal("get parent category", e)),
        },
        None => None,
    };

    let timestamp = now();
    let category = NewCategory {
        name: payload.name,
        discount: discount_for_path(&path, payload.discount),
        path: path.clone(),
        parent_id,
        tags: payload.tags,
        seo_title: payload.seo_title,
        seo_description: payload.seo_description,
        created_at: timestamp,
        updated_at: timestamp,
    };

    match repo.create_category(&category) {
        Ok(created) => Ok(created),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(format!(
            "Category with path '{path}' already exists"
        ))),
        // The parent vanished between the lookup and the insert.
        Err(RepositoryError::NotFound) => Err(ServiceError::not_found(format!(
            "Parent category '{}' not found",
            path.parent().map(|p| p.to_string()).unwrap_or_default()
        ))),
        Err(e) => Err(ServiceError::internal("create category", e)),
    }
}

/// Every root category with its nested children and priced books.
pub fn category_tree<R>(repo: &R) -> ServiceResult<Vec<CategoryNode>>
where
    R: CategoryReader + BookReader,
{
    let categories = repo
        .list_categories()
        .map_err(|e| ServiceError::internal("list categories", e))?;
    let books = repo
        .list_books(BookListQuery::new())
        .map_err(|e| ServiceError::internal("list books", e))?;

    Ok(CategoryTree::build(categories, books).roots())
}

/// One category with its nested children and priced books.
pub fn get_category<R>(path: &CategoryPath, repo: &R) -> ServiceResult<CategoryNode>
where
    R: CategoryReader + BookReader,
{
    let categories = repo
        .list_categories()
        .map_err(|e| ServiceError::internal("list categories", e))?;
    let books = repo
        .list_books(BookListQuery::new().under(path.clone()))
        .map_err(|e| ServiceError::internal("list books", e))?;

    CategoryTree::build(categories, books)
        .subtree(path)
        .ok_or_else(|| category_not_found(path))
}

pub fn update_category<R>(
    path: &CategoryPath,
    payload: UpdateCategoryPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryUpdate>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;

    let mut category = load_category(path, repo)?;
    let previous_path = category.path.clone();

    if let Some((name, slug)) = payload.rename {
        category.path = previous_path.with_last_segment(&slug);
        category.name = name;
    }
    if let Some(tags) = payload.tags {
        category.tags = tags;
    }
    if let Some(seo_title) = payload.seo_title {
        category.seo_title = Some(seo_title);
    }
    if let Some(seo_description) = payload.seo_description {
        category.seo_description = Some(seo_description);
    }
    let requested = payload.discount.unwrap_or(category.discount);
    category.discount = discount_for_path(&category.path, requested);
    category.updated_at = now();

    match repo.update_category(&category, &previous_path) {
        Ok(moved) => {
            if category.path != previous_path {
                log::info!(
                    "Renamed category '{previous_path}' to '{}': moved {} categories and {} books",
                    category.path,
                    moved.categories,
                    moved.books
                );
            }
            Ok(CategoryUpdate { category, moved })
        }
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(format!(
            "Category path '{}' already exists",
            category.path
        ))),
        Err(RepositoryError::NotFound) => Err(category_not_found(path)),
        Err(e) => Err(ServiceError::internal("update category", e)),
    }
}

pub fn delete_category<R>(
    path: &CategoryPath,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SubtreeDeletion>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    match repo.delete_category_subtree(path) {
        Ok(deleted) => {
            log::info!(
                "Deleted category '{path}': {} categories and {} books removed",
                deleted.categories,
                deleted.books
            );
            Ok(deleted)
        }
        Err(RepositoryError::NotFound) => Err(category_not_found(path)),
        Err(e) => Err(ServiceError::internal("delete category", e)),
    }
}

pub fn delete_all_categories<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<SubtreeDeletion>
where
    R: CategoryWriter,
{
    ensure_admin(user)?;

    let deleted = repo
        .delete_all_categories()
        .map_err(|e| ServiceError::internal("delete all categories", e))?;
    log::warn!(
        "Deleted the whole catalog: {} categories and {} books",
        deleted.categories,
        deleted.books
    );
    Ok(deleted)
}

pub fn add_tag<R>(
    path: &CategoryPath,
    payload: AddTagPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Tag>>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;

    let mut category = load_category(path, repo)?;
    if category.tags.contains(&payload.tag) {
        return Err(ServiceError::bad_request("Tag already exists"));
    }
    category.tags.push(payload.tag);
    category.updated_at = now();

    let previous_path = category.path.clone();
    repo.update_category(&category, &previous_path)
        .map_err(|e| ServiceError::internal("add category tag", e))?;
    Ok(category.tags)
}

/// Remove `tag` from the category. Removing an absent tag is a no-op.
pub fn remove_tag<R>(
    path: &CategoryPath,
    tag: &str,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Tag>>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(user)?;

    let tag = Tag::new(tag)?;
    let mut category = load_category(path, repo)?;
    let before = category.tags.len();
    category.tags.retain(|t| t != &tag);
    if category.tags.len() == before {
        return Ok(category.tags);
    }
    category.updated_at = now();

    let previous_path = category.path.clone();
    repo.update_category(&category, &previous_path)
        .map_err(|e| ServiceError::internal("remove category tag", e))?;
    Ok(category.tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryName, CategorySlug, DiscountPercent};
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{sample_admin, sample_book, sample_category, sample_user};

    fn create_payload(name: &str, parent: Option<&str>, discount: f64) -> CreateCategoryPayload {
        CreateCategoryPayload {
            name: CategoryName::new(name).unwrap(),
            slug: CategorySlug::new(name).unwrap(),
            parent_path: parent.map(|p| CategoryPath::new(p).unwrap()),
            tags: vec![],
            seo_title: None,
            seo_description: None,
            discount: DiscountPercent::new(discount).unwrap(),
        }
    }

    fn path(value: &str) -> CategoryPath {
        CategoryPath::new(value).unwrap()
    }

    #[test]
    fn creates_child_under_existing_parent() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1, "fiction", 0.0)]);

        let created =
            create_category(create_payload("Sci Fi", Some("fiction"), 10.0), &sample_admin(), &repo)
                .unwrap();
        assert_eq!(created.path.as_str(), "fiction/sci-fi");
        assert_eq!(created.parent_id.unwrap().get(), 1);
        assert_eq!(created.discount, 10.0);
    }

    #[test]
    fn missing_parent_leaves_no_orphan() {
        let repo = TestRepository::new();
        let result = create_category(
            create_payload("Sci Fi", Some("fiction"), 0.0),
            &sample_admin(),
            &repo,
        );
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert!(repo.categories().is_empty());
    }

    #[test]
    fn duplicate_path_conflicts_without_touching_existing() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1, "fiction", 5.0)]);
        let result = create_category(create_payload("Fiction", None, 50.0), &sample_admin(), &repo);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert_eq!(repo.categories()[0].discount, 5.0);
    }

    #[test]
    fn discount_is_dropped_below_second_level() {
        let repo = TestRepository::new().with_categories(vec![
            sample_category(1, "school", 0.0),
            sample_category(2, "school/class-10", 0.0),
            sample_category(3, "school/class-10/maths", 0.0),
        ]);
        let created = create_category(
            create_payload("Algebra", Some("school/class-10/maths"), 30.0),
            &sample_admin(),
            &repo,
        )
        .unwrap();
        assert_eq!(created.discount, DiscountPercent::ZERO);
    }

    #[test]
    fn non_admin_cannot_create() {
        let repo = TestRepository::new();
        let result = create_category(create_payload("Fiction", None, 0.0), &sample_user(), &repo);
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn rename_moves_descendants_and_books_only_under_prefix() {
        let repo = TestRepository::new()
            .with_categories(vec![
                sample_category(1, "fiction", 0.0),
                sample_category(2, "fiction/scifi", 0.0),
                sample_category(3, "fiction/scifi/space", 0.0),
                sample_category(4, "fiction/scifi-classics", 0.0),
            ])
            .with_books(vec![
                sample_book(1, "fiction/scifi"),
                sample_book(2, "fiction/scifi/space"),
                sample_book(3, "fiction/scifi-classics"),
                sample_book(4, "fiction"),
            ]);

        let payload = UpdateCategoryPayload {
            rename: Some((
                CategoryName::new("Sci-Fi").unwrap(),
                CategorySlug::new("Sci-Fi").unwrap(),
            )),
            ..Default::default()
        };
        let updated = update_category(&path("fiction/scifi"), payload, &sample_admin(), &repo).unwrap();
        assert_eq!(updated.category.path.as_str(), "fiction/sci-fi");
        assert_eq!(updated.moved.categories, 1);
        assert_eq!(updated.moved.books, 2);

        let mut paths: Vec<String> = repo
            .categories()
            .iter()
            .map(|c| c.path.to_string())
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "fiction",
                "fiction/sci-fi",
                "fiction/sci-fi/space",
                "fiction/scifi-classics"
            ]
        );

        let books = repo.books();
        let book_path = |id: i32| {
            books
                .iter()
                .find(|b| b.id.get() == id)
                .map(|b| b.category_path.to_string())
                .unwrap()
        };
        assert_eq!(book_path(1), "fiction/sci-fi");
        assert_eq!(book_path(2), "fiction/sci-fi/space");
        assert_eq!(book_path(3), "fiction/scifi-classics");
        assert_eq!(book_path(4), "fiction");
    }

    #[test]
    fn rename_onto_existing_path_conflicts() {
        let repo = TestRepository::new().with_categories(vec![
            sample_category(1, "fiction", 0.0),
            sample_category(2, "drama", 0.0),
        ]);
        let payload = UpdateCategoryPayload {
            rename: Some((
                CategoryName::new("Drama").unwrap(),
                CategorySlug::new("Drama").unwrap(),
            )),
            ..Default::default()
        };
        let result = update_category(&path("fiction"), payload, &sample_admin(), &repo);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert!(repo.categories().iter().any(|c| c.path.as_str() == "fiction"));
    }

    #[test]
    fn update_without_discount_keeps_existing_value() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1, "school", 12.0)]);
        let payload = UpdateCategoryPayload {
            seo_title: Some("School books".into()),
            ..Default::default()
        };
        let updated = update_category(&path("school"), payload, &sample_admin(), &repo).unwrap();
        assert_eq!(updated.category.discount, 12.0);
        assert_eq!(updated.moved, PathRewrite::default());
    }

    #[test]
    fn delete_cascades_to_descendants_and_books() {
        let repo = TestRepository::new()
            .with_categories(vec![
                sample_category(1, "fiction", 0.0),
                sample_category(2, "fiction/scifi", 0.0),
                sample_category(3, "fictional", 0.0),
            ])
            .with_books(vec![
                sample_book(1, "fiction"),
                sample_book(2, "fiction/scifi"),
                sample_book(3, "fictional"),
            ]);

        let deleted = delete_category(&path("fiction"), &sample_admin(), &repo).unwrap();
        assert_eq!(deleted, SubtreeDeletion { categories: 2, books: 2 });
        assert_eq!(repo.categories().len(), 1);
        assert_eq!(repo.books()[0].category_path.as_str(), "fictional");

        let missing = delete_category(&path("fiction"), &sample_admin(), &repo);
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn tree_nests_children_and_prices_books() {
        let repo = TestRepository::new()
            .with_categories(vec![
                sample_category(1, "school", 10.0),
                sample_category(2, "school/class-10", 0.0),
            ])
            .with_books(vec![sample_book(1, "school/class-10")]);

        let roots = category_tree(&repo).unwrap();
        assert_eq!(roots.len(), 1);
        let class_10 = &roots[0].children[0];
        assert_eq!(class_10.books[0].effective_discount, 10.0);

        let node = get_category(&path("school/class-10"), &repo).unwrap();
        assert_eq!(node.book_ids.len(), 1);
        assert!(get_category(&path("college"), &repo).is_err());
    }

    #[test]
    fn tags_are_added_once_and_removed() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1, "school", 0.0)]);
        let add = || AddTagPayload {
            tag: Tag::new("Exam Prep").unwrap(),
        };

        let tags = add_tag(&path("school"), add(), &sample_admin(), &repo).unwrap();
        assert_eq!(tags.len(), 1);
        let duplicate = add_tag(&path("school"), add(), &sample_admin(), &repo);
        assert!(matches!(duplicate, Err(ServiceError::BadRequest(_))));

        let tags = remove_tag(&path("school"), "exam-prep", &sample_admin(), &repo).unwrap();
        assert!(tags.is_empty());
    }
}
