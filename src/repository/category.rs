use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory, PathRewrite, SubtreeDeletion};
use crate::domain::types::CategoryPath;
use crate::models::category::{
    Category as DbCategory, CategoryChanges, NewCategory as DbNewCategory,
};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
    descendant_pattern,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order(categories::path.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_path(&self, path: &CategoryPath) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::path.eq(path.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        // SQLite compares ASCII case-insensitively under LIKE; the exact
        // match is re-checked below.
        let candidates = categories::table
            .filter(categories::name.like(name.trim()))
            .order(categories::path.asc())
            .load::<DbCategory>(&mut conn)?;

        let category = candidates
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .map(TryInto::try_into)
            .transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let taken = categories::table
                .filter(categories::path.eq(db_category.path.as_str()))
                .count()
                .get_result::<i64>(conn)?;
            if taken > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "category path '{}' already exists",
                    db_category.path
                )));
            }

            if let Some(parent_id) = db_category.parent_id {
                let parent = categories::table
                    .find(parent_id)
                    .select(categories::id)
                    .first::<i32>(conn)
                    .optional()?;
                if parent.is_none() {
                    return Err(RepositoryError::NotFound);
                }
            }

            Ok(diesel::insert_into(categories::table)
                .values(&db_category)
                .get_result::<DbCategory>(conn)?)
        })?;

        Ok(created.try_into()?)
    }

    fn update_category(
        &self,
        category: &Category,
        previous_path: &CategoryPath,
    ) -> RepositoryResult<PathRewrite> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;
        let changes = CategoryChanges::from(category);
        let new_path = &category.path;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            if new_path != previous_path {
                let taken = categories::table
                    .filter(categories::path.eq(new_path.as_str()))
                    .filter(categories::id.ne(category.id.get()))
                    .count()
                    .get_result::<i64>(conn)?;
                if taken > 0 {
                    return Err(RepositoryError::Conflict(format!(
                        "category path '{new_path}' already exists"
                    )));
                }
            }

            let updated = diesel::update(categories::table.find(category.id.get()))
                .set(&changes)
                .execute(conn)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            let mut rewrite = PathRewrite::default();
            if new_path == previous_path {
                return Ok(rewrite);
            }

            let pattern = descendant_pattern(previous_path);

            let descendants = categories::table
                .filter(categories::path.like(pattern.as_str()).escape('\\'))
                .select((categories::id, categories::path))
                .load::<(i32, String)>(conn)?;
            for (id, path) in descendants {
                let Some(moved) = CategoryPath::new(&path)?.rebase(previous_path, new_path) else {
                    continue;
                };
                rewrite.categories += diesel::update(categories::table.find(id))
                    .set((
                        categories::path.eq(moved.as_str()),
                        categories::updated_at.eq(category.updated_at),
                    ))
                    .execute(conn)?;
            }

            let shelved = books::table
                .filter(
                    books::category_path
                        .eq(previous_path.as_str())
                        .or(books::category_path.like(pattern.as_str()).escape('\\')),
                )
                .select((books::id, books::category_path))
                .load::<(i32, String)>(conn)?;
            for (id, path) in shelved {
                let Some(moved) = CategoryPath::new(&path)?.rebase(previous_path, new_path) else {
                    continue;
                };
                rewrite.books += diesel::update(books::table.find(id))
                    .set((
                        books::category_path.eq(moved.as_str()),
                        books::updated_at.eq(category.updated_at),
                    ))
                    .execute(conn)?;
            }

            Ok(rewrite)
        })
    }

    fn delete_category_subtree(&self, path: &CategoryPath) -> RepositoryResult<SubtreeDeletion> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;
        let pattern = descendant_pattern(path);

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let books = diesel::delete(
                books::table.filter(
                    books::category_path
                        .eq(path.as_str())
                        .or(books::category_path.like(pattern.as_str()).escape('\\')),
                ),
            )
            .execute(conn)?;

            // Counted up front: rows removed through the parent_id cascade
            // are not reported by the delete itself.
            let descendants = categories::table
                .filter(categories::path.like(pattern.as_str()).escape('\\'))
                .count()
                .get_result::<i64>(conn)? as usize;
            diesel::delete(
                categories::table.filter(categories::path.like(pattern.as_str()).escape('\\')),
            )
            .execute(conn)?;

            let own = diesel::delete(categories::table.filter(categories::path.eq(path.as_str())))
                .execute(conn)?;
            if own == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(SubtreeDeletion {
                categories: descendants + own,
                books,
            })
        })
    }

    fn delete_all_categories(&self) -> RepositoryResult<SubtreeDeletion> {
        use crate::schema::{books, categories};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let books = diesel::delete(books::table).execute(conn)?;
            let categories = categories::table.count().get_result::<i64>(conn)? as usize;
            diesel::delete(categories::table).execute(conn)?;
            Ok(SubtreeDeletion { categories, books })
        })
    }
}
