use diesel::prelude::*;

use crate::domain::book::{Book, NewBook};
use crate::domain::types::BookId;
use crate::models::book::{Book as DbBook, NewBook as DbNewBook};
use crate::repository::{
    BookListQuery, BookReader, BookWriter, DieselRepository, RepositoryError, RepositoryResult,
    contains_pattern, descendant_pattern,
};

impl BookReader for DieselRepository {
    fn list_books(&self, query: BookListQuery) -> RepositoryResult<Vec<Book>> {
        use crate::schema::books;

        let mut conn = self.conn()?;

        let mut items = books::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(path) = &query.category_path {
            let pattern = descendant_pattern(path);
            items = items.filter(
                books::category_path
                    .eq(path.as_str().to_string())
                    .or(books::category_path.like(pattern).escape('\\')),
            );
        }

        if let Some(title) = &query.title {
            items = items.filter(
                books::title
                    .like(contains_pattern(title.trim()))
                    .escape('\\'),
            );
        }

        if query.best_sellers_only {
            items = items.filter(books::is_best_seller.eq(true));
        }

        if query.new_arrivals_only {
            items = items.filter(books::is_new_arrival.eq(true));
        }

        if let Some(limit) = query.limit {
            items = items.limit(limit as i64);
        }

        let items = items
            .order((books::title.asc(), books::id.asc()))
            .load::<DbBook>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Book>, _>>()?;

        Ok(items)
    }

    fn get_book_by_id(&self, id: BookId) -> RepositoryResult<Option<Book>> {
        use crate::schema::books;

        let mut conn = self.conn()?;

        let book = books::table
            .find(id.get())
            .first::<DbBook>(&mut conn)
            .optional()?;

        let book = book.map(TryInto::try_into).transpose()?;
        Ok(book)
    }
}

impl BookWriter for DieselRepository {
    fn create_book(&self, book: &NewBook) -> RepositoryResult<Book> {
        use crate::schema::books;

        let mut conn = self.conn()?;
        let db_book: DbNewBook = book.clone().into();

        let created = diesel::insert_into(books::table)
            .values(&db_book)
            .get_result::<DbBook>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_book(&self, book: &Book) -> RepositoryResult<Book> {
        use crate::schema::books;

        let mut conn = self.conn()?;
        let changes = DbNewBook::from(book);

        let updated = conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(books::table.find(book.id.get()))
                .set(&changes)
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(books::table.find(book.id.get()).first::<DbBook>(conn)?)
        })?;

        Ok(updated.try_into()?)
    }

    fn delete_book(&self, id: BookId) -> RepositoryResult<usize> {
        use crate::schema::books;

        let mut conn = self.conn()?;
        let affected = diesel::delete(books::table.find(id.get())).execute(&mut conn)?;
        Ok(affected)
    }

    fn delete_all_books(&self) -> RepositoryResult<usize> {
        use crate::schema::books;

        let mut conn = self.conn()?;
        let affected = diesel::delete(books::table).execute(&mut conn)?;
        Ok(affected)
    }
}
