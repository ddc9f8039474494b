use diesel::prelude::*;

use crate::domain::book_request::{BookRequest, NewBookRequest};
use crate::domain::types::UserId;
use crate::models::book_request::{BookRequest as DbBookRequest, NewBookRequest as DbNewBookRequest};
use crate::repository::{BookRequestReader, BookRequestWriter, DieselRepository, RepositoryResult};

impl BookRequestReader for DieselRepository {
    fn list_book_requests(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<BookRequest>> {
        use crate::schema::book_requests;

        let mut conn = self.conn()?;

        let mut items = book_requests::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(user_id) = user_id {
            items = items.filter(book_requests::user_id.eq(user_id.get()));
        }

        let items = items
            .order((book_requests::created_at.desc(), book_requests::id.desc()))
            .load::<DbBookRequest>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<BookRequest>, _>>()?;

        Ok(items)
    }
}

impl BookRequestWriter for DieselRepository {
    fn create_book_request(&self, request: &NewBookRequest) -> RepositoryResult<BookRequest> {
        use crate::schema::book_requests;

        let mut conn = self.conn()?;
        let db_request: DbNewBookRequest = request.clone().into();

        let created = diesel::insert_into(book_requests::table)
            .values(&db_request)
            .get_result::<DbBookRequest>(&mut conn)?;

        Ok(created.try_into()?)
    }
}
