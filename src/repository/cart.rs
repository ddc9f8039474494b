use chrono::Utc;
use diesel::prelude::*;

use crate::domain::cart::{CartItem, NewCartItem};
use crate::domain::types::{BookCondition, BookId, Quantity, UserId};
use crate::models::cart::{CartItem as DbCartItem, NewCartItem as DbNewCartItem};
use crate::repository::{CartReader, CartWriter, DieselRepository, RepositoryError, RepositoryResult};

impl CartReader for DieselRepository {
    fn list_cart_items(&self, user_id: UserId) -> RepositoryResult<Vec<CartItem>> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let items = cart_items::table
            .filter(cart_items::user_id.eq(user_id.get()))
            .order(cart_items::created_at.asc())
            .load::<DbCartItem>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<CartItem>, _>>()?;

        Ok(items)
    }
}

impl CartWriter for DieselRepository {
    fn add_cart_item(&self, item: &NewCartItem) -> RepositoryResult<CartItem> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let condition = item.condition.as_str();

        let line = conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = cart_items::table
                .filter(cart_items::user_id.eq(item.user_id.get()))
                .filter(cart_items::book_id.eq(item.book_id.get()))
                .filter(cart_items::book_condition.eq(condition))
                .first::<DbCartItem>(conn)
                .optional()?;

            match existing {
                Some(line) => Ok(diesel::update(cart_items::table.find(line.id))
                    .set((
                        cart_items::quantity.eq(line.quantity + item.quantity.get()),
                        cart_items::stock.eq(item.stock.map(|s| s.get()).or(line.stock)),
                        cart_items::updated_at.eq(now),
                    ))
                    .get_result::<DbCartItem>(conn)?),
                None => Ok(diesel::insert_into(cart_items::table)
                    .values(&DbNewCartItem::from_domain(item, now))
                    .get_result::<DbCartItem>(conn)?),
            }
        })?;

        Ok(line.try_into()?)
    }

    fn set_cart_item_quantity(
        &self,
        user_id: UserId,
        book_id: BookId,
        condition: BookCondition,
        quantity: Quantity,
    ) -> RepositoryResult<usize> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            cart_items::table
                .filter(cart_items::user_id.eq(user_id.get()))
                .filter(cart_items::book_id.eq(book_id.get()))
                .filter(cart_items::book_condition.eq(condition.as_str())),
        )
        .set((
            cart_items::quantity.eq(quantity.get()),
            cart_items::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn remove_cart_item(
        &self,
        user_id: UserId,
        book_id: BookId,
        condition: BookCondition,
    ) -> RepositoryResult<usize> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            cart_items::table
                .filter(cart_items::user_id.eq(user_id.get()))
                .filter(cart_items::book_id.eq(book_id.get()))
                .filter(cart_items::book_condition.eq(condition.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn clear_cart(&self, user_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id.get())))
                .execute(&mut conn)?;

        Ok(affected)
    }
}
