use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::order::{NewOrder, NewPayment, Order};
use crate::domain::types::{BookCondition, OrderId, OrderStatus};
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderPayment, Order as DbOrder, OrderPayment,
};
use crate::repository::{
    DieselRepository, OrderListQuery, OrderReader, OrderWriter, RepositoryError, RepositoryResult,
};

/// Attach payment rows to each order, preserving the order of `rows`.
fn with_payments(conn: &mut SqliteConnection, rows: Vec<DbOrder>) -> RepositoryResult<Vec<Order>> {
    let payments = OrderPayment::belonging_to(&rows)
        .order(crate::schema::order_payments::created_at.asc())
        .load::<OrderPayment>(conn)?
        .grouped_by(&rows);

    let orders = rows
        .into_iter()
        .zip(payments)
        .map(TryInto::try_into)
        .collect::<Result<Vec<Order>, _>>()?;

    Ok(orders)
}

fn load_order(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Option<Order>> {
    use crate::schema::orders;

    let Some(row) = orders::table.find(id).first::<DbOrder>(conn).optional()? else {
        return Ok(None);
    };
    Ok(with_payments(conn, vec![row])?.pop())
}

/// Manually placed orders reserve stock until they are cancelled or deleted.
fn holds_stock(order: &DbOrder) -> bool {
    order.gateway_order_id.is_none() && order.status != OrderStatus::Cancelled.as_str()
}

/// Add `delta` copies to the stock counter matching `condition`.
fn adjust_stock(
    conn: &mut SqliteConnection,
    book_id: i32,
    condition: BookCondition,
    delta: i32,
) -> RepositoryResult<usize> {
    use crate::schema::books;

    let target = books::table.find(book_id);
    let affected = match condition {
        BookCondition::New => diesel::update(target)
            .set(books::quantity_new.eq(books::quantity_new + delta))
            .execute(conn)?,
        BookCondition::Old => diesel::update(target)
            .set(books::quantity_old.eq(books::quantity_old + delta))
            .execute(conn)?,
    };
    Ok(affected)
}

/// Take `quantity` copies out of stock, failing when fewer are on hand.
fn reserve_stock(
    conn: &mut SqliteConnection,
    book_id: i32,
    condition: BookCondition,
    quantity: i32,
) -> RepositoryResult<()> {
    use crate::schema::books;

    let (quantity_new, quantity_old) = books::table
        .find(book_id)
        .select((books::quantity_new, books::quantity_old))
        .first::<(i32, i32)>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    let available = match condition {
        BookCondition::New => quantity_new,
        BookCondition::Old => quantity_old,
    };
    if available < quantity {
        return Err(RepositoryError::InsufficientStock { available });
    }

    adjust_stock(conn, book_id, condition, -quantity)?;
    Ok(())
}

fn release_stock(conn: &mut SqliteConnection, order: &DbOrder) -> RepositoryResult<()> {
    if !holds_stock(order) {
        return Ok(());
    }
    let condition = BookCondition::try_from(order.book_condition.as_str())?;
    adjust_stock(conn, order.book_id, condition, order.quantity)?;
    Ok(())
}

impl OrderReader for DieselRepository {
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let mut items = orders::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(email) = &query.email {
            items = items.filter(orders::email.eq(email.as_str().to_string()));
        }

        let rows = items
            .order((orders::created_at.desc(), orders::id.desc()))
            .load::<DbOrder>(&mut conn)?;

        with_payments(&mut conn, rows)
    }

    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        let mut conn = self.conn()?;
        load_order(&mut conn, id.get())
    }

    fn get_order_by_gateway_id(&self, gateway_order_id: &str) -> RepositoryResult<Option<Order>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let Some(row) = orders::table
            .filter(orders::gateway_order_id.eq(gateway_order_id))
            .first::<DbOrder>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        Ok(with_payments(&mut conn, vec![row])?.pop())
    }
}

impl OrderWriter for DieselRepository {
    fn place_order(&self, order: &NewOrder) -> RepositoryResult<Order> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let db_order: DbNewOrder = order.clone().into();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            reserve_stock(conn, db_order.book_id, order.condition, db_order.quantity)?;

            let created = diesel::insert_into(orders::table)
                .values(&db_order)
                .get_result::<DbOrder>(conn)?;

            with_payments(conn, vec![created])?
                .pop()
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn create_gateway_order(&self, order: &NewOrder) -> RepositoryResult<Order> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let db_order: DbNewOrder = order.clone().into();

        let created = diesel::insert_into(orders::table)
            .values(&db_order)
            .get_result::<DbOrder>(&mut conn)?;

        with_payments(&mut conn, vec![created])?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_order_status(&self, id: OrderId, status: OrderStatus) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let Some(row) = orders::table
                .find(id.get())
                .first::<DbOrder>(conn)
                .optional()?
            else {
                return Ok(0);
            };

            let was_cancelled = row.status == OrderStatus::Cancelled.as_str();
            let cancelling = status == OrderStatus::Cancelled;
            if cancelling && !was_cancelled {
                release_stock(conn, &row)?;
            } else if was_cancelled && !cancelling && row.gateway_order_id.is_none() {
                let condition = BookCondition::try_from(row.book_condition.as_str())?;
                reserve_stock(conn, row.book_id, condition, row.quantity)?;
            }

            Ok(diesel::update(orders::table.find(row.id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?)
        })
    }

    fn cancel_order(&self, id: OrderId, reason: &str) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let Some(row) = orders::table
                .find(id.get())
                .first::<DbOrder>(conn)
                .optional()?
            else {
                return Ok(0);
            };

            release_stock(conn, &row)?;

            Ok(diesel::update(orders::table.find(row.id))
                .set((
                    orders::status.eq(OrderStatus::Cancelled.as_str()),
                    orders::cancel_reason.eq(Some(reason)),
                    orders::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?)
        })
    }

    fn delete_order(&self, id: OrderId) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let Some(row) = orders::table
                .find(id.get())
                .first::<DbOrder>(conn)
                .optional()?
            else {
                return Ok(0);
            };

            release_stock(conn, &row)?;

            Ok(diesel::delete(orders::table.find(row.id)).execute(conn)?)
        })
    }

    fn record_payment(
        &self,
        gateway_order_id: &str,
        status: OrderStatus,
        payment_type: Option<&str>,
        payment: &NewPayment,
    ) -> RepositoryResult<Option<Order>> {
        use crate::schema::{order_payments, orders};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let Some(row) = orders::table
                .filter(orders::gateway_order_id.eq(gateway_order_id))
                .first::<DbOrder>(conn)
                .optional()?
            else {
                return Ok(None);
            };

            diesel::insert_into(order_payments::table)
                .values(&NewOrderPayment {
                    order_id: row.id,
                    payment_id: &payment.payment_id,
                    status: &payment.status,
                    method: payment.method.as_deref(),
                    created_at: now,
                })
                .execute(conn)?;

            let payment_type = payment_type.map(str::to_string).or(row.payment_type);
            diesel::update(orders::table.find(row.id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::payment_type.eq(payment_type),
                    orders::updated_at.eq(now),
                ))
                .execute(conn)?;

            load_order(conn, row.id)
        })
    }
}
