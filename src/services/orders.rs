use std::collections::HashMap;

use crate::auth::AuthenticatedUser;
use crate::domain::book::Book;
use crate::domain::order::{CANCEL_REASONS, DEFAULT_CURRENCY, NewOrder, Order};
use crate::domain::types::{BookId, Email, OrderId, OrderStatus};
use crate::dto::views::OrderView;
use crate::forms::orders::PlaceOrderPayload;
use crate::repository::{BookReader, OrderListQuery, OrderReader, OrderWriter, RepositoryError};

use super::{ServiceError, ServiceResult, ensure_admin, now, session_user_id};

fn order_not_found() -> ServiceError {
    ServiceError::not_found("Order not found")
}

/// Attach the book title and image to each order, loading every book once.
pub(crate) fn order_views<R>(orders: Vec<Order>, repo: &R) -> ServiceResult<Vec<OrderView>>
where
    R: BookReader,
{
    let mut books: HashMap<BookId, Option<Book>> = HashMap::new();
    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        if !books.contains_key(&order.book_id) {
            let book = repo
                .get_book_by_id(order.book_id)
                .map_err(|e| ServiceError::internal("get book", e))?;
            books.insert(order.book_id, book);
        }
        let book = books.get(&order.book_id).and_then(Option::as_ref);
        views.push(OrderView::new(order, book));
    }
    Ok(views)
}

pub(crate) fn load_order<R>(id: OrderId, repo: &R) -> ServiceResult<Order>
where
    R: OrderReader,
{
    match repo.get_order_by_id(id) {
        Ok(Some(order)) => Ok(order),
        Ok(None) => Err(order_not_found()),
        Err(e) => Err(ServiceError::internal("get order", e)),
    }
}

/// Reserve stock and record a manually paid order.
pub fn place_order<R>(
    payload: PlaceOrderPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<OrderView>
where
    R: OrderWriter + BookReader,
{
    let user_id = session_user_id(user)?;
    let timestamp = now();
    let order = NewOrder {
        user_id: Some(user_id),
        customer_name: payload.customer_name,
        email: payload.email,
        mobile_number: payload.mobile_number,
        address: payload.address,
        book_id: payload.book_id,
        quantity: payload.quantity,
        price: payload.price,
        condition: payload.condition,
        payment_type: Some(payload.payment_type.as_str().to_string()),
        status: OrderStatus::Shipped,
        gateway_order_id: None,
        receipt: None,
        amount: None,
        currency: DEFAULT_CURRENCY.to_string(),
        created_at: timestamp,
        updated_at: timestamp,
    };

    let created = match repo.place_order(&order) {
        Ok(created) => created,
        Err(RepositoryError::NotFound) => return Err(ServiceError::not_found("Book not found")),
        Err(RepositoryError::InsufficientStock { available }) => {
            return Err(ServiceError::bad_request(format!(
                "Insufficient {} stock. Only {available} available.",
                order.condition.as_str().to_lowercase()
            )));
        }
        Err(e) => return Err(ServiceError::internal("place order", e)),
    };

    log::info!(
        "Order {} placed for book {} x{}",
        created.id,
        created.book_id,
        created.quantity
    );
    let mut views = order_views(vec![created], repo)?;
    views.pop().ok_or(ServiceError::Internal)
}

/// Orders placed with the caller's email address, newest first.
pub fn my_orders<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<OrderView>>
where
    R: OrderReader + BookReader,
{
    let email = Email::new(user.email.as_str())?;
    let orders = repo
        .list_orders(OrderListQuery::new().email(email))
        .map_err(|e| ServiceError::internal("list orders", e))?;
    order_views(orders, repo)
}

pub fn list_orders<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<OrderView>>
where
    R: OrderReader + BookReader,
{
    ensure_admin(user)?;
    let orders = repo
        .list_orders(OrderListQuery::new())
        .map_err(|e| ServiceError::internal("list orders", e))?;
    order_views(orders, repo)
}

pub fn update_order_status<R>(
    id: OrderId,
    status: OrderStatus,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter,
{
    ensure_admin(user)?;

    match repo.update_order_status(id, status) {
        Ok(0) => Err(order_not_found()),
        Ok(_) => {
            log::info!("Order {id} moved to {status}");
            load_order(id, repo)
        }
        Err(RepositoryError::NotFound) => Err(ServiceError::not_found("Book not found")),
        Err(RepositoryError::InsufficientStock { available }) => Err(ServiceError::bad_request(
            format!("Cannot reopen order. Only {available} copies in stock."),
        )),
        Err(e) => Err(ServiceError::internal("update order status", e)),
    }
}

/// Delete an order, returning its reserved stock to the book.
pub fn delete_order<R>(id: OrderId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: OrderWriter,
{
    ensure_admin(user)?;

    match repo.delete_order(id) {
        Ok(0) => Err(order_not_found()),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::internal("delete order", e)),
    }
}

/// Cancel an order on behalf of its owner or an admin and release its stock.
pub fn cancel_order<R>(
    id: OrderId,
    reason: String,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter,
{
    let order = load_order(id, repo)?;

    let is_owner = order.email.as_str().eq_ignore_ascii_case(user.email.trim());
    if !is_owner && !user.is_admin() {
        return Err(ServiceError::forbidden(
            "You are not allowed to cancel this order",
        ));
    }

    match order.status {
        OrderStatus::Cancelled => {
            return Err(ServiceError::bad_request("Order is already cancelled"));
        }
        OrderStatus::Delivered => {
            return Err(ServiceError::bad_request("Cannot cancel a delivered order"));
        }
        _ => {}
    }

    match repo.cancel_order(id, &reason) {
        Ok(0) => Err(order_not_found()),
        Ok(_) => {
            log::info!("Order {id} cancelled: {reason}");
            load_order(id, repo)
        }
        Err(e) => Err(ServiceError::internal("cancel order", e)),
    }
}

pub fn cancel_reasons() -> &'static [&'static str] {
    &CANCEL_REASONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::ShippingAddress;
    use crate::domain::types::{
        BookCondition, PaymentType, PersonName, PhoneNumber, Price, Quantity,
    };
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{sample_admin, sample_book, sample_user};

    fn order_payload(quantity: i32, condition: BookCondition) -> PlaceOrderPayload {
        PlaceOrderPayload {
            customer_name: PersonName::new("Reader").unwrap(),
            email: Email::new("reader@example.com").unwrap(),
            mobile_number: PhoneNumber::new("555-0100").unwrap(),
            address: ShippingAddress {
                street: "1 Main St".into(),
                city: "Pune".into(),
                state: "MH".into(),
                country: "India".into(),
                pin_code: "411001".into(),
            },
            book_id: BookId::new(1).unwrap(),
            quantity: Quantity::new(quantity).unwrap(),
            price: Price::new(200.0).unwrap(),
            condition,
            payment_type: PaymentType::CashOnDelivery,
        }
    }

    fn stock(repo: &TestRepository) -> (i32, i32) {
        let book = &repo.books()[0];
        (book.quantity_new.get(), book.quantity_old.get())
    }

    #[test]
    fn placing_order_reserves_stock() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let view = place_order(order_payload(2, BookCondition::New), &sample_user(), &repo).unwrap();

        assert_eq!(view.order.status, OrderStatus::Shipped);
        assert_eq!(view.order.currency, "INR");
        assert_eq!(view.book_title, "Book 1");
        assert_eq!(stock(&repo), (3, 2));
    }

    #[test]
    fn insufficient_stock_names_condition() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let result = place_order(order_payload(3, BookCondition::Old), &sample_user(), &repo);
        assert_eq!(
            result,
            Err(ServiceError::bad_request(
                "Insufficient old stock. Only 2 available."
            ))
        );
        assert_eq!(stock(&repo), (5, 2));
        assert!(repo.orders().is_empty());
    }

    #[test]
    fn cancel_releases_stock_once() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let view = place_order(order_payload(2, BookCondition::New), &sample_user(), &repo).unwrap();
        let id = view.order.id;

        let cancelled = cancel_order(id, "Other".into(), &sample_user(), &repo).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.cancel_reason.as_deref(), Some("Other"));
        assert_eq!(stock(&repo), (5, 2));

        assert_eq!(
            cancel_order(id, "Other".into(), &sample_user(), &repo),
            Err(ServiceError::bad_request("Order is already cancelled"))
        );
        assert_eq!(stock(&repo), (5, 2));
    }

    #[test]
    fn only_owner_or_admin_may_cancel() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let view = place_order(order_payload(1, BookCondition::New), &sample_user(), &repo).unwrap();
        let id = view.order.id;

        let mut stranger = sample_user();
        stranger.email = "stranger@example.com".into();
        assert!(matches!(
            cancel_order(id, "Other".into(), &stranger, &repo),
            Err(ServiceError::Forbidden(_))
        ));

        update_order_status(id, OrderStatus::Delivered, &sample_admin(), &repo).unwrap();
        assert_eq!(
            cancel_order(id, "Other".into(), &sample_admin(), &repo),
            Err(ServiceError::bad_request("Cannot cancel a delivered order"))
        );
    }

    #[test]
    fn delete_restores_stock_and_lists_by_email() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let view = place_order(order_payload(4, BookCondition::New), &sample_user(), &repo).unwrap();

        assert_eq!(my_orders(&sample_user(), &repo).unwrap().len(), 1);
        assert!(my_orders(&sample_admin(), &repo).unwrap().is_empty());
        assert_eq!(list_orders(&sample_admin(), &repo).unwrap().len(), 1);

        delete_order(view.order.id, &sample_admin(), &repo).unwrap();
        assert_eq!(stock(&repo), (5, 2));
        assert_eq!(
            delete_order(view.order.id, &sample_admin(), &repo),
            Err(order_not_found())
        );
    }

    #[test]
    fn admin_status_changes_track_stock() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let id = place_order(order_payload(2, BookCondition::New), &sample_user(), &repo)
            .unwrap()
            .order
            .id;

        update_order_status(id, OrderStatus::Cancelled, &sample_admin(), &repo).unwrap();
        assert_eq!(stock(&repo), (5, 2));

        update_order_status(id, OrderStatus::Shipped, &sample_admin(), &repo).unwrap();
        assert_eq!(stock(&repo), (3, 2));

        update_order_status(id, OrderStatus::Cancelled, &sample_admin(), &repo).unwrap();
        delete_order(id, &sample_admin(), &repo).unwrap();
        assert_eq!(stock(&repo), (5, 2));
    }

    #[test]
    fn reopening_without_stock_is_rejected() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        let first = place_order(order_payload(3, BookCondition::New), &sample_user(), &repo)
            .unwrap()
            .order
            .id;
        update_order_status(first, OrderStatus::Cancelled, &sample_admin(), &repo).unwrap();
        place_order(order_payload(4, BookCondition::New), &sample_user(), &repo).unwrap();

        assert_eq!(
            update_order_status(first, OrderStatus::Processing, &sample_admin(), &repo),
            Err(ServiceError::bad_request(
                "Cannot reopen order. Only 1 copies in stock."
            ))
        );
        assert_eq!(stock(&repo), (1, 2));
    }

    #[test]
    fn deleted_book_renders_as_unknown() {
        let repo = TestRepository::new().with_books(vec![sample_book(1, "fiction")]);
        place_order(order_payload(1, BookCondition::New), &sample_user(), &repo).unwrap();
        crate::repository::BookWriter::delete_book(&repo, BookId::new(1).unwrap()).unwrap();

        let views = list_orders(&sample_admin(), &repo).unwrap();
        assert_eq!(views[0].book_title, crate::dto::views::UNKNOWN_BOOK);
        assert_eq!(cancel_reasons().len(), 8);
    }
}
