use crate::auth::AuthenticatedUser;
use crate::domain::cart::NewCartItem;
use crate::domain::pricing::{DiscountTable, PricedBook};
use crate::domain::types::{BookCondition, BookId, UserId};
use crate::dto::views::{CartLineView, CartView};
use crate::forms::cart::CartItemPayload;
use crate::repository::{BookReader, CartReader, CartWriter, CategoryReader};

use super::{ServiceError, ServiceResult, session_user_id};

fn cart_view<R>(user_id: UserId, repo: &R) -> ServiceResult<CartView>
where
    R: CartReader + BookReader + CategoryReader,
{
    let items = repo
        .list_cart_items(user_id)
        .map_err(|e| ServiceError::internal("list cart items", e))?;
    let categories = repo
        .list_categories()
        .map_err(|e| ServiceError::internal("list categories", e))?;
    let table = DiscountTable::from_categories(&categories);

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let book = repo
            .get_book_by_id(item.book_id)
            .map_err(|e| ServiceError::internal("get book", e))?
            .map(|mut book| {
                // Price the copy in the condition the customer picked.
                book.condition = item.condition;
                PricedBook::new(book, &table)
            });
        lines.push(CartLineView { item, book });
    }
    Ok(CartView::new(lines))
}

pub fn get_cart<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<CartView>
where
    R: CartReader + BookReader + CategoryReader,
{
    cart_view(session_user_id(user)?, repo)
}

/// Add a line to the cart, merging with an existing line for the same book
/// and condition.
pub fn add_to_cart<R>(
    payload: CartItemPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + BookReader + CategoryReader,
{
    let user_id = session_user_id(user)?;

    match repo.get_book_by_id(payload.book_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::not_found("Book not found")),
        Err(e) => return Err(ServiceError::internal("get book", e)),
    }

    let item = NewCartItem {
        user_id,
        book_id: payload.book_id,
        condition: payload.condition,
        quantity: payload.quantity,
        stock: payload.stock,
    };
    repo.add_cart_item(&item)
        .map_err(|e| ServiceError::internal("add cart item", e))?;
    cart_view(user_id, repo)
}

pub fn update_cart<R>(
    payload: CartItemPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + BookReader + CategoryReader,
{
    let user_id = session_user_id(user)?;

    match repo.set_cart_item_quantity(
        user_id,
        payload.book_id,
        payload.condition,
        payload.quantity,
    ) {
        Ok(0) => Err(ServiceError::not_found("Item not found")),
        Ok(_) => cart_view(user_id, repo),
        Err(e) => Err(ServiceError::internal("update cart item", e)),
    }
}

/// Remove one line; removing a line that is not in the cart is a no-op.
pub fn remove_from_cart<R>(
    book_id: BookId,
    condition: BookCondition,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + BookReader + CategoryReader,
{
    let user_id = session_user_id(user)?;
    repo.remove_cart_item(user_id, book_id, condition)
        .map_err(|e| ServiceError::internal("remove cart item", e))?;
    cart_view(user_id, repo)
}

pub fn clear_cart<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + BookReader + CategoryReader,
{
    let user_id = session_user_id(user)?;
    repo.clear_cart(user_id)
        .map_err(|e| ServiceError::internal("clear cart", e))?;
    cart_view(user_id, repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Quantity;
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{sample_book, sample_category, sample_user};

    fn line(book_id: i32, condition: BookCondition, quantity: i32) -> CartItemPayload {
        CartItemPayload {
            book_id: BookId::new(book_id).unwrap(),
            condition,
            quantity: Quantity::new(quantity).unwrap(),
            stock: None,
        }
    }

    fn shop() -> TestRepository {
        TestRepository::new()
            .with_categories(vec![sample_category(1, "fiction", 0.0)])
            .with_books(vec![sample_book(1, "fiction"), sample_book(2, "fiction")])
    }

    #[test]
    fn adding_same_line_merges_quantity() {
        let repo = shop();
        add_to_cart(line(1, BookCondition::New, 1), &sample_user(), &repo).unwrap();
        let cart = add_to_cart(line(1, BookCondition::New, 2), &sample_user(), &repo).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_quantity, 3);

        let cart = add_to_cart(line(1, BookCondition::Old, 1), &sample_user(), &repo).unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn lines_are_priced_in_their_condition() {
        let repo = shop();
        let cart = add_to_cart(line(1, BookCondition::Old, 2), &sample_user(), &repo).unwrap();
        let book = cart.items[0].book.as_ref().unwrap();
        assert_eq!(book.effective_discount, 15.0);
        assert_eq!(cart.total_price, 340.0);
    }

    #[test]
    fn unknown_book_and_missing_line_are_not_found() {
        let repo = shop();
        assert_eq!(
            add_to_cart(line(99, BookCondition::New, 1), &sample_user(), &repo),
            Err(ServiceError::not_found("Book not found"))
        );
        assert_eq!(
            update_cart(line(1, BookCondition::New, 4), &sample_user(), &repo),
            Err(ServiceError::not_found("Item not found"))
        );
    }

    #[test]
    fn remove_and_clear_empty_the_cart() {
        let repo = shop();
        add_to_cart(line(1, BookCondition::New, 1), &sample_user(), &repo).unwrap();
        add_to_cart(line(2, BookCondition::New, 1), &sample_user(), &repo).unwrap();

        let cart = remove_from_cart(
            BookId::new(1).unwrap(),
            BookCondition::New,
            &sample_user(),
            &repo,
        )
        .unwrap();
        assert_eq!(cart.items.len(), 1);

        let cart = clear_cart(&sample_user(), &repo).unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_price, 0.0);
    }
}
