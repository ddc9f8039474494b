//! Effective discount resolution along a book's category path.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::book::Book;
use crate::domain::category::Category;
use crate::domain::types::{CategoryPath, DiscountPercent};

/// Resolve the discount applied to `book`.
///
/// The category at the first two path segments wins when its discount is
/// positive, then the root category, then the book's own discount for its
/// condition. Levels below the second never override. `category_discount`
/// returns the stored discount of the category at a path, if any.
pub fn resolve_discount<F>(book: &Book, mut category_discount: F) -> DiscountPercent
where
    F: FnMut(&CategoryPath) -> Option<DiscountPercent>,
{
    let depth = book.category_path.depth();

    for segments in [2, 1] {
        if depth < segments {
            continue;
        }
        let inherited = book
            .category_path
            .ancestor(segments)
            .and_then(|ancestor| category_discount(&ancestor));
        if let Some(discount) = inherited.filter(|d| d.is_positive()) {
            return discount;
        }
    }

    book.own_discount()
}

/// Category discounts keyed by path, loaded once per request.
#[derive(Debug, Clone, Default)]
pub struct DiscountTable {
    by_path: HashMap<CategoryPath, DiscountPercent>,
}

impl DiscountTable {
    pub fn from_categories<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = &'a Category>,
    {
        Self {
            by_path: categories
                .into_iter()
                .map(|c| (c.path.clone(), c.discount))
                .collect(),
        }
    }

    pub fn get(&self, path: &CategoryPath) -> Option<DiscountPercent> {
        self.by_path.get(path).copied()
    }

    pub fn resolve(&self, book: &Book) -> DiscountPercent {
        resolve_discount(book, |path| self.get(path))
    }
}

/// Book together with its resolved discount and the resulting price.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedBook {
    #[serde(flatten)]
    pub book: Book,
    pub effective_discount: DiscountPercent,
    pub discounted_price: Option<f64>,
}

impl PricedBook {
    pub fn new(book: Book, discounts: &DiscountTable) -> Self {
        let effective_discount = discounts.resolve(&book);
        let discounted_price = book.price.map(|price| effective_discount.apply(price));
        Self {
            book,
            effective_discount,
            discounted_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BookCondition, BookId, BookTitle, Price, StockQuantity};
    use chrono::DateTime;

    fn sample_book(path: &str, condition: BookCondition) -> Book {
        Book {
            id: BookId::new(1).unwrap(),
            title: BookTitle::new("Algebra Basics").unwrap(),
            category_path: CategoryPath::new(path).unwrap(),
            tags: vec![],
            seo_title: None,
            seo_description: None,
            price: Some(Price::new(400.0).unwrap()),
            description: None,
            estimated_delivery: None,
            condition,
            author: None,
            publisher: None,
            image_url: None,
            quantity_new: StockQuantity::new(3).unwrap(),
            quantity_old: StockQuantity::new(1).unwrap(),
            discount_new: DiscountPercent::new(5.0).unwrap(),
            discount_old: DiscountPercent::new(30.0).unwrap(),
            is_best_seller: false,
            is_new_arrival: false,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn table(entries: &[(&str, f64)]) -> impl Fn(&CategoryPath) -> Option<DiscountPercent> {
        let map: HashMap<String, DiscountPercent> = entries
            .iter()
            .map(|(path, d)| (path.to_string(), DiscountPercent::new(*d).unwrap()))
            .collect();
        move |path: &CategoryPath| map.get(path.as_str()).copied()
    }

    #[test]
    fn second_level_ancestor_wins_over_book_discount() {
        let book = sample_book("school/class-10/maths", BookCondition::New);
        let lookup = table(&[("school", 10.0), ("school/class-10", 20.0)]);
        assert_eq!(resolve_discount(&book, lookup), 20.0);
    }

    #[test]
    fn root_discount_used_when_second_level_is_zero() {
        let book = sample_book("school/class-10/maths", BookCondition::Old);
        let lookup = table(&[("school", 10.0), ("school/class-10", 0.0)]);
        assert_eq!(resolve_discount(&book, lookup), 10.0);
    }

    #[test]
    fn two_segment_path_only_consults_root() {
        let book = sample_book("school/class-10", BookCondition::New);
        let lookup = table(&[("school", 0.0), ("school/class-10", 50.0)]);
        assert_eq!(resolve_discount(&book, lookup), 5.0);
    }

    #[test]
    fn falls_back_to_condition_discount() {
        let lookup = table(&[]);
        let new_book = sample_book("school/class-10/maths", BookCondition::New);
        let old_book = sample_book("school/class-10/maths", BookCondition::Old);
        assert_eq!(resolve_discount(&new_book, &lookup), 5.0);
        assert_eq!(resolve_discount(&old_book, &lookup), 30.0);
    }

    #[test]
    fn root_book_never_inherits() {
        let book = sample_book("school", BookCondition::New);
        let lookup = table(&[("school", 40.0)]);
        assert_eq!(resolve_discount(&book, lookup), 5.0);
    }

    #[test]
    fn priced_book_applies_effective_discount() {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        let category = Category {
            id: crate::domain::types::CategoryId::new(1).unwrap(),
            name: crate::domain::types::CategoryName::new("School").unwrap(),
            path: CategoryPath::new("school").unwrap(),
            parent_id: None,
            tags: vec![],
            seo_title: None,
            seo_description: None,
            discount: DiscountPercent::new(25.0).unwrap(),
            created_at: now,
            updated_at: now,
        };
        let discounts = DiscountTable::from_categories([&category]);
        let priced = PricedBook::new(
            sample_book("school/class-10", BookCondition::New),
            &discounts,
        );
        assert_eq!(priced.effective_discount, 25.0);
        assert_eq!(priced.discounted_price, Some(300.0));
    }
}
