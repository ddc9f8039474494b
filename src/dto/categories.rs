//! In-memory category tree assembled from the flat category and book lists.
//!
//! Nodes live in an index arena; parent/child links are arena indices so the
//! tree can be built in one pass over path-ordered categories and rendered
//! from any node.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::book::Book;
use crate::domain::category::Category;
use crate::domain::pricing::{DiscountTable, PricedBook};
use crate::domain::types::{BookId, CategoryId, CategoryPath};

/// Category with its nested children and the priced books filed directly
/// under it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub child_ids: Vec<CategoryId>,
    pub book_ids: Vec<BookId>,
    pub children: Vec<CategoryNode>,
    pub books: Vec<PricedBook>,
}

#[derive(Debug)]
struct ArenaNode {
    category: Category,
    children: Vec<usize>,
    books: Vec<usize>,
}

#[derive(Debug)]
pub struct CategoryTree {
    nodes: Vec<ArenaNode>,
    roots: Vec<usize>,
    by_path: HashMap<CategoryPath, usize>,
    books: Vec<PricedBook>,
}

impl CategoryTree {
    /// Build the tree. Categories whose parent is missing are treated as
    /// roots; books whose path names no category are left out.
    pub fn build(mut categories: Vec<Category>, books: Vec<Book>) -> Self {
        categories.sort_by(|a, b| a.path.cmp(&b.path));
        let discounts = DiscountTable::from_categories(&categories);

        let mut tree = Self {
            nodes: Vec::with_capacity(categories.len()),
            roots: Vec::new(),
            by_path: HashMap::with_capacity(categories.len()),
            books: Vec::with_capacity(books.len()),
        };

        for category in categories {
            let index = tree.nodes.len();
            let parent = category
                .path
                .parent()
                .and_then(|parent| tree.by_path.get(&parent).copied());
            match parent {
                Some(parent) => tree.nodes[parent].children.push(index),
                None => tree.roots.push(index),
            }
            tree.by_path.insert(category.path.clone(), index);
            tree.nodes.push(ArenaNode {
                category,
                children: Vec::new(),
                books: Vec::new(),
            });
        }

        for book in books {
            let Some(&owner) = tree.by_path.get(&book.category_path) else {
                continue;
            };
            tree.nodes[owner].books.push(tree.books.len());
            tree.books.push(PricedBook::new(book, &discounts));
        }

        tree
    }

    pub fn roots(&self) -> Vec<CategoryNode> {
        self.roots.iter().map(|&index| self.render(index)).collect()
    }

    pub fn subtree(&self, path: &CategoryPath) -> Option<CategoryNode> {
        self.by_path.get(path).map(|&index| self.render(index))
    }

    fn render(&self, index: usize) -> CategoryNode {
        let node = &self.nodes[index];
        CategoryNode {
            category: node.category.clone(),
            child_ids: node
                .children
                .iter()
                .map(|&child| self.nodes[child].category.id)
                .collect(),
            book_ids: node.books.iter().map(|&book| self.books[book].book.id).collect(),
            children: node.children.iter().map(|&child| self.render(child)).collect(),
            books: node.books.iter().map(|&book| self.books[book].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        BookCondition, BookTitle, CategoryName, DiscountPercent, Price, StockQuantity,
    };
    use chrono::DateTime;

    fn sample_category(id: i32, path: &str, discount: f64) -> Category {
        let path = CategoryPath::new(path).unwrap();
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(path.last_segment()).unwrap(),
            parent_id: None,
            path,
            tags: vec![],
            seo_title: None,
            seo_description: None,
            discount: DiscountPercent::new(discount).unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_book(id: i32, path: &str) -> Book {
        Book {
            id: BookId::new(id).unwrap(),
            title: BookTitle::new(format!("Book {id}")).unwrap(),
            category_path: CategoryPath::new(path).unwrap(),
            tags: vec![],
            seo_title: None,
            seo_description: None,
            price: Some(Price::new(100.0).unwrap()),
            description: None,
            estimated_delivery: None,
            condition: BookCondition::New,
            author: None,
            publisher: None,
            image_url: None,
            quantity_new: StockQuantity::new(1).unwrap(),
            quantity_old: StockQuantity::new(0).unwrap(),
            discount_new: DiscountPercent::ZERO,
            discount_old: DiscountPercent::ZERO,
            is_best_seller: false,
            is_new_arrival: false,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn nests_children_and_prices_books() {
        let tree = CategoryTree::build(
            vec![
                sample_category(3, "school/class-10/maths", 0.0),
                sample_category(1, "school", 0.0),
                sample_category(2, "school/class-10", 20.0),
                sample_category(4, "fiction", 0.0),
            ],
            vec![
                sample_book(1, "school/class-10/maths"),
                sample_book(2, "fiction"),
                sample_book(3, "nowhere"),
            ],
        );

        let roots = tree.roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].category.path.as_str(), "fiction");
        assert_eq!(roots[0].book_ids, vec![BookId::new(2).unwrap()]);

        let school = &roots[1];
        assert_eq!(school.child_ids, vec![CategoryId::new(2).unwrap()]);
        let maths = &school.children[0].children[0];
        assert_eq!(maths.books[0].effective_discount, 20.0);
        assert_eq!(maths.books[0].discounted_price, Some(80.0));
    }

    #[test]
    fn subtree_starts_at_requested_path() {
        let tree = CategoryTree::build(
            vec![
                sample_category(1, "fiction", 0.0),
                sample_category(2, "fiction/scifi", 0.0),
            ],
            vec![sample_book(1, "fiction/scifi")],
        );
        let node = tree
            .subtree(&CategoryPath::new("fiction/scifi").unwrap())
            .unwrap();
        assert!(node.children.is_empty());
        assert_eq!(node.books.len(), 1);
        assert!(tree.subtree(&CategoryPath::new("drama").unwrap()).is_none());
    }
}
