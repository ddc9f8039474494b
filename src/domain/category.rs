use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, CategoryPath, DiscountPercent, Tag};

/// Deepest level (0-based) at which a category may carry its own discount.
/// Deeper categories inherit from their ancestors.
pub const MAX_DISCOUNT_DEPTH: usize = 2;

/// Category node positioned in the tree by `parent_id` and addressed by its
/// unique materialized `path`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub path: CategoryPath,
    pub parent_id: Option<CategoryId>,
    pub tags: Vec<Tag>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: DiscountPercent,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub path: CategoryPath,
    pub parent_id: Option<CategoryId>,
    pub tags: Vec<Tag>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: DiscountPercent,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Discount actually stored for a category at `path`.
pub fn discount_for_path(path: &CategoryPath, requested: DiscountPercent) -> DiscountPercent {
    if path.depth() <= MAX_DISCOUNT_DEPTH {
        requested
    } else {
        DiscountPercent::ZERO
    }
}

/// Row counts touched by a rename cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRewrite {
    pub categories: usize,
    pub books: usize,
}

/// Row counts removed by a delete cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtreeDeletion {
    pub categories: usize,
    pub books: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_is_dropped_below_level_two() {
        let ten = DiscountPercent::new(10.0).unwrap();
        let level_two = CategoryPath::new("school/class-10/maths").unwrap();
        let level_three = CategoryPath::new("school/class-10/maths/algebra").unwrap();
        assert_eq!(discount_for_path(&level_two, ten), ten);
        assert_eq!(
            discount_for_path(&level_three, ten),
            DiscountPercent::ZERO
        );
    }
}
