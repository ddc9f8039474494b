use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::types::{
    CategoryId, CategoryName, CategoryPath, DiscountPercent, Tag, TypeConstraintError,
};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub path: String,
    pub parent_id: Option<i32>,
    pub tags: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub path: String,
    pub parent_id: Option<i32>,
    pub tags: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full-row changeset written when a category is edited or renamed.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::categories, treat_none_as_null = true)]
pub struct CategoryChanges {
    pub name: String,
    pub path: String,
    pub tags: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: f64,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            path: CategoryPath::new(&category.path)?,
            parent_id: category.parent_id.map(CategoryId::new).transpose()?,
            tags: Tag::parse_list(&category.tags)?,
            seo_title: category.seo_title,
            seo_description: category.seo_description,
            discount: DiscountPercent::new(category.discount)?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name: category.name.into_inner(),
            path: category.path.into(),
            parent_id: category.parent_id.map(CategoryId::get),
            tags: Tag::join_list(&category.tags),
            seo_title: category.seo_title,
            seo_description: category.seo_description,
            discount: category.discount.get(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<&DomainCategory> for CategoryChanges {
    fn from(category: &DomainCategory) -> Self {
        Self {
            name: category.name.as_str().to_string(),
            path: category.path.as_str().to_string(),
            tags: Tag::join_list(&category.tags),
            seo_title: category.seo_title.clone(),
            seo_description: category.seo_description.clone(),
            discount: category.discount.get(),
            updated_at: category.updated_at,
        }
    }
}
