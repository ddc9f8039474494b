use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    CategoryName, CategoryPath, CategorySlug, DiscountPercent, Tag, TypeConstraintError,
};
use crate::forms::{TagList, non_blank};

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub parent_path: Option<String>,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCategoryPayload {
    pub name: CategoryName,
    pub slug: CategorySlug,
    pub parent_path: Option<CategoryPath>,
    pub tags: Vec<Tag>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: DiscountPercent,
}

impl CreateCategoryPayload {
    /// Path the new category will occupy.
    pub fn path(&self) -> CategoryPath {
        match &self.parent_path {
            Some(parent) => parent.child(&self.slug),
            None => CategoryPath::root(&self.slug),
        }
    }
}

impl TryFrom<CreateCategoryForm> for CreateCategoryPayload {
    type Error = CategoryFormError;

    fn try_from(value: CreateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let parent_path = non_blank(value.parent_path)
            .map(|path| CategoryPath::new(&path))
            .transpose()?;

        Ok(Self {
            slug: CategorySlug::new(&value.name)?,
            name: CategoryName::new(value.name)?,
            parent_path,
            tags: value
                .tags
                .map(TagList::into_tags)
                .transpose()?
                .unwrap_or_default(),
            seo_title: non_blank(value.seo_title),
            seo_description: non_blank(value.seo_description),
            discount: value
                .discount
                .map(DiscountPercent::new)
                .transpose()?
                .unwrap_or(DiscountPercent::ZERO),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
}

/// Category edits; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCategoryPayload {
    pub rename: Option<(CategoryName, CategorySlug)>,
    pub tags: Option<Vec<Tag>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub discount: Option<DiscountPercent>,
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryPayload {
    type Error = CategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let rename = match value.name {
            Some(name) => Some((CategoryName::new(name.clone())?, CategorySlug::new(&name)?)),
            None => None,
        };

        Ok(Self {
            rename,
            tags: value.tags.map(TagList::into_tags).transpose()?,
            seo_title: value.seo_title,
            seo_description: value.seo_description,
            discount: value.discount.map(DiscountPercent::new).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTagForm {
    #[validate(length(min = 1))]
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddTagPayload {
    pub tag: Tag,
}

impl TryFrom<AddTagForm> for AddTagPayload {
    type Error = CategoryFormError;

    fn try_from(value: AddTagForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            tag: Tag::new(&value.tag)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_slugs_name_under_parent() {
        let form = CreateCategoryForm {
            name: "Science Fiction".into(),
            parent_path: Some("/Fiction/".into()),
            tags: Some(TagList::Joined("Space, Aliens".into())),
            seo_title: Some("  ".into()),
            seo_description: None,
            discount: Some(15.0),
        };

        let payload = CreateCategoryPayload::try_from(form).unwrap();
        assert_eq!(payload.path().as_str(), "fiction/science-fiction");
        assert_eq!(payload.name.as_str(), "Science Fiction");
        assert_eq!(payload.tags.len(), 2);
        assert_eq!(payload.seo_title, None);
        assert_eq!(payload.discount, 15.0);
    }

    #[test]
    fn blank_parent_creates_root() {
        let form = CreateCategoryForm {
            name: "Fiction".into(),
            parent_path: Some(" ".into()),
            tags: None,
            seo_title: None,
            seo_description: None,
            discount: None,
        };
        let payload = CreateCategoryPayload::try_from(form).unwrap();
        assert_eq!(payload.path().as_str(), "fiction");
        assert_eq!(payload.discount, DiscountPercent::ZERO);
    }

    #[test]
    fn rejects_out_of_range_discount_and_slashes() {
        let form = CreateCategoryForm {
            name: "Fiction".into(),
            parent_path: None,
            tags: None,
            seo_title: None,
            seo_description: None,
            discount: Some(120.0),
        };
        assert!(matches!(
            CreateCategoryPayload::try_from(form),
            Err(CategoryFormError::Validation(_))
        ));

        let form = CreateCategoryForm {
            name: "Fiction/Drama".into(),
            parent_path: None,
            tags: None,
            seo_title: None,
            seo_description: None,
            discount: None,
        };
        assert!(matches!(
            CreateCategoryPayload::try_from(form),
            Err(CategoryFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn update_payload_keeps_absent_fields() {
        let payload = UpdateCategoryPayload::try_from(UpdateCategoryForm {
            name: Some("Sci Fi".into()),
            ..Default::default()
        })
        .unwrap();
        let (name, slug) = payload.rename.unwrap();
        assert_eq!(name.as_str(), "Sci Fi");
        assert_eq!(slug.as_str(), "sci-fi");
        assert!(payload.tags.is_none());
        assert!(payload.discount.is_none());
    }
}
