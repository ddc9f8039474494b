//! Request bodies and their validated payloads.
//!
//! Every handler deserializes a `*Form`, then converts it with `TryFrom`
//! into a payload built from domain types. Conversion runs `validator`
//! rules first and domain type constraints second.

use serde::Deserialize;

use crate::domain::types::{Tag, TypeConstraintError};

pub mod auth;
pub mod book_requests;
pub mod books;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod otp;
pub mod payments;
pub mod reviews;
pub mod settings;
pub mod subscribers;

/// Tags arrive either as a JSON array or a single comma-separated string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TagList {
    Many(Vec<String>),
    Joined(String),
}

impl TagList {
    /// Slug every tag, dropping blanks and duplicates while keeping order.
    pub fn into_tags(self) -> Result<Vec<Tag>, TypeConstraintError> {
        let raw = match self {
            TagList::Many(items) => items,
            TagList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };

        let mut tags: Vec<Tag> = Vec::with_capacity(raw.len());
        for item in raw.iter().filter(|item| !item.trim().is_empty()) {
            let tag = Tag::new(item)?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}

/// Treat blank optional strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_list_accepts_both_shapes() {
        let joined: TagList = serde_json::from_str(r#""Best Sellers, classics,,classics""#).unwrap();
        let tags = joined.into_tags().unwrap();
        assert_eq!(
            tags.iter().map(Tag::as_str).collect::<Vec<_>>(),
            vec!["best-sellers", "classics"]
        );

        let many: TagList = serde_json::from_str(r#"["Exam Prep", " "]"#).unwrap();
        assert_eq!(many.into_tags().unwrap().len(), 1);
    }

    #[test]
    fn non_blank_drops_whitespace() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".into()));
    }
}
