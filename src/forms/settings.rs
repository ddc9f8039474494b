use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::settings::{DEFAULT_API_KEY, SiteSettingsUpdate};
use crate::domain::types::TypeConstraintError;
use crate::forms::non_blank;

#[derive(Debug, Error)]
pub enum SettingsFormError {
    #[error("Settings form validation failed: {0}")]
    Validation(String),
    #[error("Settings form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SettingsFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SettingsFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingsForm {
    #[serde(default)]
    pub logo: Option<String>,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub meta_description: String,
    #[validate(length(min = 1))]
    pub meta_keywords: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub maintenance_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSettingsPayload {
    pub logo: Option<String>,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub api_key: String,
    pub maintenance_mode: bool,
}

impl TryFrom<CreateSettingsForm> for CreateSettingsPayload {
    type Error = SettingsFormError;

    fn try_from(value: CreateSettingsForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            logo: non_blank(value.logo),
            title: value.title.trim().to_string(),
            meta_description: value.meta_description.trim().to_string(),
            meta_keywords: value.meta_keywords.trim().to_string(),
            api_key: non_blank(value.api_key).unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
            maintenance_mode: value.maintenance_mode,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsForm {
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub meta_description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub maintenance_mode: Option<bool>,
}

impl TryFrom<UpdateSettingsForm> for SiteSettingsUpdate {
    type Error = SettingsFormError;

    fn try_from(value: UpdateSettingsForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            logo: value.logo,
            title: value.title,
            meta_description: value.meta_description,
            meta_keywords: value.meta_keywords,
            api_key: value.api_key,
            maintenance_mode: value.maintenance_mode,
        })
    }
}
