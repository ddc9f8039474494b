use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::SiteSettingsId;

pub const DEFAULT_API_KEY: &str = "Not set";

/// Storefront-wide settings; at most one record exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: SiteSettingsId,
    pub logo: Option<String>,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub api_key: String,
    pub maintenance_mode: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSiteSettings {
    pub logo: Option<String>,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub api_key: String,
    pub maintenance_mode: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSettingsUpdate {
    pub logo: Option<String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub api_key: Option<String>,
    pub maintenance_mode: Option<bool>,
}

impl SiteSettings {
    pub fn apply(&mut self, update: SiteSettingsUpdate) {
        if let Some(logo) = update.logo {
            self.logo = Some(logo);
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(meta_description) = update.meta_description {
            self.meta_description = meta_description;
        }
        if let Some(meta_keywords) = update.meta_keywords {
            self.meta_keywords = meta_keywords;
        }
        if let Some(api_key) = update.api_key {
            self.api_key = api_key;
        }
        if let Some(maintenance_mode) = update.maintenance_mode {
            self.maintenance_mode = maintenance_mode;
        }
    }
}
