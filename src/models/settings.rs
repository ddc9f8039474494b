use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::settings::{
    NewSiteSettings as DomainNewSiteSettings, SiteSettings as DomainSiteSettings,
};
use crate::domain::types::TypeConstraintError;

/// Diesel model representing the `site_settings` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::site_settings)]
pub struct SiteSettings {
    pub id: i32,
    pub logo: Option<String>,
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub api_key: String,
    pub maintenance_mode: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`SiteSettings`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::site_settings, treat_none_as_null = true)]
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

impl TryFrom<SiteSettings> for DomainSiteSettings {
    type Error = TypeConstraintError;

    fn try_from(settings: SiteSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            id: settings.id.try_into()?,
            logo: settings.logo,
            title: settings.title,
            meta_description: settings.meta_description,
            meta_keywords: settings.meta_keywords,
            api_key: settings.api_key,
            maintenance_mode: settings.maintenance_mode,
            created_at: settings.created_at,
            updated_at: settings.updated_at,
        })
    }
}

impl From<DomainNewSiteSettings> for NewSiteSettings {
    fn from(settings: DomainNewSiteSettings) -> Self {
        Self {
            logo: settings.logo,
            title: settings.title,
            meta_description: settings.meta_description,
            meta_keywords: settings.meta_keywords,
            api_key: settings.api_key,
            maintenance_mode: settings.maintenance_mode,
            created_at: settings.created_at,
            updated_at: settings.updated_at,
        }
    }
}

impl From<&DomainSiteSettings> for NewSiteSettings {
    fn from(settings: &DomainSiteSettings) -> Self {
        Self {
            logo: settings.logo.clone(),
            title: settings.title.clone(),
            meta_description: settings.meta_description.clone(),
            meta_keywords: settings.meta_keywords.clone(),
            api_key: settings.api_key.clone(),
            maintenance_mode: settings.maintenance_mode,
            created_at: settings.created_at,
            updated_at: settings.updated_at,
        }
    }
}
