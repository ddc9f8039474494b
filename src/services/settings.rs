use crate::auth::AuthenticatedUser;
use crate::domain::settings::{NewSiteSettings, SiteSettings, SiteSettingsUpdate};
use crate::forms::settings::CreateSettingsPayload;
use crate::repository::{RepositoryError, SettingsReader, SettingsWriter};

use super::{ServiceError, ServiceResult, ensure_admin, now};

fn settings_not_found() -> ServiceError {
    ServiceError::not_found("Settings not found")
}

pub fn create_settings<R>(
    payload: CreateSettingsPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SiteSettings>
where
    R: SettingsWriter,
{
    ensure_admin(user)?;

    let timestamp = now();
    let settings = NewSiteSettings {
        logo: payload.logo,
        title: payload.title,
        meta_description: payload.meta_description,
        meta_keywords: payload.meta_keywords,
        api_key: payload.api_key,
        maintenance_mode: payload.maintenance_mode,
        created_at: timestamp,
        updated_at: timestamp,
    };

    match repo.create_settings(&settings) {
        Ok(created) => Ok(created),
        Err(RepositoryError::Conflict(_)) => {
            Err(ServiceError::Conflict("Settings already exist".to_string()))
        }
        Err(e) => Err(ServiceError::internal("create settings", e)),
    }
}

/// Current settings, or `None` before they are first created.
pub fn get_settings<R>(repo: &R) -> ServiceResult<Option<SiteSettings>>
where
    R: SettingsReader,
{
    repo.get_settings()
        .map_err(|e| ServiceError::internal("get settings", e))
}

pub fn update_settings<R>(
    update: SiteSettingsUpdate,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SiteSettings>
where
    R: SettingsReader + SettingsWriter,
{
    ensure_admin(user)?;

    let mut settings = match repo.get_settings() {
        Ok(Some(settings)) => settings,
        Ok(None) => return Err(settings_not_found()),
        Err(e) => return Err(ServiceError::internal("get settings", e)),
    };
    settings.apply(update);
    settings.updated_at = now();

    match repo.update_settings(&settings) {
        Ok(0) => Err(settings_not_found()),
        Ok(_) => Ok(settings),
        Err(e) => Err(ServiceError::internal("update settings", e)),
    }
}

pub fn delete_settings<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: SettingsWriter,
{
    ensure_admin(user)?;

    match repo.delete_settings() {
        Ok(0) => Err(settings_not_found()),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::internal("delete settings", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::DEFAULT_API_KEY;
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{sample_admin, sample_user};

    fn payload() -> CreateSettingsPayload {
        CreateSettingsPayload {
            logo: None,
            title: "Harsh Pages".into(),
            meta_description: "Books for every class".into(),
            meta_keywords: "books,school".into(),
            api_key: DEFAULT_API_KEY.into(),
            maintenance_mode: false,
        }
    }

    #[test]
    fn settings_are_a_singleton() {
        let repo = TestRepository::new();
        assert_eq!(get_settings(&repo), Ok(None));

        create_settings(payload(), &sample_admin(), &repo).unwrap();
        assert_eq!(
            create_settings(payload(), &sample_admin(), &repo),
            Err(ServiceError::Conflict("Settings already exist".into()))
        );
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let repo = TestRepository::new();
        assert_eq!(
            update_settings(SiteSettingsUpdate::default(), &sample_admin(), &repo),
            Err(settings_not_found())
        );

        create_settings(payload(), &sample_admin(), &repo).unwrap();
        let update = SiteSettingsUpdate {
            maintenance_mode: Some(true),
            ..Default::default()
        };
        let updated = update_settings(update, &sample_admin(), &repo).unwrap();
        assert!(updated.maintenance_mode);
        assert_eq!(updated.title, "Harsh Pages");
        assert_eq!(updated.api_key, DEFAULT_API_KEY);
    }

    #[test]
    fn delete_requires_admin_and_existing_record() {
        let repo = TestRepository::new();
        create_settings(payload(), &sample_admin(), &repo).unwrap();
        assert!(matches!(
            delete_settings(&sample_user(), &repo),
            Err(ServiceError::Forbidden(_))
        ));
        delete_settings(&sample_admin(), &repo).unwrap();
        assert_eq!(delete_settings(&sample_admin(), &repo), Err(settings_not_found()));
    }
}
