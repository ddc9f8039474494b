use diesel::prelude::*;

use crate::domain::settings::{NewSiteSettings, SiteSettings};
use crate::models::settings::{
    NewSiteSettings as DbNewSiteSettings, SiteSettings as DbSiteSettings,
};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, SettingsReader, SettingsWriter,
};

impl SettingsReader for DieselRepository {
    fn get_settings(&self) -> RepositoryResult<Option<SiteSettings>> {
        use crate::schema::site_settings;

        let mut conn = self.conn()?;

        let settings = site_settings::table
            .order(site_settings::id.asc())
            .first::<DbSiteSettings>(&mut conn)
            .optional()?;

        Ok(settings.map(TryInto::try_into).transpose()?)
    }
}

impl SettingsWriter for DieselRepository {
    fn create_settings(&self, settings: &NewSiteSettings) -> RepositoryResult<SiteSettings> {
        use crate::schema::site_settings;

        let mut conn = self.conn()?;
        let db_settings: DbNewSiteSettings = settings.clone().into();

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = site_settings::table
                .count()
                .get_result::<i64>(conn)?;
            if existing > 0 {
                return Err(RepositoryError::Conflict(
                    "settings already exist".to_string(),
                ));
            }

            Ok(diesel::insert_into(site_settings::table)
                .values(&db_settings)
                .get_result::<DbSiteSettings>(conn)?)
        })?;

        Ok(created.try_into()?)
    }

    fn update_settings(&self, settings: &SiteSettings) -> RepositoryResult<usize> {
        use crate::schema::site_settings;

        let mut conn = self.conn()?;
        let changes = DbNewSiteSettings::from(settings);

        let affected = diesel::update(site_settings::table.find(settings.id.get()))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_settings(&self) -> RepositoryResult<usize> {
        use crate::schema::site_settings;

        let mut conn = self.conn()?;
        let affected = diesel::delete(site_settings::table).execute(&mut conn)?;
        Ok(affected)
    }
}
