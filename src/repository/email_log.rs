use diesel::prelude::*;

use crate::domain::email_log::{EmailLog, NewEmailLog};
use crate::models::email_log::{EmailLog as DbEmailLog, NewEmailLog as DbNewEmailLog};
use crate::repository::{DieselRepository, EmailLogReader, EmailLogWriter, RepositoryResult};

impl EmailLogReader for DieselRepository {
    fn list_email_logs(&self) -> RepositoryResult<Vec<EmailLog>> {
        use crate::schema::email_logs;

        let mut conn = self.conn()?;

        let items = email_logs::table
            .order((email_logs::created_at.desc(), email_logs::id.desc()))
            .load::<DbEmailLog>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<EmailLog>, _>>()?;

        Ok(items)
    }
}

impl EmailLogWriter for DieselRepository {
    fn create_email_log(&self, log: &NewEmailLog) -> RepositoryResult<EmailLog> {
        use crate::schema::email_logs;

        let mut conn = self.conn()?;
        let db_log: DbNewEmailLog = log.clone().into();

        let created = diesel::insert_into(email_logs::table)
            .values(&db_log)
            .get_result::<DbEmailLog>(&mut conn)?;

        Ok(created.try_into()?)
    }
}
