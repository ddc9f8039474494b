use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::email_log::{EmailLog, NewEmailLog};
use crate::domain::subscriber::{NewSubscriber, NotificationPreferences, Subscriber};
use crate::domain::types::{Email, EmailLogStatus, SubscriberId, SubscriberStatus};
use crate::forms::subscribers::{
    BulkEmailPayload, NotificationsForm, SubscriberMailPayload, SubscriberPayload,
};
use crate::mail::{EmailMessage, Mailer};
use crate::repository::{
    EmailLogReader, EmailLogWriter, RepositoryError, SubscriberReader, SubscriberWriter,
};

use super::{ServiceError, ServiceResult, ensure_admin, now};

fn subscriber_not_found() -> ServiceError {
    ServiceError::not_found("Subscriber not found")
}

/// Delivery outcome for one recipient of a bulk email.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipientResult {
    pub email: Email,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BulkEmailReport {
    pub results: Vec<RecipientResult>,
    pub log: EmailLog,
}

impl BulkEmailReport {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

fn load_subscriber<R>(id: SubscriberId, repo: &R) -> ServiceResult<Subscriber>
where
    R: SubscriberReader,
{
    match repo.get_subscriber_by_id(id) {
        Ok(Some(subscriber)) => Ok(subscriber),
        Ok(None) => Err(subscriber_not_found()),
        Err(e) => Err(ServiceError::internal("get subscriber", e)),
    }
}

fn save_subscriber<R>(subscriber: &Subscriber, repo: &R) -> ServiceResult<()>
where
    R: SubscriberWriter,
{
    match repo.update_subscriber(subscriber) {
        Ok(0) => Err(subscriber_not_found()),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::internal("update subscriber", e)),
    }
}

/// Public newsletter signup.
pub fn add_subscriber<R>(payload: SubscriberPayload, repo: &R) -> ServiceResult<Subscriber>
where
    R: SubscriberWriter,
{
    let timestamp = now();
    let subscriber = NewSubscriber {
        name: payload.name,
        email: payload.email,
        status: payload.status,
        notifications: payload.notifications,
        created_at: timestamp,
        updated_at: timestamp,
    };

    match repo.create_subscriber(&subscriber) {
        Ok(created) => Ok(created),
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(
            "Subscriber already exists".to_string(),
        )),
        Err(e) => Err(ServiceError::internal("create subscriber", e)),
    }
}

pub fn list_subscribers<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Subscriber>>
where
    R: SubscriberReader,
{
    ensure_admin(user)?;
    repo.list_subscribers()
        .map_err(|e| ServiceError::internal("list subscribers", e))
}

pub fn update_status<R>(
    id: SubscriberId,
    status: SubscriberStatus,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Subscriber>
where
    R: SubscriberReader + SubscriberWriter,
{
    ensure_admin(user)?;

    let mut subscriber = load_subscriber(id, repo)?;
    subscriber.status = status;
    subscriber.updated_at = now();
    save_subscriber(&subscriber, repo)?;
    Ok(subscriber)
}

pub fn update_notifications<R>(
    id: SubscriberId,
    form: NotificationsForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Subscriber>
where
    R: SubscriberReader + SubscriberWriter,
{
    ensure_admin(user)?;

    let mut subscriber = load_subscriber(id, repo)?;
    subscriber.notifications = form.apply(subscriber.notifications);
    subscriber.updated_at = now();
    save_subscriber(&subscriber, repo)?;
    Ok(subscriber)
}

pub fn delete_subscriber<R>(id: SubscriberId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: SubscriberWriter,
{
    ensure_admin(user)?;

    match repo.delete_subscriber(id) {
        Ok(0) => Err(subscriber_not_found()),
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::internal("delete subscriber", e)),
    }
}

/// Add the address as an active subscriber (or refresh its name) and mail it.
pub async fn send_to_subscriber<R>(
    payload: SubscriberMailPayload,
    user: &AuthenticatedUser,
    repo: &R,
    mailer: &dyn Mailer,
) -> ServiceResult<Subscriber>
where
    R: SubscriberReader + SubscriberWriter,
{
    ensure_admin(user)?;

    let subscriber = match repo.get_subscriber_by_email(&payload.email) {
        Ok(Some(mut existing)) => {
            existing.name = payload.name;
            existing.updated_at = now();
            save_subscriber(&existing, repo)?;
            existing
        }
        Ok(None) => {
            let timestamp = now();
            repo.create_subscriber(&NewSubscriber {
                name: payload.name,
                email: payload.email,
                status: SubscriberStatus::Active,
                notifications: NotificationPreferences::default(),
                created_at: timestamp,
                updated_at: timestamp,
            })
            .map_err(|e| ServiceError::internal("create subscriber", e))?
        }
        Err(e) => return Err(ServiceError::internal("get subscriber", e)),
    };

    let message = EmailMessage::text(
        subscriber.email.as_str(),
        payload.subject.as_str(),
        payload.body,
    );
    mailer.send(message).await.map_err(|e| {
        log::error!("Failed to mail subscriber {}: {e}", subscriber.email);
        ServiceError::Upstream("Failed to send email".into())
    })?;
    Ok(subscriber)
}

/// Mail every recipient and store one log entry for the dispatch. Individual
/// failures are reported per recipient rather than aborting the batch.
pub async fn send_bulk_email<R>(
    payload: BulkEmailPayload,
    user: &AuthenticatedUser,
    repo: &R,
    mailer: &dyn Mailer,
) -> ServiceResult<BulkEmailReport>
where
    R: EmailLogWriter,
{
    ensure_admin(user)?;

    let mut results = Vec::with_capacity(payload.recipients.len());
    for recipient in &payload.recipients {
        let message = EmailMessage::text(
            recipient.as_str(),
            payload.subject.as_str(),
            payload.body.clone(),
        );
        let outcome = mailer.send(message).await;
        if let Err(e) = &outcome {
            log::warn!("Bulk email to {recipient} failed: {e}");
        }
        results.push(RecipientResult {
            email: recipient.clone(),
            success: outcome.is_ok(),
            error: outcome.err().map(|e| e.to_string()),
        });
    }

    let failures: Vec<String> = results
        .iter()
        .filter_map(|r| r.error.as_ref().map(|e| format!("{}: {e}", r.email)))
        .collect();
    let entry = NewEmailLog {
        subject: payload.subject.into_inner(),
        recipients: payload.recipients,
        status: if failures.is_empty() {
            EmailLogStatus::Success
        } else {
            EmailLogStatus::Failed
        },
        error: (!failures.is_empty()).then(|| failures.join("; ")),
        timestamp: now(),
    };
    let log = repo
        .create_email_log(&entry)
        .map_err(|e| ServiceError::internal("store email log", e))?;

    log::info!(
        "Bulk email '{}' sent to {} of {} recipients",
        log.subject,
        results.len() - failures.len(),
        results.len()
    );
    Ok(BulkEmailReport { results, log })
}

pub fn email_logs<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<EmailLog>>
where
    R: EmailLogReader,
{
    ensure_admin(user)?;
    repo.list_email_logs()
        .map_err(|e| ServiceError::internal("list email logs", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailSubject, PersonName};
    use crate::repository::test::TestRepository;
    use crate::services::fixtures::{RecordingMailer, sample_admin, sample_user};

    fn signup(email: &str) -> SubscriberPayload {
        SubscriberPayload {
            name: PersonName::new("Meera").unwrap(),
            email: Email::new(email).unwrap(),
            status: SubscriberStatus::Inactive,
            notifications: NotificationPreferences::default(),
        }
    }

    #[test]
    fn duplicate_signup_conflicts() {
        let repo = TestRepository::new();
        add_subscriber(signup("meera@example.com"), &repo).unwrap();
        assert!(matches!(
            add_subscriber(signup("meera@example.com"), &repo),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn admin_updates_status_and_preferences() {
        let repo = TestRepository::new();
        let created = add_subscriber(signup("meera@example.com"), &repo).unwrap();

        let active =
            update_status(created.id, SubscriberStatus::Active, &sample_admin(), &repo).unwrap();
        assert_eq!(active.status, SubscriberStatus::Active);

        let form = NotificationsForm {
            push: Some(true),
            email: None,
        };
        let updated = update_notifications(created.id, form, &sample_admin(), &repo).unwrap();
        assert!(updated.notifications.push);
        assert!(updated.notifications.email);

        assert!(matches!(
            delete_subscriber(created.id, &sample_user(), &repo),
            Err(ServiceError::Forbidden(_))
        ));
        delete_subscriber(created.id, &sample_admin(), &repo).unwrap();
        assert!(list_subscribers(&sample_admin(), &repo).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn send_to_subscriber_upserts_then_mails() {
        let repo = TestRepository::new();
        let mailer = RecordingMailer::default();
        let payload = SubscriberMailPayload {
            name: PersonName::new("Meera").unwrap(),
            email: Email::new("meera@example.com").unwrap(),
            subject: EmailSubject::new("New arrivals").unwrap(),
            body: "Fresh stock this week".into(),
        };

        let subscriber = send_to_subscriber(payload.clone(), &sample_admin(), &repo, &mailer)
            .await
            .unwrap();
        assert_eq!(subscriber.status, SubscriberStatus::Active);
        send_to_subscriber(payload, &sample_admin(), &repo, &mailer)
            .await
            .unwrap();

        assert_eq!(list_subscribers(&sample_admin(), &repo).unwrap().len(), 1);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[actix_web::test]
    async fn bulk_email_logs_partial_failure() {
        let repo = TestRepository::new();
        let mailer = RecordingMailer::failing_for("bounce@example.com");
        let payload = BulkEmailPayload {
            subject: EmailSubject::new("Sale").unwrap(),
            body: "Everything 10% off".into(),
            recipients: vec![
                Email::new("meera@example.com").unwrap(),
                Email::new("bounce@example.com").unwrap(),
            ],
        };

        let report = send_bulk_email(payload, &sample_admin(), &repo, &mailer)
            .await
            .unwrap();
        assert_eq!(report.failed(), 1);
        assert_eq!(report.log.status, EmailLogStatus::Failed);
        assert!(report.log.error.as_deref().unwrap().contains("bounce@example.com"));

        let logs = email_logs(&sample_admin(), &repo).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].recipients.len(), 2);
        assert_eq!(mailer.sent().len(), 1);
    }
}
