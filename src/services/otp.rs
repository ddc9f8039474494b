use crate::forms::otp::{SendOtpPayload, VerifyOtpPayload};
use crate::mail::{EmailMessage, Mailer};
use crate::otp::OtpStore;

use super::{ServiceError, ServiceResult};

/// Issue a passcode for the address and mail it. A failed delivery drops
/// the code again.
pub async fn send_otp(
    payload: SendOtpPayload,
    store: &OtpStore,
    mailer: &dyn Mailer,
) -> ServiceResult<()> {
    let code = store.issue(payload.email.as_str());

    let message = EmailMessage::text(
        payload.email.as_str(),
        "Your verification code",
        format!(
            "Hello {},\n\nYour verification code is {code}. It expires shortly, do not share it.\n",
            payload.name
        ),
    );

    if let Err(e) = mailer.send(message).await {
        log::error!("Failed to send OTP to {}: {e}", payload.email);
        store.revoke(payload.email.as_str());
        return Err(ServiceError::Upstream("Failed to send OTP".into()));
    }
    Ok(())
}

pub fn verify_otp(payload: VerifyOtpPayload, store: &OtpStore) -> ServiceResult<()> {
    if store.verify(payload.email.as_str(), &payload.otp) {
        Ok(())
    } else {
        Err(ServiceError::unauthorized("Invalid OTP"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::types::{Email, PersonName};
    use crate::services::fixtures::RecordingMailer;

    fn send_payload(email: &str) -> SendOtpPayload {
        SendOtpPayload {
            name: PersonName::new("Reader").unwrap(),
            email: Email::new(email).unwrap(),
        }
    }

    fn mailed_code(mailer: &RecordingMailer) -> String {
        mailer.sent()[0]
            .text
            .split_whitespace()
            .find(|word| word.len() == 7 && word.ends_with('.'))
            .map(|word| word.trim_end_matches('.').to_string())
            .unwrap()
    }

    #[actix_web::test]
    async fn mailed_code_verifies_once() {
        let store = OtpStore::new(Duration::from_secs(300));
        let mailer = RecordingMailer::default();
        send_otp(send_payload("reader@example.com"), &store, &mailer)
            .await
            .unwrap();

        let verify = |otp: String| VerifyOtpPayload {
            email: Email::new("reader@example.com").unwrap(),
            otp,
        };
        let code = mailed_code(&mailer);
        assert_eq!(verify_otp(verify("000000".into()), &store), Err(ServiceError::unauthorized("Invalid OTP")));
        assert!(verify_otp(verify(code.clone()), &store).is_ok());
        assert!(verify_otp(verify(code), &store).is_err());
    }

    #[actix_web::test]
    async fn failed_delivery_leaves_no_code() {
        let store = OtpStore::new(Duration::from_secs(300));
        let mailer = RecordingMailer::failing_for("reader@example.com");
        let result = send_otp(send_payload("reader@example.com"), &store, &mailer).await;
        assert!(matches!(result, Err(ServiceError::Upstream(_))));
        assert!(store.is_empty());
    }
}
