//! Short-lived one-time passcodes keyed by email address.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::Rng;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires_at: Instant,
}

/// In-process passcode store. Entries expire after the configured TTL and
/// are purged whenever a new code is issued.
#[derive(Debug)]
pub struct OtpStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, OtpEntry>>,
}

impl OtpStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Generate and remember a fresh 6-digit code for `email`, replacing any
    /// previous one.
    pub fn issue(&self, email: &str) -> String {
        let code = rand::thread_rng().gen_range(100_000..1_000_000).to_string();
        self.insert_at(email, code.clone(), Instant::now());
        code
    }

    fn insert_at(&self, email: &str, code: String, now: Instant) {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            email.to_string(),
            OtpEntry {
                code,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Consume the code for `email` if it matches and has not expired.
    pub fn verify(&self, email: &str, code: &str) -> bool {
        self.verify_at(email, code, Instant::now())
    }

    fn verify_at(&self, email: &str, code: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(email) {
            Some(entry) if entry.expires_at <= now => {
                entries.remove(email);
                false
            }
            Some(entry) if entry.code == code.trim() => {
                entries.remove(email);
                true
            }
            _ => false,
        }
    }

    /// Forget the code held for `email`, if any.
    pub fn revoke(&self, email: &str) -> bool {
        self.entries.lock().remove(email).is_some()
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_code_verifies_once() {
        let store = OtpStore::new(Duration::from_secs(60));
        let code = store.issue("reader@example.com");
        assert_eq!(code.len(), 6);
        assert!(!store.verify("reader@example.com", "000000x"));
        assert!(store.verify("reader@example.com", &code));
        assert!(!store.verify("reader@example.com", &code));
    }

    #[test]
    fn revoked_code_no_longer_verifies() {
        let store = OtpStore::new(Duration::from_secs(60));
        let code = store.issue("reader@example.com");
        assert!(store.revoke("reader@example.com"));
        assert!(!store.revoke("reader@example.com"));
        assert!(!store.verify("reader@example.com", &code));
    }

    #[test]
    fn expired_code_is_rejected_and_removed() {
        let store = OtpStore::new(Duration::from_secs(60));
        let issued = Instant::now();
        store.insert_at("reader@example.com", "123456".into(), issued);
        assert!(!store.verify_at(
            "reader@example.com",
            "123456",
            issued + Duration::from_secs(61)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn issuing_purges_expired_entries() {
        let store = OtpStore::new(Duration::from_secs(60));
        let issued = Instant::now();
        store.insert_at("old@example.com", "111111".into(), issued);
        store.insert_at(
            "new@example.com",
            "222222".into(),
            issued + Duration::from_secs(120),
        );
        assert_eq!(store.len(), 1);
    }
}
