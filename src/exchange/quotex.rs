// src/exchange/quotex.rs
use crate::domain::models::CredentialRecord;
use std::fmt;
use std::path::Path;

/// Handle for a Quotex account session.
///
/// Binds the stored credentials; authentication, quotes and order
/// placement belong to the broker client and happen when the handle is
/// used, so building one never fails.
#[derive(Clone)]
pub struct QuotexSession {
    credentials: CredentialRecord,
}

impl QuotexSession {
    /// Build a session handle from a saved credential record
    pub fn create(record: &CredentialRecord) -> Self {
        log::debug!("Creating Quotex session handle for {}", record.email);
        Self {
            credentials: record.clone(),
        }
    }

    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    /// Browser profile directory the broker client keeps its session in
    pub fn user_data_dir(&self) -> &Path {
        &self.credentials.session_dir
    }

    pub fn credentials(&self) -> &CredentialRecord {
        &self.credentials
    }
}

impl fmt::Debug for QuotexSession {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("QuotexSession")
            .field("email", &self.credentials.email)
            .field("user_data_dir", &self.credentials.session_dir)
            .finish_non_exhaustive()
    }
}
