//! Stored task API credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-user task API secret as persisted by a credential store.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Platform user identifier; primary key.
    pub user_id: String,
    /// Opaque task API token.
    pub secret: String,
    /// First time a credential was stored for this user.
    pub created_at: DateTime<Utc>,
    /// Most recent upsert.
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Construct a fresh record stamped with the current time.
    #[must_use]
    pub fn new(user_id: String, secret: String) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            secret,
            created_at: now,
            updated_at: now,
        }
    }

    /// Secret with everything but the last four characters hidden.
    #[must_use]
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.secret)
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("secret", &self.masked_secret())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Hide all but the trailing four characters of `secret`.
///
/// Secrets of four characters or fewer are hidden entirely.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("{}{tail}", "*".repeat(len - 4))
}
