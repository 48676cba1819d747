//! In-memory credential store for tests and throwaway deployments.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::credential::CredentialRecord;

use super::{CredentialStore, StoreFuture};

/// [`CredentialStore`] that keeps everything in a process-local map.
///
/// Contents are lost when the instance is dropped.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `(user_id, secret)` pairs.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let records = entries
            .into_iter()
            .map(|(user_id, secret)| {
                let record = CredentialRecord::new(user_id.into(), secret.into());
                (record.user_id.clone(), record)
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<CredentialRecord>> {
        Box::pin(async move { Ok(self.records.read().await.get(user_id).cloned()) })
    }

    fn put<'a>(&'a self, user_id: &'a str, secret: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            match records.get_mut(user_id) {
                Some(existing) => {
                    secret.clone_into(&mut existing.secret);
                    existing.updated_at = Utc::now();
                }
                None => {
                    records.insert(
                        user_id.to_owned(),
                        CredentialRecord::new(user_id.to_owned(), secret.to_owned()),
                    );
                }
            }
            Ok(())
        })
    }

    fn delete<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async move { Ok(self.records.write().await.remove(user_id).is_some()) })
    }

    fn list(&self) -> StoreFuture<'_, Vec<CredentialRecord>> {
        Box::pin(async move {
            let mut all: Vec<CredentialRecord> =
                self.records.read().await.values().cloned().collect();
            all.sort_by(|a, b| a.user_id.cmp(&b.user_id));
            Ok(all)
        })
    }
}
