use std::sync::Arc;

use crate::models::error::AppError;
use crate::models::history::PhaseSession;
use crate::services::store::KvStore;

const SESSION_KEY: &str = "artmorph_session_v1";

/// Per-session handoff state between the upload and stylize steps.
/// No guarantees across sessions; a corrupt entry reads as absent.
pub struct SessionStore {
    store: Arc<dyn KvStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn key(session: &str) -> String {
        format!("{}:{}", SESSION_KEY, session)
    }

    pub async fn load(&self, session: &str) -> Result<Option<PhaseSession>, AppError> {
        let raw = self.store.get(&Self::key(session)).await?;
        Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session entry");
                None
            }
        }))
    }

    pub async fn save(&self, session: &str, state: &PhaseSession) -> Result<(), AppError> {
        let raw = serde_json::to_string(state)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;
        self.store.set(&Self::key(session), raw).await
    }

    pub async fn clear(&self, session: &str) -> Result<(), AppError> {
        self.store.remove(&Self::key(session)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::style::{Control, Style, Subject};
    use crate::services::store::MemoryStore;

    #[tokio::test]
    async fn save_load_clear() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(kv.clone());
        assert_eq!(sessions.load("s1").await.unwrap(), None);

        let state = PhaseSession {
            content_image: "data:image/png;base64,AAAA".to_string(),
            content_hash: None,
            style: Style::Noir,
            subject: Subject::Portrait,
            control: Control::Canny,
        };
        sessions.save("s1", &state).await.unwrap();
        assert_eq!(sessions.load("s1").await.unwrap(), Some(state));
        assert_eq!(sessions.load("s2").await.unwrap(), None);

        sessions.clear("s1").await.unwrap();
        assert_eq!(sessions.load("s1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_entry_reads_as_absent() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        kv.set("artmorph_session_v1:s1", "{not json".to_string()).await.unwrap();
        let sessions = SessionStore::new(kv);
        assert_eq!(sessions.load("s1").await.unwrap(), None);
    }
}
