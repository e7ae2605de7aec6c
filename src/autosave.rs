//! Debounced saving of hand-edited document HTML.
//!
//! Each edit replaces the pending content for its document and restarts
//! the quiet period; only the newest content is written once no further
//! edit arrives within `delay`.
//!
//! The pending map stays locked while a save is written, so a `discard`
//! issued for an explicit update waits for any in-flight autosave and the
//! explicit write lands last.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::models::document::{DocumentPatch, DocumentStore, StoreError};

struct Pending {
    revision: u64,
    owner_id: String,
    content: String,
}

pub struct Autosaver {
    store: Arc<dyn DocumentStore>,
    delay: Duration,
    revision: AtomicU64,
    pending: Arc<Mutex<HashMap<String, Pending>>>,
}

impl Autosaver {
    pub fn new(store: Arc<dyn DocumentStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            revision: AtomicU64::new(0),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Queues `content` as the latest edit of `document_id`.
    pub async fn queue(&self, owner_id: &str, document_id: &str, content: String) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.lock().await.insert(
            document_id.to_string(),
            Pending {
                revision,
                owner_id: owner_id.to_string(),
                content,
            },
        );

        let pending = Arc::clone(&self.pending);
        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let document_id = document_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut pending = pending.lock().await;
            let due = match pending.get(&document_id) {
                Some(entry) if entry.revision == revision => pending.remove(&document_id),
                _ => None,
            };
            if let Some(entry) = due {
                if let Err(error) = write(store.as_ref(), &document_id, entry).await {
                    error!(document_id = %document_id, %error, "autosave failed");
                }
            }
        });
    }

    /// Writes any pending edit of `document_id` immediately. Returns whether
    /// there was one.
    pub async fn flush(&self, document_id: &str) -> Result<bool, StoreError> {
        let mut pending = self.pending.lock().await;
        match pending.remove(document_id) {
            Some(entry) => write(self.store.as_ref(), document_id, entry).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Drops `owner_id`'s pending edit of `document_id` without writing it.
    /// Returns once no autosave of the document is being written.
    pub async fn discard(&self, owner_id: &str, document_id: &str) {
        let mut pending = self.pending.lock().await;
        if matches!(pending.get(document_id), Some(entry) if entry.owner_id == owner_id) {
            pending.remove(document_id);
        }
    }
}

async fn write(store: &dyn DocumentStore, document_id: &str, entry: Pending) -> Result<(), StoreError> {
    let patch = DocumentPatch {
        content: Some(entry.content),
        ..DocumentPatch::default()
    };
    store.update(&entry.owner_id, document_id, patch).await?;
    info!(document_id, owner = %entry.owner_id, "autosaved document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{
        DocumentKind, DocumentSummary, GeneratedDocument, MemoryDocumentStore, NewDocument, SavedDocument,
    };
    use serde_json::json;

    async fn setup(delay: Duration) -> (Arc<MemoryDocumentStore>, Autosaver, String) {
        let store = Arc::new(MemoryDocumentStore::new());
        let saved = store
            .save(NewDocument {
                owner_id: "alice".to_string(),
                name: "Doc".to_string(),
                kind: DocumentKind::Rams,
                content: "<p>v0</p>".to_string(),
                payload: json!({}),
            })
            .await
            .expect("save");
        let autosaver = Autosaver::new(store.clone(), delay);
        (store, autosaver, saved.id)
    }

    #[tokio::test]
    async fn bursts_of_edits_coalesce_into_one_save() {
        let (store, autosaver, id) = setup(Duration::from_millis(40)).await;
        for version in 1..=3 {
            autosaver.queue("alice", &id, format!("<p>v{version}</p>")).await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.update_count(), 1);
        let document = store.find("alice", &id).await.expect("find");
        assert_eq!(document.content, "<p>v3</p>");
    }

    #[tokio::test]
    async fn flush_writes_immediately_and_cancels_the_timer() {
        let (store, autosaver, id) = setup(Duration::from_millis(40)).await;
        autosaver.queue("alice", &id, "<p>edited</p>".to_string()).await;

        assert!(autosaver.flush(&id).await.expect("flush"));
        assert!(!autosaver.flush(&id).await.expect("flush"));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.update_count(), 1);
        let document = store.find("alice", &id).await.expect("find");
        assert_eq!(document.content, "<p>edited</p>");
    }

    #[tokio::test]
    async fn discarded_edits_are_never_written() {
        let (store, autosaver, id) = setup(Duration::from_millis(20)).await;
        autosaver.queue("alice", &id, "<p>gone</p>".to_string()).await;
        autosaver.discard("alice", &id).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test]
    async fn other_owners_cannot_discard_an_edit() {
        let (store, autosaver, id) = setup(Duration::from_millis(20)).await;
        autosaver.queue("alice", &id, "<p>kept</p>".to_string()).await;
        autosaver.discard("bob", &id).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let document = store.find("alice", &id).await.expect("find");
        assert_eq!(document.content, "<p>kept</p>");
    }

    /// Memory store whose first update takes `delay` to land.
    struct SlowStore {
        inner: MemoryDocumentStore,
        delay: Duration,
        calls: AtomicU64,
    }

    #[async_trait::async_trait]
    impl DocumentStore for SlowStore {
        async fn save(&self, document: NewDocument) -> Result<SavedDocument, StoreError> {
            self.inner.save(document).await
        }
        async fn update(&self, owner_id: &str, id: &str, patch: DocumentPatch) -> Result<(), StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.update(owner_id, id, patch).await
        }
        async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
            self.inner.delete(owner_id, id).await
        }
        async fn find(&self, owner_id: &str, id: &str) -> Result<GeneratedDocument, StoreError> {
            self.inner.find(owner_id, id).await
        }
        async fn list(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
            self.inner.list(owner_id).await
        }
    }

    #[tokio::test]
    async fn explicit_update_after_discard_wins_over_an_inflight_autosave() {
        let store = Arc::new(SlowStore {
            inner: MemoryDocumentStore::new(),
            delay: Duration::from_millis(60),
            calls: AtomicU64::new(0),
        });
        let saved = store
            .save(NewDocument {
                owner_id: "alice".to_string(),
                name: "Doc".to_string(),
                kind: DocumentKind::Rams,
                content: "<p>v0</p>".to_string(),
                payload: json!({}),
            })
            .await
            .expect("save");
        let autosaver = Autosaver::new(store.clone(), Duration::from_millis(10));

        autosaver.queue("alice", &saved.id, "<p>autosaved</p>".to_string()).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        autosaver.discard("alice", &saved.id).await;
        let patch = DocumentPatch {
            content: Some("<p>explicit</p>".to_string()),
            ..DocumentPatch::default()
        };
        store.update("alice", &saved.id, patch).await.expect("update");
        tokio::time::sleep(Duration::from_millis(100)).await;

        let document = store.find("alice", &saved.id).await.expect("find");
        assert_eq!(document.content, "<p>explicit</p>");
        assert_eq!(store.inner.update_count(), 2);
    }
}
