use crate::database::get_db;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, to_bson, Document},
    options::FindOptions,
    Collection, Database,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::HashMap,
    str::FromStr,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Rams,
    Coshh,
    Toolbox,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Rams, DocumentKind::Coshh, DocumentKind::Toolbox];

    pub fn collection(&self) -> &'static str {
        match self {
            DocumentKind::Rams => "rams_documents",
            DocumentKind::Coshh => "coshh_documents",
            DocumentKind::Toolbox => "toolbox_documents",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Rams => "RAMS",
            DocumentKind::Coshh => "COSHH",
            DocumentKind::Toolbox => "Toolbox Talk",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("invalid document id")]
    InvalidId,
    #[error("database is not connected")]
    Unavailable,
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("could not encode document: {0}")]
    Encoding(String),
    #[error("document store rejected the write")]
    Rejected,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewDocument {
    pub owner_id: String,
    pub name: String,
    pub kind: DocumentKind,
    pub content: String,
    pub payload: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub payload: Option<Value>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.payload.is_none()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Owner-scoped document persistence. Every lookup filters on the owner so
/// one user can never read or touch another user's documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(&self, document: NewDocument) -> Result<SavedDocument, StoreError>;
    async fn update(&self, owner_id: &str, id: &str, patch: DocumentPatch) -> Result<(), StoreError>;
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;
    async fn find(&self, owner_id: &str, id: &str) -> Result<GeneratedDocument, StoreError>;
    /// All of the owner's documents across every kind, newest first.
    async fn list(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError>;
}

#[derive(Debug, Deserialize, Serialize)]
struct DocumentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    _id: Option<ObjectId>,
    owner_id: String,
    name: String,
    kind: DocumentKind,
    content: String,
    payload: Value,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl DocumentRecord {
    fn into_document(self) -> GeneratedDocument {
        GeneratedDocument {
            id: self._id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: self.owner_id,
            name: self.name,
            kind: self.kind,
            content: self.content,
            payload: self.payload,
            created_at: to_chrono(self.created_at),
            updated_at: to_chrono(self.updated_at),
        }
    }
}

fn to_chrono(time: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time.to_system_time())
}

fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::from_str(id).map_err(|_| StoreError::InvalidId)
}

#[derive(Default)]
pub struct MongoDocumentStore;

impl MongoDocumentStore {
    fn collection(kind: DocumentKind) -> Result<Collection<DocumentRecord>, StoreError> {
        let db: Database = get_db().ok_or(StoreError::Unavailable)?;
        Ok(db.collection::<DocumentRecord>(kind.collection()))
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn save(&self, document: NewDocument) -> Result<SavedDocument, StoreError> {
        let collection = Self::collection(document.kind)?;
        let now = bson::DateTime::now();
        let id = ObjectId::new();
        let record = DocumentRecord {
            _id: Some(id),
            owner_id: document.owner_id,
            name: document.name,
            kind: document.kind,
            content: document.content,
            payload: document.payload,
            created_at: now,
            updated_at: now,
        };

        collection.insert_one(&record, None).await?;
        Ok(SavedDocument {
            id: id.to_hex(),
            created_at: to_chrono(now),
        })
    }
    async fn update(&self, owner_id: &str, id: &str, patch: DocumentPatch) -> Result<(), StoreError> {
        let _id = parse_id(id)?;
        let mut set: Document = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(content) = patch.content {
            set.insert("content", content);
        }
        if let Some(payload) = patch.payload {
            let payload = to_bson(&payload).map_err(|error| StoreError::Encoding(error.to_string()))?;
            set.insert("payload", payload);
        }

        for kind in DocumentKind::ALL {
            let result = Self::collection(kind)?
                .update_one(
                    doc! { "_id": _id, "owner_id": owner_id },
                    doc! { "$set": set.clone() },
                    None,
                )
                .await?;
            if result.matched_count > 0 {
                return Ok(());
            }
        }
        Err(StoreError::NotFound)
    }
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        let _id = parse_id(id)?;
        for kind in DocumentKind::ALL {
            let result = Self::collection(kind)?
                .delete_one(doc! { "_id": _id, "owner_id": owner_id }, None)
                .await?;
            if result.deleted_count > 0 {
                return Ok(());
            }
        }
        Err(StoreError::NotFound)
    }
    async fn find(&self, owner_id: &str, id: &str) -> Result<GeneratedDocument, StoreError> {
        let _id = parse_id(id)?;
        for kind in DocumentKind::ALL {
            if let Some(record) = Self::collection(kind)?
                .find_one(doc! { "_id": _id, "owner_id": owner_id }, None)
                .await?
            {
                return Ok(record.into_document());
            }
        }
        Err(StoreError::NotFound)
    }
    async fn list(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        let mut documents: Vec<DocumentSummary> = Vec::new();
        for kind in DocumentKind::ALL {
            let options = FindOptions::builder()
                .projection(doc! { "content": 0, "payload": 0 })
                .sort(doc! { "created_at": -1 })
                .build();
            let mut cursor = Self::collection(kind)?
                .clone_with_type::<SummaryRecord>()
                .find(doc! { "owner_id": owner_id }, options)
                .await?;
            while let Some(record) = cursor.next().await {
                let record = record?;
                documents.push(DocumentSummary {
                    id: record._id.to_hex(),
                    name: record.name,
                    kind: record.kind,
                    created_at: to_chrono(record.created_at),
                    updated_at: to_chrono(record.updated_at),
                });
            }
        }
        sort_newest_first(&mut documents);
        Ok(documents)
    }
}

#[derive(Debug, Deserialize)]
struct SummaryRecord {
    _id: ObjectId,
    name: String,
    kind: DocumentKind,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn sort_newest_first(documents: &mut [DocumentSummary]) {
    documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Process-local store, selected with `STORE=memory` and used by tests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, GeneratedDocument>>,
    fail_writes: AtomicBool,
    updates: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
    /// Makes every subsequent save and update fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Rejected)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn save(&self, document: NewDocument) -> Result<SavedDocument, StoreError> {
        self.check_writable()?;
        let now = Utc::now();
        let id = ObjectId::new().to_hex();
        self.documents.write().await.insert(
            id.clone(),
            GeneratedDocument {
                id: id.clone(),
                owner_id: document.owner_id,
                name: document.name,
                kind: document.kind,
                content: document.content,
                payload: document.payload,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(SavedDocument { id, created_at: now })
    }
    async fn update(&self, owner_id: &str, id: &str, patch: DocumentPatch) -> Result<(), StoreError> {
        parse_id(id)?;
        self.check_writable()?;
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(id)
            .filter(|document| document.owner_id == owner_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            document.name = name;
        }
        if let Some(content) = patch.content {
            document.content = content;
        }
        if let Some(payload) = patch.payload {
            document.payload = payload;
        }
        document.updated_at = Utc::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        parse_id(id)?;
        let mut documents = self.documents.write().await;
        match documents.get(id) {
            Some(document) if document.owner_id == owner_id => {
                documents.remove(id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
    async fn find(&self, owner_id: &str, id: &str) -> Result<GeneratedDocument, StoreError> {
        parse_id(id)?;
        self.documents
            .read()
            .await
            .get(id)
            .filter(|document| document.owner_id == owner_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
    async fn list(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        let mut documents: Vec<DocumentSummary> = self
            .documents
            .read()
            .await
            .values()
            .filter(|document| document.owner_id == owner_id)
            .map(|document| DocumentSummary {
                id: document.id.clone(),
                name: document.name.clone(),
                kind: document.kind,
                created_at: document.created_at,
                updated_at: document.updated_at,
            })
            .collect();
        sort_newest_first(&mut documents);
        Ok(documents)
    }
}
