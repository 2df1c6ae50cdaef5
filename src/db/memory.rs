use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::document::{Collection, Document, DocumentStore, Query},
    error::{AppError, AppResult},
};

/// Appwrite's page size when a list has no limit clause
const DEFAULT_LIST_LIMIT: usize = 25;

/// Process-local document store with the same query semantics as the hosted one
///
/// Documents are kept in creation order, which is also the order lists return
/// them in when no ordering clause is given.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every document in a collection
    pub async fn documents(&self, collection: Collection) -> Vec<Document> {
        let collections = self.collections.read().await;
        collections.get(&collection).cloned().unwrap_or_default()
    }

    fn generated_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(20);
        id
    }

    fn into_fields(data: Value) -> AppResult<serde_json::Map<String, Value>> {
        match data {
            Value::Object(fields) => Ok(fields),
            other => Err(AppError::InvalidInput(format!(
                "Document data must be an object, got {}",
                other
            ))),
        }
    }

    fn compare_desc(attribute: &str, a: &Document, b: &Document) -> Ordering {
        let (a, b) = (a.fields.get(attribute), b.fields.get(attribute));
        match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
            (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            _ => {
                let a = a.and_then(Value::as_str).unwrap_or_default();
                let b = b.and_then(Value::as_str).unwrap_or_default();
                b.cmp(a)
            }
        }
    }

    fn not_found(collection: Collection, document_id: &str) -> AppError {
        AppError::NotFound(format!("document {} in {}", document_id, collection))
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: Collection,
        queries: &[Query],
    ) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut documents: Vec<Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        queries.iter().all(|q| match q {
                            Query::Equal(attribute, value) => {
                                doc.fields.get(*attribute) == Some(value)
                            }
                            _ => true,
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let mut limit = DEFAULT_LIST_LIMIT;
        for query in queries {
            match query {
                Query::OrderDesc(attribute) => {
                    documents.sort_by(|a, b| Self::compare_desc(attribute, a, b))
                }
                Query::Limit(n) => limit = *n as usize,
                Query::Equal(..) => {}
            }
        }
        documents.truncate(limit);

        Ok(documents)
    }

    async fn create_document(
        &self,
        collection: Collection,
        document_id: Option<&str>,
        data: Value,
    ) -> AppResult<Document> {
        let fields = Self::into_fields(data)?;
        let id = document_id
            .map(str::to_string)
            .unwrap_or_else(Self::generated_id);

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        if documents.iter().any(|doc| doc.id == id) {
            return Err(AppError::DocumentConflict(format!(
                "document {} in {}",
                id, collection
            )));
        }

        let document = Document { id, fields };
        documents.push(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> AppResult<Document> {
        let fields = Self::into_fields(data)?;

        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == document_id))
            .ok_or_else(|| Self::not_found(collection, document_id))?;

        document.fields.extend(fields);
        Ok(document.clone())
    }

    async fn delete_document(&self, collection: Collection, document_id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(&collection)
            .ok_or_else(|| Self::not_found(collection, document_id))?;

        let position = documents
            .iter()
            .position(|doc| doc.id == document_id)
            .ok_or_else(|| Self::not_found(collection, document_id))?;

        documents.remove(position);
        Ok(())
    }

    async fn increment_attribute(
        &self,
        collection: Collection,
        document_id: &str,
        attribute: &str,
        by: i64,
    ) -> AppResult<Document> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == document_id))
            .ok_or_else(|| Self::not_found(collection, document_id))?;

        let current = match document.fields.get(attribute) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                AppError::InvalidInput(format!("Attribute {} is not an integer", attribute))
            })?,
        };

        document
            .fields
            .insert(attribute.to_string(), Value::from(current + by));
        Ok(document.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
