use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::AppResult;

/// The collections this service reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Per-term search counters feeding the trending list
    SearchCounters,
    /// User records with their saved movie ids
    Users,
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::SearchCounters => write!(f, "search_counters"),
            Collection::Users => write!(f, "users"),
        }
    }
}

/// A schemaless document: the store-assigned id plus its attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Decodes the document (id included) into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Query clauses understood by every store
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals value exactly
    Equal(&'static str, Value),
    OrderDesc(&'static str),
    Limit(u32),
}

impl Query {
    pub fn equal(attribute: &'static str, value: impl Into<Value>) -> Self {
        Query::Equal(attribute, value.into())
    }

    /// Appwrite's JSON query encoding, one value per `queries[]` parameter
    pub fn to_wire(&self) -> String {
        let encoded = match self {
            Query::Equal(attribute, value) => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Query::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Query::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
        };
        encoded.to_string()
    }
}

/// Deterministic document id for a record keyed by a natural key
///
/// Creating two documents with the same natural key collides on the id, so the
/// store itself rejects the second create.
pub fn natural_key_id(collection: Collection, key: &str) -> String {
    let name = format!("{}:{}", collection, key);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
        .simple()
        .to_string()
}

/// Remote document database handle
///
/// Implementations map [`Collection`] to their own addressing. A create with an
/// id that already exists fails with `AppError::DocumentConflict`.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(
        &self,
        collection: Collection,
        queries: &[Query],
    ) -> AppResult<Vec<Document>>;

    /// Creates a document; `None` lets the store generate the id
    async fn create_document(
        &self,
        collection: Collection,
        document_id: Option<&str>,
        data: Value,
    ) -> AppResult<Document>;

    /// Overwrites the given attributes, leaving the others untouched
    async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> AppResult<Document>;

    async fn delete_document(&self, collection: Collection, document_id: &str) -> AppResult<()>;

    /// Atomically adds `by` to a numeric attribute
    async fn increment_attribute(
        &self,
        collection: Collection,
        document_id: &str,
        attribute: &str,
        by: i64,
    ) -> AppResult<Document>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;

    #[test]
    fn test_query_wire_format() {
        assert_eq!(
            Query::equal("email", "a@x.com").to_wire(),
            r#"{"attribute":"email","method":"equal","values":["a@x.com"]}"#
        );
        assert_eq!(
            Query::OrderDesc("count").to_wire(),
            r#"{"attribute":"count","method":"orderDesc"}"#
        );
        assert_eq!(Query::Limit(5).to_wire(), r#"{"method":"limit","values":[5]}"#);
    }

    #[test]
    fn test_natural_key_id_is_stable_and_scoped() {
        let a = natural_key_id(Collection::Users, "a@x.com");

        assert_eq!(a, natural_key_id(Collection::Users, "a@x.com"));
        assert_ne!(a, natural_key_id(Collection::Users, "b@x.com"));
        assert_ne!(a, natural_key_id(Collection::SearchCounters, "a@x.com"));
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_document_keeps_metadata_and_decodes() {
        let json = r#"{
            "$id": "u1",
            "$collectionId": "users",
            "name": "Ada",
            "email": "a@x.com",
            "saved": [7]
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id, "u1");
        assert_eq!(doc.fields["$collectionId"], "users");

        let user: UserRecord = doc.decode().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.saved, vec![7]);
    }
}
