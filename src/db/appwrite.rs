/// Appwrite Databases REST client
///
/// Documents live under `{endpoint}/databases/{database}/collections/{collection}/documents`.
/// Project, database and collection ids are resolved per call, so a missing id
/// only fails the operations that need it.
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    config::Config,
    db::document::{Collection, Document, DocumentStore, Query},
    error::{AppError, AppResult},
};

/// Lets the server generate the document id
const GENERATED_ID: &str = "unique()";

#[derive(Debug, Deserialize)]
struct DocumentList {
    total: u64,
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct AppwriteStore {
    http_client: HttpClient,
    endpoint: String,
    project_id: Option<String>,
    api_key: Option<String>,
    database_id: Option<String>,
    movies_collection_id: Option<String>,
    users_collection_id: Option<String>,
}

impl AppwriteStore {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint: config.appwrite_endpoint.trim_end_matches('/').to_string(),
            project_id: config.appwrite_project_id.clone(),
            api_key: config.appwrite_api_key.clone(),
            database_id: config.appwrite_database_id.clone(),
            movies_collection_id: config.appwrite_collection_movies_id.clone(),
            users_collection_id: config.appwrite_collection_users_id.clone(),
        }
    }

    fn documents_url(&self, collection: Collection) -> AppResult<String> {
        let database_id = Config::require(&self.database_id, "APPWRITE_DATABASE_ID")?;
        let collection_id = match collection {
            Collection::SearchCounters => Config::require(
                &self.movies_collection_id,
                "APPWRITE_COLLECTION_MOVIES_ID",
            )?,
            Collection::Users => {
                Config::require(&self.users_collection_id, "APPWRITE_COLLECTION_USERS_ID")?
            }
        };

        Ok(format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, database_id, collection_id
        ))
    }

    fn request(&self, method: Method, url: &str) -> AppResult<RequestBuilder> {
        let project_id = Config::require(&self.project_id, "APPWRITE_PROJECT_ID")?;

        let mut builder = self
            .http_client
            .request(method, url)
            .header("X-Appwrite-Project", project_id);

        if let Some(api_key) = &self.api_key {
            builder = builder.header("X-Appwrite-Key", api_key);
        }

        Ok(builder)
    }

    /// Fails on non-success statuses, keeping Appwrite's error message
    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        tracing::error!(
            status = %status,
            message = %message,
            "Appwrite request failed"
        );

        Err(match status {
            StatusCode::CONFLICT => AppError::DocumentConflict(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Remote {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> AppResult<T> {
        let response = Self::check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl DocumentStore for AppwriteStore {
    async fn list_documents(
        &self,
        collection: Collection,
        queries: &[Query],
    ) -> AppResult<Vec<Document>> {
        let url = self.documents_url(collection)?;
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_wire()))
            .collect();

        let list: DocumentList =
            Self::send_json(self.request(Method::GET, &url)?.query(&params)).await?;

        tracing::debug!(
            collection = %collection,
            total = list.total,
            results = list.documents.len(),
            "Listed documents"
        );

        Ok(list.documents)
    }

    async fn create_document(
        &self,
        collection: Collection,
        document_id: Option<&str>,
        data: Value,
    ) -> AppResult<Document> {
        let url = self.documents_url(collection)?;
        let body = json!({
            "documentId": document_id.unwrap_or(GENERATED_ID),
            "data": data,
        });

        Self::send_json(self.request(Method::POST, &url)?.json(&body)).await
    }

    async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> AppResult<Document> {
        let url = format!("{}/{}", self.documents_url(collection)?, document_id);

        Self::send_json(
            self.request(Method::PATCH, &url)?
                .json(&json!({ "data": data })),
        )
        .await
    }

    async fn delete_document(&self, collection: Collection, document_id: &str) -> AppResult<()> {
        let url = format!("{}/{}", self.documents_url(collection)?, document_id);
        let response = self.request(Method::DELETE, &url)?.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn increment_attribute(
        &self,
        collection: Collection,
        document_id: &str,
        attribute: &str,
        by: i64,
    ) -> AppResult<Document> {
        let url = format!(
            "{}/{}/{}/increment",
            self.documents_url(collection)?,
            document_id,
            attribute
        );

        Self::send_json(
            self.request(Method::PATCH, &url)?
                .json(&json!({ "value": by })),
        )
        .await
    }

    fn name(&self) -> &'static str {
        "appwrite"
    }
}
