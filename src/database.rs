use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tokio::sync::Mutex;

use self::{
    documents::{Document, Fields, RunQueryRequest, RunQueryRow},
    google_auth_token::GoogleAuthToken,
};
use crate::{config::FirestoreConfig, constants::*};

pub mod documents;
pub mod google_auth_token;

/// Result of a create-if-absent write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Thin Firestore REST client over the `(default)` database of one project
pub struct AppDatabase {
    client: reqwest::Client,
    documents_url: String,
    auth: Option<Mutex<GoogleAuthToken>>,
}

impl AppDatabase {
    pub fn new(config: &FirestoreConfig, client: reqwest::Client) -> Self {
        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            config.base_url.trim_end_matches('/'),
            config.project_id
        );
        let auth = config
            .service_account
            .clone()
            .map(|account| Mutex::new(GoogleAuthToken::new(account, FIRESTORE_DATASTORE_SCOPE)));
        Self {
            client,
            documents_url,
            auth,
        }
    }

    fn document_url(&self, coll: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url, coll, id)
    }

    async fn request(&self, method: Method, url: &str) -> anyhow::Result<RequestBuilder> {
        let builder = self.client.request(method, url);
        let Some(auth) = self.auth.as_ref() else {
            return Ok(builder);
        };
        let access_token = auth.lock().await.get_access_token(&self.client).await?;
        Ok(builder.bearer_auth(access_token))
    }

    async fn error_for(op: &str, res: Response) -> anyhow::Error {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        anyhow::anyhow!("firestore {op} failed with {status}: {body}")
    }

    /// Run a structured query and return the matched documents
    pub async fn run_query(&self, query: &RunQueryRequest) -> anyhow::Result<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url);
        let res = self.request(Method::POST, &url).await?.json(query).send().await?;
        if !res.status().is_success() {
            return Err(Self::error_for("runQuery", res).await);
        }
        let rows = res.json::<Vec<RunQueryRow>>().await?;
        Ok(rows.into_iter().filter_map(|row| row.document).collect())
    }

    /// Point lookup; a missing document is `Ok(None)`
    pub async fn get_document(&self, coll: &str, id: &str) -> anyhow::Result<Option<Document>> {
        let url = self.document_url(coll, id);
        let res = self.request(Method::GET, &url).await?.send().await?;
        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(res.json::<Document>().await?)),
            _ => Err(Self::error_for("get", res).await),
        }
    }

    /// Create a document with a caller chosen id; fails over to
    /// `AlreadyExists` instead of overwriting
    pub async fn create_document(
        &self,
        coll: &str,
        id: &str,
        fields: Fields,
    ) -> anyhow::Result<CreateOutcome> {
        let url = format!("{}/{}", self.documents_url, coll);
        let res = self
            .request(Method::POST, &url)
            .await?
            .query(&[("documentId", id)])
            .json(&Document::with_fields(fields))
            .send()
            .await?;
        match res.status() {
            StatusCode::CONFLICT => Ok(CreateOutcome::AlreadyExists),
            s if s.is_success() => Ok(CreateOutcome::Created),
            _ => Err(Self::error_for("create", res).await),
        }
    }

    pub async fn delete_document(&self, coll: &str, id: &str) -> anyhow::Result<()> {
        let url = self.document_url(coll, id);
        let res = self.request(Method::DELETE, &url).await?.send().await?;
        if !res.status().is_success() && res.status() != StatusCode::NOT_FOUND {
            return Err(Self::error_for("delete", res).await);
        }
        Ok(())
    }
}
