//! Google Docs REST client.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::editing::operations::{BatchUpdate, EditOperation};
use crate::io::{DocumentEditor, EditorError};
use crate::models::document::DocsDocument;

pub const DEFAULT_BASE_URL: &str = "https://docs.googleapis.com";

/// Extracts the document id from a Docs URL such as
/// `https://docs.google.com/document/d/<id>/edit`.
pub fn document_id_from_url(url: &str) -> Option<&str> {
    static DOC_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DOC_ID_REGEX.get_or_init(|| {
        Regex::new(r"/document/d/([a-zA-Z0-9_-]+)").expect("Invalid document id regex")
    });

    regex
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct DocsClient {
    client: Client,
    base_url: String,
}

impl DocsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EditorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn document_url(&self, document_id: &str) -> String {
        format!("{}/v1/documents/{document_id}", self.base_url)
    }

    pub fn batch_update_url(&self, document_id: &str) -> String {
        format!("{}/v1/documents/{document_id}:batchUpdate", self.base_url)
    }
}

impl DocumentEditor for DocsClient {
    async fn fetch(&self, document_id: &str, token: &str) -> Result<DocsDocument, EditorError> {
        let response = self
            .client
            .get(self.document_url(document_id))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EditorError::Fetch { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn apply(
        &self,
        document_id: &str,
        token: &str,
        requests: &[EditOperation],
    ) -> Result<(), EditorError> {
        log::debug!("Sending {} requests to {document_id}", requests.len());

        let response = self
            .client
            .post(self.batch_update_url(document_id))
            .bearer_auth(token)
            .json(&BatchUpdate::new(requests))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EditorError::Apply { status, body });
        }

        Ok(())
    }
}
