use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::store::PublicRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    ChangesRequested,
    #[serde(alias = "canceled")]
    Cancelled,
    #[serde(other)]
    Other,
}

/// Client document review request, shared with the client by public token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub public_token: Option<String>,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trashed_at: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    pub fn new(title: impl Into<String>, public_token: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            public_token: public_token.map(str::to_string),
            status: ReviewStatus::Pending,
            document_url: None,
            created_by: None,
            created_at: Some(Utc::now()),
            trashed_at: None,
        }
    }

    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.created_by = Some(owner.into());
        self
    }

    pub fn with_document_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = Some(url.into());
        self
    }
}

impl PublicRecord for ReviewRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn public_token(&self) -> Option<&str> {
        self.public_token.as_deref()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn is_cancelled(&self) -> bool {
        self.status == ReviewStatus::Cancelled
    }

    fn is_trashed(&self) -> bool {
        self.trashed_at.is_some()
    }
}
