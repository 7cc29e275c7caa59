use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::store::PublicRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    #[serde(alias = "canceled")]
    Cancelled,
    #[serde(other)]
    Other,
}

/// Invoice row as stored in the `invoices` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub invoice_number: String,
    #[serde(default)]
    pub public_token: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub pdf_url: Option<String>,
    /// Owner email, keys the business info lookups
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trashed_at: Option<DateTime<Utc>>,
}

impl InvoiceRecord {
    pub fn new(invoice_number: impl Into<String>, public_token: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_number: invoice_number.into(),
            public_token: public_token.map(str::to_string),
            status: InvoiceStatus::Sent,
            pdf_url: None,
            created_by: None,
            created_at: Some(Utc::now()),
            trashed_at: None,
        }
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.created_by = Some(owner.into());
        self
    }

    pub fn with_pdf_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_url = Some(url.into());
        self
    }

    pub fn trashed(mut self) -> Self {
        self.trashed_at = Some(Utc::now());
        self
    }
}

impl PublicRecord for InvoiceRecord {
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
        self.status == InvoiceStatus::Cancelled
    }

    fn is_trashed(&self) -> bool {
        self.trashed_at.is_some()
    }
}
