//! Payment transactions. Read-only from the dashboard: they are listed and filtered,
//! never edited or deleted.

use crate::backend::{required, BackendError, CatalogEntity};
use crate::query::{CollectionQuery, FieldValue, Record};
use chrono::{DateTime, Utc};
use list_framework::ResourceItem;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u32);

impl From<u32> for TransactionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "txn_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub reference: String,
    pub customer: String,
    /// Minor currency units.
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCreate {
    pub reference: String,
    pub customer: String,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub payment_method: String,
    /// Backdates the record; defaults to the time of creation.
    pub created_at: Option<DateTime<Utc>>,
}

/// Transactions accept no patches.
#[derive(Debug, Clone)]
pub enum TransactionUpdate {}

impl ResourceItem for Transaction {
    type Id = TransactionId;
    type Create = TransactionCreate;
    type Update = TransactionUpdate;
    type Query = CollectionQuery;

    fn id(&self) -> &TransactionId {
        &self.id
    }
}

impl Record for Transaction {
    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "reference" => Some(FieldValue::Text(&self.reference)),
            "customer" => Some(FieldValue::Text(&self.customer)),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "payment_method" => Some(FieldValue::Text(&self.payment_method)),
            "created_at" => Some(FieldValue::Time(self.created_at)),
            "updated_at" => Some(FieldValue::Time(self.updated_at)),
            _ => None,
        }
    }
}

impl CatalogEntity for Transaction {
    const READ_ONLY: bool = true;

    fn from_create_params(
        id: TransactionId,
        params: TransactionCreate,
        now: DateTime<Utc>,
    ) -> Result<Self, BackendError> {
        required("reference", &params.reference)?;
        required("customer", &params.customer)?;
        if params.amount_cents < 0 {
            return Err(BackendError::Invalid(format!(
                "amount must not be negative, got {}",
                params.amount_cents
            )));
        }
        let created_at = params.created_at.unwrap_or(now);
        Ok(Self {
            id,
            reference: params.reference,
            customer: params.customer,
            amount_cents: params.amount_cents,
            status: params.status,
            payment_method: params.payment_method,
            created_at,
            updated_at: created_at,
        })
    }

    fn on_update(&mut self, update: TransactionUpdate, _now: DateTime<Utc>) -> Result<(), BackendError> {
        match update {}
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.reference.clone())
    }
}
