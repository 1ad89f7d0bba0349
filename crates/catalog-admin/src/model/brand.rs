//! A product brand shown in the catalog.
//!
//! Searchable by `name` and `description`; `status` is exposed as a facet.

use super::Status;
use crate::backend::{required, BackendError, CatalogEntity};
use crate::query::{CollectionQuery, FieldValue, Record};
use chrono::{DateTime, Utc};
use list_framework::ResourceItem;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrandId(pub u32);

impl From<u32> for BrandId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BrandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "brand_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTOs for Brand creation and updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandCreate {
    pub name: String,
    pub description: String,
    pub status: Status,
}

impl BrandCreate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: Status::Active,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl ResourceItem for Brand {
    type Id = BrandId;
    type Create = BrandCreate;
    type Update = BrandUpdate;
    type Query = CollectionQuery;

    fn id(&self) -> &BrandId {
        &self.id
    }
}

impl Record for Brand {
    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "name" => Some(FieldValue::Text(&self.name)),
            "description" => Some(FieldValue::Text(&self.description)),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "created_at" => Some(FieldValue::Time(self.created_at)),
            "updated_at" => Some(FieldValue::Time(self.updated_at)),
            _ => None,
        }
    }
}

impl CatalogEntity for Brand {
    fn from_create_params(
        id: BrandId,
        params: BrandCreate,
        now: DateTime<Utc>,
    ) -> Result<Self, BackendError> {
        required("name", &params.name)?;
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            description: params.description,
            status: params.status,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, update: BrandUpdate, now: DateTime<Utc>) -> Result<(), BackendError> {
        if let Some(name) = update.name {
            required("name", &name)?;
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.to_lowercase())
    }
}
