//! Catalog domain models.
//!
//! Every model is a [`ResourceItem`](list_framework::ResourceItem) for the dashboard's stores
//! and a [`CatalogEntity`](crate::backend::CatalogEntity) for the in-memory backend.

pub mod brand;
pub mod category;
pub mod transaction;

pub use brand::*;
pub use category::*;
pub use transaction::*;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Publication status shared by brands and categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
