use super::Status;
use crate::backend::{required, BackendError, CatalogEntity};
use crate::query::{CollectionQuery, FieldValue, Record};
use chrono::{DateTime, Utc};
use list_framework::ResourceItem;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u32);

impl From<u32> for CategoryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "category_{}", self.0)
    }
}

/// A product category. The `slug` is derived from the name and unique per catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: String,
    pub status: Status,
}

impl CategoryCreate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: Status::Active,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

/// Lowercase ASCII words joined by single dashes: `"Home & Garden"` becomes `"home-garden"`.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl ResourceItem for Category {
    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Query = CollectionQuery;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

impl Record for Category {
    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "name" => Some(FieldValue::Text(&self.name)),
            "slug" => Some(FieldValue::Text(&self.slug)),
            "description" => Some(FieldValue::Text(&self.description)),
            "status" => Some(FieldValue::Text(self.status.as_str())),
            "created_at" => Some(FieldValue::Time(self.created_at)),
            "updated_at" => Some(FieldValue::Time(self.updated_at)),
            _ => None,
        }
    }
}

impl CatalogEntity for Category {
    fn from_create_params(
        id: CategoryId,
        params: CategoryCreate,
        now: DateTime<Utc>,
    ) -> Result<Self, BackendError> {
        required("name", &params.name)?;
        let slug = slugify(&params.name);
        if slug.is_empty() {
            return Err(BackendError::Invalid(format!(
                "name {:?} has no letters or digits",
                params.name
            )));
        }
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            slug,
            description: params.description,
            status: params.status,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, update: CategoryUpdate, now: DateTime<Utc>) -> Result<(), BackendError> {
        if let Some(name) = update.name {
            required("name", &name)?;
            let slug = slugify(&name);
            if slug.is_empty() {
                return Err(BackendError::Invalid(format!(
                    "name {name:?} has no letters or digits"
                )));
            }
            self.name = name.trim().to_string();
            self.slug = slug;
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
        Some(self.slug.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("  Shoes  "), "shoes");
        assert_eq!(slugify("T-Shirts 2024"), "t-shirts-2024");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_rename_refreshes_slug() {
        let now = Utc::now();
        let mut category = Category::from_create_params(
            CategoryId(1),
            CategoryCreate::new("Shoes", ""),
            now,
        )
        .unwrap();
        assert_eq!(category.slug, "shoes");

        category
            .on_update(
                CategoryUpdate {
                    name: Some("Running Shoes".into()),
                    ..Default::default()
                },
                now,
            )
            .unwrap();
        assert_eq!(category.slug, "running-shoes");
    }

    #[test]
    fn test_symbol_only_name_is_invalid() {
        let err = Category::from_create_params(CategoryId(1), CategoryCreate::new("!!", ""), Utc::now())
            .unwrap_err();
        assert!(matches!(err, BackendError::Invalid(_)));
    }
}
