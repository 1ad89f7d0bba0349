//! Backend-shaped queries and the translator that builds them from filter criteria.
//!
//! A [`CollectionQuery`] is a conjunction of [`Condition`]s evaluated against any
//! [`Record`]. [`FieldTranslator`] maps the dashboard's `FilterCriteria` onto it:
//!
//! - search text: case-insensitive substring over a list of fields (any may match)
//! - date range: inclusive bounds on one timestamp field
//! - each facet: exact match on the field of the same name

use chrono::{DateTime, Utc};
use list_framework::{FilterCriteria, QueryTranslator};
use serde::Serialize;
use std::fmt;

/// A field value exposed to query evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Time(DateTime<Utc>),
}

/// Named-field access used by [`Condition::matches`].
pub trait Record {
    /// Returns the value of `field`, or `None` if the record has no such field.
    fn field(&self, field: &str) -> Option<FieldValue<'_>>;
}

/// One predicate of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// Some field in `fields` contains `needle`, ignoring case.
    ContainsAny { fields: Vec<String>, needle: String },
    /// `field` lies within `[start, end]`.
    Between {
        field: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// `field` equals `value` exactly.
    Equals { field: String, value: String },
}

impl Condition {
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Condition::ContainsAny { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|name| match record.field(name) {
                    Some(FieldValue::Text(text)) => text.to_lowercase().contains(&needle),
                    _ => false,
                })
            }
            Condition::Between { field, start, end } => match record.field(field) {
                Some(FieldValue::Time(at)) => *start <= at && at <= *end,
                _ => false,
            },
            Condition::Equals { field, value } => match record.field(field) {
                Some(FieldValue::Text(text)) => text == value,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::ContainsAny { fields, needle } => {
                write!(f, "{} ILIKE %{needle}%", fields.join("|"))
            }
            Condition::Between { field, start, end } => {
                write!(f, "{field} BETWEEN {} AND {}", start.to_rfc3339(), end.to_rfc3339())
            }
            Condition::Equals { field, value } => write!(f, "{field} = {value}"),
        }
    }
}

/// All conditions must hold. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionQuery {
    pub conditions: Vec<Condition>,
}

impl CollectionQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

impl fmt::Display for CollectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "*");
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

/// Translates filter criteria into a [`CollectionQuery`] over named fields.
#[derive(Debug, Clone)]
pub struct FieldTranslator {
    search_fields: Vec<String>,
    date_field: String,
}

impl FieldTranslator {
    /// Searches `search_fields` and bounds the range on `created_at`.
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            date_field: "created_at".into(),
        }
    }

    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = field.into();
        self
    }
}

impl QueryTranslator<CollectionQuery> for FieldTranslator {
    fn translate(&self, criteria: &FilterCriteria) -> CollectionQuery {
        let mut query = CollectionQuery::all();

        let needle = criteria.search.trim();
        if !needle.is_empty() && !self.search_fields.is_empty() {
            query = query.with(Condition::ContainsAny {
                fields: self.search_fields.clone(),
                needle: needle.to_string(),
            });
        }

        if let Some(range) = &criteria.range {
            query = query.with(Condition::Between {
                field: self.date_field.clone(),
                start: range.start,
                end: range.end,
            });
        }

        for (field, value) in &criteria.facets {
            query = query.with(Condition::Equals {
                field: field.clone(),
                value: value.clone(),
            });
        }

        query
    }
}
