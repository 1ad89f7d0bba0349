//! # Catalog Admin
//!
//! The catalog dashboard's list screens for brands, categories and transactions, built on
//! `list_framework`, with an in-memory backend standing in for the remote API.
//!
//! - [`model`] - domain records and their create/update DTOs
//! - [`query`] - backend query conditions and the criteria-to-query translator
//! - [`backend`] - the in-memory collection actors and the endpoint stores talk to
//! - [`lifecycle`] - [`CatalogSystem`](lifecycle::CatalogSystem), which wires and stops it all
//! - [`config`] - settings from `catalog-admin.toml` and `CATALOG_ADMIN__*` variables

pub mod backend;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod query;
