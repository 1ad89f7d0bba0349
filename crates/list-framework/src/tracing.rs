//! # Observability & Tracing
//!
//! Structured logging for stores, filter controllers and list drivers.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: startup, shutdown and the final list size
//! - **Fetches**: issue (`seq`), completion, and stale responses dropped as superseded
//! - **Mutations**: create, update and delete with the affected id
//! - **Filters**: debounced emissions and rejected facet keys
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Every fetch sequence number and every superseded response
//! RUST_LOG=debug cargo run
//!
//! # Only the store runtime
//! RUST_LOG=list_framework::store=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a burst of filter edits followed by a slow and a fast response
//! reads like this:
//!
//! ```text
//! DEBUG Criteria changed criteria=FilterCriteria { search: "ni", .. }
//! DEBUG Fetch resource="brand" seq=1 query=..
//! DEBUG Criteria changed criteria=FilterCriteria { search: "nike", .. }
//! DEBUG Fetch resource="brand" seq=2 query=..
//! INFO Fetched resource="brand" seq=2 count=1
//! WARN Superseded fetch discarded resource="brand" seq=1 latest=2 ok=true
//! ```

/// Installs the global subscriber: compact format, no module paths, level from `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
