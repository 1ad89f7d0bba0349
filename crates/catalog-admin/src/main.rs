//! # Catalog Admin Demo
//!
//! Walks through the list screens end to end:
//! 1. Seeding the backends and loading every list.
//! 2. Paging through brands.
//! 3. Typing a search (debounced) and picking a facet.
//! 4. Filtering transactions by a date range.
//! 5. Creating, renaming and deleting a brand, and a simulated timeout.
//!
//! Run with `RUST_LOG=info` (or `debug` for every fetch sequence number).

use catalog_admin::config::{load_settings, Settings};
use catalog_admin::lifecycle::CatalogSystem;
use catalog_admin::model::{BrandCreate, BrandUpdate};
use chrono::{Duration as Days, Utc};
use list_framework::tracing::setup_tracing;
use list_framework::{EndpointError, ResourceItem, ResourceList};
use std::time::Duration;
use tracing::{error, info, Instrument};

/// Sleeps past the debounce window plus a couple of backend round trips.
async fn settle(settings: &Settings) {
    let wait = Duration::from_millis(settings.debounce_ms) + settings.backend_latency() * 3;
    tokio::time::sleep(wait).await;
}

fn log_page<T>(label: &str, list: &ResourceList<T>, describe: impl Fn(&T) -> String)
where
    T: ResourceItem,
{
    let view = list.page();
    let rows: Vec<String> = view.rows.iter().map(describe).collect();
    info!(
        list = label,
        page = view.page,
        total_pages = view.total_pages,
        total_items = view.total_items,
        error = view.error.as_deref().unwrap_or("-"),
        ?rows,
        "Page"
    );
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let settings = load_settings().map_err(|e| e.to_string())?;
    info!(?settings, "Starting catalog admin");

    let system = CatalogSystem::new(&settings);
    system.seed().await.map_err(|e| e.to_string())?;
    system.load_all().await.map_err(|e| e.to_string())?;

    // Paging
    let span = tracing::info_span!("paging");
    async {
        log_page("brands", &system.brands, |b| b.name.clone());
        system.brands.set_page(2);
        log_page("brands", &system.brands, |b| b.name.clone());
    }
    .instrument(span)
    .await;

    // Search and facet edits collapse into one fetch
    let span = tracing::info_span!("filtering");
    async {
        let filters = system.brands.filters();
        filters.set_search("r");
        filters.set_search("ru");
        filters.set_search("run");
        filters.set_facet("status", "active");
        if !filters.set_facet("country", "us") {
            info!("Facet 'country' is not offered for brands");
        }
        settle(&settings).await;
        log_page("brands", &system.brands, |b| b.name.clone());

        filters.clear_all();
        settle(&settings).await;
        log_page("brands", &system.brands, |b| b.name.clone());
    }
    .instrument(span)
    .await;

    // Date range on transactions
    let span = tracing::info_span!("date_range");
    async {
        let now = Utc::now();
        let filters = system.transactions.filters();
        filters.set_date_range(&[now - Days::days(6), now]);
        filters.set_facet("status", "paid");
        settle(&settings).await;
        log_page("transactions", &system.transactions, |t| {
            format!("{} {} {}", t.reference, t.status.as_str(), t.created_at.date_naive())
        });
        filters.set_date_range(&[]);
        settle(&settings).await;
    }
    .instrument(span)
    .await;

    // Mutations go straight through the store
    let span = tracing::info_span!("mutations");
    let store = system.brands.store();
    let result = async {
        let created = store
            .create(BrandCreate::new("Kappa", "Italian sportswear"))
            .await?;
        info!(id = %created.id, "Brand created");

        let renamed = store
            .update(
                created.id,
                BrandUpdate {
                    name: Some("Kappa Italia".into()),
                    ..Default::default()
                },
            )
            .await?;
        info!(id = %renamed.id, name = %renamed.name, "Brand renamed");

        store.delete(created.id).await?;
        info!(id = %created.id, "Brand deleted");

        if let Err(e) = store.create(BrandCreate::new("Nike", "Duplicate")).await {
            info!(error = %e, "Duplicate brand rejected");
        }

        system.brand_backend.fail_next(EndpointError::Timeout);
        if let Err(e) = system.brands.load().await {
            info!(error = %e, "Simulated timeout surfaced to the list");
        }
        Ok::<_, list_framework::StoreError>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = result {
        error!(error = %e, "Mutation walk-through failed");
    }
    log_page("brands", &system.brands, |b| b.name.clone());

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
