//! # System Lifecycle & Orchestration
//!
//! Starts, wires and stops everything behind the catalog dashboard.
//!
//! ## Wiring per resource type
//!
//! ```text
//! CollectionActor<T> ◀── BackendEndpoint<T> ◀── StoreActor<T> ◀── ResourceList<T>
//!   (the "server")        (latency, faults)      (list state)      (filters, pages)
//! ```
//!
//! Every arrow is a channel owned by the task on its left, so the whole graph is acyclic
//! and shuts down by dropping the handles on the right.
//!
//! ## Graceful Shutdown
//!
//! 1. **Shut down the lists** - cancels pending filter timers and the list drivers
//! 2. **Drop the store clients** - each `StoreActor` drains its in-flight calls, then exits
//! 3. **Drop the backend endpoints** - with the stores gone, each `CollectionActor` exits
//! 4. **Await completion** - wait for every actor task
//!
//! Stores are awaited before backends: a store still draining holds an endpoint.

use crate::backend::{self, BackendEndpoint, BackendError, CatalogEntity};
use crate::config::Settings;
use crate::model::{
    Brand, BrandCreate, Category, CategoryCreate, PaymentStatus, Status, Transaction,
    TransactionCreate,
};
use crate::query::FieldTranslator;
use chrono::{Duration, Utc};
use list_framework::{FilterController, ResourceList, StoreActor, StoreError};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The main runtime orchestrator of the catalog dashboard.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::new(&load_settings()?);
/// system.seed().await?;
/// system.load_all().await?;
///
/// system.brands.filters().set_search("nik");
/// let page = system.brands.page();
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    pub brands: ResourceList<Brand>,
    pub categories: ResourceList<Category>,
    /// Read-only: updates and deletes are rejected by the backend.
    pub transactions: ResourceList<Transaction>,

    /// Backend handles for seeding and fault injection.
    pub brand_backend: BackendEndpoint<Brand>,
    pub category_backend: BackendEndpoint<Category>,
    pub transaction_backend: BackendEndpoint<Transaction>,

    store_handles: Vec<JoinHandle<()>>,
    backend_handles: Vec<JoinHandle<()>>,
}

/// The running pieces of one resource type.
struct Wired<T: CatalogEntity> {
    list: ResourceList<T>,
    backend: BackendEndpoint<T>,
    store_handle: JoinHandle<()>,
    backend_handle: JoinHandle<()>,
}

fn wire<T: CatalogEntity>(
    settings: &Settings,
    translator: FieldTranslator,
    facets: &[&str],
) -> Wired<T> {
    let (backend_actor, backend_client) = backend::new::<T>(settings.store_buffer);
    let backend_handle = tokio::spawn(backend_actor.run());
    let backend = BackendEndpoint::new(backend_client, settings.backend_latency());

    let (store_actor, store_client) = StoreActor::<T>::new(settings.store_config().buffer_size);
    let store_handle = tokio::spawn(store_actor.run(backend.clone()));

    let filters = FilterController::new(settings.filter_config().with_facets(facets.iter().copied()));
    let list = ResourceList::new(filters, translator, store_client, settings.page_size);

    Wired {
        list,
        backend,
        store_handle,
        backend_handle,
    }
}

impl CatalogSystem {
    /// Creates and starts a backend, a store and a list for every resource type.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(settings: &Settings) -> Self {
        let brands = wire::<Brand>(settings, FieldTranslator::new(["name", "description"]), &["status"]);
        let categories = wire::<Category>(
            settings,
            FieldTranslator::new(["name", "slug", "description"]),
            &["status"],
        );
        let transactions = wire::<Transaction>(
            settings,
            FieldTranslator::new(["reference", "customer"]),
            &["status", "payment_method"],
        );

        info!(
            page_size = settings.page_size,
            debounce_ms = settings.debounce_ms,
            "Catalog system started"
        );

        Self {
            brands: brands.list,
            categories: categories.list,
            transactions: transactions.list,
            brand_backend: brands.backend,
            category_backend: categories.backend,
            transaction_backend: transactions.backend,
            store_handles: vec![
                brands.store_handle,
                categories.store_handle,
                transactions.store_handle,
            ],
            backend_handles: vec![
                brands.backend_handle,
                categories.backend_handle,
                transactions.backend_handle,
            ],
        }
    }

    /// Fills the backends with demo data, bypassing the stores.
    pub async fn seed(&self) -> Result<(), BackendError> {
        let brands = self.brand_backend.client();
        for (name, description, status) in [
            ("Nike", "Sportswear and running shoes", Status::Active),
            ("Adidas", "Sportswear", Status::Active),
            ("Puma", "Athletic footwear", Status::Active),
            ("Reebok", "Fitness apparel", Status::Inactive),
            ("New Balance", "Running shoes", Status::Active),
            ("Asics", "Running shoes", Status::Active),
            ("Fila", "Heritage sportswear", Status::Inactive),
            ("Converse", "Canvas sneakers", Status::Active),
            ("Vans", "Skate shoes", Status::Active),
            ("Under Armour", "Performance apparel", Status::Active),
            ("Salomon", "Trail running gear", Status::Active),
            ("Umbro", "Football kits", Status::Inactive),
        ] {
            brands
                .create(BrandCreate {
                    name: name.into(),
                    description: description.into(),
                    status,
                })
                .await?;
        }

        let categories = self.category_backend.client();
        for (name, description) in [
            ("Running Shoes", "Road and trail"),
            ("T-Shirts", "Short and long sleeve"),
            ("Home & Garden", "Outdoor living"),
            ("Accessories", "Bags, caps and socks"),
        ] {
            categories.create(CategoryCreate::new(name, description)).await?;
        }

        let transactions = self.transaction_backend.client();
        let now = Utc::now();
        let statuses = [
            PaymentStatus::Paid,
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Refunded,
            PaymentStatus::Failed,
        ];
        let customers = ["alice", "bob", "carol", "dave"];
        let methods = ["card", "paypal", "bank_transfer"];
        for n in 0..30u32 {
            let i = n as usize;
            transactions
                .create(TransactionCreate {
                    reference: format!("TX-{:05}", 1000 + n),
                    customer: customers[i % customers.len()].into(),
                    amount_cents: 1_999 + i64::from(n) * 250,
                    status: statuses[i % statuses.len()],
                    payment_method: methods[i % methods.len()].into(),
                    created_at: Some(now - Duration::days(i64::from(29 - n))),
                })
                .await?;
        }

        info!("Seeded catalog backends");
        Ok(())
    }

    /// Initial load of every list with its current criteria.
    pub async fn load_all(&self) -> Result<(), StoreError> {
        self.brands.load().await?;
        self.categories.load().await?;
        self.transactions.load().await?;
        Ok(())
    }

    /// Gracefully shuts down the entire system.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(String)` if any actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog system...");

        self.brands.shutdown();
        self.categories.shutdown();
        self.transactions.shutdown();
        drop(self.brands);
        drop(self.categories);
        drop(self.transactions);

        // The list drivers were aborted above; their store clients go away with them.
        for handle in self.store_handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        drop(self.brand_backend);
        drop(self.category_backend);
        drop(self.transaction_backend);

        for handle in self.backend_handles {
            if let Err(e) = handle.await {
                error!("Backend task failed: {:?}", e);
                return Err(format!("Backend task failed: {:?}", e));
            }
        }

        info!("Catalog system shutdown complete.");
        Ok(())
    }
}
