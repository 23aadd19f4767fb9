//! Catalog Command Domain
//!
//! Write-side domain for the product/category catalog: validated aggregates,
//! repository ports, PostgreSQL implementations, and the transactional
//! application services. Listings and lookups served to end users belong to
//! the separate query service; the reads here exist for uniqueness and
//! existence checks and for verifying committed state.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← command orchestration, transaction lifecycle
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← data access (trait + PostgreSQL implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← validated aggregates
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::postgres::{self, TransactionManager};
//! use domain_catalog::{PgProductRepository, ProductService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = postgres::connect("postgresql://localhost/catalog").await?;
//!
//! let transactions = TransactionManager::new(db);
//! let service = ProductService::new(transactions, PgProductRepository::new());
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{
    ApplicationError, CatalogError, CatalogResult, CrudError, DomainError, ErrorCode,
    InternalError,
};
pub use models::{Category, Product};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{CategoryRepository, ProductRepository};
pub use service::{CategoryService, ProductService};
