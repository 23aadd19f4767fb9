//! Storage ports for the command side
//!
//! Every method executes against the caller's open transaction, passed as an
//! explicit handle. Implementations never begin, commit, or roll back; the
//! transaction lifecycle belongs to the application service. Implementations
//! raise only `CrudError`/`InternalError`: a missing row on update/delete is
//! `NOT_FOUND`, a store rejection is `CONSTRAINT_VIOLATION` wrapping the
//! driver's error.

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{Category, Product};

/// Repository port for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetch one product together with its owning category
    async fn find_by_id(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
    ) -> CatalogResult<Option<Product>>;

    /// List all products ordered by name
    async fn list(&self, tx: &DatabaseTransaction) -> CatalogResult<Vec<Product>>;

    /// Find products whose name contains the given fragment
    async fn find_by_name_like(
        &self,
        tx: &DatabaseTransaction,
        name: &str,
    ) -> CatalogResult<Vec<Product>>;

    /// Insert a new product row
    async fn add(&self, tx: &DatabaseTransaction, product: &Product) -> CatalogResult<()>;

    /// Replace the row identified by the aggregate's id
    async fn update(&self, tx: &DatabaseTransaction, product: &Product) -> CatalogResult<()>;

    /// Remove the row with the given id
    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> CatalogResult<()>;
}

/// Repository port for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fetch one category
    async fn find_by_id(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
    ) -> CatalogResult<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self, tx: &DatabaseTransaction) -> CatalogResult<Vec<Category>>;

    /// Find categories whose name contains the given fragment
    async fn find_by_name_like(
        &self,
        tx: &DatabaseTransaction,
        name: &str,
    ) -> CatalogResult<Vec<Category>>;

    /// Insert a new category row
    async fn add(&self, tx: &DatabaseTransaction, category: &Category) -> CatalogResult<()>;

    /// Replace the row identified by the aggregate's id
    async fn update(&self, tx: &DatabaseTransaction, category: &Category) -> CatalogResult<()>;

    /// Remove the row with the given id
    ///
    /// Fails with a constraint violation while products still reference the
    /// category.
    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> CatalogResult<()>;
}
