//! Command services for the catalog
//!
//! Every command follows one shape: begin a transaction, run the repository
//! work inside it while accumulating a single pending result, then resolve
//! the transaction through [`TransactionManager::complete`], which commits
//! when the pending result is `Ok` and rolls back otherwise. The pending
//! error reaches the caller unchanged in kind, so the presentation layer can
//! map it to a status without inspecting message text.

use std::sync::Arc;

use database::postgres::TransactionManager;
use sea_orm::DatabaseTransaction;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ApplicationError, CatalogResult, ErrorCode, InternalError};
use crate::models::{Category, Product};
use crate::repository::{CategoryRepository, ProductRepository};

/// Command service for products
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    transactions: TransactionManager,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(transactions: TransactionManager, repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            transactions,
        }
    }

    /// Add a new product to the catalog
    ///
    /// The name must be free; a duplicate found by the in-transaction check
    /// is reported as `ALREADY_EXISTS` without writing. A concurrent writer
    /// that slips past the check is still rejected by the store's unique
    /// constraint and surfaces as a constraint violation.
    #[instrument(skip(self, product), fields(product_id = %product.id()))]
    pub async fn add(&self, product: Product) -> CatalogResult<Product> {
        let tx = self.begin().await?;
        let pending = self.add_in(&tx, product).await;
        self.transactions.complete(tx, pending).await
    }

    async fn add_in(&self, tx: &DatabaseTransaction, product: Product) -> CatalogResult<Product> {
        let matches = self.repository.find_by_name_like(tx, product.name()).await?;
        if matches.iter().any(|existing| existing.name() == product.name()) {
            return Err(ApplicationError::new(
                ErrorCode::AlreadyExists,
                format!("product named '{}' already exists", product.name()),
            )
            .into());
        }

        self.repository.add(tx, &product).await?;
        Ok(product)
    }

    /// Replace an existing product
    ///
    /// A missing row surfaces from the repository as `NOT_FOUND`.
    #[instrument(skip(self, product), fields(product_id = %product.id()))]
    pub async fn update(&self, product: Product) -> CatalogResult<Product> {
        let tx = self.begin().await?;
        let pending = self.repository.update(&tx, &product).await.map(|()| product);
        self.transactions.complete(tx, pending).await
    }

    /// Remove a product from the catalog
    ///
    /// A missing row surfaces from the repository as `NOT_FOUND`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        let tx = self.begin().await?;
        let pending = self.repository.delete(&tx, id).await;
        self.transactions.complete(tx, pending).await
    }

    /// Fetch one product with its owning category
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let tx = self.begin().await?;
        let pending = self.repository.find_by_id(&tx, id).await;
        self.transactions.complete(tx, pending).await
    }

    /// List the catalog ordered by name
    #[instrument(skip(self))]
    pub async fn list(&self) -> CatalogResult<Vec<Product>> {
        let tx = self.begin().await?;
        let pending = self.repository.list(&tx).await;
        self.transactions.complete(tx, pending).await
    }

    async fn begin(&self) -> CatalogResult<DatabaseTransaction> {
        self.transactions.begin().await.map_err(|e| {
            InternalError::with_cause(
                ErrorCode::TransactionFailed,
                "transaction could not be started",
                e,
            )
            .into()
        })
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            transactions: self.transactions.clone(),
        }
    }
}

/// Command service for categories
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
    transactions: TransactionManager,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(transactions: TransactionManager, repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            transactions,
        }
    }

    /// Add a new category
    ///
    /// Category names are unique; a duplicate found by the in-transaction
    /// check is reported as `ALREADY_EXISTS` without writing, and the
    /// store's unique index remains the final authority under concurrency.
    #[instrument(skip(self, category), fields(category_id = %category.id()))]
    pub async fn add(&self, category: Category) -> CatalogResult<Category> {
        let tx = self.begin().await?;
        let pending = self.add_in(&tx, category).await;
        self.transactions.complete(tx, pending).await
    }

    async fn add_in(
        &self,
        tx: &DatabaseTransaction,
        category: Category,
    ) -> CatalogResult<Category> {
        let matches = self
            .repository
            .find_by_name_like(tx, category.name())
            .await?;
        if matches.iter().any(|existing| existing.name() == category.name()) {
            return Err(ApplicationError::new(
                ErrorCode::AlreadyExists,
                format!("category named '{}' already exists", category.name()),
            )
            .into());
        }

        self.repository.add(tx, &category).await?;
        Ok(category)
    }

    /// Replace an existing category
    ///
    /// A missing row surfaces from the repository as `NOT_FOUND`; renaming
    /// onto a taken name is rejected by the store's unique index.
    #[instrument(skip(self, category), fields(category_id = %category.id()))]
    pub async fn update(&self, category: Category) -> CatalogResult<Category> {
        let tx = self.begin().await?;
        let pending = self
            .repository
            .update(&tx, &category)
            .await
            .map(|()| category);
        self.transactions.complete(tx, pending).await
    }

    /// Remove a category
    ///
    /// Fails with `NOT_FOUND` for a missing row and with a constraint
    /// violation while products still reference the category.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        let tx = self.begin().await?;
        let pending = self.repository.delete(&tx, id).await;
        self.transactions.complete(tx, pending).await
    }

    /// Fetch one category
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let tx = self.begin().await?;
        let pending = self.repository.find_by_id(&tx, id).await;
        self.transactions.complete(tx, pending).await
    }

    /// List all categories ordered by name
    #[instrument(skip(self))]
    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        let tx = self.begin().await?;
        let pending = self.repository.list(&tx).await;
        self.transactions.complete(tx, pending).await
    }

    async fn begin(&self) -> CatalogResult<DatabaseTransaction> {
        self.transactions.begin().await.map_err(|e| {
            InternalError::with_cause(
                ErrorCode::TransactionFailed,
                "transaction could not be started",
                e,
            )
            .into()
        })
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            transactions: self.transactions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, CrudError};
    use crate::repository::{MockCategoryRepository, MockProductRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn transactions() -> TransactionManager {
        TransactionManager::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn electronics() -> Category {
        Category::new(Uuid::new_v4(), "Electronics").unwrap()
    }

    fn keyboard(category: Category) -> Product {
        Product::new(Uuid::new_v4(), "Mechanical Keyboard", 12900, category).unwrap()
    }

    #[tokio::test]
    async fn test_add_product_persists_when_name_is_free() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_name_like()
            .times(1)
            .returning(|_, _| Ok(vec![]));
        repo.expect_add().times(1).returning(|_, _| Ok(()));

        let service = ProductService::new(transactions(), repo);
        let product = keyboard(electronics());

        let added = service.add(product.clone()).await.unwrap();
        assert_eq!(added, product);
    }

    #[tokio::test]
    async fn test_add_product_with_taken_name_writes_nothing() {
        let category = electronics();
        let existing =
            Product::new(Uuid::new_v4(), "Mechanical Keyboard", 9900, category.clone()).unwrap();

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_name_like()
            .times(1)
            .returning(move |_, _| Ok(vec![existing.clone()]));
        repo.expect_add().times(0);

        let service = ProductService::new(transactions(), repo);
        let result = service.add(keyboard(category)).await;

        match result {
            Err(CatalogError::Application(err)) => {
                assert_eq!(err.code(), ErrorCode::AlreadyExists)
            }
            other => panic!("expected an application conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_product_ignores_near_matches() {
        // The LIKE search may return similarly-named rows; only an exact
        // name collision is a conflict.
        let category = electronics();
        let near_match =
            Product::new(Uuid::new_v4(), "Mechanical Keyboard Mat", 1900, category.clone())
                .unwrap();

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_name_like()
            .times(1)
            .returning(move |_, _| Ok(vec![near_match.clone()]));
        repo.expect_add().times(1).returning(|_, _| Ok(()));

        let service = ProductService::new(transactions(), repo);
        assert!(service.add(keyboard(category)).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_product_propagates_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .times(1)
            .returning(|_, product| Err(CrudError::not_found("product", product.id()).into()));

        let service = ProductService::new(transactions(), repo);
        let result = service.update(keyboard(electronics())).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_product_propagates_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete()
            .times(1)
            .returning(|_, id| Err(CrudError::not_found("product", id).into()));

        let service = ProductService::new(transactions(), repo);
        let result = service.delete(Uuid::new_v4()).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_add_category_with_taken_name_writes_nothing() {
        let existing = Category::new(Uuid::new_v4(), "Electronics").unwrap();

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name_like()
            .times(1)
            .returning(move |_, _| Ok(vec![existing.clone()]));
        repo.expect_add().times(0);

        let service = CategoryService::new(transactions(), repo);
        let result = service.add(electronics()).await;

        match result {
            Err(CatalogError::Application(err)) => {
                assert_eq!(err.code(), ErrorCode::AlreadyExists)
            }
            other => panic!("expected an application conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_category_persists_when_name_is_free() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name_like()
            .times(1)
            .returning(|_, _| Ok(vec![]));
        repo.expect_add().times(1).returning(|_, _| Ok(()));

        let service = CategoryService::new(transactions(), repo);
        let category = electronics();

        let added = service.add(category.clone()).await.unwrap();
        assert_eq!(added, category);
    }

    #[tokio::test]
    async fn test_delete_category_propagates_constraint_violation() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete().times(1).returning(|_, _| {
            Err(CrudError::new(
                ErrorCode::ConstraintViolation,
                "delete category: referential constraint violated",
            )
            .into())
        });

        let service = CategoryService::new(transactions(), repo);
        let result = service.delete(Uuid::new_v4()).await;

        match result {
            Err(CatalogError::Crud(err)) => {
                assert_eq!(err.code(), ErrorCode::ConstraintViolation)
            }
            other => panic!("expected a storage conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_repository_failure_during_check_skips_the_write() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_name_like().times(1).returning(|_, _| {
            Err(InternalError::new(ErrorCode::Internal, "search products failed").into())
        });
        repo.expect_add().times(0);

        let service = ProductService::new(transactions(), repo);
        let result = service.add(keyboard(electronics())).await;

        assert_eq!(result.unwrap_err().code(), ErrorCode::Internal);
    }
}
