//! PostgreSQL implementations of the repository ports
//!
//! The repositories hold no connection of their own; every call executes on
//! the transaction supplied by the service. Driver errors are translated at
//! this boundary: affected-row counts of zero become `NOT_FOUND`, unique and
//! referential rejections become `CONSTRAINT_VIOLATION` with the driver
//! error kept as the cause.

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};
use tracing::info;
use uuid::Uuid;

use crate::entity::{categories, products};
use crate::error::{CatalogError, CatalogResult, CrudError, ErrorCode, InternalError};
use crate::models::{Category, Product};
use crate::repository::{CategoryRepository, ProductRepository};

fn query_failed(context: &str, err: DbErr) -> CatalogError {
    InternalError::with_cause(ErrorCode::Internal, format!("{context} failed"), err).into()
}

fn write_rejected(context: &str, err: DbErr) -> CatalogError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => CrudError::with_cause(
            ErrorCode::ConstraintViolation,
            format!("{context}: unique constraint violated"),
            err,
        )
        .into(),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => CrudError::with_cause(
            ErrorCode::ConstraintViolation,
            format!("{context}: referential constraint violated"),
            err,
        )
        .into(),
        _ => query_failed(context, err),
    }
}

fn assemble(row: (products::Model, Option<categories::Model>)) -> CatalogResult<Product> {
    let (product, category) = row;
    match category {
        Some(category) => Ok(product.into_aggregate(category)),
        // Unreachable while the foreign key stands
        None => Err(InternalError::new(
            ErrorCode::Internal,
            format!("product {} is missing its category row", product.id),
        )
        .into()),
    }
}

/// PostgreSQL implementation of `ProductRepository`
#[derive(Debug, Default, Clone)]
pub struct PgProductRepository;

impl PgProductRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
    ) -> CatalogResult<Option<Product>> {
        let row = products::Entity::find_by_id(id)
            .find_also_related(categories::Entity)
            .one(tx)
            .await
            .map_err(|e| query_failed("select product", e))?;

        row.map(assemble).transpose()
    }

    async fn list(&self, tx: &DatabaseTransaction) -> CatalogResult<Vec<Product>> {
        let rows = products::Entity::find()
            .find_also_related(categories::Entity)
            .order_by_asc(products::Column::Name)
            .all(tx)
            .await
            .map_err(|e| query_failed("list products", e))?;

        rows.into_iter().map(assemble).collect()
    }

    async fn find_by_name_like(
        &self,
        tx: &DatabaseTransaction,
        name: &str,
    ) -> CatalogResult<Vec<Product>> {
        let rows = products::Entity::find()
            .filter(products::Column::Name.contains(name))
            .find_also_related(categories::Entity)
            .order_by_asc(products::Column::Name)
            .all(tx)
            .await
            .map_err(|e| query_failed("search products", e))?;

        rows.into_iter().map(assemble).collect()
    }

    async fn add(&self, tx: &DatabaseTransaction, product: &Product) -> CatalogResult<()> {
        let model = products::ActiveModel {
            id: Set(product.id()),
            name: Set(product.name().to_string()),
            price: Set(product.price()),
            category_id: Set(product.category().id()),
            ..Default::default()
        };

        products::Entity::insert(model)
            .exec(tx)
            .await
            .map_err(|e| write_rejected("insert product", e))?;

        info!(product_id = %product.id(), "product added");
        Ok(())
    }

    async fn update(&self, tx: &DatabaseTransaction, product: &Product) -> CatalogResult<()> {
        let result = products::Entity::update_many()
            .set(products::ActiveModel {
                name: Set(product.name().to_string()),
                price: Set(product.price()),
                category_id: Set(product.category().id()),
                updated_at: Set(chrono::Utc::now().into()),
                ..Default::default()
            })
            .filter(products::Column::Id.eq(product.id()))
            .exec(tx)
            .await
            .map_err(|e| write_rejected("update product", e))?;

        if result.rows_affected == 0 {
            return Err(CrudError::not_found("product", product.id()).into());
        }

        info!(product_id = %product.id(), "product updated");
        Ok(())
    }

    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> CatalogResult<()> {
        let result = products::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(|e| write_rejected("delete product", e))?;

        if result.rows_affected == 0 {
            return Err(CrudError::not_found("product", id).into());
        }

        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

/// PostgreSQL implementation of `CategoryRepository`
#[derive(Debug, Default, Clone)]
pub struct PgCategoryRepository;

impl PgCategoryRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
    ) -> CatalogResult<Option<Category>> {
        let row = categories::Entity::find_by_id(id)
            .one(tx)
            .await
            .map_err(|e| query_failed("select category", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, tx: &DatabaseTransaction) -> CatalogResult<Vec<Category>> {
        let rows = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(tx)
            .await
            .map_err(|e| query_failed("list categories", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_name_like(
        &self,
        tx: &DatabaseTransaction,
        name: &str,
    ) -> CatalogResult<Vec<Category>> {
        let rows = categories::Entity::find()
            .filter(categories::Column::Name.contains(name))
            .order_by_asc(categories::Column::Name)
            .all(tx)
            .await
            .map_err(|e| query_failed("search categories", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add(&self, tx: &DatabaseTransaction, category: &Category) -> CatalogResult<()> {
        let model = categories::ActiveModel {
            id: Set(category.id()),
            name: Set(category.name().to_string()),
            ..Default::default()
        };

        categories::Entity::insert(model)
            .exec(tx)
            .await
            .map_err(|e| write_rejected("insert category", e))?;

        info!(category_id = %category.id(), "category added");
        Ok(())
    }

    async fn update(&self, tx: &DatabaseTransaction, category: &Category) -> CatalogResult<()> {
        let result = categories::Entity::update_many()
            .set(categories::ActiveModel {
                name: Set(category.name().to_string()),
                updated_at: Set(chrono::Utc::now().into()),
                ..Default::default()
            })
            .filter(categories::Column::Id.eq(category.id()))
            .exec(tx)
            .await
            .map_err(|e| write_rejected("update category", e))?;

        if result.rows_affected == 0 {
            return Err(CrudError::not_found("category", category.id()).into());
        }

        info!(category_id = %category.id(), "category updated");
        Ok(())
    }

    async fn delete(&self, tx: &DatabaseTransaction, id: Uuid) -> CatalogResult<()> {
        let result = categories::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(|e| write_rejected("delete category", e))?;

        if result.rows_affected == 0 {
            return Err(CrudError::not_found("category", id).into());
        }

        info!(category_id = %id, "category deleted");
        Ok(())
    }
}
