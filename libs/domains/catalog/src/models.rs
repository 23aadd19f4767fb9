//! Catalog aggregates
//!
//! `Category` and `Product` can only be obtained through their validating
//! factories, so a value of either type is always in a valid state. There
//! are no setters: to change an aggregate, construct a new value and hand it
//! to the service's `update`.

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, ErrorCode};

/// A named grouping products belong to
///
/// Category names are unique across the catalog; the uniqueness itself is
/// enforced by the service and the store, the shape rules here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct Category {
    id: Uuid,
    #[validate(length(min = 1, max = 100))]
    name: String,
}

impl Category {
    /// Validating factory: rejects an empty or over-long name
    pub fn new(id: Uuid, name: impl Into<String>) -> Result<Self, DomainError> {
        let category = Self {
            id,
            name: name.into(),
        };
        category
            .validate()
            .map_err(|e| DomainError::new(ErrorCode::InvalidArgument, e.to_string()))?;
        Ok(category)
    }

    /// Rebuild from a row the schema has already validated
    pub(crate) fn rehydrate(id: Uuid, name: String) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A sellable item owned by exactly one category
///
/// The owning category is held by value, so a product without a category is
/// unrepresentable. Prices are integer cents and at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct Product {
    id: Uuid,
    #[validate(length(min = 1, max = 200))]
    name: String,
    #[validate(range(min = 1))]
    price: i64,
    category: Category,
}

impl Product {
    /// Validating factory: rejects an empty or over-long name and any price
    /// below one cent
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        price: i64,
        category: Category,
    ) -> Result<Self, DomainError> {
        let product = Self {
            id,
            name: name.into(),
            price,
            category,
        };
        product
            .validate()
            .map_err(|e| DomainError::new(ErrorCode::InvalidArgument, e.to_string()))?;
        Ok(product)
    }

    /// Rebuild from rows the schema has already validated
    pub(crate) fn rehydrate(id: Uuid, name: String, price: i64, category: Category) -> Self {
        Self {
            id,
            name,
            price,
            category,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price in cents
    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn category(&self) -> &Category {
        &self.category
    }
}
