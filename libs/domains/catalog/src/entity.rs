//! SeaORM entities backing the catalog aggregates
//!
//! Column widths and constraints mirror the domain rules; the migration
//! crate owns the authoritative schema.

use sea_orm::entity::prelude::*;

// ===== Categories Entity =====

pub mod categories {
    use super::*;
    use crate::models::Category;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(100))", unique)]
        pub name: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::products::Entity")]
        Products,
    }

    impl Related<super::products::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Products.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for Category {
        fn from(model: Model) -> Self {
            Category::rehydrate(model.id, model.name)
        }
    }
}

// ===== Products Entity =====

pub mod products {
    use super::*;
    use crate::models::Product;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(200))", unique)]
        pub name: String,
        pub price: i64,
        pub category_id: Uuid,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::categories::Entity",
            from = "Column::CategoryId",
            to = "super::categories::Column::Id"
        )]
        Category,
    }

    impl Related<super::categories::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        /// Reassemble the aggregate together with its owning category row
        pub(crate) fn into_aggregate(self, category: super::categories::Model) -> Product {
            Product::rehydrate(self.id, self.name, self.price, category.into())
        }
    }
}
