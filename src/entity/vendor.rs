//! Vendor entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub contact_details: String,
    pub address: String,
    #[sea_orm(unique)]
    pub vendor_code: String,
    /// Cached metric, 0-100. Refreshed by the performance endpoint.
    pub on_time_delivery_rate: f64,
    /// Cached metric, 0-5. Refreshed by the performance endpoint.
    pub quality_rating_avg: f64,
    /// Cached metric in hours. Refreshed after completed+acknowledged saves.
    pub average_response_time: f64,
    /// Cached metric, 0-100. Refreshed by the performance endpoint.
    pub fulfillment_rate: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,
    #[sea_orm(has_many = "super::performance_snapshot::Entity")]
    PerformanceSnapshots,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl Related<super::performance_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceSnapshots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
