//! Purchase order entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub po_number: String,
    pub vendor_id: i64,
    pub order_date: DateTimeUtc,
    pub delivery_date: DateTimeUtc,
    /// Ordered items as a JSON array, no element schema enforced.
    #[sea_orm(column_type = "JsonBinary")]
    pub items: JsonValue,
    pub quantity: i32,
    /// Status: pending, completed, canceled
    pub status: String,
    /// Rating 0-5, set only after completion.
    pub quality_rating: Option<f64>,
    pub issue_date: DateTimeUtc,
    /// Set by the acknowledge action. Overwritten on re-acknowledgment.
    pub acknowledgment_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id",
        on_delete = "Cascade"
    )]
    Vendor,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
