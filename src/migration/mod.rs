//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_vendors;
mod m20260301_000002_create_purchase_orders;
mod m20260301_000003_create_performance_snapshots;
mod m20260301_000004_create_users;
mod m20260301_000005_create_auth_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_vendors::Migration),
            Box::new(m20260301_000002_create_purchase_orders::Migration),
            Box::new(m20260301_000003_create_performance_snapshots::Migration),
            Box::new(m20260301_000004_create_users::Migration),
            Box::new(m20260301_000005_create_auth_tokens::Migration),
        ]
    }
}
