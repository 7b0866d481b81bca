pub use sea_orm_migration::prelude::*;

use crate::schema::ForeignKeyRule;

mod m20250301_000001_create_catalog_tables;
mod m20250301_000002_create_user_tables;
mod m20250301_000003_create_resource_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_catalog_tables::Migration),
            Box::new(m20250301_000002_create_user_tables::Migration),
            Box::new(m20250301_000003_create_resource_tables::Migration),
        ]
    }
}

/// Foreign key for `rule`; the delete action comes from the rule's policy.
pub(crate) fn foreign_key(rule: &ForeignKeyRule) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(rule.name)
        .from(Alias::new(rule.child), Alias::new(rule.column))
        .to(Alias::new(rule.parent), Alias::new("id"))
        .on_delete(rule.on_delete.action())
        .to_owned()
}
