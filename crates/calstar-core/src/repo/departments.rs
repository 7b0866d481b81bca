use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Deserialize;

use super::{OrderBy, delete_row, missing_row, ordered, paged};
use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::models::department::{self, Entity as Department};
use crate::schema;

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    pub code: Option<String>,
    pub order_by: OrderBy<department::Column>,
    pub page: Option<Pagination>,
}

pub async fn create<C>(db: &C, new: NewDepartment) -> Result<department::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = department::ActiveModel {
        name: Set(new.name),
        code: Set(new.code),
        description: Set(new.description),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "department insert rejected"))?;

    tracing::info!(id = model.id, code = %model.code, "department created");
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<department::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Department::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Department with id {id} not found")))
}

pub async fn find_by_code<C>(db: &C, code: &str) -> Result<Option<department::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Department::find()
        .filter(department::Column::Code.eq(code))
        .one(db)
        .await?)
}

/// Departments ordered by code unless `filter.order_by` says otherwise.
pub async fn list<C>(db: &C, filter: DepartmentFilter) -> Result<Vec<department::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = Department::find();
    if let Some(code) = filter.code {
        select = select.filter(department::Column::Code.eq(code));
    }
    let select = ordered(select, filter.order_by, |s| {
        s.order_by_asc(department::Column::Code)
    });
    Ok(paged(select, filter.page).all(db).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    changes: DepartmentChanges,
) -> Result<department::Model, CalstarError> {
    let mut am = department::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(name) = changes.name {
        am.name = Set(name);
    }
    if let Some(code) = changes.code {
        am.code = Set(code);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    if !am.is_changed() {
        return get(db, id).await;
    }

    let txn = db.begin().await?;
    let model = am
        .update(&txn)
        .await
        .map_err(missing_row("Department", id))?;
    txn.commit().await?;
    tracing::info!(id, "department updated");
    Ok(model)
}

/// Deletes the department and its courses; its professors stay, unassigned.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::DEPARTMENTS, "Department", id).await
}
