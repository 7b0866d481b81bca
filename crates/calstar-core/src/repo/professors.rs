use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Deserialize;

use super::{OrderBy, delete_row, missing_row, ordered, paged};
use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::models::professor::{self, Entity as Professor};
use crate::schema;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProfessor {
    pub full_name: String,
    pub department_id: Option<i32>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub website_url: String,
}

/// `department_id: Some(None)` detaches the professor from their department.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessorChanges {
    pub full_name: Option<String>,
    pub department_id: Option<Option<i32>>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfessorFilter {
    pub department_id: Option<i32>,
    pub order_by: OrderBy<professor::Column>,
    pub page: Option<Pagination>,
}

pub async fn create<C>(db: &C, new: NewProfessor) -> Result<professor::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = professor::ActiveModel {
        full_name: Set(new.full_name),
        department_id: Set(new.department_id),
        email: Set(new.email),
        bio: Set(new.bio),
        website_url: Set(new.website_url),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "professor insert rejected"))?;

    tracing::info!(id = model.id, "professor created");
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<professor::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Professor::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Professor with id {id} not found")))
}

/// Professors ordered by full name unless `filter.order_by` says otherwise.
pub async fn list<C>(db: &C, filter: ProfessorFilter) -> Result<Vec<professor::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = Professor::find();
    if let Some(department_id) = filter.department_id {
        select = select.filter(professor::Column::DepartmentId.eq(department_id));
    }
    let select = ordered(select, filter.order_by, |s| {
        s.order_by_asc(professor::Column::FullName)
    });
    Ok(paged(select, filter.page).all(db).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    changes: ProfessorChanges,
) -> Result<professor::Model, CalstarError> {
    let mut am = professor::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(full_name) = changes.full_name {
        am.full_name = Set(full_name);
    }
    if let Some(department_id) = changes.department_id {
        am.department_id = Set(department_id);
    }
    if let Some(email) = changes.email {
        am.email = Set(email);
    }
    if let Some(bio) = changes.bio {
        am.bio = Set(bio);
    }
    if let Some(website_url) = changes.website_url {
        am.website_url = Set(website_url);
    }
    if !am.is_changed() {
        return get(db, id).await;
    }

    let txn = db.begin().await?;
    let model = am
        .update(&txn)
        .await
        .map_err(missing_row("Professor", id))?;
    txn.commit().await?;
    tracing::info!(id, "professor updated");
    Ok(model)
}

/// Deletes the professor with their offerings and reviews.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::PROFESSORS, "Professor", id).await
}
