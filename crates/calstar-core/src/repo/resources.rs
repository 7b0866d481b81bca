use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Deserialize;

use super::{OrderBy, delete_row, missing_row, offerings, ordered, paged};
use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::models::resource::{self, Entity as Resource, ResourceType};
use crate::schema;

#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
    pub course_offering_id: i32,
    pub user_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub resource_type: ResourceType,
    pub file_path: String,
    pub file_size: Option<i64>,
    #[serde(default)]
    pub file_type: String,
}

/// `file_size: Some(None)` clears the recorded size.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub file_path: Option<String>,
    pub file_size: Option<Option<i64>>,
    pub file_type: Option<String>,
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub course_offering_id: Option<i32>,
    pub user_id: Option<i32>,
    pub resource_type: Option<ResourceType>,
    pub approved: Option<bool>,
    pub order_by: OrderBy<resource::Column>,
    pub page: Option<Pagination>,
}

impl ResourceFilter {
    pub fn for_offering(course_offering_id: i32) -> Self {
        ResourceFilter {
            course_offering_id: Some(course_offering_id),
            ..Default::default()
        }
    }
}

/// Record an uploaded resource. New resources start unapproved.
pub async fn create<C>(db: &C, new: NewResource) -> Result<resource::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = resource::ActiveModel {
        course_offering_id: Set(new.course_offering_id),
        user_id: Set(new.user_id),
        title: Set(new.title),
        description: Set(new.description),
        resource_type: Set(new.resource_type),
        file_path: Set(new.file_path),
        file_size: Set(new.file_size),
        file_type: Set(new.file_type),
        approved: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "resource insert rejected"))?;

    tracing::info!(
        id = model.id,
        course_offering_id = model.course_offering_id,
        resource_type = model.resource_type.as_str(),
        "resource created"
    );
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<resource::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Resource::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Resource with id {id} not found")))
}

/// Resources newest first unless `filter.order_by` says otherwise.
pub async fn list<C>(db: &C, filter: ResourceFilter) -> Result<Vec<resource::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = Resource::find();
    if let Some(offering_id) = filter.course_offering_id {
        select = select.filter(resource::Column::CourseOfferingId.eq(offering_id));
    }
    if let Some(user_id) = filter.user_id {
        select = select.filter(resource::Column::UserId.eq(user_id));
    }
    if let Some(resource_type) = filter.resource_type {
        select = select.filter(resource::Column::ResourceType.eq(resource_type));
    }
    if let Some(approved) = filter.approved {
        select = select.filter(resource::Column::Approved.eq(approved));
    }
    let select = ordered(select, filter.order_by, |s| {
        s.order_by_desc(resource::Column::CreatedAt)
            .order_by_desc(resource::Column::Id)
    });
    Ok(paged(select, filter.page).all(db).await?)
}

/// `"Midterm 1 (Past Exams) for COMPSCI 61A - Fall 2024 - Prof. John DeNero"`.
pub async fn describe<C>(db: &C, id: i32) -> Result<String, CalstarError>
where
    C: ConnectionTrait,
{
    let resource = get(db, id).await?;
    let offering = offerings::describe(db, resource.course_offering_id).await?;
    Ok(resource.describe(&offering))
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    changes: ResourceChanges,
) -> Result<resource::Model, CalstarError> {
    let mut am = resource::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(title) = changes.title {
        am.title = Set(title);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    if let Some(resource_type) = changes.resource_type {
        am.resource_type = Set(resource_type);
    }
    if let Some(file_path) = changes.file_path {
        am.file_path = Set(file_path);
    }
    if let Some(file_size) = changes.file_size {
        am.file_size = Set(file_size);
    }
    if let Some(file_type) = changes.file_type {
        am.file_type = Set(file_type);
    }
    if let Some(approved) = changes.approved {
        am.approved = Set(approved);
    }
    if !am.is_changed() {
        return get(db, id).await;
    }

    let txn = db.begin().await?;
    let model = am
        .update(&txn)
        .await
        .map_err(missing_row("Resource", id))?;
    txn.commit().await?;
    tracing::info!(id, "resource updated");
    Ok(model)
}

pub async fn set_approved(
    db: &DatabaseConnection,
    id: i32,
    approved: bool,
) -> Result<resource::Model, CalstarError> {
    update(
        db,
        id,
        ResourceChanges {
            approved: Some(approved),
            ..Default::default()
        },
    )
    .await
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::RESOURCES, "Resource", id).await
}
