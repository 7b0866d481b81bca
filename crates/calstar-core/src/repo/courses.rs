use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Deserialize;

use super::{OrderBy, delete_row, departments, missing_row, ordered, paged};
use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::models::course::{self, Entity as Course};
use crate::models::department;
use crate::schema;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub department_id: i32,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub units: Option<i32>,
}

/// `units: Some(None)` clears the unit count.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseChanges {
    pub department_id: Option<i32>,
    pub code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub units: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub department_id: Option<i32>,
    pub code: Option<String>,
    pub order_by: OrderBy<course::Column>,
    pub page: Option<Pagination>,
}

pub async fn create<C>(db: &C, new: NewCourse) -> Result<course::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = course::ActiveModel {
        department_id: Set(new.department_id),
        code: Set(new.code),
        title: Set(new.title),
        description: Set(new.description),
        units: Set(new.units),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "course insert rejected"))?;

    tracing::info!(id = model.id, department_id = model.department_id, code = %model.code, "course created");
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<course::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Course::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Course with id {id} not found")))
}

/// Courses ordered by department code, then course code, unless
/// `filter.order_by` says otherwise.
pub async fn list<C>(db: &C, filter: CourseFilter) -> Result<Vec<course::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = Course::find();
    if let Some(department_id) = filter.department_id {
        select = select.filter(course::Column::DepartmentId.eq(department_id));
    }
    if let Some(code) = filter.code {
        select = select.filter(course::Column::Code.eq(code));
    }
    let select = ordered(select, filter.order_by, |s| {
        s.inner_join(department::Entity)
            .order_by_asc(department::Column::Code)
            .order_by_asc(course::Column::Code)
    });
    Ok(paged(select, filter.page).all(db).await?)
}

/// The course with its department, e.g. for rendering `"COMPSCI 61A: ..."`.
pub async fn with_department<C>(
    db: &C,
    id: i32,
) -> Result<(course::Model, department::Model), CalstarError>
where
    C: ConnectionTrait,
{
    let course = get(db, id).await?;
    let department = departments::get(db, course.department_id).await?;
    Ok((course, department))
}

pub async fn describe<C>(db: &C, id: i32) -> Result<String, CalstarError>
where
    C: ConnectionTrait,
{
    let (course, department) = with_department(db, id).await?;
    Ok(course.describe(&department))
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    changes: CourseChanges,
) -> Result<course::Model, CalstarError> {
    let mut am = course::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(department_id) = changes.department_id {
        am.department_id = Set(department_id);
    }
    if let Some(code) = changes.code {
        am.code = Set(code);
    }
    if let Some(title) = changes.title {
        am.title = Set(title);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    if let Some(units) = changes.units {
        am.units = Set(units);
    }
    if !am.is_changed() {
        return get(db, id).await;
    }

    let txn = db.begin().await?;
    let model = am
        .update(&txn)
        .await
        .map_err(missing_row("Course", id))?;
    txn.commit().await?;
    tracing::info!(id, "course updated");
    Ok(model)
}

/// Deletes the course with its offerings, tags and (through the offerings)
/// resources and reviews.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::COURSES, "Course", id).await
}
