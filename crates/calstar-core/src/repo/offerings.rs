use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Deserialize;

use super::{OrderBy, courses, delete_row, missing_row, ordered, paged, professors};
use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::models::course_offering::{self, Entity as CourseOffering};
use crate::models::review;
use crate::schema;

#[derive(Debug, Clone, Deserialize)]
pub struct NewOffering {
    pub course_id: i32,
    pub professor_id: i32,
    pub semester: String,
    pub year: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferingChanges {
    pub course_id: Option<i32>,
    pub professor_id: Option<i32>,
    pub semester: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferingFilter {
    pub course_id: Option<i32>,
    pub professor_id: Option<i32>,
    pub semester: Option<String>,
    pub year: Option<i32>,
    pub order_by: OrderBy<course_offering::Column>,
    pub page: Option<Pagination>,
}

impl OfferingFilter {
    pub fn for_course(course_id: i32) -> Self {
        OfferingFilter {
            course_id: Some(course_id),
            ..Default::default()
        }
    }

    pub fn for_professor(professor_id: i32) -> Self {
        OfferingFilter {
            professor_id: Some(professor_id),
            ..Default::default()
        }
    }
}

/// Records that a professor taught a course in a term. The same
/// `(course, professor, semester, year)` can only be recorded once.
pub async fn create<C>(db: &C, new: NewOffering) -> Result<course_offering::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = course_offering::ActiveModel {
        course_id: Set(new.course_id),
        professor_id: Set(new.professor_id),
        semester: Set(new.semester),
        year: Set(new.year),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "course offering insert rejected"))?;

    tracing::info!(
        id = model.id,
        course_id = model.course_id,
        professor_id = model.professor_id,
        "course offering created"
    );
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<course_offering::Model, CalstarError>
where
    C: ConnectionTrait,
{
    CourseOffering::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Course offering with id {id} not found")))
}

/// Offerings newest year first, then by semester, unless `filter.order_by`
/// says otherwise.
pub async fn list<C>(
    db: &C,
    filter: OfferingFilter,
) -> Result<Vec<course_offering::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = CourseOffering::find();
    if let Some(course_id) = filter.course_id {
        select = select.filter(course_offering::Column::CourseId.eq(course_id));
    }
    if let Some(professor_id) = filter.professor_id {
        select = select.filter(course_offering::Column::ProfessorId.eq(professor_id));
    }
    if let Some(semester) = filter.semester {
        select = select.filter(course_offering::Column::Semester.eq(semester));
    }
    if let Some(year) = filter.year {
        select = select.filter(course_offering::Column::Year.eq(year));
    }
    let select = ordered(select, filter.order_by, |s| {
        s.order_by_desc(course_offering::Column::Year)
            .order_by_asc(course_offering::Column::Semester)
    });
    Ok(paged(select, filter.page).all(db).await?)
}

/// `"COMPSCI 61A - Fall 2024 - Prof. John DeNero"`.
pub async fn describe<C>(db: &C, id: i32) -> Result<String, CalstarError>
where
    C: ConnectionTrait,
{
    let offering = get(db, id).await?;
    let (course, department) = courses::with_department(db, offering.course_id).await?;
    let professor = professors::get(db, offering.professor_id).await?;
    Ok(offering.describe(&course, &department, &professor))
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    changes: OfferingChanges,
) -> Result<course_offering::Model, CalstarError> {
    let mut am = course_offering::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(course_id) = changes.course_id {
        am.course_id = Set(course_id);
    }
    if let Some(professor_id) = changes.professor_id {
        am.professor_id = Set(professor_id);
    }
    if let Some(semester) = changes.semester {
        am.semester = Set(semester);
    }
    if let Some(year) = changes.year {
        am.year = Set(year);
    }
    if !am.is_changed() {
        return get(db, id).await;
    }

    let txn = db.begin().await?;
    let model = am
        .update(&txn)
        .await
        .map_err(missing_row("Course offering", id))?;
    if changes.professor_id.is_some() {
        // Reviews follow the offering's professor.
        let moved = review::Entity::update_many()
            .col_expr(review::Column::ProfessorId, Expr::value(model.professor_id))
            .filter(review::Column::CourseOfferingId.eq(id))
            .filter(review::Column::ProfessorId.ne(model.professor_id))
            .exec(&txn)
            .await?
            .rows_affected;
        if moved > 0 {
            tracing::debug!(id, moved, "reviews reassigned to new professor");
        }
    }
    txn.commit().await?;
    tracing::info!(id, "course offering updated");
    Ok(model)
}

/// Deletes the offering with its resources and reviews.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::COURSE_OFFERINGS, "Course offering", id).await
}
