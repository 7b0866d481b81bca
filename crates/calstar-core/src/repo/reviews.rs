use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::Deserialize;

use super::{OrderBy, delete_row, ordered};
use crate::error::CalstarError;
use crate::models::course_offering;
use crate::models::review::{self, Entity as Review};
use crate::schema;

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub course_offering_id: i32,
    pub overall_rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub professor_id: Option<i32>,
    pub course_offering_id: Option<i32>,
    pub order_by: OrderBy<review::Column>,
}

/// Record a review. The professor is taken from the offering inside the
/// insert itself, so the row cannot disagree with the offering it reviews.
pub async fn create(db: &DatabaseConnection, new: NewReview) -> Result<review::Model, CalstarError> {
    let offering_id = new.course_offering_id;
    let source = Query::select()
        .column(course_offering::Column::Id)
        .column(course_offering::Column::ProfessorId)
        .expr(Expr::val(new.overall_rating))
        .expr(Expr::val(new.comment))
        .expr(Expr::val(Utc::now().naive_utc()))
        .from(course_offering::Entity)
        .and_where(course_offering::Column::Id.eq(offering_id))
        .to_owned();
    let insert = Query::insert()
        .into_table(review::Entity)
        .columns([
            review::Column::CourseOfferingId,
            review::Column::ProfessorId,
            review::Column::OverallRating,
            review::Column::Comment,
            review::Column::CreatedAt,
        ])
        .select_from(source)
        .map_err(|e| CalstarError::Internal(e.to_string()))?
        .returning_col(review::Column::Id)
        .to_owned();

    let txn = db.begin().await?;
    let backend = txn.get_database_backend();
    let Some(row) = txn.query_one(backend.build(&insert)).await? else {
        txn.rollback().await?;
        return Err(CalstarError::NotFound(format!(
            "Course offering with id {offering_id} not found"
        )));
    };
    let id: i32 = row.try_get("", "id")?;
    let model = get(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(
        id = model.id,
        course_offering_id = model.course_offering_id,
        rating = model.overall_rating,
        "review recorded"
    );
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<review::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Review::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Review with id {id} not found")))
}

pub async fn list<C>(db: &C, filter: ReviewFilter) -> Result<Vec<review::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = Review::find();
    if let Some(professor_id) = filter.professor_id {
        select = select.filter(review::Column::ProfessorId.eq(professor_id));
    }
    if let Some(offering_id) = filter.course_offering_id {
        select = select.filter(review::Column::CourseOfferingId.eq(offering_id));
    }
    let select = ordered(select, filter.order_by, |s| s.order_by_asc(review::Column::Id));
    Ok(select.all(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::REVIEWS, "Review", id).await
}
