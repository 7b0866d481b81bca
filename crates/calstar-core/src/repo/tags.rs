use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};

use super::{delete_row, missing_row};
use crate::error::CalstarError;
use crate::models::course::{self, Entity as Course};
use crate::models::course_tag::{self, Entity as CourseTag};
use crate::models::tag::{self, Entity as Tag};
use crate::schema;

pub async fn create<C>(db: &C, name: &str) -> Result<tag::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, name, "tag insert rejected"))?;

    tracing::info!(id = model.id, name, "tag created");
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<tag::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Tag::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Tag with id {id} not found")))
}

pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<tag::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Tag::find().filter(tag::Column::Name.eq(name)).one(db).await?)
}

pub async fn list<C>(db: &C) -> Result<Vec<tag::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Tag::find().order_by_asc(tag::Column::Id).all(db).await?)
}

pub async fn rename(db: &DatabaseConnection, id: i32, name: &str) -> Result<tag::Model, CalstarError> {
    let am = tag::ActiveModel {
        id: Unchanged(id),
        name: Set(name.to_string()),
    };
    let txn = db.begin().await?;
    let model = am.update(&txn).await.map_err(missing_row("Tag", id))?;
    txn.commit().await?;
    tracing::info!(id, name, "tag renamed");
    Ok(model)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::TAGS, "Tag", id).await
}

// ── Course tagging ──

/// Attach a tag to a course. Tagging the same course twice is rejected.
pub async fn tag_course<C>(db: &C, course_id: i32, tag_id: i32) -> Result<course_tag::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = course_tag::ActiveModel {
        course_id: Set(course_id),
        tag_id: Set(tag_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, course_id, tag_id, "course tag rejected"))?;

    tracing::info!(course_id, tag_id, "course tagged");
    Ok(model)
}

pub async fn untag_course(db: &DatabaseConnection, course_id: i32, tag_id: i32) -> Result<(), CalstarError> {
    let removed = CourseTag::delete_many()
        .filter(course_tag::Column::CourseId.eq(course_id))
        .filter(course_tag::Column::TagId.eq(tag_id))
        .exec(db)
        .await?
        .rows_affected;
    if removed == 0 {
        return Err(CalstarError::NotFound(format!(
            "Course {course_id} is not tagged with tag {tag_id}"
        )));
    }
    tracing::info!(course_id, tag_id, "course untagged");
    Ok(())
}

pub async fn course_tags<C>(db: &C, course_id: i32) -> Result<Vec<course_tag::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(CourseTag::find()
        .filter(course_tag::Column::CourseId.eq(course_id))
        .order_by_asc(course_tag::Column::Id)
        .all(db)
        .await?)
}

pub async fn tags_for_course<C>(db: &C, course_id: i32) -> Result<Vec<tag::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Tag::find()
        .inner_join(CourseTag)
        .filter(course_tag::Column::CourseId.eq(course_id))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?)
}

pub async fn courses_for_tag<C>(db: &C, tag_id: i32) -> Result<Vec<course::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Course::find()
        .inner_join(CourseTag)
        .filter(course_tag::Column::TagId.eq(tag_id))
        .order_by_asc(course::Column::Id)
        .all(db)
        .await?)
}
