use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Deserialize;

use super::{OrderBy, delete_row, missing_row, ordered};
use crate::error::CalstarError;
use crate::identity::Identity;
use crate::models::user::{self, Entity as User};
use crate::schema;

/// Fields the course review site keeps on top of the identity record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentProfile {
    pub berkeley_student_id: Option<String>,
    #[serde(default)]
    pub major: String,
    pub graduation_year: Option<i32>,
}

/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub berkeley_student_id: Option<Option<String>>,
    pub major: Option<String>,
    pub graduation_year: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub graduation_year: Option<i32>,
    pub major: Option<String>,
    pub order_by: OrderBy<user::Column>,
}

/// Record a user for an identity the provider has already authenticated.
pub async fn create<C, I>(db: &C, identity: &I, profile: StudentProfile) -> Result<user::Model, CalstarError>
where
    C: ConnectionTrait,
    I: Identity + ?Sized,
{
    let model = user::ActiveModel {
        identity_handle: Set(identity.handle().to_string()),
        username: Set(identity.username().to_string()),
        email: Set(identity.email().to_string()),
        berkeley_student_id: Set(profile.berkeley_student_id),
        major: Set(profile.major),
        graduation_year: Set(profile.graduation_year),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, handle = identity.handle(), "user insert rejected"))?;

    tracing::info!(id = model.id, handle = %model.identity_handle, "user created");
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<user::Model, CalstarError>
where
    C: ConnectionTrait,
{
    User::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("User with id {id} not found")))
}

/// The user recorded for `identity`, if any.
pub async fn find_by_identity<C, I>(db: &C, identity: &I) -> Result<Option<user::Model>, CalstarError>
where
    C: ConnectionTrait,
    I: Identity + ?Sized,
{
    Ok(User::find()
        .filter(user::Column::IdentityHandle.eq(identity.handle()))
        .one(db)
        .await?)
}

pub async fn list<C>(db: &C, filter: UserFilter) -> Result<Vec<user::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    let mut select = User::find();
    if let Some(year) = filter.graduation_year {
        select = select.filter(user::Column::GraduationYear.eq(year));
    }
    if let Some(major) = filter.major {
        select = select.filter(user::Column::Major.eq(major));
    }
    let select = ordered(select, filter.order_by, |s| s.order_by_asc(user::Column::Id));
    Ok(select.all(db).await?)
}

/// Apply profile changes; `updated_at` is refreshed by the save.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: i32,
    changes: ProfileChanges,
) -> Result<user::Model, CalstarError> {
    let mut am = user::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(student_id) = changes.berkeley_student_id {
        am.berkeley_student_id = Set(student_id);
    }
    if let Some(major) = changes.major {
        am.major = Set(major);
    }
    if let Some(year) = changes.graduation_year {
        am.graduation_year = Set(year);
    }
    if !am.is_changed() {
        return get(db, id).await;
    }

    let txn = db.begin().await?;
    let model = am
        .update(&txn)
        .await
        .map_err(missing_row("User", id))?;
    txn.commit().await?;
    tracing::info!(id, "user profile updated");
    Ok(model)
}

/// Deletes the user with their uploaded resources and role assignments.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::USERS, "User", id).await
}
