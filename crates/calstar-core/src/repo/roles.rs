use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Unchanged,
};

use super::{delete_row, missing_row};
use crate::error::CalstarError;
use crate::models::role::{self, Entity as Role};
use crate::models::user::{self, Entity as User};
use crate::models::user_role::{self, Entity as UserRole};
use crate::schema;

pub async fn create<C>(db: &C, name: &str) -> Result<role::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = role::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, name, "role insert rejected"))?;

    tracing::info!(id = model.id, name, "role created");
    Ok(model)
}

pub async fn get<C>(db: &C, id: i32) -> Result<role::Model, CalstarError>
where
    C: ConnectionTrait,
{
    Role::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CalstarError::NotFound(format!("Role with id {id} not found")))
}

pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<role::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Role::find().filter(role::Column::Name.eq(name)).one(db).await?)
}

pub async fn list<C>(db: &C) -> Result<Vec<role::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Role::find().order_by_asc(role::Column::Id).all(db).await?)
}

pub async fn rename(db: &DatabaseConnection, id: i32, name: &str) -> Result<role::Model, CalstarError> {
    let am = role::ActiveModel {
        id: Unchanged(id),
        name: Set(name.to_string()),
    };
    let txn = db.begin().await?;
    let model = am.update(&txn).await.map_err(missing_row("Role", id))?;
    txn.commit().await?;
    tracing::info!(id, name, "role renamed");
    Ok(model)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), CalstarError> {
    delete_row(db, schema::ROLES, "Role", id).await
}

// ── Role assignment ──

/// Grant `role_id` to `user_id`. Granting the same role twice is rejected.
pub async fn assign<C>(db: &C, user_id: i32, role_id: i32) -> Result<user_role::Model, CalstarError>
where
    C: ConnectionTrait,
{
    let model = user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .inspect_err(|e| tracing::warn!(error = %e, user_id, role_id, "role assignment rejected"))?;

    tracing::info!(user_id, role_id, "role assigned");
    Ok(model)
}

pub async fn revoke(db: &DatabaseConnection, user_id: i32, role_id: i32) -> Result<(), CalstarError> {
    let removed = UserRole::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .filter(user_role::Column::RoleId.eq(role_id))
        .exec(db)
        .await?
        .rows_affected;
    if removed == 0 {
        return Err(CalstarError::NotFound(format!(
            "User {user_id} does not hold role {role_id}"
        )));
    }
    tracing::info!(user_id, role_id, "role revoked");
    Ok(())
}

pub async fn roles_for_user<C>(db: &C, user_id: i32) -> Result<Vec<role::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(Role::find()
        .inner_join(UserRole)
        .filter(user_role::Column::UserId.eq(user_id))
        .order_by_asc(role::Column::Name)
        .all(db)
        .await?)
}

pub async fn users_with_role<C>(db: &C, role_id: i32) -> Result<Vec<user::Model>, CalstarError>
where
    C: ConnectionTrait,
{
    Ok(User::find()
        .inner_join(UserRole)
        .filter(user_role::Column::RoleId.eq(role_id))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}
