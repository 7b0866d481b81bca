//! Persistence access layer.
//!
//! One module per entity, each with free functions taking the connection as
//! their first argument. Reads accept any [`ConnectionTrait`] so they can run
//! inside a caller's transaction; writes that touch more than one statement
//! open their own transaction on a [`DatabaseConnection`].
//!
//! Uniqueness is left to the store's unique indexes: a duplicate insert comes
//! back as [`CalstarError::ConstraintViolation`] instead of being pre-checked.
//!
//! Every write transaction issues its first write before any read. SQLite
//! cannot upgrade a transaction that has already read into a writer while
//! another connection writes; starting with the write makes it wait for the
//! lock instead of failing with `SQLITE_BUSY`.

use std::future::Future;
use std::pin::Pin;

use sea_orm::sea_query::{Alias, Expr, Query};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryOrder, QuerySelect,
    Select, TransactionTrait,
};

use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::schema::{self, OnDelete};

pub mod courses;
pub mod departments;
pub mod offerings;
pub mod professors;
pub mod resources;
pub mod reviews;
pub mod roles;
pub mod tags;
pub mod users;

/// Explicit ordering for a listing; `None` keeps the entity's default order.
pub type OrderBy<C> = Option<Vec<(C, Order)>>;

/// Apply `order_by` when given, otherwise the entity's default ordering.
pub(crate) fn ordered<E, F>(select: Select<E>, order_by: OrderBy<E::Column>, default: F) -> Select<E>
where
    E: EntityTrait,
    F: FnOnce(Select<E>) -> Select<E>,
{
    match order_by {
        Some(columns) if !columns.is_empty() => columns
            .into_iter()
            .fold(select, |select, (column, order)| select.order_by(column, order)),
        _ => default(select),
    }
}

/// Apply `page` when given; listings without one are unbounded.
pub(crate) fn paged<E>(select: Select<E>, page: Option<Pagination>) -> Select<E>
where
    E: EntityTrait,
{
    match page {
        Some(page) => select.limit(page.limit).offset(page.offset),
        None => select,
    }
}

/// Maps the "no row matched the UPDATE" error of `ActiveModel::update` to
/// [`CalstarError::NotFound`].
pub(crate) fn missing_row(label: &'static str, id: i32) -> impl FnOnce(DbErr) -> CalstarError {
    move |err| match err {
        DbErr::RecordNotUpdated => {
            CalstarError::NotFound(format!("{label} with id {id} not found"))
        }
        other => other.into(),
    }
}

/// Delete the row `table.id = id` together with everything the foreign-key
/// rules attach to it, as one transaction.
pub(crate) async fn delete_row(
    db: &DatabaseConnection,
    table: &'static str,
    label: &str,
    id: i32,
) -> Result<(), CalstarError> {
    let txn = db.begin().await?;
    let backend = txn.get_database_backend();

    // A no-op write on the row takes the write lock and tells us whether it exists.
    let claim = Query::update()
        .table(Alias::new(table))
        .value(Alias::new("id"), Expr::col(Alias::new("id")))
        .and_where(Expr::col(Alias::new("id")).eq(id))
        .to_owned();
    if txn.execute(backend.build(&claim)).await?.rows_affected() == 0 {
        txn.rollback().await?;
        return Err(CalstarError::NotFound(format!("{label} with id {id} not found")));
    }

    purge(&txn, table, vec![id]).await?;
    txn.commit().await?;
    tracing::info!(table, id, "row deleted");
    Ok(())
}

type PurgeFuture<'a> = Pin<Box<dyn Future<Output = Result<u64, DbErr>> + Send + 'a>>;

/// Remove `ids` from `table`, first applying every rule that references it:
/// cascading rules recurse into the child table, set-null rules clear the
/// child's column. Returns how many rows of `table` were removed.
fn purge<'a, C>(db: &'a C, table: &'static str, ids: Vec<i32>) -> PurgeFuture<'a>
where
    C: ConnectionTrait,
{
    Box::pin(async move {
        if ids.is_empty() {
            return Ok(0);
        }
        let backend = db.get_database_backend();

        for rule in schema::referencing(table) {
            match rule.on_delete {
                OnDelete::Cascade => {
                    let select = Query::select()
                        .column(Alias::new("id"))
                        .from(Alias::new(rule.child))
                        .and_where(Expr::col(Alias::new(rule.column)).is_in(ids.iter().copied()))
                        .to_owned();
                    let mut children = Vec::new();
                    for row in db.query_all(backend.build(&select)).await? {
                        children.push(row.try_get::<i32>("", "id")?);
                    }
                    let removed = purge(db, rule.child, children).await?;
                    tracing::debug!(rule = rule.name, removed, "cascaded delete");
                }
                OnDelete::SetNull => {
                    let update = Query::update()
                        .table(Alias::new(rule.child))
                        .value(Alias::new(rule.column), Option::<i32>::None)
                        .and_where(Expr::col(Alias::new(rule.column)).is_in(ids.iter().copied()))
                        .to_owned();
                    let cleared = db.execute(backend.build(&update)).await?.rows_affected();
                    tracing::debug!(rule = rule.name, cleared, "cleared references");
                }
            }
        }

        let delete = Query::delete()
            .from_table(Alias::new(table))
            .and_where(Expr::col(Alias::new("id")).is_in(ids))
            .to_owned();
        Ok(db.execute(backend.build(&delete)).await?.rows_affected())
    })
}
