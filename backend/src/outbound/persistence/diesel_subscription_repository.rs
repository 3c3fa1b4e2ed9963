//! PostgreSQL-backed `SubscriptionRepository` using Diesel.
//!
//! Every method issues a single statement. Partial updates use
//! `UPDATE … RETURNING`, and the price aggregation uses
//! `COALESCE(SUM(price), 0)` so an empty match yields zero.

use async_trait::async_trait;
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{
    NewSubscription, PriceSumFilter, Subscription, SubscriptionId, SubscriptionPatch, UserId,
};

use super::diesel_error_mapping::StoreFailure;
use super::models::{NewSubscriptionRow, SubscriptionChangeset, SubscriptionRow};
use super::pool::DbPool;
use super::schema::subscriptions;

define_sql_function! {
    /// `COALESCE` over the nullable aggregate produced by `SUM`.
    fn coalesce(value: Nullable<BigInt>, fallback: BigInt) -> BigInt;
}

/// Diesel-backed implementation of the `SubscriptionRepository` port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> SubscriptionRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        StoreFailure::Query(message) => SubscriptionRepositoryError::query(message),
        StoreFailure::Constraint(message) => SubscriptionRepositoryError::constraint(message),
    }
}

/// Rows written through this adapter always convert; anything else was
/// written around the constraints.
fn row_to_subscription(row: SubscriptionRow) -> Result<Subscription, SubscriptionRepositoryError> {
    let id = row.id;
    Subscription::try_from(row).map_err(|err| {
        warn!(id, error = %err, "stored subscription failed validation");
        SubscriptionRepositoryError::query(format!("invalid stored subscription {id}: {err}"))
    })
}

fn rows_to_subscriptions(
    rows: Vec<SubscriptionRow>,
) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
    rows.into_iter().map(row_to_subscription).collect()
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn insert(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let row = diesel::insert_into(subscriptions::table)
            .values(NewSubscriptionRow::from(subscription))
            .returning(SubscriptionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;

        row_to_subscription(row)
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let rows: Vec<SubscriptionRow> = subscriptions::table
            .select(SubscriptionRow::as_select())
            .order(subscriptions::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        rows_to_subscriptions(rows)
    }

    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let row: Option<SubscriptionRow> = subscriptions::table
            .find(id.get())
            .select(SubscriptionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(row_to_subscription).transpose()
    }

    async fn find_by_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let uuids: Vec<Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<SubscriptionRow> = subscriptions::table
            .filter(subscriptions::user_id.eq_any(uuids))
            .select(SubscriptionRow::as_select())
            .order(subscriptions::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        rows_to_subscriptions(rows)
    }

    async fn update(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        // Diesel rejects an empty changeset.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let row: Option<SubscriptionRow> = diesel::update(subscriptions::table.find(id.get()))
            .set(SubscriptionChangeset::from(patch))
            .returning(SubscriptionRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(row_to_subscription).transpose()
    }

    async fn delete(&self, id: SubscriptionId) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let removed = diesel::delete(subscriptions::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;

        Ok(removed > 0)
    }

    async fn sum_prices(&self, filter: &PriceSumFilter) -> Result<u64, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let total: i64 = subscriptions::table
            .filter(subscriptions::user_id.eq(*filter.user_id().as_uuid()))
            .filter(subscriptions::service_name.eq(filter.service_name()))
            .filter(
                subscriptions::start_date.between(filter.start_date(), filter.end_date()),
            )
            .select(coalesce(diesel::dsl::sum(subscriptions::price), 0_i64))
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;

        u64::try_from(total)
            .map_err(|_| SubscriptionRepositoryError::query(format!("negative price sum {total}")))
    }
}
