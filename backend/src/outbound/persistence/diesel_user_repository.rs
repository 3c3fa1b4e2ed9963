//! PostgreSQL-backed `UserRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{UserRepository, UserRepositoryError};

use super::diesel_error_mapping::StoreFailure;
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> UserRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        StoreFailure::Query(message) | StoreFailure::Constraint(message) => {
            UserRepositoryError::query(message)
        }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list_ids(&self) -> Result<Vec<UserId>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        Ok(rows
            .into_iter()
            .map(|row| UserId::from_uuid(row.id))
            .collect())
    }
}
