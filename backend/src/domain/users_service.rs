//! Users domain service.
//!
//! Lists every known user together with the subscriptions referencing it.
//! Subscriptions are fetched in one batch and grouped in memory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    SubscriptionRepository, UserRepository, UserRepositoryError, UsersQuery,
};
use crate::domain::subscription_service::map_repository_error;
use crate::domain::{Error, Subscription, User, UserId};

/// Service implementing [`UsersQuery`].
#[derive(Clone)]
pub struct UsersService<U, S> {
    users: Arc<U>,
    subscriptions: Arc<S>,
}

impl<U, S> UsersService<U, S> {
    /// Create a new service over the user and subscription repositories.
    pub fn new(users: Arc<U>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    warn!(error = %error, "user repository call failed");
    let (base, message) = match &error {
        UserRepositoryError::Connection { message } => {
            (Error::service_unavailable("user store unavailable"), message)
        }
        UserRepositoryError::Query { message } => (Error::internal("user store error"), message),
    };
    base.with_details(json!({ "error": message }))
}

#[async_trait]
impl<U, S> UsersQuery for UsersService<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let ids = self.users.list_ids().await.map_err(map_user_error)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut grouped: HashMap<UserId, Vec<Subscription>> = HashMap::new();
        for subscription in self
            .subscriptions
            .find_by_users(&ids)
            .await
            .map_err(map_repository_error)?
        {
            grouped
                .entry(*subscription.user_id())
                .or_default()
                .push(subscription);
        }

        Ok(ids
            .into_iter()
            .map(|id| {
                let subscriptions = grouped.remove(&id).unwrap_or_default();
                User::new(id, subscriptions)
            })
            .collect())
    }
}
