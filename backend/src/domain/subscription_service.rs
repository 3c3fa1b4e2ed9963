//! Subscription domain service.
//!
//! Implements the subscription driving ports over a [`SubscriptionRepository`],
//! translating repository failures into domain [`Error`] values. Every
//! operation issues exactly one repository call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    SubscriptionRepository, SubscriptionRepositoryError, SubscriptionsCommand,
    SubscriptionsQuery,
};
use crate::domain::{
    Error, NewSubscription, PriceSumFilter, Subscription, SubscriptionId, SubscriptionPatch,
    UserId,
};

/// Subscription service implementing the command and query ports.
#[derive(Clone)]
pub struct SubscriptionService<R> {
    repo: Arc<R>,
}

impl<R> SubscriptionService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

/// Translate a repository failure, keeping the adapter message in `details`.
pub(crate) fn map_repository_error(error: SubscriptionRepositoryError) -> Error {
    let (base, message) = match &error {
        SubscriptionRepositoryError::Connection { message } => (
            Error::service_unavailable("subscription store unavailable"),
            message,
        ),
        SubscriptionRepositoryError::Query { message } => {
            (Error::internal("subscription store error"), message)
        }
        SubscriptionRepositoryError::Constraint { message } => (
            Error::invalid_request("subscription violates a stored constraint"),
            message,
        ),
    };
    warn!(error = %error, "subscription repository call failed");
    base.with_details(json!({ "error": message }))
}

fn subscription_not_found(id: SubscriptionId) -> Error {
    Error::not_found(format!("subscription {id} not found"))
        .with_details(json!({ "id": id.get() }))
}

#[async_trait]
impl<R> SubscriptionsCommand for SubscriptionService<R>
where
    R: SubscriptionRepository,
{
    async fn create(&self, subscription: NewSubscription) -> Result<Subscription, Error> {
        let stored = self
            .repo
            .insert(&subscription)
            .await
            .map_err(map_repository_error)?;
        info!(id = %stored.id(), user_id = %stored.user_id(), "subscription created");
        Ok(stored)
    }

    async fn update(
        &self,
        id: SubscriptionId,
        patch: SubscriptionPatch,
    ) -> Result<Subscription, Error> {
        patch
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let updated = if patch.is_empty() {
            debug!(%id, "empty patch; returning stored subscription");
            self.repo.find_by_id(id).await
        } else {
            self.repo.update(id, &patch).await
        }
        .map_err(map_repository_error)?;

        let subscription = updated.ok_or_else(|| subscription_not_found(id))?;
        info!(%id, "subscription updated");
        Ok(subscription)
    }

    async fn delete(&self, id: SubscriptionId) -> Result<bool, Error> {
        let removed = self.repo.delete(id).await.map_err(map_repository_error)?;
        if removed {
            info!(%id, "subscription deleted");
        } else {
            debug!(%id, "delete matched no subscription");
        }
        Ok(removed)
    }
}

#[async_trait]
impl<R> SubscriptionsQuery for SubscriptionService<R>
where
    R: SubscriptionRepository,
{
    async fn list(&self) -> Result<Vec<Subscription>, Error> {
        self.repo.list_all().await.map_err(map_repository_error)
    }

    async fn get(&self, id: SubscriptionId) -> Result<Subscription, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| subscription_not_found(id))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, Error> {
        self.repo
            .find_by_users(std::slice::from_ref(user_id))
            .await
            .map_err(map_repository_error)
    }

    async fn sum_prices(&self, filter: &PriceSumFilter) -> Result<u64, Error> {
        let total = self
            .repo
            .sum_prices(filter)
            .await
            .map_err(map_repository_error)?;
        debug!(
            user_id = %filter.user_id(),
            service_name = filter.service_name(),
            total,
            "price sum computed"
        );
        Ok(total)
    }
}
