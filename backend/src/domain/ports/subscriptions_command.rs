//! Driving port for subscription mutations.
//!
//! HTTP handlers call this port to create, update and delete subscriptions
//! without depending on the persistence adapters behind it.

use async_trait::async_trait;

use crate::domain::{Error, NewSubscription, Subscription, SubscriptionId, SubscriptionPatch};

/// Domain use-case port for subscription mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Persist a new subscription and return the stored record.
    async fn create(&self, subscription: NewSubscription) -> Result<Subscription, Error>;

    /// Apply the provided fields, preserving the rest.
    async fn update(
        &self,
        id: SubscriptionId,
        patch: SubscriptionPatch,
    ) -> Result<Subscription, Error>;

    /// Delete a subscription. Returns `false` when nothing matched.
    async fn delete(&self, id: SubscriptionId) -> Result<bool, Error>;
}
