//! Port for subscription persistence.
//!
//! Adapters store subscriptions with store-assigned identifiers and compute
//! the price aggregation. Each method maps to a single store statement.

use async_trait::async_trait;

use crate::domain::{
    NewSubscription, PriceSumFilter, Subscription, SubscriptionId, SubscriptionPatch, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "subscription repository query failed: {message}",
        /// A stored-data constraint rejected the write.
        Constraint => "subscription repository constraint violated: {message}",
    }
}

/// Port for subscription storage and aggregation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a subscription and return it with its assigned identifier.
    async fn insert(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, SubscriptionRepositoryError>;

    /// Return every stored subscription ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Subscription>, SubscriptionRepositoryError>;

    /// Fetch a subscription by identifier.
    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError>;

    /// Return the subscriptions referencing any of the given users.
    async fn find_by_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError>;

    /// Apply a non-empty patch, returning the updated record if it exists.
    async fn update(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError>;

    /// Delete a subscription, returning whether a row was removed.
    async fn delete(&self, id: SubscriptionId) -> Result<bool, SubscriptionRepositoryError>;

    /// Sum prices of matching subscriptions; zero when nothing matches.
    async fn sum_prices(&self, filter: &PriceSumFilter) -> Result<u64, SubscriptionRepositoryError>;
}
