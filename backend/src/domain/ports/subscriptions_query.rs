//! Driving port for subscription reads and the price aggregation.

use async_trait::async_trait;

use crate::domain::{Error, PriceSumFilter, Subscription, SubscriptionId, UserId};

/// Domain use-case port for subscription lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Every stored subscription.
    async fn list(&self) -> Result<Vec<Subscription>, Error>;

    /// A single subscription; `not_found` when absent.
    async fn get(&self, id: SubscriptionId) -> Result<Subscription, Error>;

    /// Subscriptions owned by a user; empty when there are none.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, Error>;

    /// Sum of matching prices; zero when nothing matches.
    async fn sum_prices(&self, filter: &PriceSumFilter) -> Result<u64, Error>;
}
