//! Process-local store implementing the driven ports.
//!
//! Used when no database URL is configured and by the HTTP tests. It enforces
//! the same rules as the PostgreSQL schema: identifiers are assigned from an
//! increasing sequence and an update that would invert a subscription window
//! is rejected as a constraint violation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    SubscriptionRepository, SubscriptionRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    NewSubscription, PriceSumFilter, Subscription, SubscriptionId, SubscriptionPatch, UserId,
};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    users: BTreeSet<UserId>,
}

/// In-memory subscription and user store.
///
/// # Examples
/// ```
/// use subscriptions_aggregator::domain::UserId;
/// use subscriptions_aggregator::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::default();
/// store.add_user(UserId::random());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so it is returned by [`UserRepository::list_ids`].
    pub fn add_user(&self, id: UserId) {
        self.state().users.insert(id);
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave `State` half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn insert(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, SubscriptionRepositoryError> {
        let mut state = self.state();
        let next = state.last_id + 1;
        let id = SubscriptionId::new(next)
            .map_err(|err| SubscriptionRepositoryError::query(err.to_string()))?;
        let stored = Subscription::new(id, subscription.clone());
        state.last_id = next;
        state.subscriptions.insert(id, stored.clone());
        debug!(%id, "stored subscription in memory");
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        Ok(self.state().subscriptions.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        Ok(self.state().subscriptions.get(&id).cloned())
    }

    async fn find_by_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<Subscription>, SubscriptionRepositoryError> {
        Ok(self
            .state()
            .subscriptions
            .values()
            .filter(|subscription| user_ids.contains(subscription.user_id()))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let mut state = self.state();
        let Some(current) = state.subscriptions.get_mut(&id) else {
            return Ok(None);
        };
        let updated = patch
            .apply_to(current)
            .map_err(|err| SubscriptionRepositoryError::constraint(err.to_string()))?;
        *current = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: SubscriptionId) -> Result<bool, SubscriptionRepositoryError> {
        Ok(self.state().subscriptions.remove(&id).is_some())
    }

    async fn sum_prices(&self, filter: &PriceSumFilter) -> Result<u64, SubscriptionRepositoryError> {
        Ok(self
            .state()
            .subscriptions
            .values()
            .filter(|subscription| {
                filter.matches(
                    subscription.user_id(),
                    subscription.service_name().as_str(),
                    subscription.start_date().first_day(),
                )
            })
            .map(|subscription| u64::from(subscription.price().get()))
            .sum())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list_ids(&self) -> Result<Vec<UserId>, UserRepositoryError> {
        Ok(self.state().users.iter().copied().collect())
    }
}
