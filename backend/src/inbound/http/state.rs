//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend only on the
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{SubscriptionsCommand, SubscriptionsQuery, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    pub users: Arc<dyn UsersQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use subscriptions_aggregator::domain::{SubscriptionService, UsersService};
    /// use subscriptions_aggregator::inbound::http::state::HttpState;
    /// use subscriptions_aggregator::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let subscriptions = Arc::new(SubscriptionService::new(store.clone()));
    /// let users = Arc::new(UsersService::new(store.clone(), store));
    /// let state = HttpState::new(subscriptions.clone(), subscriptions, users);
    /// let _query = state.subscriptions_query.clone();
    /// ```
    pub fn new(
        subscriptions: Arc<dyn SubscriptionsCommand>,
        subscriptions_query: Arc<dyn SubscriptionsQuery>,
        users: Arc<dyn UsersQuery>,
    ) -> Self {
        Self {
            subscriptions,
            subscriptions_query,
            users,
        }
    }
}
