//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{SubscriptionService, UsersService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;

/// HTTP state over a fresh in-memory store, returned with the store so tests
/// can seed users.
pub fn in_memory_state() -> (web::Data<HttpState>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let subscriptions = Arc::new(SubscriptionService::new(store.clone()));
    let users = Arc::new(UsersService::new(store.clone(), store.clone()));
    let state = HttpState::new(subscriptions.clone(), subscriptions, users);
    (web::Data::new(state), store)
}
