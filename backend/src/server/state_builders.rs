//! Wiring of driven adapters into the driving ports held by [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use crate::domain::ports::{SubscriptionRepository, UserRepository};
use crate::domain::{SubscriptionService, UsersService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{DieselSubscriptionRepository, DieselUserRepository};

use super::ServerConfig;

fn state_over<S, U>(subscriptions: Arc<S>, users: Arc<U>) -> HttpState
where
    S: SubscriptionRepository + 'static,
    U: UserRepository + 'static,
{
    let subscription_service = Arc::new(SubscriptionService::new(subscriptions.clone()));
    let users_service = Arc::new(UsersService::new(users, subscriptions));
    HttpState::new(
        subscription_service.clone(),
        subscription_service,
        users_service,
    )
}

/// Build the HTTP state from the configured store.
///
/// Uses the Diesel repositories when a pool is attached and a fresh
/// [`InMemoryStore`] otherwise.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match config.db_pool() {
        Some(pool) => {
            info!("using PostgreSQL subscription store");
            state_over(
                Arc::new(DieselSubscriptionRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
            )
        }
        None => {
            warn!("no database configured; subscriptions are kept in memory");
            let store = Arc::new(InMemoryStore::new());
            state_over(store.clone(), store)
        }
    };
    web::Data::new(state)
}
