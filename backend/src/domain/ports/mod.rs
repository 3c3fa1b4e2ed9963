//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`SubscriptionRepository`], [`UserRepository`]) are
//! implemented by outbound adapters and return strongly typed port errors.
//! Driving ports ([`SubscriptionsCommand`], [`SubscriptionsQuery`],
//! [`UsersQuery`]) are implemented by domain services and return the domain
//! [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod subscription_repository;
mod subscriptions_command;
mod subscriptions_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use subscriptions_command::MockSubscriptionsCommand;
pub use subscriptions_command::SubscriptionsCommand;
#[cfg(test)]
pub use subscriptions_query::MockSubscriptionsQuery;
pub use subscriptions_query::SubscriptionsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
