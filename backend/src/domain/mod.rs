//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed subscription model and the use cases
//! over it, independent of HTTP and storage. Types document their invariants
//! and serialisation contracts (serde) in their own Rustdoc.
//!
//! Public surface:
//! - [`MonthYear`]: month granularity date, `MM-YYYY` on the wire.
//! - [`Subscription`], [`NewSubscription`], [`SubscriptionPatch`]: the record,
//!   its creation payload and partial updates.
//! - [`User`], [`UserId`]: user identity with its looked-up subscriptions.
//! - [`PriceSumFilter`]: validated input of the price aggregation.
//! - [`Error`], [`ErrorCode`]: transport agnostic error payload.
//! - [`SubscriptionService`], [`UsersService`]: driving port implementations.

pub mod error;
pub mod month_year;
pub mod ports;
pub mod price_sum;
pub mod subscription;
pub mod subscription_service;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::error::{Error, ErrorCode};
pub use self::month_year::{MonthYear, MonthYearFormatError};
pub use self::price_sum::{PriceSumFilter, PriceSumQueryError, RawPriceSumParams};
pub use self::subscription::{
    NewSubscription, Price, ServiceName, Subscription, SubscriptionId, SubscriptionPatch,
    SubscriptionValidationError,
};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserIdValidationError};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use subscriptions_aggregator::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
