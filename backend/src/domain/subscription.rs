//! Subscription record, its creation payload and partial updates.
//!
//! A subscription ties a user to a paid service for a window of months:
//!
//! ```text
//! { id, service_name, price, user_id, start_date: "MM-YYYY", end_date?: "MM-YYYY" }
//! ```
//!
//! `end_date`, when present, is never before `start_date`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MonthYear, UserId};

/// Validation errors for subscription values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionValidationError {
    #[error("subscription id must be a positive integer")]
    InvalidId,
    #[error("service name must not be empty")]
    EmptyServiceName,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("price must be at most {max}")]
    PriceTooLarge { max: u32 },
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: MonthYear, end: MonthYear },
}

/// Store-assigned subscription identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SubscriptionId(i64);

impl SubscriptionId {
    /// Validate a raw identifier.
    pub fn new(id: i64) -> Result<Self, SubscriptionValidationError> {
        if id <= 0 {
            return Err(SubscriptionValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Parse an identifier from a path segment.
    ///
    /// # Examples
    /// ```
    /// use subscriptions_aggregator::domain::SubscriptionId;
    ///
    /// assert_eq!(SubscriptionId::parse("42").expect("valid").get(), 42);
    /// assert!(SubscriptionId::parse("").is_err());
    /// assert!(SubscriptionId::parse("abc").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, SubscriptionValidationError> {
        let id = raw
            .parse::<i64>()
            .map_err(|_| SubscriptionValidationError::InvalidId)?;
        Self::new(id)
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for SubscriptionId {
    type Error = SubscriptionValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubscriptionId> for i64 {
    fn from(value: SubscriptionId) -> Self {
        value.0
    }
}

/// Name of the subscribed service. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Validate a service name. The text is kept as given.
    pub fn new(name: impl Into<String>) -> Result<Self, SubscriptionValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubscriptionValidationError::EmptyServiceName);
        }
        Ok(Self(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ServiceName {
    type Error = SubscriptionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(value: ServiceName) -> Self {
        value.0
    }
}

/// Price in the smallest currency unit.
///
/// Bounded by the `INTEGER` column it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Price(u32);

impl Price {
    /// Largest storable price.
    pub const MAX: u32 = i32::MAX as u32;

    /// Validate a raw price.
    ///
    /// # Examples
    /// ```
    /// use subscriptions_aggregator::domain::Price;
    ///
    /// assert_eq!(Price::new(500).expect("valid").get(), 500);
    /// assert!(Price::new(-1).is_err());
    /// ```
    pub fn new(price: i64) -> Result<Self, SubscriptionValidationError> {
        if price < 0 {
            return Err(SubscriptionValidationError::NegativePrice);
        }
        u32::try_from(price)
            .ok()
            .filter(|value| *value <= Self::MAX)
            .map(Self)
            .ok_or(SubscriptionValidationError::PriceTooLarge { max: Self::MAX })
    }

    /// Raw price value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = SubscriptionValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for u32 {
    fn from(value: Price) -> Self {
        value.0
    }
}

fn check_window(
    start: MonthYear,
    end: Option<MonthYear>,
) -> Result<(), SubscriptionValidationError> {
    match end {
        Some(end) if end < start => Err(SubscriptionValidationError::EndBeforeStart { start, end }),
        _ => Ok(()),
    }
}

/// Validated payload for creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    service_name: ServiceName,
    price: Price,
    user_id: UserId,
    start_date: MonthYear,
    end_date: Option<MonthYear>,
}

impl NewSubscription {
    /// Validate the subscription window and build the payload.
    pub fn new(
        service_name: ServiceName,
        price: Price,
        user_id: UserId,
        start_date: MonthYear,
        end_date: Option<MonthYear>,
    ) -> Result<Self, SubscriptionValidationError> {
        check_window(start_date, end_date)?;
        Ok(Self {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        })
    }

    /// Service name.
    pub fn service_name(&self) -> &ServiceName {
        &self.service_name
    }

    /// Price in the smallest currency unit.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// First month of the subscription.
    pub fn start_date(&self) -> MonthYear {
        self.start_date
    }

    /// Last month of the subscription, if bounded.
    pub fn end_date(&self) -> Option<MonthYear> {
        self.end_date
    }
}

/// Stored subscription record.
///
/// Built only from a validated [`NewSubscription`]; the HTTP layer converts it
/// into its own wire body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
    service_name: ServiceName,
    price: Price,
    user_id: UserId,
    start_date: MonthYear,
    end_date: Option<MonthYear>,
}

impl Subscription {
    /// Attach a store-assigned identifier to a validated payload.
    pub fn new(id: SubscriptionId, fields: NewSubscription) -> Self {
        let NewSubscription {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        } = fields;
        Self {
            id,
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Service name.
    pub fn service_name(&self) -> &ServiceName {
        &self.service_name
    }

    /// Price in the smallest currency unit.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// First month of the subscription.
    pub fn start_date(&self) -> MonthYear {
        self.start_date
    }

    /// Last month of the subscription, if bounded.
    pub fn end_date(&self) -> Option<MonthYear> {
        self.end_date
    }
}

/// Partial update applied to an existing subscription.
///
/// `None` leaves a field untouched. `end_date` distinguishes "leave as is"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub service_name: Option<ServiceName>,
    pub price: Option<Price>,
    pub user_id: Option<UserId>,
    pub start_date: Option<MonthYear>,
    pub end_date: Option<Option<MonthYear>>,
}

impl SubscriptionPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.service_name.is_none()
            && self.price.is_none()
            && self.user_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Reject patches whose own dates already form an inverted window.
    ///
    /// Windows mixing patched and stored dates are checked by the store.
    pub fn validate(&self) -> Result<(), SubscriptionValidationError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => check_window(start, end),
            _ => Ok(()),
        }
    }

    /// Apply the patch to a stored record, re-checking the window.
    pub fn apply_to(
        &self,
        current: &Subscription,
    ) -> Result<Subscription, SubscriptionValidationError> {
        let fields = NewSubscription::new(
            self.service_name
                .clone()
                .unwrap_or_else(|| current.service_name.clone()),
            self.price.unwrap_or(current.price),
            self.user_id.unwrap_or(current.user_id),
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )?;
        Ok(Subscription::new(current.id, fields))
    }
}
