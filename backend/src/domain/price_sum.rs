//! Filter for the subscription price aggregation.
//!
//! The aggregation sums `price` over subscriptions matching a user, a service
//! name and a window on `start_date`:
//!
//! ```text
//! SELECT COALESCE(SUM(price), 0) FROM subscriptions
//! WHERE user_id = $1 AND service_name = $2 AND start_date BETWEEN $3 AND $4
//! ```
//!
//! Only the subscription's `start_date` is compared against the window; its
//! `end_date` plays no part. The service name arrives as a raw path segment and
//! is percent-decoded exactly once here.

use chrono::NaiveDate;
use thiserror::Error;

use super::UserId;

/// Validation errors raised before the aggregation reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceSumQueryError {
    /// One of the four inputs is empty.
    #[error("missing required parameter `{name}`")]
    MissingParameter { name: &'static str },
    /// The service name is not valid percent-encoded UTF-8.
    #[error("invalid service name encoding `{value}`")]
    InvalidEncoding { value: String },
    /// The user identifier is not a UUID.
    #[error("user id `{value}` must be a valid UUID")]
    InvalidUserId { value: String },
    /// A window bound is not a `YYYY-MM-DD` date.
    #[error("`{name}` must be a YYYY-MM-DD date, got `{value}`")]
    InvalidDate { name: &'static str, value: String },
}

/// Raw aggregation inputs, exactly as taken from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPriceSumParams<'a> {
    pub user_id: &'a str,
    pub service_name: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
}

/// Validated aggregation filter.
///
/// # Examples
/// ```
/// use subscriptions_aggregator::domain::{PriceSumFilter, RawPriceSumParams};
///
/// let filter = PriceSumFilter::parse(RawPriceSumParams {
///     user_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6",
///     service_name: "Netflix%20Premium",
///     start_date: "2024-01-01",
///     end_date: "2024-02-28",
/// })
/// .expect("valid filter");
/// assert_eq!(filter.service_name(), "Netflix Premium");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSumFilter {
    user_id: UserId,
    service_name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl PriceSumFilter {
    /// Validate raw inputs, decoding the service name once.
    pub fn parse(raw: RawPriceSumParams<'_>) -> Result<Self, PriceSumQueryError> {
        for (name, value) in [
            ("user_id", raw.user_id),
            ("service_name", raw.service_name),
            ("start_date", raw.start_date),
            ("end_date", raw.end_date),
        ] {
            if value.is_empty() {
                return Err(PriceSumQueryError::MissingParameter { name });
            }
        }

        let service_name = unescape_segment(raw.service_name)?;
        let user_id =
            UserId::new(raw.user_id).map_err(|_| PriceSumQueryError::InvalidUserId {
                value: raw.user_id.to_owned(),
            })?;

        Ok(Self {
            user_id,
            service_name,
            start_date: parse_bound("start_date", raw.start_date)?,
            end_date: parse_bound("end_date", raw.end_date)?,
        })
    }

    /// Owning user to match.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Decoded service name to match exactly.
    pub fn service_name(&self) -> &str {
        self.service_name.as_str()
    }

    /// Inclusive lower bound on `start_date`.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Inclusive upper bound on `start_date`.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Whether a subscription row falls inside the filter.
    pub fn matches(&self, user_id: &UserId, service_name: &str, start_date: NaiveDate) -> bool {
        user_id == &self.user_id
            && service_name == self.service_name
            && (self.start_date..=self.end_date).contains(&start_date)
    }
}

fn parse_bound(name: &'static str, value: &str) -> Result<NaiveDate, PriceSumQueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| PriceSumQueryError::InvalidDate {
        name,
        value: value.to_owned(),
    })
}

/// Percent-decode a path segment using query-unescape rules.
///
/// `+` becomes a space and every `%` must start a two-digit hex escape.
fn unescape_segment(raw: &str) -> Result<String, PriceSumQueryError> {
    let invalid = || PriceSumQueryError::InvalidEncoding {
        value: raw.to_owned(),
    };

    let bytes = raw.as_bytes();
    let mut index = 0;
    while let Some(offset) = bytes
        .get(index..)
        .and_then(|rest| rest.iter().position(|byte| *byte == b'%'))
    {
        let escape = index + offset;
        let well_formed = bytes
            .get(escape + 1..escape + 3)
            .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(invalid());
        }
        index = escape + 3;
    }

    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|_| invalid())
}
