//! Shared validation helpers for inbound HTTP adapters.
//!
//! Validation failures become `invalid_request` errors whose `details` name
//! the offending field, the rejected value and a stable code.

use serde_json::json;

use crate::domain::{
    Error, MonthYear, MonthYearFormatError, PriceSumQueryError, SubscriptionId,
    SubscriptionValidationError, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidUuid,
    InvalidMonthYear,
    InvalidDate,
    InvalidEncoding,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidMonthYear => "invalid_month_year",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidEncoding => "invalid_encoding",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let (Some(value), Some(map)) = (value, details.as_object_mut()) {
        map.insert("value".to_owned(), json!(value));
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
        None,
    )
}

/// Parse a subscription identifier taken from the request path.
pub(crate) fn parse_subscription_id(raw: &str) -> Result<SubscriptionId, Error> {
    let field = FieldName::new("id");
    if raw.is_empty() {
        return Err(missing_field_error(field));
    }
    SubscriptionId::parse(raw).map_err(|err| {
        field_error(field, err.to_string(), ErrorCode::InvalidId, Some(raw))
    })
}

/// Parse a UUID user identifier.
pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    if raw.is_empty() {
        return Err(missing_field_error(field));
    }
    UserId::new(raw).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            Some(raw),
        )
    })
}

/// Parse an `MM-YYYY` month-year.
pub(crate) fn parse_month_year(raw: &str, field: FieldName) -> Result<MonthYear, Error> {
    raw.parse().map_err(|err: MonthYearFormatError| {
        field_error(field, err.to_string(), ErrorCode::InvalidMonthYear, Some(raw))
    })
}

/// Map a value-object validation failure onto the field it concerns.
pub(crate) fn subscription_validation_error(err: SubscriptionValidationError) -> Error {
    let field = match &err {
        SubscriptionValidationError::InvalidId => FieldName::new("id"),
        SubscriptionValidationError::EmptyServiceName => FieldName::new("service_name"),
        SubscriptionValidationError::NegativePrice
        | SubscriptionValidationError::PriceTooLarge { .. } => FieldName::new("price"),
        SubscriptionValidationError::EndBeforeStart { .. } => FieldName::new("end_date"),
    };
    field_error(field, err.to_string(), ErrorCode::InvalidValue, None)
}

/// Map a rejected price aggregation filter.
pub(crate) fn price_sum_error(err: PriceSumQueryError) -> Error {
    let message = err.to_string();
    match err {
        PriceSumQueryError::MissingParameter { name } => {
            field_error(FieldName::new(name), message, ErrorCode::MissingField, None)
        }
        PriceSumQueryError::InvalidEncoding { value } => field_error(
            FieldName::new("service_name"),
            message,
            ErrorCode::InvalidEncoding,
            Some(&value),
        ),
        PriceSumQueryError::InvalidUserId { value } => field_error(
            FieldName::new("user_id"),
            message,
            ErrorCode::InvalidUuid,
            Some(&value),
        ),
        PriceSumQueryError::InvalidDate { name, value } => field_error(
            FieldName::new(name),
            message,
            ErrorCode::InvalidDate,
            Some(&value),
        ),
    }
}
