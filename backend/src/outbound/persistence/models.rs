//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversions to and from domain types live beside them.

use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    MonthYear, NewSubscription, Price, ServiceName, Subscription, SubscriptionId,
    SubscriptionPatch, SubscriptionValidationError, UserId,
};

use super::schema::{subscriptions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
}

/// Row struct for reading from the subscriptions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubscriptionRow {
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = SubscriptionValidationError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let fields = NewSubscription::new(
            ServiceName::new(row.service_name)?,
            Price::new(i64::from(row.price))?,
            UserId::from_uuid(row.user_id),
            MonthYear::from_date(row.start_date),
            row.end_date.map(MonthYear::from_date),
        )?;
        Ok(Subscription::new(SubscriptionId::new(row.id)?, fields))
    }
}

/// Insertable struct for creating subscription records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub(crate) struct NewSubscriptionRow<'a> {
    pub service_name: &'a str,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl<'a> From<&'a NewSubscription> for NewSubscriptionRow<'a> {
    fn from(value: &'a NewSubscription) -> Self {
        Self {
            service_name: value.service_name().as_str(),
            price: price_column(value.price()),
            user_id: *value.user_id().as_uuid(),
            start_date: value.start_date().first_day(),
            end_date: value.end_date().map(|month| month.first_day()),
        }
    }
}

/// Changeset for partial updates; `None` fields are left untouched.
///
/// `end_date: Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subscriptions)]
pub(crate) struct SubscriptionChangeset<'a> {
    pub service_name: Option<&'a str>,
    pub price: Option<i32>,
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl<'a> From<&'a SubscriptionPatch> for SubscriptionChangeset<'a> {
    fn from(patch: &'a SubscriptionPatch) -> Self {
        Self {
            service_name: patch.service_name.as_ref().map(ServiceName::as_str),
            price: patch.price.map(price_column),
            user_id: patch.user_id.map(|id| *id.as_uuid()),
            start_date: patch.start_date.map(|month| month.first_day()),
            end_date: patch
                .end_date
                .map(|end| end.map(|month| month.first_day())),
        }
    }
}

/// `Price` is bounded by `i32::MAX`, so the conversion never saturates.
fn price_column(price: Price) -> i32 {
    i32::try_from(price.get()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[rstest]
    fn row_converts_to_domain_with_month_dates() {
        let row = SubscriptionRow {
            id: 11,
            service_name: "Netflix Premium".to_owned(),
            price: 1299,
            user_id: Uuid::nil(),
            start_date: date("2024-01-01"),
            end_date: Some(date("2024-06-01")),
        };

        let subscription = Subscription::try_from(row).expect("valid row");

        assert_eq!(subscription.id().get(), 11);
        assert_eq!(subscription.start_date().to_string(), "01-2024");
        assert_eq!(
            subscription.end_date().map(|month| month.to_string()),
            Some("06-2024".to_owned())
        );
    }

    #[rstest]
    fn negative_stored_price_is_rejected() {
        let row = SubscriptionRow {
            id: 1,
            service_name: "Spotify".to_owned(),
            price: -5,
            user_id: Uuid::nil(),
            start_date: date("2024-01-01"),
            end_date: None,
        };
        assert_eq!(
            Subscription::try_from(row),
            Err(SubscriptionValidationError::NegativePrice)
        );
    }

    #[rstest]
    fn changeset_distinguishes_untouched_and_cleared_end_date() {
        let untouched = SubscriptionPatch::default();
        assert_eq!(SubscriptionChangeset::from(&untouched).end_date, None);

        let cleared = SubscriptionPatch {
            end_date: Some(None),
            ..SubscriptionPatch::default()
        };
        assert_eq!(SubscriptionChangeset::from(&cleared).end_date, Some(None));
    }

    #[rstest]
    fn insert_row_stores_first_of_month() {
        let payload = NewSubscription::new(
            ServiceName::new("Spotify").expect("valid name"),
            Price::new(500).expect("valid price"),
            UserId::random(),
            "01-2024".parse().expect("valid month"),
            None,
        )
        .expect("valid payload");

        let row = NewSubscriptionRow::from(&payload);

        assert_eq!(row.start_date, date("2024-01-01"));
        assert_eq!(row.end_date, None);
        assert_eq!(row.price, 500);
    }
}
