//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Known users. Subscriptions reference them by `user_id` without a
    /// foreign key.
    users (id) {
        id -> Uuid,
    }
}

diesel::table! {
    /// Subscription records.
    ///
    /// Dates are stored on the first day of their month.
    subscriptions (id) {
        /// Store-assigned identifier (`BIGSERIAL`).
        id -> Int8,
        service_name -> Text,
        /// Smallest currency unit, never negative.
        price -> Int4,
        user_id -> Uuid,
        start_date -> Date,
        /// Absent for open-ended subscriptions.
        end_date -> Nullable<Date>,
    }
}
