//! Subscription HTTP handlers.
//!
//! ```text
//! POST   /create_sub
//! GET    /get_subs
//! GET    /get_subs/{id}
//! GET    /get_subs_by_user/{user_id}
//! PATCH  /update/{id}
//! DELETE /delete/{id}
//! GET    /get_sum/{user_id}/{service_name}/{start_date}/{end_date}
//! ```
//!
//! Dates travel as `MM-YYYY`, except the aggregation window which uses
//! `YYYY-MM-DD` bounds.
//!
//! Key segments match the empty string so that a missing key is answered
//! with a `missing_field` error rather than an unmatched route.

use actix_web::{HttpRequest, delete, get, patch, post, web};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, NewSubscription, Price, PriceSumFilter, PriceSumQueryError, RawPriceSumParams,
    ServiceName, Subscription, SubscriptionPatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_month_year, parse_subscription_id, parse_user_id,
    price_sum_error, subscription_validation_error,
};

const SUM_PREFIX: &str = "/get_sum/";

/// Subscription as exchanged on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionBody {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Netflix Premium")]
    pub service_name: String,
    /// Smallest currency unit.
    #[schema(example = 500)]
    pub price: u32,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    #[schema(example = "01-2024")]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "12-2024")]
    pub end_date: Option<String>,
}

impl From<Subscription> for SubscriptionBody {
    fn from(value: Subscription) -> Self {
        Self {
            id: value.id().get(),
            service_name: value.service_name().to_string(),
            price: value.price().get(),
            user_id: value.user_id().to_string(),
            start_date: value.start_date().to_string(),
            end_date: value.end_date().map(|month| month.to_string()),
        }
    }
}

fn bodies(subscriptions: Vec<Subscription>) -> Vec<SubscriptionBody> {
    subscriptions.into_iter().map(SubscriptionBody::from).collect()
}

/// Request body for `POST /create_sub`. Any `id` sent is ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Request body for `PATCH /update/{id}`.
///
/// Omitted fields are preserved; `"end_date": null` clears the end date.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// `{message, subs}` returned by `GET /get_subs`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionListResponse {
    pub message: String,
    pub subs: Vec<SubscriptionBody>,
}

/// `{message, Subscription}` returned by `GET /get_subs/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub message: String,
    #[serde(rename = "Subscription")]
    pub subscription: SubscriptionBody,
}

/// `{message, Subscription: [...]}` returned by `GET /get_subs_by_user/{user_id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSubscriptionsResponse {
    pub message: String,
    #[serde(rename = "Subscription")]
    pub subscriptions: Vec<SubscriptionBody>,
}

/// `{message, date}` returned by `PATCH /update/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedSubscriptionResponse {
    pub message: String,
    pub date: SubscriptionBody,
}

/// `{message}` returned by `DELETE /delete/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// `{message, Subscription: <total>}` returned by the aggregation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceSumResponse {
    pub message: String,
    #[serde(rename = "Subscription")]
    pub total: u64,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(FieldName::new(field)))
}

fn parse_service_name(raw: String) -> Result<ServiceName, Error> {
    ServiceName::new(raw).map_err(subscription_validation_error)
}

fn parse_price(raw: i64) -> Result<Price, Error> {
    Price::new(raw).map_err(subscription_validation_error)
}

fn parse_create_request(payload: CreateSubscriptionRequest) -> Result<NewSubscription, Error> {
    let service_name = parse_service_name(required(payload.service_name, "service_name")?)?;
    let price = parse_price(required(payload.price, "price")?)?;
    let user_id = parse_user_id(
        &required(payload.user_id, "user_id")?,
        FieldName::new("user_id"),
    )?;
    let start_date = parse_month_year(
        &required(payload.start_date, "start_date")?,
        FieldName::new("start_date"),
    )?;
    let end_date = payload
        .end_date
        .map(|raw| parse_month_year(&raw, FieldName::new("end_date")))
        .transpose()?;

    NewSubscription::new(service_name, price, user_id, start_date, end_date)
        .map_err(subscription_validation_error)
}

fn parse_update_request(payload: UpdateSubscriptionRequest) -> Result<SubscriptionPatch, Error> {
    Ok(SubscriptionPatch {
        service_name: payload.service_name.map(parse_service_name).transpose()?,
        price: payload.price.map(parse_price).transpose()?,
        user_id: payload
            .user_id
            .map(|raw| parse_user_id(&raw, FieldName::new("user_id")))
            .transpose()?,
        start_date: payload
            .start_date
            .map(|raw| parse_month_year(&raw, FieldName::new("start_date")))
            .transpose()?,
        end_date: payload
            .end_date
            .map(|end| {
                end.map(|raw| parse_month_year(&raw, FieldName::new("end_date")))
                    .transpose()
            })
            .transpose()?,
    })
}

/// Split the four aggregation inputs out of the raw request path.
///
/// The router percent-decodes matched segments, so the service name is
/// read from the undecoded URI and decoded exactly once by the domain.
fn raw_sum_params(path: &str) -> RawPriceSumParams<'_> {
    let tail = path
        .find(SUM_PREFIX)
        .map_or("", |index| &path[index + SUM_PREFIX.len()..]);
    let mut segments = tail.splitn(4, '/');
    let mut next = || segments.next().unwrap_or_default();
    RawPriceSumParams {
        user_id: next(),
        service_name: next(),
        start_date: next(),
        end_date: next(),
    }
}

/// Create a subscription.
#[utoipa::path(
    post,
    path = "/create_sub",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 200, description = "Stored subscription", body = SubscriptionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "createSubscription"
)]
#[post("/create_sub")]
pub async fn create_subscription(
    state: web::Data<HttpState>,
    payload: web::Json<CreateSubscriptionRequest>,
) -> ApiResult<web::Json<SubscriptionBody>> {
    let fields = parse_create_request(payload.into_inner())?;
    let stored = state.subscriptions.create(fields).await?;
    Ok(web::Json(SubscriptionBody::from(stored)))
}

/// List every subscription.
#[utoipa::path(
    get,
    path = "/get_subs",
    responses(
        (status = 200, description = "All subscriptions", body = SubscriptionListResponse),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions"
)]
#[get("/get_subs")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<SubscriptionListResponse>> {
    let subscriptions = state.subscriptions_query.list().await?;
    info!(count = subscriptions.len(), "subscriptions listed");
    Ok(web::Json(SubscriptionListResponse {
        message: "subscriptions retrieved successfully".to_owned(),
        subs: bodies(subscriptions),
    }))
}

/// Fetch a subscription by id.
#[utoipa::path(
    get,
    path = "/get_subs/{id}",
    params(("id" = i64, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "No such subscription", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "getSubscription"
)]
#[get("/get_subs/{id:[^/]*}")]
pub async fn get_subscription(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubscriptionResponse>> {
    let id = parse_subscription_id(&path.into_inner())?;
    let subscription = state.subscriptions_query.get(id).await?;
    Ok(web::Json(SubscriptionResponse {
        message: "subscription retrieved successfully".to_owned(),
        subscription: SubscriptionBody::from(subscription),
    }))
}

/// List a user's subscriptions; empty when the user has none.
#[utoipa::path(
    get,
    path = "/get_subs_by_user/{user_id}",
    params(("user_id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Subscriptions of the user", body = UserSubscriptionsResponse),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listUserSubscriptions"
)]
#[get("/get_subs_by_user/{user_id:[^/]*}")]
pub async fn list_user_subscriptions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserSubscriptionsResponse>> {
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("user_id"))?;
    let subscriptions = state.subscriptions_query.list_for_user(&user_id).await?;
    Ok(web::Json(UserSubscriptionsResponse {
        message: "subscriptions retrieved successfully".to_owned(),
        subscriptions: bodies(subscriptions),
    }))
}

/// Apply a partial update.
#[utoipa::path(
    patch,
    path = "/update/{id}",
    params(("id" = i64, Path, description = "Subscription id")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Updated subscription", body = UpdatedSubscriptionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No such subscription", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "updateSubscription"
)]
#[patch("/update/{id:[^/]*}")]
pub async fn update_subscription(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateSubscriptionRequest>,
) -> ApiResult<web::Json<UpdatedSubscriptionResponse>> {
    let id = parse_subscription_id(&path.into_inner())?;
    let patch = parse_update_request(payload.into_inner())?;
    let updated = state.subscriptions.update(id, patch).await?;
    Ok(web::Json(UpdatedSubscriptionResponse {
        message: "subscription updated successfully".to_owned(),
        date: SubscriptionBody::from(updated),
    }))
}

/// Delete a subscription. Deleting an unknown id succeeds without effect.
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = i64, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription deleted or absent", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "deleteSubscription"
)]
#[delete("/delete/{id:[^/]*}")]
pub async fn delete_subscription(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_subscription_id(&path.into_inner())?;
    state.subscriptions.delete(id).await?;
    Ok(web::Json(MessageResponse {
        message: "subscription deleted successfully".to_owned(),
    }))
}

/// Sum prices of a user's subscriptions to one service started in a window.
///
/// `service_name` is percent-decoded once; bounds are inclusive and compared
/// against each subscription's start month only.
#[utoipa::path(
    get,
    path = "/get_sum/{user_id}/{service_name}/{start_date}/{end_date}",
    params(
        ("user_id" = String, Path, description = "User UUID"),
        ("service_name" = String, Path, description = "Percent-encoded service name"),
        ("start_date" = String, Path, description = "Inclusive lower bound, YYYY-MM-DD"),
        ("end_date" = String, Path, description = "Inclusive upper bound, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Sum of matching prices, zero when none match", body = PriceSumResponse),
        (status = 400, description = "Missing or malformed parameter", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "sumSubscriptionPrices"
)]
#[get("/get_sum/{params:.*}")]
pub async fn sum_prices(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<web::Json<PriceSumResponse>> {
    let filter = PriceSumFilter::parse(raw_sum_params(request.uri().path()))
        .map_err(price_sum_error)?;
    let total = state.subscriptions_query.sum_prices(&filter).await?;
    Ok(web::Json(PriceSumResponse {
        message: "sum retrieved successfully".to_owned(),
        total,
    }))
}

/// `GET /get_sum` without any aggregation inputs.
#[get("/get_sum")]
pub async fn sum_prices_without_params() -> ApiResult<web::Json<PriceSumResponse>> {
    Err(price_sum_error(PriceSumQueryError::MissingParameter {
        name: "user_id",
    }))
}
