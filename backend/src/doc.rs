//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together with
//! the wire DTOs and the schema wrappers for domain errors. The document backs
//! Swagger UI in debug builds and is printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::subscriptions::{
    CreateSubscriptionRequest, MessageResponse, PriceSumResponse, SubscriptionBody,
    SubscriptionListResponse, SubscriptionResponse, UpdateSubscriptionRequest,
    UpdatedSubscriptionResponse, UserSubscriptionsResponse,
};
use crate::inbound::http::users::{UserBody, UsersResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscriptions aggregator API",
        description = "Record users' online subscriptions and aggregate their cost."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::home,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::list_users,
        crate::inbound::http::subscriptions::create_subscription,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::subscriptions::get_subscription,
        crate::inbound::http::subscriptions::list_user_subscriptions,
        crate::inbound::http::subscriptions::update_subscription,
        crate::inbound::http::subscriptions::delete_subscription,
        crate::inbound::http::subscriptions::sum_prices,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SubscriptionBody,
        CreateSubscriptionRequest,
        UpdateSubscriptionRequest,
        SubscriptionListResponse,
        SubscriptionResponse,
        UserSubscriptionsResponse,
        UpdatedSubscriptionResponse,
        MessageResponse,
        PriceSumResponse,
        UserBody,
        UsersResponse,
    )),
    tags(
        (name = "subscriptions", description = "Subscription records and price aggregation"),
        (name = "users", description = "Users and their subscriptions"),
        (name = "health", description = "Greeting and probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("/home")]
    #[case("/get_users")]
    #[case("/create_sub")]
    #[case("/get_subs")]
    #[case("/get_subs/{id}")]
    #[case("/get_subs_by_user/{user_id}")]
    #[case("/update/{id}")]
    #[case("/delete/{id}")]
    #[case("/get_sum/{user_id}/{service_name}/{start_date}/{end_date}")]
    fn documents_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn error_schema_uses_camel_case_trace_id() {
        let fields = schema_fields("crate.domain.Error");
        for field in ["code", "message", "traceId", "details"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[rstest]
    fn subscription_schema_uses_snake_case_fields() {
        let fields = schema_fields("SubscriptionBody");
        for field in ["id", "service_name", "price", "user_id", "start_date", "end_date"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }
}
