//! End-to-end HTTP scenarios over the in-memory store.
//!
//! Requests go through the fully wired application, including the trace
//! middleware and the extractor error handlers.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use subscriptions_aggregator::domain::{SubscriptionService, UserId, UsersService};
use subscriptions_aggregator::inbound::http::health::HealthState;
use subscriptions_aggregator::inbound::http::state::HttpState;
use subscriptions_aggregator::outbound::memory::InMemoryStore;
use subscriptions_aggregator::server::build_app;

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

struct Harness {
    store: Arc<InMemoryStore>,
    state: web::Data<HttpState>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let subscriptions = Arc::new(SubscriptionService::new(store.clone()));
    let users = Arc::new(UsersService::new(store.clone(), store.clone()));
    let state = web::Data::new(HttpState::new(subscriptions.clone(), subscriptions, users));
    Harness { store, state }
}

async fn service(
    harness: &Harness,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(build_app(
        web::Data::new(HealthState::new()),
        harness.state.clone(),
    ))
    .await
}

async fn create<S>(app: &S, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/create_sub")
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

async fn get<S>(app: &S, uri: &str) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await
}

fn spotify(start: &str, price: u32) -> Value {
    json!({
        "service_name": "Spotify",
        "price": price,
        "user_id": USER,
        "start_date": start,
    })
}

#[rstest]
#[actix_web::test]
async fn create_stores_month_granularity_without_end_date(harness: Harness) {
    let app = service(&harness).await;

    let res = create(&app, spotify("01-2024", 500)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;

    assert_eq!(body["service_name"], "Spotify");
    assert_eq!(body["price"], 500);
    assert_eq!(body["user_id"], USER);
    assert_eq!(body["start_date"], "01-2024");
    assert!(body.get("end_date").is_none());

    let id = body["id"].as_i64().expect("numeric id");
    let fetched: Value = test::read_body_json(get(&app, &format!("/get_subs/{id}")).await).await;
    assert_eq!(fetched["Subscription"], body);
}

#[rstest]
#[actix_web::test]
async fn sum_adds_prices_inside_the_window(harness: Harness) {
    let app = service(&harness).await;
    for (start, price) in [("01-2024", 500), ("02-2024", 300), ("03-2024", 700)] {
        assert_eq!(create(&app, spotify(start, price)).await.status(), StatusCode::OK);
    }

    let res = get(&app, &format!("/get_sum/{USER}/Spotify/2024-01-01/2024-02-28")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["Subscription"], 800);
}

#[rstest]
#[actix_web::test]
async fn sum_decodes_service_name_once(harness: Harness) {
    let app = service(&harness).await;
    let mut payload = spotify("05-2024", 1200);
    payload["service_name"] = json!("Netflix Premium");
    assert_eq!(create(&app, payload).await.status(), StatusCode::OK);

    let res = get(
        &app,
        &format!("/get_sum/{USER}/Netflix%20Premium/2024-01-01/2024-12-31"),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["Subscription"], 1200);
}

#[rstest]
#[actix_web::test]
async fn sum_without_matches_is_zero(harness: Harness) {
    let app = service(&harness).await;

    let res = get(&app, &format!("/get_sum/{USER}/Spotify/2024-01-01/2024-12-31")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["Subscription"], 0);
}

#[rstest]
#[case(format!("/get_sum/{USER}/Spotify/2024-01-01"))]
#[case(format!("/get_sum/{USER}//2024-01-01/2024-12-31"))]
#[case(format!("/get_sum/not-a-uuid/Spotify/2024-01-01/2024-12-31"))]
#[case(format!("/get_sum/{USER}/Spotify/01-2024/2024-12-31"))]
#[case(format!("/get_sum/{USER}/Netflix%2/2024-01-01/2024-12-31"))]
#[actix_web::test]
async fn sum_rejects_malformed_parameters(harness: Harness, #[case] uri: String) {
    let app = service(&harness).await;

    let res = get(&app, &uri).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn delete_of_unknown_id_succeeds(harness: Harness) {
    let app = service(&harness).await;

    let req = test::TestRequest::delete().uri("/delete/4242").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert!(body["message"].is_string());
}

#[rstest]
#[actix_web::test]
async fn delete_removes_the_record(harness: Harness) {
    let app = service(&harness).await;
    let created: Value = test::read_body_json(create(&app, spotify("01-2024", 500)).await).await;
    let id = created["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::delete()
        .uri(&format!("/delete/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let res = get(&app, &format!("/get_subs/{id}")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn update_preserves_omitted_fields_and_clears_null_end(harness: Harness) {
    let app = service(&harness).await;
    let mut payload = spotify("01-2024", 500);
    payload["end_date"] = json!("12-2024");
    let created: Value = test::read_body_json(create(&app, payload).await).await;
    let id = created["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::patch()
        .uri(&format!("/update/{id}"))
        .set_json(json!({ "price": 650 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["date"]["price"], 650);
    assert_eq!(body["date"]["service_name"], "Spotify");
    assert_eq!(body["date"]["end_date"], "12-2024");

    let req = test::TestRequest::patch()
        .uri(&format!("/update/{id}"))
        .set_json(json!({ "end_date": null }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["date"].get("end_date").is_none());
    assert_eq!(body["date"]["price"], 650);
}

#[rstest]
#[actix_web::test]
async fn update_of_unknown_id_is_not_found(harness: Harness) {
    let app = service(&harness).await;

    let req = test::TestRequest::patch()
        .uri("/update/77")
        .set_json(json!({ "price": 1 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn end_before_start_is_rejected(harness: Harness) {
    let app = service(&harness).await;
    let mut payload = spotify("05-2024", 500);
    payload["end_date"] = json!("01-2024");

    let res = create(&app, payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");

    let listed: Value = test::read_body_json(get(&app, "/get_subs").await).await;
    assert_eq!(listed["subs"], json!([]));
}

#[rstest]
#[case(json!({"service_name": "Spotify", "price": 500, "user_id": USER, "start_date": "2024-01"}))]
#[case(json!({"service_name": "Spotify", "price": -1, "user_id": USER, "start_date": "01-2024"}))]
#[case(json!({"service_name": "Spotify", "price": 500, "user_id": "bob", "start_date": "01-2024"}))]
#[case(json!({"service_name": "", "price": 500, "user_id": USER, "start_date": "01-2024"}))]
#[actix_web::test]
async fn create_rejects_invalid_payloads(harness: Harness, #[case] payload: Value) {
    let app = service(&harness).await;

    let res = create(&app, payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_body(harness: Harness) {
    let app = service(&harness).await;

    let req = test::TestRequest::post()
        .uri("/create_sub")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["traceId"], trace_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn user_listing_groups_subscriptions(harness: Harness) {
    let owner = UserId::new(USER).expect("valid id");
    let idle = UserId::random();
    harness.store.add_user(owner);
    harness.store.add_user(idle);
    let app = service(&harness).await;
    assert_eq!(create(&app, spotify("01-2024", 500)).await.status(), StatusCode::OK);

    let body: Value = test::read_body_json(get(&app, "/get_users").await).await;
    let users = body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 2);
    let find = |id: String| {
        users
            .iter()
            .find(|user| user["id"] == id.as_str())
            .cloned()
            .expect("user listed")
    };
    assert_eq!(find(owner.to_string())["subscriptions"].as_array().map(Vec::len), Some(1));
    assert_eq!(find(idle.to_string())["subscriptions"], json!([]));

    let by_user: Value = test::read_body_json(get(&app, &format!("/get_subs_by_user/{USER}")).await).await;
    assert_eq!(by_user["Subscription"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("/home")]
#[case("/get_subs")]
#[case("/get_subs/abc")]
#[case("/get_subs/999")]
#[case("/health/live")]
#[actix_web::test]
async fn every_response_carries_a_trace_id(harness: Harness, #[case] uri: &str) {
    let app = service(&harness).await;

    let res = get(&app, uri).await;
    assert!(res.headers().contains_key("trace-id"), "{uri} lacks trace-id");
}

fn trace_id_of(res: &ServiceResponse) -> String {
    res.headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header")
}

#[rstest]
#[case(Method::GET, "/get_subs/", "id")]
#[case(Method::GET, "/get_subs_by_user/", "user_id")]
#[case(Method::PATCH, "/update/", "id")]
#[case(Method::DELETE, "/delete/", "id")]
#[case(Method::GET, "/get_sum", "user_id")]
#[case(Method::GET, "/get_sum/", "user_id")]
#[actix_web::test]
async fn empty_keys_are_missing_field_errors(
    harness: Harness,
    #[case] method: Method,
    #[case] uri: &str,
    #[case] field: &str,
) {
    let app = service(&harness).await;
    let req = test::TestRequest::default()
        .method(method)
        .uri(uri)
        .set_json(json!({}))
        .to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
    let trace_id = trace_id_of(&res);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], "missing_field");
    assert_eq!(body["traceId"], trace_id.as_str());
    assert!(body["message"].is_string());
}

#[rstest]
#[case(Method::GET, "/no_such_route")]
#[case(Method::GET, "/get_subs/1/extra")]
#[actix_web::test]
async fn unmatched_requests_get_a_not_found_body(
    harness: Harness,
    #[case] method: Method,
    #[case] uri: &str,
) {
    let app = service(&harness).await;
    let req = test::TestRequest::default().method(method).uri(uri).to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    let trace_id = trace_id_of(&res);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["traceId"], trace_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn home_returns_the_greeting(harness: Harness) {
    let app = service(&harness).await;

    let res = get(&app, "/home").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(
        std::str::from_utf8(&body).expect("utf8 body"),
        subscriptions_aggregator::inbound::http::health::GREETING
    );
}
