//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{AppSettings, DATABASE_URL_FALLBACK};
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::{json_error_handler, path_error_handler, route_not_found};
use crate::inbound::http::health::{HealthState, home, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::subscriptions::{
    create_subscription, delete_subscription, get_subscription, list_subscriptions,
    list_user_subscriptions, sum_prices, sum_prices_without_params, update_subscription,
};
use crate::inbound::http::users::list_users;

/// Assemble the application: routes, extractor error handlers and tracing.
///
/// Unmatched requests are answered with a JSON `not_found` error. Swagger UI is served under `/swagger/` in debug builds only.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use subscriptions_aggregator::inbound::http::health::HealthState;
/// use subscriptions_aggregator::server::{ServerConfig, build_app, build_http_state};
///
/// let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
/// let _app = build_app(web::Data::new(HealthState::new()), build_http_state(&config));
/// ```
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(home)
        .service(ready)
        .service(live)
        .service(list_users)
        .service(create_subscription)
        .service(list_subscriptions)
        .service(get_subscription)
        .service(list_user_subscriptions)
        .service(update_subscription)
        .service(delete_subscription)
        .service(sum_prices)
        .service(sum_prices_without_params)
        .default_service(web::to(route_not_found));

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/swagger/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the configured store.
///
/// The health state is marked ready once the listener is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
