//! Users API handlers.
//!
//! ```text
//! GET /get_users
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::subscriptions::SubscriptionBody;

/// User with the subscriptions referencing it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub subscriptions: Vec<SubscriptionBody>,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            subscriptions: value
                .subscriptions()
                .iter()
                .cloned()
                .map(SubscriptionBody::from)
                .collect(),
        }
    }
}

/// `{message, users}` returned by `GET /get_users`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub message: String,
    pub users: Vec<UserBody>,
}

/// List known users with their subscriptions.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use subscriptions_aggregator::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/get_users",
    responses(
        (status = 200, description = "Users", body = UsersResponse),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/get_users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UsersResponse>> {
    let users = state.users.list_users().await?;
    info!(count = users.len(), "users listed");
    Ok(web::Json(UsersResponse {
        message: "users retrieved successfully".to_owned(),
        users: users.into_iter().map(UserBody::from).collect(),
    }))
}
