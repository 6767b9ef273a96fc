//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"manager","password":"secret"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, StaffAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Staff username.
    #[schema(example = "manager")]
    pub username: String,
    /// Account password.
    #[schema(example = "secret")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Account bound to the new session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionAccountBody {
    /// Staff account id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Whether the account is a superuser.
    pub is_superuser: bool,
}

impl From<StaffAccount> for SessionAccountBody {
    fn from(account: StaffAccount) -> Self {
        Self {
            id: account.id.value(),
            username: account.username,
            is_superuser: account.is_superuser,
        }
    }
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": "blank" }))
}

/// Authenticate a staff account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionAccountBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let account = state.login.authenticate(&credentials).await?;
    session.persist_staff(account.id)?;
    info!(staff_id = %account.id, "staff session established");
    Ok(HttpResponse::Ok().json(SessionAccountBody::from(account)))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
